// Turn selection policy
//
// Who speaks next: the initiator on an empty log, otherwise any persona whose
// role differs from the last speaker's. With exactly two personas this
// degenerates to strict alternation; with more, the choice is uniform random.

use rand::seq::SliceRandom;

use crate::agent::Agent;
use crate::conversation::ConversationLog;
use crate::error::{DialogueError, Result};
use crate::role::SpeakerRole;

/// Role tag that opens every conversation
pub const INITIATOR_ROLE: SpeakerRole = SpeakerRole::User;

/// Pick the next speaker for the given log.
///
/// An empty roster or a roster where every persona shares the last speaker's
/// role is a configuration error and is signaled, never guessed around.
pub fn next_speaker<'a>(log: &ConversationLog, agents: &'a [Agent]) -> Result<&'a Agent> {
    if agents.is_empty() {
        return Err(DialogueError::EmptyRoster);
    }

    let Some(last_role) = log.last_role() else {
        // First message is always the initiator; first match in configured
        // order breaks any ambiguity deterministically.
        return agents
            .iter()
            .find(|a| a.persona().role == INITIATOR_ROLE)
            .ok_or_else(|| DialogueError::config("no persona with the initiator role"));
    };

    let eligible: Vec<&Agent> = agents
        .iter()
        .filter(|a| a.persona().role != last_role)
        .collect();

    match eligible.len() {
        0 => Err(DialogueError::NoEligibleSpeaker),
        1 => Ok(eligible[0]),
        _ => eligible
            .choose(&mut rand::thread_rng())
            .copied()
            .ok_or(DialogueError::NoEligibleSpeaker),
    }
}
