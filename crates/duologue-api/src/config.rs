// Deployment configuration for the dialogue roster
//
// Model identifier, topic, and the two persona definitions come from the
// environment; everything has a working default so the server boots with
// nothing but GROQ_API_KEY set.

use duologue_core::{Persona, SpeakerRole};

const DEFAULT_MODEL: &str = "moonshotai/kimi-k2-instruct";
const DEFAULT_TOPIC: &str = "Two models in dialogue";

const DEFAULT_USER_NAME: &str = "John";
const DEFAULT_USER_GOAL: &str = "You are John, a stubborn contrarian who has never once \
changed his mind. You try to charm the other person into seeing your perspective and \
reject any suggestion to reconsider. Always respond in a short single sentence.";

const DEFAULT_ASSISTANT_NAME: &str = "Samantha";
const DEFAULT_ASSISTANT_GOAL: &str = "You are Samantha, a patient therapist. You help \
people question their fixed ideas. Always respond in a short single sentence.";

#[derive(Debug, Clone)]
pub struct DialogueConfig {
    pub model: String,
    pub topic: String,
    pub user_name: String,
    pub user_goal: String,
    pub assistant_name: String,
    pub assistant_goal: String,
}

impl DialogueConfig {
    pub fn from_env() -> Self {
        let get = |key: &str, default: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            model: get("DUOLOGUE_MODEL", DEFAULT_MODEL),
            topic: get("DUOLOGUE_TOPIC", DEFAULT_TOPIC),
            user_name: get("DUOLOGUE_USER_NAME", DEFAULT_USER_NAME),
            user_goal: get("DUOLOGUE_USER_GOAL", DEFAULT_USER_GOAL),
            assistant_name: get("DUOLOGUE_ASSISTANT_NAME", DEFAULT_ASSISTANT_NAME),
            assistant_goal: get("DUOLOGUE_ASSISTANT_GOAL", DEFAULT_ASSISTANT_GOAL),
        }
    }

    /// The two configured personas, initiator first
    pub fn personas(&self) -> Vec<Persona> {
        vec![
            Persona::new(
                &self.user_name,
                SpeakerRole::User,
                &self.user_goal,
                &self.model,
            ),
            Persona::new(
                &self.assistant_name,
                SpeakerRole::Assistant,
                &self.assistant_goal,
                &self.model,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personas_initiator_first() {
        let config = DialogueConfig {
            model: "test-model".into(),
            topic: "t".into(),
            user_name: "A".into(),
            user_goal: "ga".into(),
            assistant_name: "B".into(),
            assistant_goal: "gb".into(),
        };
        let personas = config.personas();
        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].role, SpeakerRole::User);
        assert_eq!(personas[0].name, "A");
        assert_eq!(personas[1].role, SpeakerRole::Assistant);
        assert_eq!(personas[1].model, "test-model");
    }
}
