// Persona descriptor
//
// A configured identity: display name, role tag, behavioral instruction and
// model binding. Immutable after construction; one per persona for the
// lifetime of the process.

use crate::role::SpeakerRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name (e.g. "John")
    pub name: String,
    /// Role tag this persona speaks under
    pub role: SpeakerRole,
    /// System instruction sent with every completion request
    pub goal: String,
    /// Model identifier at the completion provider
    pub model: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        role: SpeakerRole,
        goal: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            goal: goal.into(),
            model: model.into(),
        }
    }
}
