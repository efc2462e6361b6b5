//! Memory-service categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The category a memory entry is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Pointers to plans and workflows started in a session.
    Workflow,
    /// User preferences gathered during conversation.
    Preference,
    /// Free-form conversational facts.
    Conversation,
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryType::Workflow => "workflow",
            MemoryType::Preference => "preference",
            MemoryType::Conversation => "conversation",
        };
        f.write_str(name)
    }
}
