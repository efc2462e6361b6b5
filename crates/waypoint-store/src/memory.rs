//! In-memory implementation of `MemoryService`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    memory::MemoryType,
};
use waypoint_core::traits::MemoryService;

/// One stored memory value and when it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub memory_type: MemoryType,
    pub key: String,
    pub value: Value,
    pub saved_at: DateTime<Utc>,
}

type MemoryKey = (String, MemoryType, String);

/// Session-scoped key/value memory. Later writes to the same
/// (session, type, key) replace earlier ones.
#[derive(Clone, Default)]
pub struct InMemoryMemoryService {
    entries: Arc<Mutex<HashMap<MemoryKey, MemoryEntry>>>,
}

impl InMemoryMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries for `session_id`, ordered by type then key.
    pub fn entries(&self, session_id: &str) -> Vec<MemoryEntry> {
        let Ok(entries) = self.entries.lock() else {
            return vec![];
        };
        let mut found: Vec<MemoryEntry> = entries
            .iter()
            .filter(|((session, _, _), _)| session == session_id)
            .map(|(_, entry)| entry.clone())
            .collect();
        found.sort_by(|a, b| a.memory_type.to_string().cmp(&b.memory_type.to_string()).then(a.key.cmp(&b.key)));
        found
    }
}

impl MemoryService for InMemoryMemoryService {
    fn save_memory(&self, session_id: &str, memory_type: MemoryType, key: &str, value: Value) -> WaypointResult<()> {
        let mut entries = self.entries.lock().map_err(|e| WaypointError::MemoryWriteFailed {
            reason: format!("memory lock poisoned: {}", e),
        })?;
        debug!(session_id = %session_id, memory_type = %memory_type, key = %key, "memory saved");
        entries.insert(
            (session_id.to_string(), memory_type, key.to_string()),
            MemoryEntry {
                memory_type,
                key: key.to_string(),
                value,
                saved_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn load_memory(&self, session_id: &str, memory_type: MemoryType, key: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(&(session_id.to_string(), memory_type, key.to_string()))
            .map(|entry| entry.value.clone())
    }
}
