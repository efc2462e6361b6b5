//! Append-only execution records.
//!
//! Every skill attempt the engine makes, primary or fallback, produces exactly
//! one `ExecutionRecord` in `Plan::history`. Records are never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::skill::FailureReason;

/// Suffix appended to a step id when recording its fallback attempt.
pub const FALLBACK_SUFFIX: &str = "_fallback";

/// One entry in a plan's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// The step id, or `<id>_fallback` for a fallback attempt.
    pub step_id: String,
    /// The skill actually invoked.
    pub skill_id: String,
    /// The fully resolved input sent to the skill.
    pub input: Map<String, Value>,
    /// The skill's data payload (`Null` when none was returned).
    pub output: Value,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Classified failure reason for unsuccessful attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    /// Wall-clock time the attempt finished (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ExecutionRecord {
    /// Return true if this record is a successful attempt for `step_id`,
    /// either by the primary skill or by its fallback.
    pub fn satisfies(&self, step_id: &str) -> bool {
        if !self.success {
            return false;
        }
        match self.step_id.strip_suffix(FALLBACK_SUFFIX) {
            Some(base) => base == step_id || self.step_id == step_id,
            None => self.step_id == step_id,
        }
    }
}

/// The step id under which a fallback attempt for `step_id` is recorded.
pub fn fallback_step_id(step_id: &str) -> String {
    format!("{step_id}{FALLBACK_SUFFIX}")
}
