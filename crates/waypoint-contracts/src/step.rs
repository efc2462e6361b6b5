//! Planned units of work.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One planned unit of work bound to a skill.
///
/// Steps are immutable once created. Replanning inserts new `Step` values into
/// a plan but never edits an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Identifier unique within the plan (e.g. "search", "select").
    pub id: String,
    /// The skill the engine invokes for this step.
    pub skill_id: String,
    /// Human-readable description, used in prompts.
    pub description: String,
    /// Field → literal value or whole-field `{{var}}` template.
    #[serde(default)]
    pub input: Map<String, Value>,
    /// Step ids that must have succeeded before this one runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Advisory condition. The engine does not evaluate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Alternate skill to try when `skill_id` fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Step {
    /// Build a step with no input, dependencies, condition or fallback.
    pub fn new(
        id: impl Into<String>,
        skill_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            skill_id: skill_id.into(),
            description: description.into(),
            input: Map::new(),
            depends_on: Vec::new(),
            condition: None,
            fallback: None,
        }
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }

    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.depends_on.push(step_id.into());
        self
    }

    pub fn with_fallback(mut self, skill_id: impl Into<String>) -> Self {
        self.fallback = Some(skill_id.into());
        self
    }
}
