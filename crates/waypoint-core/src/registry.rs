//! The skill registry: the engine's only route to skill code.
//!
//! `execute_skill` always answers with a `SkillResult`, even for an unknown
//! skill id or params that violate the skill's declared input schema. Only an
//! `Err` returned by the skill itself escapes as an error.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use waypoint_contracts::{
    error::WaypointResult,
    skill::{FailureReason, SkillResult},
};

use crate::{context::SkillContext, traits::Skill};

/// Skills keyed by id.
#[derive(Default)]
pub struct SkillRegistry {
    skills: HashMap<String, Box<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `skill` under its id. Registering the same id twice replaces
    /// the previous skill.
    pub fn register_skill(&mut self, skill: Box<dyn Skill>) {
        let id = skill.id().to_string();
        debug!(skill_id = %id, triggers = ?skill.triggers(), "registering skill");
        if self.skills.insert(id.clone(), skill).is_some() {
            warn!(skill_id = %id, "skill re-registered, previous implementation replaced");
        }
    }

    /// Ids of every registered skill, sorted.
    pub fn skill_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.skills.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Invoke `skill_id` with `params`.
    ///
    /// - Unknown id → `Ok` failure with reason `Unavailable`.
    /// - Schema violation → `Ok` failure with reason `InvalidInput`, listing
    ///   every violation; the skill is not called.
    /// - Otherwise whatever the skill returns.
    pub fn execute_skill(
        &self,
        skill_id: &str,
        params: &Map<String, Value>,
        ctx: &SkillContext<'_>,
    ) -> WaypointResult<SkillResult> {
        let Some(skill) = self.skills.get(skill_id) else {
            warn!(skill_id = %skill_id, "skill not registered");
            return Ok(SkillResult::failure_with(
                FailureReason::Unavailable,
                format!("skill '{skill_id}' is not registered"),
            ));
        };

        if let Some(schema) = skill.input_schema() {
            if let Some(violations) = Self::validate(skill_id, &schema, params) {
                return Ok(SkillResult::failure_with(FailureReason::InvalidInput, violations));
            }
        }

        debug!(skill_id = %skill_id, "invoking skill");
        skill.execute(params, ctx)
    }

    /// Check `params` against `schema`, returning a joined violation summary
    /// or `None` when the params conform.
    fn validate(skill_id: &str, schema: &Value, params: &Map<String, Value>) -> Option<String> {
        let instance = Value::Object(params.clone());
        let messages: Vec<String> = match jsonschema::validator_for(schema) {
            Ok(validator) => validator
                .iter_errors(&instance)
                .map(|e| format!("input violation at '{}': {}", e.instance_path, e))
                .collect(),
            Err(e) => vec![format!("invalid input schema for skill '{skill_id}': {e}")],
        };

        if messages.is_empty() {
            None
        } else {
            let summary = messages.join("; ");
            warn!(skill_id = %skill_id, violations = %summary, "skill input rejected");
            Some(summary)
        }
    }
}
