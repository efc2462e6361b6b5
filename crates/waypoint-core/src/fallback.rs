//! The fallback executor.
//!
//! Runs a step's alternate skill with the same resolved input the primary
//! received, and records the attempt under `<step_id>_fallback` so the audit
//! trail tells primary and fallback attempts apart.

use serde_json::{Map, Value};
use tracing::{info, warn};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    execution::fallback_step_id,
    plan::Plan,
    step::Step,
};

use crate::{observe, registry::SkillRegistry, traits::MemoryService};

pub(crate) struct FallbackExecutor<'a> {
    registry: &'a SkillRegistry,
    memory: &'a dyn MemoryService,
}

impl<'a> FallbackExecutor<'a> {
    pub(crate) fn new(registry: &'a SkillRegistry, memory: &'a dyn MemoryService) -> Self {
        Self { registry, memory }
    }

    /// Attempt `fallback_skill` for `step` and record the attempt.
    ///
    /// Returns the fallback's output on success. Any failure, reported or
    /// raised, becomes `WaypointError::FallbackFailed`; the caller marks the
    /// plan failed. Nothing else is tried.
    pub(crate) fn execute(
        &self,
        plan: &mut Plan,
        step: &Step,
        fallback_skill: &str,
        input: &Map<String, Value>,
    ) -> WaypointResult<Value> {
        let record_id = fallback_step_id(&step.id);
        info!(
            plan_id = %plan.id,
            step_id = %step.id,
            primary_skill = %step.skill_id,
            fallback_skill = %fallback_skill,
            "primary skill failed, trying fallback"
        );

        match observe::invoke(self.registry, self.memory, plan, &step.id, fallback_skill, input) {
            Ok(result) => {
                plan.record(observe::record_for(&record_id, fallback_skill, input.clone(), &result));
                if result.success {
                    Ok(result.data.unwrap_or(Value::Null))
                } else {
                    let reason = result.error_text();
                    warn!(
                        plan_id = %plan.id,
                        step_id = %step.id,
                        fallback_skill = %fallback_skill,
                        reason = %reason,
                        "fallback skill failed"
                    );
                    Err(WaypointError::FallbackFailed {
                        skill_id: fallback_skill.to_string(),
                        reason,
                    })
                }
            }
            Err(e) => {
                let reason = e.to_string();
                plan.record(observe::record_for_exception(&record_id, fallback_skill, input.clone(), &reason));
                warn!(
                    plan_id = %plan.id,
                    step_id = %step.id,
                    fallback_skill = %fallback_skill,
                    reason = %reason,
                    "fallback skill raised an error"
                );
                Err(WaypointError::FallbackFailed {
                    skill_id: fallback_skill.to_string(),
                    reason,
                })
            }
        }
    }
}
