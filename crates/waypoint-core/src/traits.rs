//! Collaborator trait definitions for the Waypoint orchestrator.
//!
//! These traits define every seam the orchestrator talks through:
//!
//! - `Skill`            — an externally registered capability, invoked by id
//! - `PlanStore`        — the authoritative table of live plans
//! - `MemoryService`    — best-effort session memory
//! - `IntentClassifier` — free text → intent type + params
//! - `PlanSynthesizer`  — intent type + params → ordered steps

use serde_json::{Map, Value};

use waypoint_contracts::{
    error::WaypointResult,
    intent::IntentMatch,
    memory::MemoryType,
    plan::{Context, Plan},
    skill::SkillResult,
    step::Step,
};

use crate::context::SkillContext;

/// A capability the engine can invoke for a step.
///
/// Implementations are **untrusted** from the engine's perspective: a
/// reported failure (`Ok` with `success = false`) is recoverable through
/// fallback or replanning, while an `Err` is treated as an exception and fails
/// the plan outright.
pub trait Skill: Send + Sync {
    /// Stable identifier steps refer to (e.g. "product-search").
    fn id(&self) -> &str;

    /// Intent types this skill is typically used for. Informational only.
    fn triggers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional JSON Schema the resolved params must satisfy.
    ///
    /// When present, the registry validates params before calling `execute()`
    /// and returns an `InvalidInput` failure without invoking the skill.
    fn input_schema(&self) -> Option<Value> {
        None
    }

    /// Run the skill with fully resolved params.
    fn execute(&self, params: &Map<String, Value>, ctx: &SkillContext<'_>)
        -> WaypointResult<SkillResult>;
}

/// The table of live plans, keyed by plan id.
///
/// Writes after creation go through `compare_and_swap`, which succeeds only
/// when the stored plan's `revision` still equals `expected_revision`. The
/// store bumps `revision` on every successful write.
pub trait PlanStore: Send + Sync {
    /// Store a brand-new plan. Fails if the id already exists.
    fn insert(&self, plan: Plan) -> WaypointResult<Plan>;

    /// Return a snapshot of the plan, or `None` if the id is unknown.
    fn get(&self, plan_id: &str) -> WaypointResult<Option<Plan>>;

    /// Replace the stored plan if its revision still matches.
    ///
    /// Returns the committed plan (with its new revision) on success and
    /// `WaypointError::ConcurrentModification` if another write won.
    fn compare_and_swap(&self, plan: Plan, expected_revision: u64) -> WaypointResult<Plan>;
}

/// Session-scoped memory.
///
/// The orchestrator writes one `workflow` entry per plan creation. Writes are
/// best-effort: a failure is logged and never affects the plan itself.
pub trait MemoryService: Send + Sync {
    fn save_memory(
        &self,
        session_id: &str,
        memory_type: MemoryType,
        key: &str,
        value: Value,
    ) -> WaypointResult<()>;

    /// Read back an entry. Default: nothing is readable.
    fn load_memory(&self, _session_id: &str, _memory_type: MemoryType, _key: &str) -> Option<Value> {
        None
    }
}

/// Maps free text to an intent. Must never fail: unrecognized text degrades
/// to a general query.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> IntentMatch;
}

/// Builds the ordered step list for an intent.
///
/// Returning an empty list signals that no plan can be produced.
pub trait PlanSynthesizer: Send + Sync {
    fn synthesize(&self, intent_type: &str, params: &Map<String, Value>, context: &Context)
        -> Vec<Step>;
}
