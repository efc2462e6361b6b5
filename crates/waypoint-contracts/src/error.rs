//! Runtime error types for the Waypoint orchestrator.
//!
//! All fallible operations return `WaypointResult<T>`. The orchestrator facade
//! converts these into structured responses at the API boundary, so callers
//! never see a panic for a bad plan id or a failing skill.

use thiserror::Error;

/// The unified error type for the Waypoint runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaypointError {
    /// The synthesizer produced zero steps for the classified intent.
    #[error("no plan could be produced for intent type '{intent_type}'")]
    NoPlanProducible { intent_type: String },

    /// No live plan exists under the given id.
    #[error("plan '{plan_id}' not found")]
    PlanNotFound { plan_id: String },

    /// A prerequisite step has no successful history entry yet.
    ///
    /// Not a plan failure: index and status are left untouched so the same
    /// call can be retried later.
    #[error("step '{step_id}' depends on '{dependency}', which has not succeeded")]
    UnmetDependency { step_id: String, dependency: String },

    /// A skill reported `success: false` and no recovery applied.
    #[error("skill '{skill_id}' failed: {reason}")]
    SkillFailed { skill_id: String, reason: String },

    /// A skill invocation returned an error instead of a result.
    #[error("skill '{skill_id}' raised an error: {reason}")]
    SkillException { skill_id: String, reason: String },

    /// The fallback skill of a step failed as well.
    #[error("fallback skill '{skill_id}' failed: {reason}")]
    FallbackFailed { skill_id: String, reason: String },

    /// The configured replanning cap was reached for this plan.
    #[error("replanning limit of {limit} reached at step '{step_id}'")]
    ReplanLimitReached { step_id: String, limit: u32 },

    /// Another writer committed the plan since it was read.
    #[error("plan '{plan_id}' was modified concurrently (expected revision {expected})")]
    ConcurrentModification { plan_id: String, expected: u64 },

    /// The plan store could not complete an operation.
    #[error("plan store error: {reason}")]
    StoreError { reason: String },

    /// The memory service rejected a write.
    #[error("memory write failed: {reason}")]
    MemoryWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The plan is in a state the engine cannot advance from.
    #[error("state machine error: {reason}")]
    StateMachineError { reason: String },
}

/// Convenience alias used throughout the Waypoint crates.
pub type WaypointResult<T> = Result<T, WaypointError>;
