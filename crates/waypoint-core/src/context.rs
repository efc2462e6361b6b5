//! The capability set handed to every skill invocation.
//!
//! Skills receive a `SkillContext` rather than an ad hoc object: it exposes
//! exactly the session id, the memory service, and a read-only view of the
//! workflow (plan) the skill is running in.

use serde_json::Value;

use waypoint_contracts::plan::Context;

use crate::traits::MemoryService;

/// Read-only view of the plan a skill is executing within.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowView<'a> {
    plan_id: &'a str,
    step_id: &'a str,
    context: &'a Context,
}

impl<'a> WorkflowView<'a> {
    pub fn new(plan_id: &'a str, step_id: &'a str, context: &'a Context) -> Self {
        Self { plan_id, step_id, context }
    }

    pub fn plan_id(&self) -> &str {
        self.plan_id
    }

    /// The step being executed (the original id, also for fallback attempts).
    pub fn step_id(&self) -> &str {
        self.step_id
    }

    /// Look up a value in the plan context.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn context(&self) -> &Context {
        self.context
    }
}

/// Everything a skill may reach during `execute()`.
pub struct SkillContext<'a> {
    session_id: &'a str,
    memory: &'a dyn MemoryService,
    workflow: WorkflowView<'a>,
}

impl<'a> SkillContext<'a> {
    pub fn new(session_id: &'a str, memory: &'a dyn MemoryService, workflow: WorkflowView<'a>) -> Self {
        Self { session_id, memory, workflow }
    }

    pub fn session_id(&self) -> &str {
        self.session_id
    }

    pub fn memory(&self) -> &dyn MemoryService {
        self.memory
    }

    pub fn workflow(&self) -> &WorkflowView<'a> {
        &self.workflow
    }
}
