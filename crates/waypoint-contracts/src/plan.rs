//! The plan: one conversational task and its progress.
//!
//! All mutation goes through the methods here so the structural invariants
//! hold everywhere: the cursor only moves forward, history is append-only,
//! context keys are never removed, and status moves along the allowed edges.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{WaypointError, WaypointResult},
    execution::ExecutionRecord,
    step::Step,
};

/// The plan-scoped, merge-only key/value store.
pub type Context = Map<String, Value>;

/// Lifecycle state of a plan.
///
/// ```text
/// planning ──▶ executing ──▶ completed
///                  │  ▲
///                  ▼  │
///              replanning ──▶ failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Planning,
    Executing,
    Completed,
    Failed,
    Replanning,
}

impl PlanStatus {
    /// Completed and failed plans never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Failed)
    }

    /// Return true if moving from `self` to `next` is a legal transition.
    /// Staying in the same non-terminal state is always legal.
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        use PlanStatus::*;
        if self == next {
            return !self.is_terminal();
        }
        match self {
            Planning => matches!(next, Executing | Completed | Failed),
            Executing => matches!(next, Completed | Failed | Replanning),
            Replanning => matches!(next, Executing | Completed | Failed),
            Completed | Failed => false,
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanStatus::Planning => "planning",
            PlanStatus::Executing => "executing",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
            PlanStatus::Replanning => "replanning",
        };
        f.write_str(name)
    }
}

/// One materialized, mutable sequence of steps tracking progress toward a
/// user's intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub session_id: String,
    /// The original intent text.
    pub intent: String,
    /// The classifier's intent type (e.g. "search_and_buy").
    pub intent_type: String,
    pub steps: Vec<Step>,
    pub current_step_index: usize,
    pub status: PlanStatus,
    pub context: Context,
    pub history: Vec<ExecutionRecord>,
    /// Number of replanning insertions made so far.
    pub replan_count: u32,
    /// Write counter; bumped by every store commit.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// Create a plan in the `planning` state with a fresh UUID.
    pub fn new(
        session_id: impl Into<String>,
        intent: impl Into<String>,
        intent_type: impl Into<String>,
        steps: Vec<Step>,
        context: Context,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            intent: intent.into(),
            intent_type: intent_type.into(),
            steps,
            current_step_index: 0,
            status: PlanStatus::Planning,
            context,
            history: Vec::new(),
            replan_count: 0,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The step at the cursor, or `None` once every step has run.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_step_index)
    }

    /// Move to `next`, rejecting illegal edges.
    pub fn transition(&mut self, next: PlanStatus) -> WaypointResult<()> {
        if self.status == next && !next.is_terminal() {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(WaypointError::StateMachineError {
                reason: format!(
                    "plan '{}' cannot move from {} to {}",
                    self.id, self.status, next
                ),
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Return the first dependency of `step` without a successful record.
    pub fn unmet_dependency<'s>(&self, step: &'s Step) -> Option<&'s str> {
        step.depends_on
            .iter()
            .find(|dep| !self.history.iter().any(|r| r.satisfies(dep)))
            .map(String::as_str)
    }

    /// Add or overwrite context keys. Keys are never removed.
    pub fn merge_context(&mut self, values: Context) {
        for (key, value) in values {
            self.context.insert(key, value);
        }
        self.touch();
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), value);
        self.touch();
    }

    /// Append one execution record.
    pub fn record(&mut self, record: ExecutionRecord) {
        self.history.push(record);
        self.touch();
    }

    /// Move the cursor forward by one step.
    pub fn advance(&mut self) {
        self.current_step_index += 1;
        self.touch();
    }

    /// Splice `step` in at the cursor so it is the next step attempted.
    pub fn insert_at_cursor(&mut self, step: Step) {
        let at = self.current_step_index.min(self.steps.len());
        self.steps.insert(at, step);
        self.replan_count += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
