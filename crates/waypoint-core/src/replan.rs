//! Failure-driven replanning.
//!
//! When a step fails with no fallback configured, the engine asks the
//! `Replanner` for a corrective step. Dispatch is a total match over
//! `FailureReason`; only `OutOfStock` and `OverBudget` produce a step. The
//! engine splices that step in at the cursor so it runs next.

use serde_json::Value;
use tracing::debug;

use waypoint_contracts::{plan::Plan, skill::FailureReason, step::Step};

use crate::config::ReplanConfig;

/// Skill used for every corrective search.
pub const REPLAN_SEARCH_SKILL: &str = "product-search";

pub struct Replanner {
    config: ReplanConfig,
}

impl Replanner {
    pub fn new(config: ReplanConfig) -> Self {
        Self { config }
    }

    /// Return the step to insert for a failure of `reason`, or `None` when
    /// this failure class has no corrective action.
    pub fn replan(&self, reason: FailureReason, plan: &Plan) -> Option<Step> {
        let step = match reason {
            FailureReason::OutOfStock => {
                let query = format!("{} {}", base_query(plan), self.config.alternative_qualifier);
                Step::new(next_id(plan), REPLAN_SEARCH_SKILL, "Search for an in-stock alternative")
                    .with_input("query", query)
            }
            FailureReason::OverBudget => {
                let query = format!("{} {}", base_query(plan), self.config.budget_qualifier);
                let step = Step::new(next_id(plan), REPLAN_SEARCH_SKILL, "Search for an option within budget")
                    .with_input("query", query);
                match plan.context.get("budget") {
                    Some(budget) if !budget.is_null() => step.with_input("maxPrice", budget.clone()),
                    _ => step,
                }
            }
            FailureReason::InvalidInput | FailureReason::Unavailable | FailureReason::Other => {
                return None;
            }
        };

        debug!(
            plan_id = %plan.id,
            reason = ?reason,
            inserted_step = %step.id,
            "replanner produced corrective step"
        );
        Some(step)
    }
}

/// The query the corrective search refines: `context.query`, else
/// `context.topic`, else the original intent text.
fn base_query(plan: &Plan) -> String {
    ["query", "topic"]
        .iter()
        .find_map(|key| match plan.context.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| plan.intent.trim().to_string())
}

fn next_id(plan: &Plan) -> String {
    format!("replan_{}", plan.replan_count + 1)
}
