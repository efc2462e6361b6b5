//! # waypoint-contracts
//!
//! Shared types, schemas, and contracts for the Waypoint orchestrator.
//!
//! All crates in the workspace import from here. No orchestration logic lives
//! in this crate: only data definitions and error types.

pub mod error;
pub mod execution;
pub mod intent;
pub mod memory;
pub mod plan;
pub mod response;
pub mod skill;
pub mod step;

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{json, Map};

    use super::*;
    use error::WaypointError;
    use execution::{fallback_step_id, ExecutionRecord};
    use plan::{Plan, PlanStatus};
    use skill::{FailureReason, SkillResult};
    use step::Step;

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn record(step_id: &str, success: bool) -> ExecutionRecord {
        ExecutionRecord {
            step_id: step_id.to_string(),
            skill_id: "product-search".to_string(),
            input: Map::new(),
            output: json!(null),
            success,
            error: None,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    fn two_step_plan() -> Plan {
        Plan::new(
            "session-1",
            "帮我搜索耳机并购买",
            "search_and_buy",
            vec![
                Step::new("search", "product-search", "Search products"),
                Step::new("select", "add-to-cart", "Add to cart").depends_on("search"),
            ],
            Map::new(),
        )
    }

    // ── PlanStatus ───────────────────────────────────────────────────────────

    #[test]
    fn status_allows_replanning_round_trip() {
        assert!(PlanStatus::Executing.can_transition_to(PlanStatus::Replanning));
        assert!(PlanStatus::Replanning.can_transition_to(PlanStatus::Executing));
        assert!(PlanStatus::Planning.can_transition_to(PlanStatus::Executing));
    }

    #[test]
    fn status_terminal_states_are_final() {
        for next in [
            PlanStatus::Planning,
            PlanStatus::Executing,
            PlanStatus::Replanning,
            PlanStatus::Completed,
        ] {
            assert!(!PlanStatus::Completed.can_transition_to(next));
            assert!(!PlanStatus::Failed.can_transition_to(next));
        }
    }

    #[test]
    fn status_never_moves_back_to_planning() {
        assert!(!PlanStatus::Executing.can_transition_to(PlanStatus::Planning));
        assert!(!PlanStatus::Replanning.can_transition_to(PlanStatus::Planning));
    }

    #[test]
    fn plan_transition_rejects_illegal_edge() {
        let mut plan = two_step_plan();
        plan.transition(PlanStatus::Executing).unwrap();
        plan.transition(PlanStatus::Completed).unwrap();

        match plan.transition(PlanStatus::Executing) {
            Err(WaypointError::StateMachineError { reason }) => {
                assert!(reason.contains("completed"), "unexpected reason: {reason}");
            }
            other => panic!("expected StateMachineError, got {:?}", other),
        }
        assert_eq!(plan.status, PlanStatus::Completed);
    }

    // ── Plan mutation ────────────────────────────────────────────────────────

    #[test]
    fn plan_new_starts_planning_at_cursor_zero() {
        let plan = two_step_plan();
        assert_eq!(plan.status, PlanStatus::Planning);
        assert_eq!(plan.current_step_index, 0);
        assert!(plan.history.is_empty());
        assert_eq!(plan.current_step().unwrap().id, "search");
    }

    #[test]
    fn current_step_is_none_past_the_last_step() {
        let mut plan = two_step_plan();
        plan.advance();
        assert_eq!(plan.current_step().unwrap().id, "select");
        plan.advance();
        assert!(plan.current_step().is_none());
    }

    #[test]
    fn plan_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| two_step_plan().id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn insert_at_cursor_retargets_next_step() {
        let mut plan = two_step_plan();
        plan.advance();
        plan.insert_at_cursor(Step::new("replan_1", "product-search", "Alternative search"));

        assert_eq!(plan.current_step_index, 1);
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.current_step().unwrap().id, "replan_1");
        assert_eq!(plan.steps[2].id, "select");
        assert_eq!(plan.replan_count, 1);
    }

    #[test]
    fn merge_context_overwrites_but_keeps_keys() {
        let mut plan = two_step_plan();
        plan.set_context("query", json!("耳机"));
        plan.set_context("budget", json!(300));

        let mut update = Map::new();
        update.insert("query".to_string(), json!("蓝牙耳机"));
        plan.merge_context(update);

        assert_eq!(plan.context["query"], json!("蓝牙耳机"));
        assert_eq!(plan.context["budget"], json!(300));
    }

    #[test]
    fn unmet_dependency_requires_successful_record() {
        let mut plan = two_step_plan();
        let select = plan.steps[1].clone();

        assert_eq!(plan.unmet_dependency(&select), Some("search"));

        plan.record(record("search", false));
        assert_eq!(plan.unmet_dependency(&select), Some("search"));

        plan.record(record("search", true));
        assert_eq!(plan.unmet_dependency(&select), None);
    }

    #[test]
    fn fallback_record_satisfies_dependency() {
        let rec = record(&fallback_step_id("search"), true);
        assert_eq!(rec.step_id, "search_fallback");
        assert!(rec.satisfies("search"));
        assert!(!rec.satisfies("select"));
    }

    // ── FailureReason ────────────────────────────────────────────────────────

    #[test]
    fn failure_reason_classifies_bilingual_markers() {
        assert_eq!(FailureReason::from_error_text("商品库存不足"), FailureReason::OutOfStock);
        assert_eq!(FailureReason::from_error_text("Item is OUT OF STOCK"), FailureReason::OutOfStock);
        assert_eq!(FailureReason::from_error_text("价格超出预算"), FailureReason::OverBudget);
        assert_eq!(FailureReason::from_error_text("too expensive for you"), FailureReason::OverBudget);
        assert_eq!(FailureReason::from_error_text("network timeout"), FailureReason::Other);
    }

    #[test]
    fn explicit_reason_wins_over_text() {
        let result = SkillResult::failure_with(FailureReason::Unavailable, "out of stock");
        assert_eq!(result.failure_reason(), Some(FailureReason::Unavailable));

        let implicit = SkillResult::failure("库存不足");
        assert_eq!(implicit.failure_reason(), Some(FailureReason::OutOfStock));

        assert_eq!(SkillResult::ok(json!({})).failure_reason(), None);
    }

    #[test]
    fn error_text_falls_back_to_message() {
        let mut result = SkillResult::failure("x");
        result.error = None;
        result.message = Some("card declined".to_string());
        assert_eq!(result.error_text(), "card declined");
    }

    // ── Serialization ────────────────────────────────────────────────────────

    #[test]
    fn plan_serializes_camel_case() {
        let plan = two_step_plan();
        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["currentStepIndex"], json!(0));
        assert_eq!(value["status"], json!("planning"));
        assert_eq!(value["steps"][1]["dependsOn"], json!(["search"]));
        assert_eq!(value["steps"][1]["skillId"], json!("add-to-cart"));
    }

    #[test]
    fn execution_response_marks_suspension() {
        let resp = response::ExecutionResponse::suspended(
            two_step_plan(),
            None,
            "Which product?".to_string(),
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["needsUserInput"], json!(true));
        assert_eq!(value["userPrompt"], json!("Which product?"));
    }

    // ── WaypointError display messages ───────────────────────────────────────

    #[test]
    fn error_plan_not_found_display() {
        let err = WaypointError::PlanNotFound { plan_id: "p-42".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("p-42"));
    }

    #[test]
    fn error_unmet_dependency_display() {
        let err = WaypointError::UnmetDependency {
            step_id: "select".to_string(),
            dependency: "search".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("select"));
        assert!(msg.contains("search"));
    }

    #[test]
    fn error_no_plan_producible_display() {
        let err = WaypointError::NoPlanProducible { intent_type: "teleport".to_string() };
        assert!(err.to_string().contains("teleport"));
    }
}
