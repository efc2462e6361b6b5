//! Acting on a step and observing the result.
//!
//! Shared by the engine's primary path and the fallback executor so both
//! invoke skills, write audit records, and merge outputs identically.

use chrono::Utc;
use serde_json::{Map, Value};

use waypoint_contracts::{
    error::WaypointResult,
    execution::ExecutionRecord,
    plan::Plan,
    skill::SkillResult,
};

use crate::{
    context::{SkillContext, WorkflowView},
    registry::SkillRegistry,
    traits::MemoryService,
};

/// Invoke `skill_id` for the step `step_id` of `plan`.
pub(crate) fn invoke(
    registry: &SkillRegistry,
    memory: &dyn MemoryService,
    plan: &Plan,
    step_id: &str,
    skill_id: &str,
    input: &Map<String, Value>,
) -> WaypointResult<SkillResult> {
    let workflow = WorkflowView::new(&plan.id, step_id, &plan.context);
    let ctx = SkillContext::new(&plan.session_id, memory, workflow);
    registry.execute_skill(skill_id, input, &ctx)
}

/// Build the audit record for a skill that returned a result.
pub(crate) fn record_for(
    record_step_id: &str,
    skill_id: &str,
    input: Map<String, Value>,
    result: &SkillResult,
) -> ExecutionRecord {
    ExecutionRecord {
        step_id: record_step_id.to_string(),
        skill_id: skill_id.to_string(),
        input,
        output: result.data.clone().unwrap_or(Value::Null),
        success: result.success,
        error: (!result.success).then(|| result.error_text()),
        reason: result.failure_reason(),
        timestamp: Utc::now(),
    }
}

/// Build the audit record for a skill that raised an error.
pub(crate) fn record_for_exception(
    record_step_id: &str,
    skill_id: &str,
    input: Map<String, Value>,
    error: &str,
) -> ExecutionRecord {
    ExecutionRecord {
        step_id: record_step_id.to_string(),
        skill_id: skill_id.to_string(),
        input,
        output: Value::Null,
        success: false,
        error: Some(error.to_string()),
        reason: None,
        timestamp: Utc::now(),
    }
}

/// Merge a successful step output into the plan context.
///
/// - `<step_id>_result` always holds the raw output.
/// - A `products` array is copied to `products`; when non-empty the first
///   element becomes `firstProduct` and its `id` becomes `selectedProductId`.
/// - A non-empty `airdrops` array sets `discoveredAirdropId` to the first id.
pub fn absorb_output(plan: &mut Plan, step_id: &str, output: &Value) {
    let mut update = Map::new();
    update.insert(format!("{step_id}_result"), output.clone());

    if let Some(Value::Array(products)) = output.get("products") {
        update.insert("products".to_string(), Value::Array(products.clone()));
        if let Some(first) = products.first() {
            update.insert("firstProduct".to_string(), first.clone());
            if let Some(id) = first.get("id").filter(|id| !id.is_null()) {
                update.insert("selectedProductId".to_string(), id.clone());
            }
        }
    }

    if let Some(Value::Array(airdrops)) = output.get("airdrops") {
        if let Some(id) = airdrops.first().and_then(|a| a.get("id")).filter(|id| !id.is_null()) {
            update.insert("discoveredAirdropId".to_string(), id.clone());
        }
    }

    plan.merge_context(update);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn empty_plan() -> Plan {
        Plan::new("s", "intent", "general_query", vec![], Map::new())
    }

    #[test]
    fn products_bind_first_candidate() {
        let mut plan = empty_plan();
        let output = json!({ "products": [
            { "id": "p-1", "name": "A", "price": 10 },
            { "id": "p-2", "name": "B", "price": 20 }
        ]});

        absorb_output(&mut plan, "search", &output);

        assert_eq!(plan.context["search_result"], output);
        assert_eq!(plan.context["products"].as_array().unwrap().len(), 2);
        assert_eq!(plan.context["firstProduct"]["name"], json!("A"));
        assert_eq!(plan.context["selectedProductId"], json!("p-1"));
    }

    #[test]
    fn empty_products_bind_list_only() {
        let mut plan = empty_plan();
        absorb_output(&mut plan, "search", &json!({ "products": [] }));

        assert_eq!(plan.context["products"], json!([]));
        assert!(!plan.context.contains_key("firstProduct"));
        assert!(!plan.context.contains_key("selectedProductId"));
    }

    #[test]
    fn airdrops_bind_discovered_id() {
        let mut plan = empty_plan();
        absorb_output(&mut plan, "discover", &json!({ "airdrops": [{ "id": "ad-7" }] }));
        assert_eq!(plan.context["discoveredAirdropId"], json!("ad-7"));

        let mut none = empty_plan();
        absorb_output(&mut none, "discover", &json!({ "airdrops": [] }));
        assert!(!none.context.contains_key("discoveredAirdropId"));
    }

    #[test]
    fn non_object_output_only_sets_result_key() {
        let mut plan = empty_plan();
        absorb_output(&mut plan, "overview", &json!("ok"));
        assert_eq!(plan.context.len(), 1);
        assert_eq!(plan.context["overview_result"], json!("ok"));
    }
}
