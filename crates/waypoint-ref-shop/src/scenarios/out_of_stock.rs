//! Scenario 2: Out-of-Stock Replanning
//!
//! The top search hit for "降噪耳机" has no stock. Adding it to the cart fails
//! with "库存不足", which classifies as out-of-stock. There is no fallback on
//! the select step, so the replanner inserts `replan_1`, a search qualified
//! with "alternative", at the cursor. It runs next, its first (in-stock)
//! product replaces `selectedProductId`, and the select step is retried.

use waypoint_contracts::{error::WaypointResult, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "shopper-2";
pub const INTENT: &str = "帮我搜索降噪耳机并购买";

pub fn drive(runtime: &ShopRuntime) -> WaypointResult<ExecutionResponse> {
    let plan = start(runtime, SESSION, INTENT, None)?;
    Ok(runtime.orchestrator.execute_next_step(&plan.id, None))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 2: Out-of-Stock Replanning ===");
    println!();

    let runtime = ShopRuntime::new()?;
    let resp = drive(&runtime)?;
    print_outcome(&resp);

    if let Some(plan) = &resp.plan {
        let inserted: Vec<&str> = plan
            .steps
            .iter()
            .filter(|s| s.id.starts_with("replan_"))
            .map(|s| s.id.as_str())
            .collect();
        println!("  Corrective steps inserted: {:?}", inserted);
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
