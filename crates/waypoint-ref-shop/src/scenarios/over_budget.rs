//! Scenario 3: Over-Budget Replanning
//!
//! The caller passes the shopper's `budget` (300 元) as plan context. The top
//! hit for "耳机" costs 399 元, so adding it to the cart fails with "超出预算".
//! The replanner inserts a search qualified with "cheaper" and bounded by
//! `maxPrice = budget`, and the retried select picks the affordable item.

use serde_json::json;

use waypoint_contracts::{error::WaypointResult, plan::Context, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "shopper-3";
pub const INTENT: &str = "帮我搜索耳机并购买";
pub const BUDGET: u64 = 300;

pub fn drive(runtime: &ShopRuntime) -> WaypointResult<ExecutionResponse> {
    let mut context = Context::new();
    context.insert("budget".to_string(), json!(BUDGET));
    let plan = start(runtime, SESSION, INTENT, Some(context))?;
    Ok(runtime.orchestrator.execute_next_step(&plan.id, None))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 3: Over-Budget Replanning ===");
    println!();
    println!("  Session budget: {} 元", BUDGET);

    let runtime = ShopRuntime::new()?;
    let resp = drive(&runtime)?;
    print_outcome(&resp);

    if let Some(order) = runtime.shop.orders().first() {
        println!("  Order total: {} 元", order["total"]);
    }
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
