//! Scenario 5: Suspend for User Input
//!
//! Nothing in the catalog matches "智能手表", so the search yields no
//! products and `selectedProductId` stays unbound. The engine stops before
//! the select step, without running or recording it, and returns a prompt.
//! The user then names a product; `provide_user_input` merges it into the
//! plan context and the plan runs to completion.

use serde_json::json;

use waypoint_contracts::{
    error::WaypointResult,
    plan::Context,
    response::ExecutionResponse,
};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "shopper-5";
pub const INTENT: &str = "帮我搜索智能手表并购买";
pub const USER_CHOICE: &str = "p-300";

/// The suspended response and the response after the user answers.
pub fn drive(runtime: &ShopRuntime) -> WaypointResult<(ExecutionResponse, ExecutionResponse)> {
    let plan = start(runtime, SESSION, INTENT, None)?;
    let suspended = runtime.orchestrator.execute_next_step(&plan.id, None);

    let mut answer = Context::new();
    answer.insert("selectedProductId".to_string(), json!(USER_CHOICE));
    let resumed = runtime.orchestrator.provide_user_input(&plan.id, answer);

    Ok((suspended, resumed))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 5: Suspend for User Input ===");
    println!();

    let runtime = ShopRuntime::new()?;
    let (suspended, resumed) = drive(&runtime)?;

    println!("  First call:");
    print_outcome(&suspended);
    println!("  User replies: selectedProductId = {}", USER_CHOICE);
    println!();
    println!("  After user input:");
    print_outcome(&resumed);

    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
