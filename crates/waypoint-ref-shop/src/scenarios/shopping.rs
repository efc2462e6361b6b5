//! Scenario 1: Search and Buy
//!
//! The happy path. "帮我搜索机械键盘并购买" classifies as `search_and_buy`
//! with `wantToBuy`, producing search → select → checkout. One call runs all
//! three steps: the search result's first product becomes
//! `selectedProductId`, which the select step's `{{selectedProductId}}`
//! resolves to.

use waypoint_contracts::{error::WaypointResult, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "shopper-1";
pub const INTENT: &str = "帮我搜索机械键盘并购买";

/// Create the plan and advance it once.
pub fn drive(runtime: &ShopRuntime) -> WaypointResult<ExecutionResponse> {
    let plan = start(runtime, SESSION, INTENT, None)?;
    Ok(runtime.orchestrator.execute_next_step(&plan.id, None))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 1: Search and Buy ===");
    println!();

    let runtime = ShopRuntime::new()?;
    let resp = drive(&runtime)?;
    print_outcome(&resp);

    println!("  Orders placed:  {}", runtime.shop.orders().len());
    println!("  Wallet balance: {} 元", runtime.shop.balance());
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
