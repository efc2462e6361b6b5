//! Scenario 4: Research with Fallback
//!
//! "研究一下电子书阅读器" becomes a single `web-search` step whose fallback is
//! `product-search`. The web search backend is offline, so the primary
//! attempt is recorded as failed and the fallback runs with the same input,
//! recorded under `search_fallback`.

use waypoint_contracts::{error::WaypointResult, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "researcher-1";
pub const INTENT: &str = "研究一下电子书阅读器";

pub fn drive(runtime: &ShopRuntime) -> WaypointResult<ExecutionResponse> {
    let plan = start(runtime, SESSION, INTENT, None)?;
    Ok(runtime.orchestrator.execute_next_step(&plan.id, None))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 4: Research with Fallback ===");
    println!();
    println!("  Web search backend: OFFLINE");

    let runtime = ShopRuntime::new()?;
    let resp = drive(&runtime)?;
    print_outcome(&resp);

    if let Some(products) = resp.output.as_ref().and_then(|o| o["products"].as_array()) {
        println!("  Fallback found {} product(s)", products.len());
    }
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
