//! Scenario 7: Product Comparison
//!
//! "对比Inkleaf和Papyrus" yields one independent search per product
//! (`search_0`, `search_1`). Each step's output lands in the context under
//! `<step id>_result`, so both result sets are available side by side.

use waypoint_contracts::{error::WaypointResult, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "shopper-7";
pub const INTENT: &str = "对比Inkleaf和Papyrus";

pub fn drive(runtime: &ShopRuntime) -> WaypointResult<ExecutionResponse> {
    let plan = start(runtime, SESSION, INTENT, None)?;
    Ok(runtime.orchestrator.execute_next_step(&plan.id, None))
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 7: Product Comparison ===");
    println!();

    let runtime = ShopRuntime::new()?;
    let resp = drive(&runtime)?;
    print_outcome(&resp);

    if let Some(output) = &resp.output {
        for key in ["search_0_result", "search_1_result"] {
            if let Some(first) = output[key]["products"].get(0) {
                println!("  {}: {} at {} 元", key, first["name"], first["price"]);
            }
        }
    }
    println!();
    println!("  Scenario 7 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
