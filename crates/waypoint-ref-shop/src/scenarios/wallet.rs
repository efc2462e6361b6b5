//! Scenario 6: Wallet
//!
//! Three utterances against the mock wallet:
//!   1. "查看我的资产"  → asset overview
//!   2. "帮我领取空投"  → discover finds ad-7, claim uses `{{discoveredAirdropId}}`
//!   3. "帮我领取空投"  → nothing left to claim; the claim step suspends and
//!      the prompt asks for `discoveredAirdropId`

use waypoint_contracts::{error::WaypointResult, response::ExecutionResponse};

use crate::runtime::ShopRuntime;
use crate::scenarios::{print_outcome, start};

pub const SESSION: &str = "holder-1";
pub const OVERVIEW_INTENT: &str = "查看我的资产";
pub const CLAIM_INTENT: &str = "帮我领取空投";

/// Overview, first claim, second claim.
pub fn drive(runtime: &ShopRuntime) -> WaypointResult<Vec<ExecutionResponse>> {
    let mut responses = vec![];
    for text in [OVERVIEW_INTENT, CLAIM_INTENT, CLAIM_INTENT] {
        let plan = start(runtime, SESSION, text, None)?;
        let resp = runtime.orchestrator.execute_next_step(&plan.id, None);
        print_outcome(&resp);
        responses.push(resp);
    }
    Ok(responses)
}

pub fn run_scenario() -> WaypointResult<()> {
    println!("=== Scenario 6: Wallet ===");
    println!();

    let runtime = ShopRuntime::new()?;
    let responses = drive(&runtime)?;

    if let Some(total) = responses[0].output.as_ref().map(|o| o["overview_result"]["totalUsd"].clone()) {
        println!("  Portfolio value: ${}", total);
    }
    let plans = runtime.store.plans_for_session(SESSION)?;
    println!("  Plans in session {}: {}", SESSION, plans.len());
    println!();
    println!("  Scenario 6 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
