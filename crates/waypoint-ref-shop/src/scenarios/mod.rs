//! Reference runtime demo scenarios.
//!
//! Each scenario builds its own `ShopRuntime` (fresh shop, store, and memory),
//! drives the orchestrator with one or more utterances, and prints what the
//! engine did step by step.

pub mod compare;
pub mod out_of_stock;
pub mod over_budget;
pub mod research_fallback;
pub mod shopping;
pub mod user_input;
pub mod wallet;

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    plan::{Context, Plan},
    response::ExecutionResponse,
};

use crate::runtime::ShopRuntime;

/// Names accepted by `run_named`, in `run_all` order.
pub const SCENARIOS: &[&str] = &[
    "shopping",
    "out-of-stock",
    "over-budget",
    "research-fallback",
    "user-input",
    "wallet",
    "compare",
];

/// Run one scenario by name.
pub fn run_named(name: &str) -> WaypointResult<()> {
    match name {
        "shopping" => shopping::run_scenario(),
        "out-of-stock" => out_of_stock::run_scenario(),
        "over-budget" => over_budget::run_scenario(),
        "research-fallback" => research_fallback::run_scenario(),
        "user-input" => user_input::run_scenario(),
        "wallet" => wallet::run_scenario(),
        "compare" => compare::run_scenario(),
        other => Err(WaypointError::ConfigError {
            reason: format!("unknown scenario '{}' (expected one of: {})", other, SCENARIOS.join(", ")),
        }),
    }
}

/// Run every scenario in sequence.
pub fn run_all() -> WaypointResult<()> {
    for name in SCENARIOS {
        run_named(name)?;
    }
    Ok(())
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Create a plan for `text`, printing the classification and steps.
pub(crate) fn start(
    runtime: &ShopRuntime,
    session_id: &str,
    text: &str,
    context: Option<Context>,
) -> WaypointResult<Plan> {
    let created = runtime.orchestrator.create_plan(session_id, text, context);
    let Some(plan) = created.plan else {
        return Err(WaypointError::StateMachineError {
            reason: format!(
                "no plan for '{}': {}",
                text,
                created.error.unwrap_or_else(|| "unknown error".to_string())
            ),
        });
    };

    println!("  Utterance:   {}", text);
    println!("  Intent type: {}", plan.intent_type);
    for step in &plan.steps {
        let deps = if step.depends_on.is_empty() {
            String::new()
        } else {
            format!(" after {}", step.depends_on.join(", "))
        };
        println!("    - {} → {}{}", step.id, step.skill_id, deps);
    }
    Ok(plan)
}

/// Print the history and outcome carried by `resp`.
pub(crate) fn print_outcome(resp: &ExecutionResponse) {
    if let Some(plan) = &resp.plan {
        for record in &plan.history {
            let mark = if record.success { "ok" } else { "failed" };
            match &record.error {
                Some(error) => println!("    [{}] {} ({}): {}", mark, record.step_id, record.skill_id, error),
                None => println!("    [{}] {} ({})", mark, record.step_id, record.skill_id),
            }
        }
        println!(
            "  Status: {}  (cursor {}/{}, replans {})",
            plan.status,
            plan.current_step_index,
            plan.steps.len(),
            plan.replan_count
        );
    }
    if resp.needs_user_input {
        if let Some(prompt) = &resp.user_prompt {
            println!("  Awaiting user input:");
            for line in prompt.lines() {
                println!("    | {}", line);
            }
        }
    }
    if let Some(error) = &resp.error {
        println!("  Error: {}", error);
    }
    println!();
}
