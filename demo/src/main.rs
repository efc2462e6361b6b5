//! Waypoint Reference Runtime — Demo CLI
//!
//! Runs the shopping/wallet reference scenarios, or drives the orchestrator
//! with an utterance of your own.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- scenario out-of-stock
//!   cargo run -p demo -- intent "帮我搜索耳机并购买"
//!   cargo run -p demo -- intent "帮我搜索智能手表并购买" --input selectedProductId=p-300
//!   cargo run -p demo -- --config waypoint.toml intent "buy headphones under $150"

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use waypoint_contracts::error::{WaypointError, WaypointResult};
use waypoint_core::config::OrchestratorConfig;
use waypoint_ref_shop::{
    runtime::SHOP_CONFIG,
    scenarios::{self, SCENARIOS},
    Shop, ShopRuntime,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Waypoint — conversational plan-act-observe orchestrator demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Waypoint orchestrator reference runtime demo",
    long_about = "Runs Waypoint reference scenarios showing intent classification,\n\
                  step execution, fallback, replanning, and suspension for user input."
)]
struct Cli {
    /// Orchestrator TOML for the `intent` command (defaults to the embedded shop config).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every reference scenario in sequence.
    RunAll,
    /// Run one reference scenario by name.
    Scenario {
        /// One of: shopping, out-of-stock, over-budget, research-fallback,
        /// user-input, wallet, compare.
        name: String,
    },
    /// Plan and run a free-form utterance against the mock shop.
    Intent {
        /// The utterance, in Chinese or English.
        text: String,
        /// Session id the plan is filed under.
        #[arg(long, default_value = "cli")]
        session: String,
        /// Answer a suspension: `key=value`, repeatable. Values that parse as
        /// JSON are used as such, anything else as a string.
        #[arg(long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,
        /// Bring the web search backend online.
        #[arg(long)]
        online: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => scenarios::run_all(),
        Command::Scenario { name } => scenarios::run_named(&name),
        Command::Intent { text, session, inputs, online } => {
            run_intent(cli.config, &text, &session, &inputs, online)
        }
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Free-form intent ──────────────────────────────────────────────────────────

fn run_intent(
    config_path: Option<PathBuf>,
    text: &str,
    session: &str,
    inputs: &[String],
    online: bool,
) -> WaypointResult<()> {
    let config = match &config_path {
        Some(path) => OrchestratorConfig::from_file(path)?,
        None => OrchestratorConfig::from_toml_str(SHOP_CONFIG)?,
    };
    info!(config = ?config_path, max_replans = ?config.max_replans, "configuration loaded");

    let runtime = ShopRuntime::with_config(Shop::new().with_web_search_online(online), config)?;
    let answers = parse_inputs(inputs)?;

    let created = runtime.orchestrator.create_plan(session, text, None);
    let Some(plan) = created.plan else {
        println!("  No plan: {}", created.error.unwrap_or_default());
        return Ok(());
    };
    println!("  Plan {} ({})", plan.id, plan.intent_type);

    let mut resp = runtime.orchestrator.execute_next_step(&plan.id, None);
    print_json(&resp)?;

    if resp.needs_user_input && !answers.is_empty() {
        println!("  Supplying user input...");
        resp = runtime.orchestrator.provide_user_input(&plan.id, answers);
        print_json(&resp)?;
    }

    Ok(())
}

fn parse_inputs(inputs: &[String]) -> WaypointResult<Map<String, Value>> {
    let mut answers = Map::new();
    for pair in inputs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(WaypointError::ConfigError {
                reason: format!("--input '{}' is not KEY=VALUE", pair),
            });
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        answers.insert(key.trim().to_string(), value);
    }
    Ok(answers)
}

fn print_json(resp: &waypoint_contracts::response::ExecutionResponse) -> WaypointResult<()> {
    let rendered = serde_json::to_string_pretty(resp).map_err(|e| WaypointError::StateMachineError {
        reason: format!("failed to render response: {}", e),
    })?;
    println!("{}", rendered);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Waypoint — Plan / Act / Observe Orchestrator");
    println!("Shopping & Wallet Reference Demo");
    println!("============================================");
    println!();
    println!("Per advance call:");
    println!("  [1] Dependencies of the step at the cursor must have succeeded");
    println!("  [2] Unbound {{{{placeholders}}}} suspend execution with a prompt");
    println!("  [3] The skill runs through the registry; the attempt is recorded");
    println!("  [4] On failure: fallback skill, else replan (out of stock / over budget)");
    println!("  [5] Output is absorbed into the context; the plan is committed");
    println!();
    println!("Scenarios: {}", SCENARIOS.join(", "));
    println!();
}
