//! # waypoint-core
//!
//! The plan-act-observe runtime for Waypoint.
//!
//! This crate provides:
//! - The collaborator traits (`Skill`, `PlanStore`, `MemoryService`,
//!   `IntentClassifier`, `PlanSynthesizer`)
//! - The `SkillRegistry` every skill call goes through
//! - The `Engine` that advances a plan step by step, with fallback,
//!   replanning, and suspension for user input
//! - The `Orchestrator` facade that an HTTP/controller layer calls
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waypoint_core::{Orchestrator, OrchestratorConfig, SkillRegistry};
//!
//! let orchestrator = Orchestrator::new(classifier, synthesizer, registry, store, memory,
//!     OrchestratorConfig::default());
//! let created = orchestrator.create_plan("session-1", "帮我搜索耳机并购买", None);
//! let step = orchestrator.execute_next_step(&created.plan.unwrap().id, None);
//! ```

pub mod config;
pub mod context;
pub mod engine;
mod fallback;
pub mod locks;
pub mod observe;
pub mod orchestrator;
pub mod prompt;
pub mod registry;
pub mod replan;
pub mod template;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use config::OrchestratorConfig;
pub use engine::{Advance, Engine};
pub use orchestrator::Orchestrator;
pub use registry::SkillRegistry;
