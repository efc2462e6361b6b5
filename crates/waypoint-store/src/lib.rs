//! # waypoint-store
//!
//! Process-local persistence for the Waypoint orchestrator.
//!
//! ## Overview
//!
//! - [`InMemoryPlanStore`] implements
//!   [`PlanStore`](waypoint_core::traits::PlanStore) with revision-checked
//!   writes, so two writers that read the same revision cannot both commit.
//! - [`InMemoryMemoryService`] implements
//!   [`MemoryService`](waypoint_core::traits::MemoryService) as a
//!   session-scoped key/value map.
//!
//! Both are cheap to clone; clones share state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use waypoint_store::{InMemoryMemoryService, InMemoryPlanStore};
//!
//! let store = InMemoryPlanStore::new();
//! let orchestrator = Orchestrator::new(classifier, synthesizer, registry,
//!     Arc::new(store.clone()), Arc::new(InMemoryMemoryService::new()), config);
//! ```

pub mod memory;
pub mod plans;

pub use memory::{InMemoryMemoryService, MemoryEntry};
pub use plans::InMemoryPlanStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
