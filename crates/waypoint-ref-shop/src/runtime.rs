//! Wiring for the reference runtime: one orchestrator over the mock shop.

use std::sync::Arc;

use waypoint_contracts::error::WaypointResult;
use waypoint_core::{config::OrchestratorConfig, Orchestrator};
use waypoint_intent::{PatternClassifier, TemplateSynthesizer};
use waypoint_store::{InMemoryMemoryService, InMemoryPlanStore};

use crate::skills::Shop;

/// Embedded orchestrator settings for the reference shop.
pub const SHOP_CONFIG: &str = include_str!("../config/orchestrator.toml");

/// An orchestrator plus inspectable handles on everything it writes to.
pub struct ShopRuntime {
    pub orchestrator: Orchestrator,
    pub shop: Shop,
    pub store: InMemoryPlanStore,
    pub memory: InMemoryMemoryService,
}

impl ShopRuntime {
    /// A runtime over a fresh shop using the embedded configuration.
    pub fn new() -> WaypointResult<Self> {
        Self::with_config(Shop::new(), OrchestratorConfig::from_toml_str(SHOP_CONFIG)?)
    }

    /// A runtime over `shop`. The shop's product search follows the
    /// qualifiers in `config.replan`.
    pub fn with_config(shop: Shop, config: OrchestratorConfig) -> WaypointResult<Self> {
        let shop = shop.with_qualifiers(config.replan.clone());
        let store = InMemoryPlanStore::new();
        let memory = InMemoryMemoryService::new();
        let orchestrator = Orchestrator::new(
            Box::new(PatternClassifier::new()),
            Box::new(TemplateSynthesizer::new()),
            shop.registry(),
            Arc::new(store.clone()),
            Arc::new(memory.clone()),
            config,
        );
        Ok(Self { orchestrator, shop, store, memory })
    }
}
