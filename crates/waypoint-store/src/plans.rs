//! In-memory implementation of `PlanStore`.
//!
//! `InMemoryPlanStore` keeps every plan in a `HashMap` behind a `Mutex`.
//! Writes go through `compare_and_swap`: the caller names the revision it
//! read, and the write is refused if another writer got there first. A
//! successful write bumps the revision by one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    plan::Plan,
};
use waypoint_core::traits::PlanStore;

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct PlanTable {
    pub(crate) plans: HashMap<String, Plan>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// A process-local plan store.
///
/// Cloning shares the underlying table, so a demo can keep a handle for
/// inspection while the orchestrator owns another.
#[derive(Clone)]
pub struct InMemoryPlanStore {
    state: Arc<Mutex<PlanTable>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PlanTable { plans: HashMap::new() })),
        }
    }

    /// Every plan started in `session_id`, oldest first.
    pub fn plans_for_session(&self, session_id: &str) -> WaypointResult<Vec<Plan>> {
        let table = self.lock()?;
        let mut plans: Vec<Plan> = table
            .plans
            .values()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.created_at);
        Ok(plans)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|t| t.plans.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> WaypointResult<MutexGuard<'_, PlanTable>> {
        self.state.lock().map_err(|e| WaypointError::StoreError {
            reason: format!("plan table lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── PlanStore impl ────────────────────────────────────────────────────────────

impl PlanStore for InMemoryPlanStore {
    /// Store a new plan. Refuses an id that is already present.
    fn insert(&self, plan: Plan) -> WaypointResult<Plan> {
        let mut table = self.lock()?;
        if table.plans.contains_key(&plan.id) {
            return Err(WaypointError::StoreError {
                reason: format!("plan '{}' already exists", plan.id),
            });
        }
        debug!(plan_id = %plan.id, session_id = %plan.session_id, "plan stored");
        table.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    fn get(&self, plan_id: &str) -> WaypointResult<Option<Plan>> {
        Ok(self.lock()?.plans.get(plan_id).cloned())
    }

    fn compare_and_swap(&self, mut plan: Plan, expected_revision: u64) -> WaypointResult<Plan> {
        let mut table = self.lock()?;
        let current = table
            .plans
            .get(&plan.id)
            .ok_or_else(|| WaypointError::PlanNotFound { plan_id: plan.id.clone() })?;

        if current.revision != expected_revision {
            warn!(
                plan_id = %plan.id,
                expected = expected_revision,
                actual = current.revision,
                "stale plan write rejected"
            );
            return Err(WaypointError::ConcurrentModification {
                plan_id: plan.id.clone(),
                expected: expected_revision,
            });
        }

        plan.revision = expected_revision + 1;
        debug!(plan_id = %plan.id, revision = plan.revision, status = %plan.status, "plan updated");
        table.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }
}
