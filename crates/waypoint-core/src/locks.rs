//! Per-plan mutual exclusion.
//!
//! Every call that advances or mutates a plan holds that plan's lock for its
//! full duration, so two callers can never interleave on one plan's cursor or
//! history. Calls on different plans never contend beyond the brief table
//! lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use waypoint_contracts::error::{WaypointError, WaypointResult};

#[derive(Default)]
pub struct PlanLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PlanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `plan_id`.
    pub fn with_lock<T>(&self, plan_id: &str, f: impl FnOnce() -> T) -> WaypointResult<T> {
        let lock = self.handle(plan_id)?;
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(|poisoned| {
            // The guarded data is `()`; plan state lives in the store.
            warn!(plan_id = %plan_id, "plan lock poisoned by an earlier panic, recovering");
            poisoned.into_inner()
        });
        Ok(f())
    }

    /// Number of plans that have ever been locked.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, plan_id: &str) -> WaypointResult<Arc<Mutex<()>>> {
        let mut table = self.table.lock().map_err(|e| WaypointError::StoreError {
            reason: format!("plan lock table poisoned: {}", e),
        })?;
        Ok(Arc::clone(table.entry(plan_id.to_string()).or_default()))
    }
}
