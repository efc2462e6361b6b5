//! Mock collaborators shared by the engine and orchestrator tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    memory::MemoryType,
    plan::Plan,
    skill::SkillResult,
};

use crate::{
    context::SkillContext,
    traits::{MemoryService, PlanStore, Skill},
};

/// A skill that replays a fixed script and records every call's params.
/// After the script runs out, the last entry repeats.
#[derive(Clone)]
pub(crate) struct ScriptedSkill {
    id: String,
    script: Arc<Vec<WaypointResult<SkillResult>>>,
    calls: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl ScriptedSkill {
    pub(crate) fn sequence(id: &str, results: Vec<SkillResult>) -> Self {
        Self {
            id: id.to_string(),
            script: Arc::new(results.into_iter().map(Ok).collect()),
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    pub(crate) fn always(id: &str, result: SkillResult) -> Self {
        Self::sequence(id, vec![result])
    }

    pub(crate) fn raising(id: &str, reason: &str) -> Self {
        Self {
            id: id.to_string(),
            script: Arc::new(vec![Err(WaypointError::SkillException {
                skill_id: id.to_string(),
                reason: reason.to_string(),
            })]),
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Map<String, Value>> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Skill for ScriptedSkill {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.len();
        calls.push(params.clone());
        let idx = n.min(self.script.len() - 1);
        self.script[idx].clone()
    }
}

/// A plan store that counts compare-and-swap writes.
#[derive(Default)]
pub(crate) struct MockStore {
    plans: Mutex<HashMap<String, Plan>>,
    writes: Mutex<usize>,
}

impl MockStore {
    pub(crate) fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl PlanStore for MockStore {
    fn insert(&self, plan: Plan) -> WaypointResult<Plan> {
        self.plans.lock().unwrap().insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    fn get(&self, plan_id: &str) -> WaypointResult<Option<Plan>> {
        Ok(self.plans.lock().unwrap().get(plan_id).cloned())
    }

    fn compare_and_swap(&self, mut plan: Plan, expected_revision: u64) -> WaypointResult<Plan> {
        let mut plans = self.plans.lock().unwrap();
        let current = plans.get(&plan.id).map(|p| p.revision);
        if current != Some(expected_revision) {
            return Err(WaypointError::ConcurrentModification {
                plan_id: plan.id.clone(),
                expected: expected_revision,
            });
        }
        plan.revision = expected_revision + 1;
        plans.insert(plan.id.clone(), plan.clone());
        *self.writes.lock().unwrap() += 1;
        Ok(plan)
    }
}

/// A memory service backed by a map, optionally rejecting every write.
#[derive(Default)]
pub(crate) struct MockMemory {
    entries: Mutex<HashMap<(String, MemoryType, String), Value>>,
    fail: bool,
}

impl MockMemory {
    pub(crate) fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

impl MemoryService for MockMemory {
    fn save_memory(&self, session_id: &str, memory_type: MemoryType, key: &str, value: Value) -> WaypointResult<()> {
        if self.fail {
            return Err(WaypointError::MemoryWriteFailed { reason: "memory offline".to_string() });
        }
        self.entries
            .lock()
            .unwrap()
            .insert((session_id.to_string(), memory_type, key.to_string()), value);
        Ok(())
    }

    fn load_memory(&self, session_id: &str, memory_type: MemoryType, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap()
            .get(&(session_id.to_string(), memory_type, key.to_string()))
            .cloned()
    }
}
