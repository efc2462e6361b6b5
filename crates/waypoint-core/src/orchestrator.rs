//! The orchestrator facade: the API an HTTP/controller layer calls.
//!
//! Wires the classifier, synthesizer, plan store, memory service, and engine
//! together, and converts every internal error into a structured response.
//! No method here panics or returns `Err` for caller input.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    memory::MemoryType,
    plan::{Context, Plan, PlanStatus},
    response::{CreatePlanResponse, ExecutionResponse},
};

use crate::{
    config::OrchestratorConfig,
    engine::{Advance, Engine},
    locks::PlanLocks,
    registry::SkillRegistry,
    traits::{IntentClassifier, MemoryService, PlanStore, PlanSynthesizer},
};

/// The long-lived orchestrator instance. One per process.
pub struct Orchestrator {
    classifier: Box<dyn IntentClassifier>,
    synthesizer: Box<dyn PlanSynthesizer>,
    store: Arc<dyn PlanStore>,
    memory: Arc<dyn MemoryService>,
    engine: Engine,
    locks: PlanLocks,
}

impl Orchestrator {
    pub fn new(
        classifier: Box<dyn IntentClassifier>,
        synthesizer: Box<dyn PlanSynthesizer>,
        registry: SkillRegistry,
        store: Arc<dyn PlanStore>,
        memory: Arc<dyn MemoryService>,
        config: OrchestratorConfig,
    ) -> Self {
        let engine = Engine::new(Arc::new(registry), Arc::clone(&store), Arc::clone(&memory), config);
        Self {
            classifier,
            synthesizer,
            store,
            memory,
            engine,
            locks: PlanLocks::new(),
        }
    }

    /// Classify `intent_text`, synthesize steps, and store a new plan.
    ///
    /// The plan context starts as `context`, overlaid with the classifier's
    /// params and the `intentType`. A `workflow` memory entry pointing at the
    /// plan is written best-effort.
    pub fn create_plan(&self, session_id: &str, intent_text: &str, context: Option<Context>) -> CreatePlanResponse {
        match self.try_create_plan(session_id, intent_text, context) {
            Ok(plan) => CreatePlanResponse::created(plan),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "plan creation failed");
                CreatePlanResponse::failed(&e)
            }
        }
    }

    /// Advance the plan as far as it can go.
    ///
    /// `step_input` overrides context values when resolving the first step
    /// this call reaches; it is not stored.
    pub fn execute_next_step(&self, plan_id: &str, step_input: Option<Map<String, Value>>) -> ExecutionResponse {
        let result = self.with_known_plan(plan_id, || self.advance_locked(plan_id, step_input, None));
        self.respond(plan_id, result)
    }

    /// Merge user-supplied values into the plan context and resume.
    pub fn provide_user_input(&self, plan_id: &str, input: Map<String, Value>) -> ExecutionResponse {
        let result = self.with_known_plan(plan_id, || self.advance_locked(plan_id, None, Some(input)));
        self.respond(plan_id, result)
    }

    /// A snapshot of the plan, or `None` if the id is unknown.
    pub fn get_plan(&self, plan_id: &str) -> Option<Plan> {
        match self.store.get(plan_id) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(plan_id = %plan_id, error = %e, "plan lookup failed");
                None
            }
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        self.engine.config()
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn try_create_plan(&self, session_id: &str, intent_text: &str, context: Option<Context>) -> WaypointResult<Plan> {
        let intent = self.classifier.classify(intent_text);

        let mut plan_context = context.unwrap_or_default();
        for (key, value) in &intent.params {
            plan_context.insert(key.clone(), value.clone());
        }
        plan_context.insert("intentType".to_string(), Value::String(intent.intent_type.clone()));

        let steps = self.synthesizer.synthesize(&intent.intent_type, &intent.params, &plan_context);
        if steps.is_empty() {
            return Err(WaypointError::NoPlanProducible {
                intent_type: intent.intent_type,
            });
        }

        let plan = Plan::new(session_id, intent_text, intent.intent_type, steps, plan_context);
        let plan = self.store.insert(plan)?;

        info!(
            plan_id = %plan.id,
            session_id = %session_id,
            intent_type = %plan.intent_type,
            steps = plan.steps.len(),
            "plan created"
        );

        let pointer = json!({ "planId": plan.id, "intent": plan.intent });
        if let Err(e) = self.memory.save_memory(session_id, MemoryType::Workflow, &plan.id, pointer) {
            warn!(plan_id = %plan.id, error = %e, "workflow memory write failed, continuing");
        }

        Ok(plan)
    }

    /// Lock `plan_id` and run `f`, but only for ids the store knows.
    /// Unknown ids never reach the lock table.
    fn with_known_plan(
        &self,
        plan_id: &str,
        f: impl FnOnce() -> WaypointResult<Advance>,
    ) -> WaypointResult<Advance> {
        if self.store.get(plan_id)?.is_none() {
            return Err(WaypointError::PlanNotFound { plan_id: plan_id.to_string() });
        }
        self.locks.with_lock(plan_id, f).and_then(|r| r)
    }

    /// Load, optionally merge user input, and advance. Caller holds the lock.
    fn advance_locked(
        &self,
        plan_id: &str,
        step_input: Option<Map<String, Value>>,
        user_input: Option<Map<String, Value>>,
    ) -> WaypointResult<Advance> {
        let mut plan = self
            .store
            .get(plan_id)?
            .ok_or_else(|| WaypointError::PlanNotFound { plan_id: plan_id.to_string() })?;

        if let Some(input) = user_input {
            if !plan.is_terminal() {
                info!(plan_id = %plan_id, keys = ?input.keys().collect::<Vec<_>>(), "user input received");
                plan.merge_context(input);
                let expected = plan.revision;
                plan = self.store.compare_and_swap(plan, expected)?;
            } else {
                warn!(plan_id = %plan_id, status = %plan.status, "user input ignored for terminal plan");
            }
        }

        self.engine.advance(plan, step_input)
    }

    fn respond(&self, plan_id: &str, result: WaypointResult<Advance>) -> ExecutionResponse {
        match result {
            Ok(Advance::Completed { plan, output }) => ExecutionResponse::advanced(plan, Some(output)),
            Ok(Advance::Unchanged { plan, output }) => {
                if plan.status == PlanStatus::Failed {
                    let err = WaypointError::StateMachineError {
                        reason: format!("plan '{}' has already failed", plan.id),
                    };
                    ExecutionResponse::failed(Some(plan), &err)
                } else {
                    ExecutionResponse::advanced(plan, Some(output))
                }
            }
            Ok(Advance::Suspended { plan, output, prompt, .. }) => {
                ExecutionResponse::suspended(plan, output, prompt)
            }
            Ok(Advance::Blocked { plan, error }) | Ok(Advance::Failed { plan, error }) => {
                ExecutionResponse::failed(Some(plan), &error)
            }
            Err(e) => {
                warn!(plan_id = %plan_id, error = %e, "plan advance aborted");
                ExecutionResponse::failed(self.get_plan(plan_id), &e)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
