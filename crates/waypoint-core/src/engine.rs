//! The Waypoint execution engine: the plan-act-observe state machine.
//!
//! Each call to `advance()` drives one plan forward as far as it can go:
//!
//!   Cursor → Dependencies → Input gate → [Skill] → Record → Observe → Next
//!
//! and stops at the first of: plan completed, plan failed, unmet dependency,
//! or a step whose input needs a value only the user can supply. The loop is
//! iterative; every exit is an explicit `return` below.
//!
//! On a reported skill failure the engine tries, in order, the step's
//! fallback skill, then the replanner. A skill that raises an error instead of
//! reporting one fails the plan with no recovery.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    plan::{Plan, PlanStatus},
    skill::FailureReason,
    step::Step,
};

use crate::{
    config::OrchestratorConfig,
    fallback::FallbackExecutor,
    observe, prompt,
    registry::SkillRegistry,
    replan::Replanner,
    template,
    traits::{MemoryService, PlanStore},
};

/// The outcome of one `advance()` call.
///
/// Callers pattern-match on this to decide what to show:
/// - `Completed` → the plan ran its last step during this call
/// - `Unchanged` → the plan was already terminal; nothing happened
/// - `Suspended` → supply the missing values, then resume
/// - `Blocked`   → a dependency has not succeeded; nothing was changed
/// - `Failed`    → the plan is now `failed`
#[derive(Debug)]
pub enum Advance {
    Completed {
        plan: Plan,
        /// The final plan context.
        output: Value,
    },
    Unchanged {
        plan: Plan,
        output: Value,
    },
    Suspended {
        plan: Plan,
        /// Output of the last step run during this call, if any.
        output: Option<Value>,
        prompt: String,
        missing: Vec<String>,
    },
    Blocked {
        plan: Plan,
        error: WaypointError,
    },
    Failed {
        plan: Plan,
        error: WaypointError,
    },
}

impl Advance {
    pub fn plan(&self) -> &Plan {
        match self {
            Advance::Completed { plan, .. }
            | Advance::Unchanged { plan, .. }
            | Advance::Suspended { plan, .. }
            | Advance::Blocked { plan, .. }
            | Advance::Failed { plan, .. } => plan,
        }
    }
}

/// What happened to the step at the cursor.
enum StepOutcome {
    /// The step (or its fallback) succeeded; the cursor moved.
    Advanced(Value),
    /// A corrective step was inserted at the cursor.
    Replanned,
    /// The plan is now failed.
    Failed(WaypointError),
}

/// Drives plans through their steps. Holds no per-plan state.
pub struct Engine {
    registry: Arc<SkillRegistry>,
    store: Arc<dyn PlanStore>,
    memory: Arc<dyn MemoryService>,
    replanner: Replanner,
    config: OrchestratorConfig,
}

impl Engine {
    pub fn new(
        registry: Arc<SkillRegistry>,
        store: Arc<dyn PlanStore>,
        memory: Arc<dyn MemoryService>,
        config: OrchestratorConfig,
    ) -> Self {
        let replanner = Replanner::new(config.replan.clone());
        Self { registry, store, memory, replanner, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Advance `plan` as far as possible.
    ///
    /// `overrides` is overlaid on the context when resolving the input of the
    /// first step this call reaches; it is not merged into the context.
    ///
    /// Every state change is committed to the store before returning. The
    /// caller must hold the plan's lock.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for store and state-machine failures. Skill
    /// failures, unmet dependencies, and suspensions are `Advance` variants.
    pub fn advance(&self, mut plan: Plan, overrides: Option<Map<String, Value>>) -> WaypointResult<Advance> {
        if plan.is_terminal() {
            debug!(plan_id = %plan.id, status = %plan.status, "plan already terminal, nothing to do");
            let output = Value::Object(plan.context.clone());
            return Ok(Advance::Unchanged { plan, output });
        }

        let mut overrides = overrides;
        let mut last_output: Option<Value> = None;
        let mut dirty = false;

        loop {
            // ── Exit: every step has run ─────────────────────────────────────
            let Some(step) = plan.current_step().cloned() else {
                plan.transition(PlanStatus::Completed)?;
                self.commit(&mut plan)?;
                info!(
                    plan_id = %plan.id,
                    steps = plan.steps.len(),
                    records = plan.history.len(),
                    "plan completed"
                );
                let output = Value::Object(plan.context.clone());
                return Ok(Advance::Completed { plan, output });
            };

            debug!(
                plan_id = %plan.id,
                step_id = %step.id,
                skill_id = %step.skill_id,
                index = plan.current_step_index,
                "engine step starting"
            );

            // ── Exit: a prerequisite has not succeeded ───────────────────────
            if let Some(dependency) = plan.unmet_dependency(&step) {
                let error = WaypointError::UnmetDependency {
                    step_id: step.id.clone(),
                    dependency: dependency.to_string(),
                };
                warn!(plan_id = %plan.id, step_id = %step.id, dependency = %dependency, "unmet dependency");
                if dirty {
                    self.commit(&mut plan)?;
                }
                return Ok(Advance::Blocked { plan, error });
            }

            // ── Exit: the step needs a value the user has not given ──────────
            let bindings = template::merge(&plan.context, overrides.as_ref());
            let missing = template::missing_variables(&step.input, &bindings);
            if !missing.is_empty() {
                let prompt =
                    prompt::user_prompt(&step, &missing, &plan.context, self.config.candidate_limit);
                if dirty {
                    self.commit(&mut plan)?;
                }
                info!(
                    plan_id = %plan.id,
                    step_id = %step.id,
                    missing = ?missing,
                    "execution suspended awaiting user input"
                );
                return Ok(Advance::Suspended { plan, output: last_output, prompt, missing });
            }

            // The override only applies to the first step reached.
            overrides = None;
            let input = template::resolve(&step.input, &bindings);

            plan.transition(PlanStatus::Executing)?;
            dirty = true;

            match self.run_step(&mut plan, &step, input)? {
                StepOutcome::Advanced(output) => {
                    last_output = Some(output);
                }
                StepOutcome::Replanned => {}
                StepOutcome::Failed(error) => {
                    self.commit(&mut plan)?;
                    warn!(plan_id = %plan.id, step_id = %step.id, error = %error, "plan failed");
                    return Ok(Advance::Failed { plan, error });
                }
            }

            // Persist progress after every step so a crash or concurrent
            // reader never sees a cursor without its history entry.
            self.commit(&mut plan)?;
            dirty = false;
        }
    }

    /// Invoke the step's skill, record the attempt, and apply the recovery
    /// policy on failure.
    fn run_step(&self, plan: &mut Plan, step: &Step, input: Map<String, Value>) -> WaypointResult<StepOutcome> {
        let result = observe::invoke(&self.registry, self.memory.as_ref(), plan, &step.id, &step.skill_id, &input);

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                // A raised error is not retried, fallen back, or replanned.
                let reason = e.to_string();
                plan.record(observe::record_for_exception(&step.id, &step.skill_id, input, &reason));
                plan.transition(PlanStatus::Failed)?;
                return Ok(StepOutcome::Failed(WaypointError::SkillException {
                    skill_id: step.skill_id.clone(),
                    reason,
                }));
            }
        };

        plan.record(observe::record_for(&step.id, &step.skill_id, input.clone(), &result));

        if result.success {
            let output = result.data.unwrap_or(Value::Null);
            observe::absorb_output(plan, &step.id, &output);
            plan.advance();
            debug!(plan_id = %plan.id, step_id = %step.id, "step succeeded");
            return Ok(StepOutcome::Advanced(output));
        }

        let error_text = result.error_text();
        let reason = result.failure_reason().unwrap_or(FailureReason::Other);
        warn!(
            plan_id = %plan.id,
            step_id = %step.id,
            skill_id = %step.skill_id,
            reason = ?reason,
            error = %error_text,
            "skill reported failure"
        );

        // ── Recovery 1: fallback skill ───────────────────────────────────────
        if let Some(fallback_skill) = &step.fallback {
            let fallback = FallbackExecutor::new(&self.registry, self.memory.as_ref());
            return match fallback.execute(plan, step, fallback_skill, &input) {
                Ok(output) => {
                    observe::absorb_output(plan, &step.id, &output);
                    plan.advance();
                    Ok(StepOutcome::Advanced(output))
                }
                Err(error) => {
                    plan.transition(PlanStatus::Failed)?;
                    Ok(StepOutcome::Failed(error))
                }
            };
        }

        // ── Recovery 2: replanning ───────────────────────────────────────────
        let Some(corrective) = self.replanner.replan(reason, plan) else {
            plan.transition(PlanStatus::Failed)?;
            return Ok(StepOutcome::Failed(WaypointError::SkillFailed {
                skill_id: step.skill_id.clone(),
                reason: error_text,
            }));
        };

        if let Some(limit) = self.config.max_replans {
            if plan.replan_count >= limit {
                plan.transition(PlanStatus::Failed)?;
                return Ok(StepOutcome::Failed(WaypointError::ReplanLimitReached {
                    step_id: step.id.clone(),
                    limit,
                }));
            }
        }

        plan.transition(PlanStatus::Replanning)?;
        info!(
            plan_id = %plan.id,
            failed_step = %step.id,
            inserted_step = %corrective.id,
            reason = ?reason,
            "replanning: corrective step inserted at cursor"
        );
        plan.insert_at_cursor(corrective);
        Ok(StepOutcome::Replanned)
    }

    /// Write `plan` back to the store, adopting the committed revision.
    fn commit(&self, plan: &mut Plan) -> WaypointResult<()> {
        let expected = plan.revision;
        *plan = self.store.compare_and_swap(plan.clone(), expected)?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Map, Value};

    use waypoint_contracts::{
        error::WaypointError,
        plan::{Plan, PlanStatus},
        skill::{FailureReason, SkillResult},
        step::Step,
    };

    use crate::{
        config::OrchestratorConfig,
        registry::SkillRegistry,
        test_support::{MockMemory, MockStore, ScriptedSkill},
        traits::PlanStore,
    };

    use super::{Advance, Engine};

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn products() -> Value {
        json!({ "products": [
            { "id": "p-1", "name": "Studio Headphones", "price": 199 },
            { "id": "p-2", "name": "Earbuds", "price": 59 }
        ]})
    }

    fn buy_steps() -> Vec<Step> {
        vec![
            Step::new("search", "product-search", "Search for products").with_input("query", "耳机"),
            Step::new("select", "add-to-cart", "Add the chosen product to the cart")
                .with_input("productId", "{{selectedProductId}}")
                .with_input("quantity", 1)
                .depends_on("search"),
            Step::new("checkout", "checkout", "Check out the cart").depends_on("select"),
        ]
    }

    struct Harness {
        engine: Engine,
        store: Arc<MockStore>,
    }

    impl Harness {
        fn new(registry: SkillRegistry, config: OrchestratorConfig) -> Self {
            let store = Arc::new(MockStore::default());
            let engine = Engine::new(
                Arc::new(registry),
                store.clone(),
                Arc::new(MockMemory::default()),
                config,
            );
            Self { engine, store }
        }

        fn stored(&self, steps: Vec<Step>, context: Value) -> Plan {
            let context = match context {
                Value::Object(m) => m,
                _ => Map::new(),
            };
            let plan = Plan::new("session-1", "帮我搜索耳机并购买", "search_and_buy", steps, context);
            self.store.insert(plan).unwrap()
        }
    }

    fn register(registry: &mut SkillRegistry, skill: &ScriptedSkill) {
        registry.register_skill(Box::new(skill.clone()));
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    /// All three steps succeed in one call; the plan completes and each step
    /// has exactly one history record.
    #[test]
    fn runs_every_step_to_completion() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let cart = ScriptedSkill::always("add-to-cart", SkillResult::ok(json!({ "cartId": "c-1" })));
        let checkout = ScriptedSkill::always("checkout", SkillResult::ok(json!({ "orderId": "o-1" })));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        register(&mut registry, &cart);
        register(&mut registry, &checkout);

        let h = Harness::new(registry, OrchestratorConfig::default());
        let plan = h.stored(buy_steps(), json!({}));

        let result = h.engine.advance(plan, None).unwrap();

        match result {
            Advance::Completed { plan, output } => {
                assert_eq!(plan.status, PlanStatus::Completed);
                assert_eq!(plan.current_step_index, 3);
                assert_eq!(plan.history.len(), 3);
                assert!(plan.history.iter().all(|r| r.success));
                assert_eq!(output["checkout_result"], json!({ "orderId": "o-1" }));
            }
            other => panic!("expected Completed, got {:?}", other),
        }

        // The resolved input, not the template, reached the cart skill.
        assert_eq!(cart.calls()[0]["productId"], json!("p-1"));
        assert_eq!(h.store.writes(), 4, "one commit per step plus completion");
    }

    /// A terminal plan is returned untouched with its context.
    #[test]
    fn terminal_plan_is_a_no_op() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let mut plan = h.stored(vec![Step::new("search", "product-search", "Search")], json!({ "query": "x" }));
        plan.status = PlanStatus::Completed;

        match h.engine.advance(plan, None).unwrap() {
            Advance::Unchanged { plan, output } => {
                assert_eq!(plan.status, PlanStatus::Completed);
                assert_eq!(output["query"], json!("x"));
            }
            other => panic!("expected Unchanged, got {:?}", other),
        }
        assert_eq!(search.call_count(), 0);
    }

    /// An unmet dependency returns without touching cursor, status, history.
    #[test]
    fn unmet_dependency_blocks_without_state_change() {
        let cart = ScriptedSkill::always("add-to-cart", SkillResult::ok(json!({})));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &cart);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![Step::new("select", "add-to-cart", "Add to cart").depends_on("search")];
        let plan = h.stored(steps, json!({}));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Blocked { plan, error } => {
                assert!(matches!(error, WaypointError::UnmetDependency { ref dependency, .. } if dependency == "search"));
                assert_eq!(plan.current_step_index, 0);
                assert_eq!(plan.status, PlanStatus::Planning);
                assert!(plan.history.is_empty());
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(cart.call_count(), 0);
        assert_eq!(h.store.writes(), 0);
    }

    /// Primary fails, fallback succeeds: two records, cursor advances once.
    #[test]
    fn fallback_success_advances_cursor() {
        let primary = ScriptedSkill::always("web-search", SkillResult::failure("search backend down"));
        let fallback = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &primary);
        register(&mut registry, &fallback);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![
            Step::new("search", "web-search", "Research the topic")
                .with_input("query", "{{topic}}")
                .with_fallback("product-search"),
            Step::new("confirm", "confirm", "Confirm the choice").with_input("answer", "{{confirmation}}"),
        ];
        let plan = h.stored(steps, json!({ "topic": "降噪耳机" }));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Suspended { plan, output, .. } => {
                assert_eq!(plan.current_step_index, 1);
                assert_eq!(plan.history.len(), 2);
                assert_eq!(plan.history[0].step_id, "search");
                assert!(!plan.history[0].success);
                assert_eq!(plan.history[1].step_id, "search_fallback");
                assert_eq!(plan.history[1].skill_id, "product-search");
                assert!(plan.history[1].success);
                assert_eq!(plan.context["selectedProductId"], json!("p-1"));
                assert_eq!(output, Some(products()));
            }
            other => panic!("expected Suspended, got {:?}", other),
        }

        // Both attempts received the same resolved input.
        assert_eq!(primary.calls()[0], fallback.calls()[0]);
        assert_eq!(fallback.calls()[0]["query"], json!("降噪耳机"));
    }

    /// Fallback failure fails the plan with the fallback's error.
    #[test]
    fn fallback_failure_fails_plan() {
        let primary = ScriptedSkill::always("web-search", SkillResult::failure("down"));
        let fallback = ScriptedSkill::always("product-search", SkillResult::failure("also down"));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &primary);
        register(&mut registry, &fallback);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![Step::new("search", "web-search", "Search").with_fallback("product-search")];
        let plan = h.stored(steps, json!({}));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Failed { plan, error } => {
                assert_eq!(plan.status, PlanStatus::Failed);
                assert_eq!(plan.current_step_index, 0);
                assert_eq!(plan.history.len(), 2);
                match error {
                    WaypointError::FallbackFailed { skill_id, reason } => {
                        assert_eq!(skill_id, "product-search");
                        assert_eq!(reason, "also down");
                    }
                    other => panic!("expected FallbackFailed, got {:?}", other),
                }
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    /// Out-of-stock with no fallback inserts one search at the cursor, runs it
    /// next, retries the failed step, and returns to `executing`.
    #[test]
    fn out_of_stock_replans_at_cursor() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let cart = ScriptedSkill::sequence(
            "add-to-cart",
            vec![
                SkillResult::failure("商品库存不足"),
                SkillResult::ok(json!({ "cartId": "c-9" })),
            ],
        );
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        register(&mut registry, &cart);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![
            Step::new("search", "product-search", "Search").with_input("query", "{{query}}"),
            Step::new("select", "add-to-cart", "Add to cart")
                .with_input("productId", "{{selectedProductId}}")
                .depends_on("search"),
            Step::new("confirm", "confirm", "Confirm the order").with_input("answer", "{{confirmation}}"),
        ];
        let plan = h.stored(steps, json!({ "query": "耳机" }));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Suspended { plan, .. } => {
                assert_eq!(plan.steps.len(), 4, "exactly one step inserted");
                assert_eq!(plan.steps[1].id, "replan_1");
                assert_eq!(plan.status, PlanStatus::Executing);
                assert_eq!(plan.replan_count, 1);
                assert_eq!(plan.current_step_index, 3);

                let order: Vec<&str> = plan.history.iter().map(|r| r.step_id.as_str()).collect();
                assert_eq!(order, vec!["search", "select", "replan_1", "select"]);
                assert_eq!(plan.history[1].reason, Some(FailureReason::OutOfStock));
            }
            other => panic!("expected Suspended, got {:?}", other),
        }

        assert_eq!(search.calls()[1]["query"], json!("耳机 alternative"));
    }

    /// An unrecognized failure with no fallback fails the plan.
    #[test]
    fn unrecognized_failure_fails_plan() {
        let search = ScriptedSkill::always("product-search", SkillResult::failure("rate limited"));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let plan = h.stored(vec![Step::new("search", "product-search", "Search")], json!({}));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Failed { plan, error } => {
                assert_eq!(plan.status, PlanStatus::Failed);
                assert_eq!(plan.steps.len(), 1);
                assert!(matches!(error, WaypointError::SkillFailed { ref reason, .. } if reason == "rate limited"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    /// A skill that raises an error is not recovered, even with a fallback.
    #[test]
    fn skill_exception_fails_without_fallback() {
        let primary = ScriptedSkill::raising("web-search", "connection reset");
        let fallback = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &primary);
        register(&mut registry, &fallback);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![Step::new("search", "web-search", "Search").with_fallback("product-search")];
        let plan = h.stored(steps, json!({}));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Failed { plan, error } => {
                assert!(matches!(error, WaypointError::SkillException { .. }));
                assert_eq!(plan.history.len(), 1);
                assert!(plan.history[0].error.as_deref().unwrap().contains("connection reset"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(fallback.call_count(), 0);
    }

    /// With `max_replans` set, a recurring out-of-stock stops at the cap.
    #[test]
    fn replan_limit_stops_recurring_failure() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let cart = ScriptedSkill::always(
            "add-to-cart",
            SkillResult::failure_with(FailureReason::OutOfStock, "sold out"),
        );
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        register(&mut registry, &cart);
        let config = OrchestratorConfig { max_replans: Some(2), ..OrchestratorConfig::default() };
        let h = Harness::new(registry, config);

        let steps = vec![Step::new("select", "add-to-cart", "Add to cart").with_input("productId", "p-1")];
        let plan = h.stored(steps, json!({ "query": "耳机" }));

        match h.engine.advance(plan, None).unwrap() {
            Advance::Failed { plan, error } => {
                assert!(matches!(error, WaypointError::ReplanLimitReached { limit: 2, .. }));
                assert_eq!(plan.replan_count, 2);
                assert_eq!(plan.steps.len(), 3);
                assert_eq!(plan.status, PlanStatus::Failed);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(cart.call_count(), 3);
    }

    /// The look-ahead gate stops before a step with an unbound variable and
    /// neither runs nor records it; the per-call override only feeds the
    /// first step.
    #[test]
    fn gate_suspends_before_unbound_step() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(json!({ "products": [] })));
        let cart = ScriptedSkill::always("add-to-cart", SkillResult::ok(json!({})));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        register(&mut registry, &cart);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let steps = vec![
            Step::new("search", "product-search", "Search").with_input("query", "{{query}}"),
            Step::new("select", "add-to-cart", "Add to cart")
                .with_input("productId", "{{selectedProductId}}")
                .depends_on("search"),
        ];
        let plan = h.stored(steps, json!({}));

        let mut overrides = Map::new();
        overrides.insert("query".to_string(), json!("耳机"));
        overrides.insert("selectedProductId".to_string(), json!("p-override"));

        match h.engine.advance(plan, Some(overrides)).unwrap() {
            Advance::Suspended { plan, missing, prompt, .. } => {
                assert_eq!(missing, vec!["selectedProductId"]);
                assert!(prompt.contains("No matching products"));
                assert_eq!(plan.current_step_index, 1);
                assert_eq!(plan.history.len(), 1);
                assert!(!plan.context.contains_key("query"), "override is not merged");
            }
            other => panic!("expected Suspended, got {:?}", other),
        }
        assert_eq!(search.calls()[0]["query"], json!("耳机"));
        assert_eq!(cart.call_count(), 0);
    }

    /// A stale revision is rejected by the store and surfaces as an error.
    #[test]
    fn stale_revision_is_rejected() {
        let search = ScriptedSkill::always("product-search", SkillResult::ok(products()));
        let mut registry = SkillRegistry::new();
        register(&mut registry, &search);
        let h = Harness::new(registry, OrchestratorConfig::default());

        let plan = h.stored(vec![Step::new("search", "product-search", "Search")], json!({}));
        let stale = plan.clone();
        h.engine.advance(plan, None).unwrap();

        let result = h.engine.advance(stale, None);
        assert!(matches!(result, Err(WaypointError::ConcurrentModification { .. })));
    }
}
