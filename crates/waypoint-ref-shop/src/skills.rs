//! Mock skills backed by the shared [`Shop`] state.
//!
//! Each skill reads and mutates the mock shop through `Shop::with_state`.
//! Business failures (no stock, over budget, insufficient balance) are
//! reported as failed `SkillResult`s with the error text a real backend would
//! send; the engine classifies them.

use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use waypoint_contracts::{
    error::{WaypointError, WaypointResult},
    memory::MemoryType,
    skill::{FailureReason, SkillResult},
};
use waypoint_core::{config::ReplanConfig, context::SkillContext, registry::SkillRegistry, traits::Skill};
use waypoint_intent::synthesizer::skills as ids;

use crate::mock_data::{self, Airdrop, Holding, Product};

// ── Shared shop state ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u64,
    pub unit_price: u64,
}

#[derive(Debug)]
pub struct ShopState {
    pub products: Vec<Product>,
    pub cart: Vec<CartLine>,
    pub balance: u64,
    pub orders: Vec<Value>,
    pub holdings: Vec<Holding>,
    pub airdrops: Vec<Airdrop>,
}

/// Handle to the mock shop. Clones share state.
#[derive(Clone)]
pub struct Shop {
    state: Arc<Mutex<ShopState>>,
    web_search_online: bool,
    qualifiers: ReplanConfig,
}

impl Shop {
    /// A shop seeded from `mock_data`, with the web search backend offline.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ShopState {
                products: mock_data::catalog(),
                cart: vec![],
                balance: mock_data::STARTING_BALANCE,
                orders: vec![],
                holdings: mock_data::holdings(),
                airdrops: mock_data::airdrops(),
            })),
            web_search_online: false,
            qualifiers: ReplanConfig::default(),
        }
    }

    pub fn with_web_search_online(mut self, online: bool) -> Self {
        self.web_search_online = online;
        self
    }

    /// Recognize the replanner's query qualifiers in product searches.
    /// Takes effect for registries built after this call.
    pub fn with_qualifiers(mut self, qualifiers: ReplanConfig) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    /// Run `f` against the locked state, reporting a poisoned lock as an
    /// exception raised by `skill_id`.
    pub fn with_state<T>(&self, skill_id: &str, f: impl FnOnce(&mut ShopState) -> T) -> WaypointResult<T> {
        let mut state = self.state.lock().map_err(|e| WaypointError::SkillException {
            skill_id: skill_id.to_string(),
            reason: format!("shop state lock poisoned: {}", e),
        })?;
        Ok(f(&mut state))
    }

    pub fn balance(&self) -> u64 {
        self.with_state("shop", |s| s.balance).unwrap_or_default()
    }

    pub fn orders(&self) -> Vec<Value> {
        self.with_state("shop", |s| s.orders.clone()).unwrap_or_default()
    }

    /// A registry holding every shop and wallet skill.
    pub fn registry(&self) -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        registry.register_skill(Box::new(ProductSearchSkill { shop: self.clone() }));
        registry.register_skill(Box::new(AddToCartSkill { shop: self.clone() }));
        registry.register_skill(Box::new(CheckoutSkill { shop: self.clone() }));
        registry.register_skill(Box::new(WebSearchSkill { online: self.web_search_online }));
        registry.register_skill(Box::new(AssetOverviewSkill { shop: self.clone() }));
        registry.register_skill(Box::new(AirdropDiscoverSkill { shop: self.clone() }));
        registry.register_skill(Box::new(AirdropClaimSkill { shop: self.clone() }));
        registry
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self::new()
    }
}

fn str_param<'p>(params: &'p Map<String, Value>, key: &str) -> &'p str {
    params.get(key).and_then(Value::as_str).unwrap_or_default()
}

// ── Shopping skills ──────────────────────────────────────────────────────────

/// `product-search`: `{query, maxPrice?}` → `{products: [...]}`.
pub struct ProductSearchSkill {
    shop: Shop,
}

impl Skill for ProductSearchSkill {
    fn id(&self) -> &str {
        ids::PRODUCT_SEARCH
    }

    fn triggers(&self) -> Vec<String> {
        vec!["搜索".to_string(), "search".to_string()]
    }

    fn input_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string", "minLength": 1 },
                "maxPrice": { "type": "number", "minimum": 0 }
            }
        }))
    }

    fn execute(&self, params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        let query = str_param(params, "query");
        let max_price = params.get("maxPrice").and_then(Value::as_f64);
        let qualifiers = &self.shop.qualifiers;
        let products = self.shop.with_state(self.id(), |s| {
            mock_data::search_catalog(&s.products, query, max_price, qualifiers)
        })?;
        debug!(query = %query, hits = products.len(), "product search");
        Ok(SkillResult::ok(json!({ "products": products }))
            .with_message(format!("found {} product(s)", products.len())))
    }
}

/// `add-to-cart`: `{productId, quantity}`. Refuses items without stock and
/// items priced above the plan's `budget`.
pub struct AddToCartSkill {
    shop: Shop,
}

impl Skill for AddToCartSkill {
    fn id(&self) -> &str {
        ids::ADD_TO_CART
    }

    fn input_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "required": ["productId"],
            "properties": {
                "productId": { "type": "string" },
                "quantity": { "type": "integer", "minimum": 1 }
            }
        }))
    }

    fn execute(&self, params: &Map<String, Value>, ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        let product_id = str_param(params, "productId").to_string();
        let quantity = params.get("quantity").and_then(Value::as_u64).unwrap_or(1);
        let budget = ctx.workflow().get("budget").and_then(Value::as_f64);

        self.shop.with_state(self.id(), |s| {
            let Some(product) = s.products.iter().find(|p| p.id == product_id) else {
                return SkillResult::failure_with(
                    FailureReason::InvalidInput,
                    format!("unknown product '{product_id}'"),
                );
            };
            if u64::from(product.stock) < quantity {
                return SkillResult::failure(format!("商品库存不足: {} ({})", product.name, product.id));
            }
            let total = product.price * quantity;
            if let Some(budget) = budget {
                if total as f64 > budget {
                    return SkillResult::failure(format!("超出预算: {} 元 > {} 元", total, budget));
                }
            }

            s.cart.push(CartLine { product_id: product.id.clone(), quantity, unit_price: product.price });
            let cart_total: u64 = s.cart.iter().map(|l| l.unit_price * l.quantity).sum();
            SkillResult::ok(json!({
                "productId": product.id,
                "name": product.name,
                "quantity": quantity,
                "cartTotal": cart_total
            }))
        })
    }
}

/// `checkout`: pays for the whole cart from the wallet balance and records
/// the order in conversation memory.
pub struct CheckoutSkill {
    shop: Shop,
}

impl Skill for CheckoutSkill {
    fn id(&self) -> &str {
        ids::CHECKOUT
    }

    fn execute(&self, _params: &Map<String, Value>, ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        let plan_id = ctx.workflow().plan_id().to_string();
        let result = self.shop.with_state(self.id(), |s| {
            if s.cart.is_empty() {
                return SkillResult::failure_with(FailureReason::InvalidInput, "cart is empty");
            }
            let total: u64 = s.cart.iter().map(|l| l.unit_price * l.quantity).sum();
            if total > s.balance {
                return SkillResult::failure(format!("余额不足: 需要 {} 元, 可用 {} 元", total, s.balance));
            }
            for line in &s.cart {
                if let Some(p) = s.products.iter_mut().find(|p| p.id == line.product_id) {
                    p.stock = p.stock.saturating_sub(line.quantity as u32);
                }
            }
            s.balance -= total;
            let items: Vec<Value> = s
                .cart
                .drain(..)
                .map(|l| json!({ "productId": l.product_id, "quantity": l.quantity }))
                .collect();
            let order = json!({
                "orderId": format!("order-{}", s.orders.len() + 1),
                "planId": plan_id,
                "items": items,
                "total": total
            });
            s.orders.push(order.clone());
            SkillResult::ok(order)
        })?;

        if let Some(order) = result.data.as_ref().filter(|_| result.success) {
            if let Err(e) = ctx
                .memory()
                .save_memory(ctx.session_id(), MemoryType::Conversation, "lastOrder", order.clone())
            {
                warn!(error = %e, "could not remember last order");
            }
        }
        Ok(result)
    }
}

/// `web-search`: returns canned articles when online, otherwise reports the
/// backend unavailable.
pub struct WebSearchSkill {
    online: bool,
}

impl Skill for WebSearchSkill {
    fn id(&self) -> &str {
        ids::WEB_SEARCH
    }

    fn triggers(&self) -> Vec<String> {
        vec!["研究".to_string(), "research".to_string()]
    }

    fn execute(&self, params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        if !self.online {
            return Ok(SkillResult::failure_with(
                FailureReason::Unavailable,
                "web search backend is unreachable",
            ));
        }
        let query = str_param(params, "query");
        Ok(SkillResult::ok(json!({ "articles": mock_data::research_articles(query) })))
    }
}

// ── Wallet skills ────────────────────────────────────────────────────────────

/// `asset-overview`: holdings and their total USD value.
pub struct AssetOverviewSkill {
    shop: Shop,
}

impl Skill for AssetOverviewSkill {
    fn id(&self) -> &str {
        ids::ASSET_OVERVIEW
    }

    fn execute(&self, _params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        self.shop.with_state(self.id(), |s| {
            let total: f64 = s.holdings.iter().map(|h| h.usd_value).sum();
            SkillResult::ok(json!({ "assets": s.holdings, "totalUsd": total }))
        })
    }
}

/// `airdrop-discover`: airdrops not yet claimed.
pub struct AirdropDiscoverSkill {
    shop: Shop,
}

impl Skill for AirdropDiscoverSkill {
    fn id(&self) -> &str {
        ids::AIRDROP_DISCOVER
    }

    fn execute(&self, _params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        self.shop.with_state(self.id(), |s| {
            let open: Vec<&Airdrop> = s.airdrops.iter().filter(|a| !a.claimed).collect();
            SkillResult::ok(json!({ "airdrops": open }))
        })
    }
}

/// `airdrop-claim`: `{airdropId}`; credits the tokens to the holdings.
pub struct AirdropClaimSkill {
    shop: Shop,
}

impl Skill for AirdropClaimSkill {
    fn id(&self) -> &str {
        ids::AIRDROP_CLAIM
    }

    fn input_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "required": ["airdropId"],
            "properties": { "airdropId": { "type": "string" } }
        }))
    }

    fn execute(&self, params: &Map<String, Value>, _ctx: &SkillContext<'_>) -> WaypointResult<SkillResult> {
        let airdrop_id = str_param(params, "airdropId").to_string();
        self.shop.with_state(self.id(), |s| {
            let Some(airdrop) = s.airdrops.iter_mut().find(|a| a.id == airdrop_id) else {
                return SkillResult::failure_with(
                    FailureReason::InvalidInput,
                    format!("unknown airdrop '{airdrop_id}'"),
                );
            };
            if airdrop.claimed {
                return SkillResult::failure_with(
                    FailureReason::InvalidInput,
                    format!("airdrop '{airdrop_id}' was already claimed"),
                );
            }
            airdrop.claimed = true;
            let (symbol, amount) = (airdrop.symbol.clone(), airdrop.amount);
            if let Some(holding) = s.holdings.iter_mut().find(|h| h.symbol == symbol) {
                holding.amount += amount;
            }
            SkillResult::ok(json!({
                "airdropId": airdrop_id,
                "symbol": symbol,
                "amount": amount,
                "txHash": format!("0xclaim-{airdrop_id}")
            }))
        })
    }
}
