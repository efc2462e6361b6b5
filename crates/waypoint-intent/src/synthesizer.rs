//! Per-intent step generators.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use waypoint_contracts::{
    intent::{AIRDROP_CLAIM, ASSET_OVERVIEW, COMPARE_PRODUCTS, GENERAL_QUERY, RESEARCH, SEARCH_AND_BUY},
    plan::Context,
    step::Step,
};
use waypoint_core::traits::PlanSynthesizer;

/// Skill ids the generated steps call.
pub mod skills {
    pub const PRODUCT_SEARCH: &str = "product-search";
    pub const WEB_SEARCH: &str = "web-search";
    pub const ADD_TO_CART: &str = "add-to-cart";
    pub const CHECKOUT: &str = "checkout";
    pub const ASSET_OVERVIEW: &str = "asset-overview";
    pub const AIRDROP_DISCOVER: &str = "airdrop-discover";
    pub const AIRDROP_CLAIM: &str = "airdrop-claim";
}

/// A `PlanSynthesizer` with one fixed step template per intent type.
///
/// Unknown intent types produce no steps, which makes plan creation fail.
#[derive(Debug, Default)]
pub struct TemplateSynthesizer;

impl TemplateSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl PlanSynthesizer for TemplateSynthesizer {
    fn synthesize(&self, intent_type: &str, params: &Map<String, Value>, context: &Context) -> Vec<Step> {
        let steps = match intent_type {
            SEARCH_AND_BUY => search_and_buy(params, context),
            COMPARE_PRODUCTS => compare_products(params),
            RESEARCH => research(params, context),
            GENERAL_QUERY => general_query(params, context),
            ASSET_OVERVIEW => vec![Step::new("overview", skills::ASSET_OVERVIEW, "Summarize wallet assets")],
            AIRDROP_CLAIM => airdrop_claim(),
            other => {
                warn!(intent_type = %other, "no step template for intent type");
                vec![]
            }
        };
        debug!(intent_type = %intent_type, steps = steps.len(), "steps synthesized");
        steps
    }
}

/// The first string found under `key` in `params`, then in `context`.
fn text_param(key: &str, params: &Map<String, Value>, context: &Context) -> String {
    params
        .get(key)
        .or_else(|| context.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn search_and_buy(params: &Map<String, Value>, context: &Context) -> Vec<Step> {
    let query = text_param("query", params, context);
    let mut search = Step::new("search", skills::PRODUCT_SEARCH, format!("Search for {query}")).with_input("query", query);
    if let Some(budget) = params.get("budget").filter(|b| !b.is_null()) {
        search = search.with_input("maxPrice", budget.clone());
    }

    let want_to_buy = params.get("wantToBuy").and_then(Value::as_bool).unwrap_or(false);
    if !want_to_buy {
        return vec![search];
    }

    vec![
        search,
        Step::new("select", skills::ADD_TO_CART, "Add the chosen product to the cart")
            .with_input("productId", "{{selectedProductId}}")
            .with_input("quantity", 1)
            .depends_on("search"),
        Step::new("checkout", skills::CHECKOUT, "Check out the cart").depends_on("select"),
    ]
}

fn compare_products(params: &Map<String, Value>) -> Vec<Step> {
    params
        .get("products")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .filter_map(Value::as_str)
                .enumerate()
                .map(|(i, product)| {
                    Step::new(format!("search_{i}"), skills::PRODUCT_SEARCH, format!("Look up {product}"))
                        .with_input("query", product)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn research(params: &Map<String, Value>, context: &Context) -> Vec<Step> {
    let topic = text_param("topic", params, context);
    vec![Step::new("search", skills::WEB_SEARCH, format!("Research {topic}"))
        .with_input("query", topic)
        .with_fallback(skills::PRODUCT_SEARCH)]
}

fn general_query(params: &Map<String, Value>, context: &Context) -> Vec<Step> {
    let query = text_param("query", params, context);
    vec![Step::new("search", skills::PRODUCT_SEARCH, format!("Search for {query}")).with_input("query", query)]
}

fn airdrop_claim() -> Vec<Step> {
    vec![
        Step::new("discover", skills::AIRDROP_DISCOVER, "Discover claimable airdrops"),
        Step::new("claim", skills::AIRDROP_CLAIM, "Claim the discovered airdrop")
            .with_input("airdropId", "{{discoveredAirdropId}}")
            .depends_on("discover"),
    ]
}
