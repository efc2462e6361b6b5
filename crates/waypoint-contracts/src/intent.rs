//! Classified intents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SEARCH_AND_BUY: &str = "search_and_buy";
pub const COMPARE_PRODUCTS: &str = "compare_products";
pub const RESEARCH: &str = "research";
pub const GENERAL_QUERY: &str = "general_query";
pub const ASSET_OVERVIEW: &str = "asset_overview";
pub const AIRDROP_CLAIM: &str = "airdrop_claim";

/// The classifier's verdict for one piece of free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMatch {
    pub intent_type: String,
    /// Parameters extracted from the text (e.g. `query`, `wantToBuy`).
    pub params: Map<String, Value>,
}

impl IntentMatch {
    pub fn new(intent_type: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            intent_type: intent_type.into(),
            params,
        }
    }

    /// The fallback verdict for text no pattern recognized.
    pub fn general_query(text: &str) -> Self {
        let mut params = Map::new();
        params.insert("query".to_string(), Value::String(text.to_string()));
        Self::new(GENERAL_QUERY, params)
    }
}
