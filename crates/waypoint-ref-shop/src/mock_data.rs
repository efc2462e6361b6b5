//! Simulated shop and wallet data for the Waypoint reference runtime.
//!
//! All data in this module is hardcoded and fictional. No external systems are
//! contacted. It stands in for a product catalog, an inventory service, and a
//! wallet/indexer in a production deployment.

use serde::Serialize;
use serde_json::{json, Value};

use waypoint_core::config::ReplanConfig;

// ── Catalog (mock) ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Price in whole yuan.
    pub price: u64,
    pub stock: u32,
    #[serde(skip)]
    pub tags: Vec<String>,
}

impl Product {
    fn new(id: &str, name: &str, price: u64, stock: u32, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            stock,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Relevance of this product for one lowercase query token: 2 when the
    /// name or a tag contains the token, 1 when the token contains a tag.
    fn score(&self, token: &str) -> u32 {
        if self.name.to_lowercase().contains(token) || self.tags.iter().any(|t| t.contains(token)) {
            2
        } else if self.tags.iter().any(|t| token.contains(t.as_str())) {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "id": self.id, "name": self.name, "price": self.price, "stock": self.stock })
    }
}

/// The seed catalog. Order is the tie-break for equally relevant results.
///
/// - p-101 AuraSound Lite     399  in stock
/// - p-102 Pebble Buds        199  in stock
/// - p-100 AuraSound Pro     1299  OUT OF STOCK
/// - p-200 Inkleaf Reader     899  in stock
/// - p-201 Papyrus Note      1099  in stock
/// - p-300 Keystone keyboard  459  in stock
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("p-101", "AuraSound Lite 头戴耳机", 399, 12, &["耳机", "headphones"]),
        Product::new("p-102", "Pebble Buds 真无线耳机", 199, 30, &["耳机", "earbuds", "headphones"]),
        Product::new("p-100", "AuraSound Pro 旗舰降噪耳机", 1299, 0, &["降噪耳机", "耳机", "noise cancelling", "headphones"]),
        Product::new("p-200", "Inkleaf Reader 电子书阅读器", 899, 5, &["阅读器", "ereader", "inkleaf"]),
        Product::new("p-201", "Papyrus Note 手写阅读器", 1099, 3, &["阅读器", "ereader", "papyrus"]),
        Product::new("p-300", "Keystone 87键机械键盘", 459, 8, &["机械键盘", "键盘", "keyboard"]),
    ]
}

/// Search `products` for `query`.
///
/// Every whitespace-separated token contributes to the relevance score; a
/// product matches when any token does. The replanner's qualifier tokens are
/// honored: the alternative qualifier drops out-of-stock items and the budget
/// qualifier sorts by price.
pub fn search_catalog(
    products: &[Product],
    query: &str,
    max_price: Option<f64>,
    qualifiers: &ReplanConfig,
) -> Vec<Value> {
    let tokens: Vec<String> = query.split_whitespace().map(|t| t.to_lowercase()).collect();
    let has_token = |qualifier: &str| {
        let qualifier = qualifier.to_lowercase();
        tokens.iter().any(|t| *t == qualifier)
    };
    let in_stock_only = has_token(&qualifiers.alternative_qualifier);
    let by_price = has_token(&qualifiers.budget_qualifier);

    let mut scored: Vec<(u32, &Product)> = products
        .iter()
        .map(|p| (tokens.iter().map(|t| p.score(t)).sum::<u32>(), p))
        .filter(|(score, _)| *score > 0)
        .filter(|(_, p)| !in_stock_only || p.stock > 0)
        .filter(|(_, p)| max_price.map_or(true, |max| p.price as f64 <= max))
        .collect();

    if by_price {
        scored.sort_by_key(|(_, p)| p.price);
    } else {
        scored.sort_by(|a, b| b.0.cmp(&a.0));
    }

    scored.into_iter().map(|(_, p)| p.to_json()).collect()
}

// ── Research articles (mock) ─────────────────────────────────────────────────

/// Canned articles returned by an online web search.
pub fn research_articles(topic: &str) -> Value {
    json!([
        { "title": format!("{topic}: a buyer's guide"), "source": "example-reviews.test" },
        { "title": format!("Five things to know about {topic}"), "source": "gadget-notes.test" }
    ])
}

// ── Wallet (mock) ────────────────────────────────────────────────────────────

/// Starting spendable balance in yuan.
pub const STARTING_BALANCE: u64 = 2000;

#[derive(Debug, Clone, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub amount: f64,
    #[serde(rename = "usdValue")]
    pub usd_value: f64,
}

pub fn holdings() -> Vec<Holding> {
    vec![
        Holding { symbol: "LUM".to_string(), amount: 420.0, usd_value: 84.0 },
        Holding { symbol: "USDC".to_string(), amount: 350.0, usd_value: 350.0 },
        Holding { symbol: "ORB".to_string(), amount: 1.5, usd_value: 612.0 },
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct Airdrop {
    pub id: String,
    pub project: String,
    pub symbol: String,
    pub amount: f64,
    pub claimed: bool,
}

/// - ad-7 Lumen Network 120 LUM  claimable
/// - ad-8 Orbital DEX    25 ORB  already claimed
pub fn airdrops() -> Vec<Airdrop> {
    vec![
        Airdrop { id: "ad-7".to_string(), project: "Lumen Network".to_string(), symbol: "LUM".to_string(), amount: 120.0, claimed: false },
        Airdrop { id: "ad-8".to_string(), project: "Orbital DEX".to_string(), symbol: "ORB".to_string(), amount: 25.0, claimed: true },
    ]
}

#[cfg(test)]
mod tests {
    use waypoint_core::config::ReplanConfig;

    use super::{catalog, search_catalog};

    fn ids(results: &[serde_json::Value]) -> Vec<&str> {
        results.iter().map(|p| p["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn most_specific_match_comes_first() {
        let products = catalog();
        assert_eq!(ids(&search_catalog(&products, "降噪耳机", None, &ReplanConfig::default()))[0], "p-100");
        assert_eq!(ids(&search_catalog(&products, "耳机", None, &ReplanConfig::default())), vec!["p-101", "p-102", "p-100"]);
    }

    #[test]
    fn qualifiers_filter_and_sort() {
        let products = catalog();
        let defaults = ReplanConfig::default();
        assert_eq!(ids(&search_catalog(&products, "降噪耳机 alternative", None, &defaults)), vec!["p-101", "p-102"]);
        assert_eq!(ids(&search_catalog(&products, "耳机 cheaper", Some(300.0), &defaults)), vec!["p-102"]);
    }

    #[test]
    fn configured_qualifiers_replace_the_defaults() {
        let products = catalog();
        let custom = ReplanConfig {
            alternative_qualifier: "替代".to_string(),
            budget_qualifier: "更便宜".to_string(),
        };

        assert_eq!(ids(&search_catalog(&products, "降噪耳机 替代", None, &custom)), vec!["p-101", "p-102"]);
        assert_eq!(ids(&search_catalog(&products, "耳机 更便宜", None, &custom)), vec!["p-102", "p-101", "p-100"]);
        // The default words are ordinary tokens under a custom config.
        assert_eq!(ids(&search_catalog(&products, "降噪耳机 alternative", None, &custom))[0], "p-100");
    }

    #[test]
    fn unknown_query_finds_nothing() {
        assert!(search_catalog(&catalog(), "智能手表", None, &ReplanConfig::default()).is_empty());
    }
}
