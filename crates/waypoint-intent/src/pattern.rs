//! The intent pattern table and budget extraction.
//!
//! `PATTERNS` is ordered: specific intents (comparison, airdrops, assets,
//! research) come before the broad buy/search forms. Each entry's extractor
//! may decline a regex match (e.g. a comparison with a single item), in which
//! case classification moves on to the next entry.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Map, Number, Value};

use waypoint_contracts::intent::{
    AIRDROP_CLAIM, ASSET_OVERVIEW, COMPARE_PRODUCTS, RESEARCH, SEARCH_AND_BUY,
};

/// Turns a regex match into intent params, or declines it.
pub type Extractor = fn(&Captures<'_>, &str) -> Option<Map<String, Value>>;

/// One row of the classification table.
pub struct IntentPattern {
    /// Stable identifier used in logs.
    pub id: &'static str,
    pub intent_type: &'static str,
    pub regex: Regex,
    pub extract: Extractor,
}

impl IntentPattern {
    fn new(id: &'static str, intent_type: &'static str, pattern: &str, extract: Extractor) -> Self {
        Self {
            id,
            intent_type,
            // Patterns are literals below; a bad one is a programming error.
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("intent pattern '{id}' is invalid: {e}")),
            extract,
        }
    }

    /// Params for `text` if this entry matches it.
    pub fn apply(&self, text: &str) -> Option<Map<String, Value>> {
        let caps = self.regex.captures(text)?;
        (self.extract)(&caps, text)
    }
}

pub static PATTERNS: Lazy<Vec<IntentPattern>> = Lazy::new(|| {
    vec![
        IntentPattern::new(
            "compare-zh",
            COMPARE_PRODUCTS,
            r"^\s*(?:请|帮我)?\s*(?:对比|比较)(?:一下)?\s*(?P<items>.+?)\s*$",
            extract_comparison,
        ),
        IntentPattern::new(
            "compare-en",
            COMPARE_PRODUCTS,
            r"(?i)^\s*(?:please\s+)?compare\s+(?P<items>.+?)\s*$",
            extract_comparison,
        ),
        IntentPattern::new(
            "airdrop",
            AIRDROP_CLAIM,
            r"(?i)(?:(?:领取|认领).*空投|\bclaim\b.*\bairdrops?\b)",
            no_params,
        ),
        IntentPattern::new(
            "assets",
            ASSET_OVERVIEW,
            r"(?i)(?:我的(?:资产|余额|钱包|持仓)|(?:查看|看看|查询)(?:一下)?(?:我的)?(?:资产|余额|持仓)|\bmy\s+(?:assets|portfolio|balance|holdings|wallet)\b)",
            no_params,
        ),
        IntentPattern::new(
            "research-zh",
            RESEARCH,
            r"^\s*(?:请|帮我)?\s*(?:研究|调研|了解一下)(?:一下)?\s*(?P<topic>.+?)\s*$",
            extract_topic,
        ),
        IntentPattern::new(
            "research-en",
            RESEARCH,
            r"(?i)^\s*(?:please\s+)?(?:research|tell\s+me\s+about|learn\s+about)\s+(?P<topic>.+?)\s*$",
            extract_topic,
        ),
        IntentPattern::new(
            "buy-zh",
            SEARCH_AND_BUY,
            r"^\s*(?:请|帮我|我想|我要)?\s*(?:购买|买|下单)(?:一个|一台|一副|个)?\s*(?P<query>.+?)\s*$",
            extract_buy,
        ),
        IntentPattern::new(
            "buy-en",
            SEARCH_AND_BUY,
            r"(?i)^\s*(?:please\s+)?(?:i\s+(?:want|need)\s+to\s+)?(?:buy|purchase|order)\s+(?:an?\s+|some\s+)?(?P<query>.+?)\s*$",
            extract_buy,
        ),
        IntentPattern::new(
            "search-zh",
            SEARCH_AND_BUY,
            r"^\s*(?:请|帮我|帮忙)?\s*(?:搜索|查找|搜|找)(?:一下)?\s*(?P<query>.+?)\s*(?P<buy>(?:并且?|然后|再)\s*(?:购买|买|下单))?\s*$",
            extract_search,
        ),
        IntentPattern::new(
            "search-en",
            SEARCH_AND_BUY,
            r"(?i)^\s*(?:please\s+)?(?:search\s+for|search|find|look\s+for)\s+(?P<query>.+?)\s*(?P<buy>,?\s*and\s+(?:then\s+)?(?:buy|purchase|order)(?:\s+it|\s+one)?)?\s*$",
            extract_search,
        ),
    ]
});

static ITEM_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:,|，|、|和|与|跟|\bvs\b\.?|\bversus\b|\band\b|\bwith\b)\s*")
        .unwrap_or_else(|e| panic!("item separator pattern is invalid: {e}"))
});

static BUDGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:预算\s*(?:是|为)?\s*(?P<a>\d+(?:\.\d+)?)\s*(?:元|块)?",
        r"|(?P<b>\d+(?:\.\d+)?)\s*(?:元|块)\s*以(?:内|下)的?",
        r"|不超过\s*(?P<c>\d+(?:\.\d+)?)\s*(?:元|块)?的?",
        r"|\b(?:under|below|budget(?:\s+of)?)\s*\$?\s*(?P<d>\d+(?:\.\d+)?)",
        r"|\$(?P<e>\d+(?:\.\d+)?))",
    ))
    .unwrap_or_else(|e| panic!("budget pattern is invalid: {e}"))
});

/// Characters trimmed from the ends of extracted phrases.
const PHRASE_PUNCTUATION: &[char] = &[',', '，', '。', '.', '!', '！', '?', '？', '、', ';', '；', ':', '：'];

// ── Extractors ───────────────────────────────────────────────────────────────

fn no_params(_caps: &Captures<'_>, _text: &str) -> Option<Map<String, Value>> {
    Some(Map::new())
}

fn extract_comparison(caps: &Captures<'_>, _text: &str) -> Option<Map<String, Value>> {
    let items: Vec<Value> = ITEM_SEPARATOR
        .split(caps.name("items")?.as_str())
        .map(clean_phrase)
        .filter(|item| !item.is_empty())
        .map(Value::String)
        .collect();

    if items.len() < 2 {
        return None;
    }
    let mut params = Map::new();
    params.insert("products".to_string(), Value::Array(items));
    Some(params)
}

fn extract_topic(caps: &Captures<'_>, _text: &str) -> Option<Map<String, Value>> {
    let topic = clean_phrase(caps.name("topic")?.as_str());
    if topic.is_empty() {
        return None;
    }
    let mut params = Map::new();
    params.insert("topic".to_string(), Value::String(topic));
    Some(params)
}

fn extract_buy(caps: &Captures<'_>, text: &str) -> Option<Map<String, Value>> {
    shopping_params(caps.name("query")?.as_str(), text, true)
}

fn extract_search(caps: &Captures<'_>, text: &str) -> Option<Map<String, Value>> {
    let want_to_buy = caps.name("buy").is_some();
    shopping_params(caps.name("query")?.as_str(), text, want_to_buy)
}

fn shopping_params(raw_query: &str, text: &str, want_to_buy: bool) -> Option<Map<String, Value>> {
    let query = clean_phrase(&strip_budget(raw_query));
    if query.is_empty() {
        return None;
    }
    let mut params = Map::new();
    params.insert("query".to_string(), Value::String(query));
    params.insert("wantToBuy".to_string(), Value::Bool(want_to_buy));
    if let Some(budget) = extract_budget(text) {
        params.insert("budget".to_string(), budget);
    }
    Some(params)
}

// ── Budget ───────────────────────────────────────────────────────────────────

/// The first budget amount mentioned anywhere in `text`, as a JSON number.
pub fn extract_budget(text: &str) -> Option<Value> {
    let caps = BUDGET.captures(text)?;
    let amount = ["a", "b", "c", "d", "e"]
        .iter()
        .find_map(|name| caps.name(name))?
        .as_str()
        .parse::<f64>()
        .ok()?;

    if amount.fract() == 0.0 && amount >= 0.0 && amount <= u64::MAX as f64 {
        Some(json!(amount as u64))
    } else {
        Number::from_f64(amount).map(Value::Number)
    }
}

/// `text` with every budget phrase removed.
pub fn strip_budget(text: &str) -> String {
    BUDGET.replace_all(text, " ").into_owned()
}

fn clean_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(PHRASE_PUNCTUATION)
        .trim()
        .to_string()
}
