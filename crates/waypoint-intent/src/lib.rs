//! # waypoint-intent
//!
//! Natural-language front end for the Waypoint orchestrator.
//!
//! ## Overview
//!
//! - [`PatternClassifier`] implements
//!   [`IntentClassifier`](waypoint_core::traits::IntentClassifier): an ordered
//!   table of bilingual (Chinese/English) regexes, first match wins, with a
//!   `general_query` fallback so classification never fails.
//! - [`TemplateSynthesizer`] implements
//!   [`PlanSynthesizer`](waypoint_core::traits::PlanSynthesizer): one step
//!   template per intent type.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use waypoint_intent::{PatternClassifier, TemplateSynthesizer};
//!
//! let orchestrator = Orchestrator::new(
//!     Box::new(PatternClassifier::new()),
//!     Box::new(TemplateSynthesizer::new()),
//!     registry, store, memory, config,
//! );
//! ```

pub mod classifier;
pub mod pattern;
pub mod synthesizer;

pub use classifier::PatternClassifier;
pub use synthesizer::TemplateSynthesizer;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use waypoint_core::traits::{IntentClassifier, PlanSynthesizer};

    use crate::{PatternClassifier, TemplateSynthesizer};

    fn plan_shape(text: &str) -> (String, Vec<String>) {
        let m = PatternClassifier::new().classify(text);
        let steps = TemplateSynthesizer::new().synthesize(&m.intent_type, &m.params, &m.params);
        (m.intent_type, steps.into_iter().map(|s| s.skill_id).collect())
    }

    #[test]
    fn text_to_steps() {
        assert_eq!(
            plan_shape("帮我搜索耳机"),
            ("search_and_buy".to_string(), vec!["product-search".to_string()])
        );
        assert_eq!(
            plan_shape("帮我搜索耳机并购买").1,
            vec!["product-search", "add-to-cart", "checkout"]
        );
        assert_eq!(plan_shape("对比kindle和kobo").1, vec!["product-search", "product-search"]);
        assert_eq!(plan_shape("领取空投").1, vec!["airdrop-discover", "airdrop-claim"]);
        assert_eq!(plan_shape("what is a good gift").1, vec!["product-search"]);
    }
}
