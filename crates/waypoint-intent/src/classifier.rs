//! First-match intent classification over the pattern table.

use tracing::debug;

use waypoint_contracts::intent::IntentMatch;
use waypoint_core::traits::IntentClassifier;

use crate::pattern::{IntentPattern, PATTERNS};

/// An `IntentClassifier` backed by an ordered regex table.
///
/// Entries are tried in order and the first one that matches and whose
/// extractor accepts the match wins. Text no entry accepts becomes a
/// `general_query` carrying the raw text as `query`.
pub struct PatternClassifier {
    patterns: &'static [IntentPattern],
}

impl PatternClassifier {
    pub fn new() -> Self {
        Self { patterns: PATTERNS.as_slice() }
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier for PatternClassifier {
    fn classify(&self, text: &str) -> IntentMatch {
        for pattern in self.patterns {
            if let Some(params) = pattern.apply(text) {
                debug!(pattern = pattern.id, intent_type = pattern.intent_type, "intent pattern matched");
                return IntentMatch::new(pattern.intent_type, params);
            }
        }

        debug!("no intent pattern matched, treating as general query");
        IntentMatch::general_query(text)
    }
}
