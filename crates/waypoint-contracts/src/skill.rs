//! Uniform skill results and the closed failure-reason taxonomy.
//!
//! Skills report failures with an explicit `FailureReason` so replanning can
//! dispatch with a total `match`. Skills that only return an error string are
//! classified by `FailureReason::from_error_text`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a skill invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The requested item is not available in stock.
    OutOfStock,
    /// The requested item exceeds the user's budget.
    OverBudget,
    /// The input failed validation before or inside the skill.
    InvalidInput,
    /// The skill or a backend it needs is not reachable or not registered.
    Unavailable,
    /// Anything else.
    Other,
}

const OUT_OF_STOCK_MARKERS: &[&str] = &["库存不足", "缺货", "售罄", "out of stock", "sold out"];

const OVER_BUDGET_MARKERS: &[&str] = &[
    "超出预算",
    "超过预算",
    "太贵",
    "too expensive",
    "over budget",
    "exceeds budget",
];

impl FailureReason {
    /// Classify a free-text error by substring markers (Chinese and English).
    ///
    /// Matching is case-insensitive for the English markers. Unrecognized text
    /// yields `Other`.
    pub fn from_error_text(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if OUT_OF_STOCK_MARKERS.iter().any(|m| lowered.contains(m)) {
            FailureReason::OutOfStock
        } else if OVER_BUDGET_MARKERS.iter().any(|m| lowered.contains(m)) {
            FailureReason::OverBudget
        } else {
            FailureReason::Other
        }
    }
}

/// The result every skill invocation returns, including unknown skill ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl SkillResult {
    /// A successful result carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            reason: None,
        }
    }

    /// A failed result with an error message and no explicit reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            reason: None,
        }
    }

    /// A failed result with an explicit reason.
    pub fn failure_with(reason: FailureReason, error: impl Into<String>) -> Self {
        Self {
            reason: Some(reason),
            ..Self::failure(error)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The error text a caller should see: `error`, else `message`, else a
    /// generic placeholder.
    pub fn error_text(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "skill reported failure without an error message".to_string())
    }

    /// The failure reason: the explicit one if present, otherwise classified
    /// from the error text. `None` for successful results.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        if self.success {
            return None;
        }
        Some(
            self.reason
                .unwrap_or_else(|| FailureReason::from_error_text(&self.error_text())),
        )
    }
}
