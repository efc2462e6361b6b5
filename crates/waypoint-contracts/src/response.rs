//! Structured responses returned by the orchestrator facade.
//!
//! These are the shapes an HTTP/controller layer serializes directly, so they
//! use camelCase field names. Every outcome, including failures, carries the
//! current plan snapshot when one exists so a caller can show exactly what was
//! attempted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::WaypointError, plan::Plan};

/// Result of `create_plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreatePlanResponse {
    pub fn created(plan: Plan) -> Self {
        Self {
            success: true,
            plan: Some(plan),
            error: None,
        }
    }

    pub fn failed(err: &WaypointError) -> Self {
        Self {
            success: false,
            plan: None,
            error: Some(err.to_string()),
        }
    }
}

/// Result of `execute_next_step` and `provide_user_input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// True when execution is suspended waiting for user-supplied values.
    #[serde(default)]
    pub needs_user_input: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResponse {
    /// The plan advanced (or was already finished) without error.
    pub fn advanced(plan: Plan, output: Option<Value>) -> Self {
        Self {
            success: true,
            plan: Some(plan),
            output,
            needs_user_input: false,
            user_prompt: None,
            error: None,
        }
    }

    /// Execution is suspended before a step whose input is not yet bound.
    pub fn suspended(plan: Plan, output: Option<Value>, prompt: String) -> Self {
        Self {
            success: true,
            plan: Some(plan),
            output,
            needs_user_input: true,
            user_prompt: Some(prompt),
            error: None,
        }
    }

    /// The call failed; `plan` is the snapshot at the time of failure.
    pub fn failed(plan: Option<Plan>, err: &WaypointError) -> Self {
        Self {
            success: false,
            plan,
            output: None,
            needs_user_input: false,
            user_prompt: None,
            error: Some(err.to_string()),
        }
    }
}
