use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::plan::Plan;

/// One per-asset analysis request fanned out by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub name: String,
    pub target_return: f64,
    pub time_horizon_days: u32,
}

/// Worker reply carrying the scored plan for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub plan: Plan,
}

/// Swap instruction dispatched to the execution worker, at most one per
/// completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapCommand {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub rate: f64,
}

/// Closed set of commands the execution worker accepts. Anything else is an
/// UnknownCommand rejection, never silently matched by string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum ExecutionCommand {
    Swap(SwapCommand),
    GetBalances,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    pub message: String,
}

/// Request to register a future swap, validated against the tracked asset
/// set and the calendar before it is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub from_asset: String,
    pub to_asset: String,
    pub amount: f64,
    pub date: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub date: String,
}

/// Every payload the transport carries between components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    AnalysisRequest(AnalysisRequest),
    AnalysisResponse(AnalysisResponse),
    Execute(ExecutionCommand),
    ExecutionResult(ExecutionResponse),
    ScheduleSwap(ScheduleRequest),
    ScheduleResult(ScheduleResponse),
}
