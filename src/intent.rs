use serde::Deserialize;

use crate::model::plan::Goal;

const DEFAULT_SWAP_AMOUNT: f64 = 5.0;

/// Raw payload emitted by the conversational front-end's NLP step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentPayload {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub target_return: Option<f64>,
    #[serde(default)]
    pub time_horizon: Option<u32>,
}

/// Closed set of recognized front-end intents. Free-form intent strings are
/// folded into this enum exactly once, at the boundary; everything not
/// recognized (or missing its required fields) becomes `Unrecognized`.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AssetAnalysis {
        asset: String,
        goal: Goal,
    },
    Swap {
        from_asset: String,
        to_asset: String,
        amount: f64,
    },
    ScheduleSwap {
        from_asset: String,
        to_asset: String,
        amount: f64,
        date: String,
    },
    CheckBalance,
    GeneralQuestion,
    Unrecognized {
        raw: String,
    },
}

impl Intent {
    pub fn from_payload(payload: &IntentPayload) -> Intent {
        match payload.intent.as_str() {
            "asset_analysis" => {
                let Some(asset) = payload.assets.first() else {
                    return Intent::Unrecognized {
                        raw: payload.intent.clone(),
                    };
                };
                let defaults = Goal::default();
                Intent::AssetAnalysis {
                    asset: asset.clone(),
                    goal: Goal {
                        target_return: payload.target_return.unwrap_or(defaults.target_return),
                        time_horizon_days: payload
                            .time_horizon
                            .unwrap_or(defaults.time_horizon_days),
                    },
                }
            }
            "execute_swap" => match payload.assets.as_slice() {
                [from, to, ..] => Intent::Swap {
                    from_asset: from.clone(),
                    to_asset: to.clone(),
                    amount: payload.amount.unwrap_or(DEFAULT_SWAP_AMOUNT),
                },
                _ => Intent::Unrecognized {
                    raw: payload.intent.clone(),
                },
            },
            "schedule_swap" => match (payload.assets.as_slice(), &payload.scheduled_date) {
                ([from, to, ..], Some(date)) => Intent::ScheduleSwap {
                    from_asset: from.clone(),
                    to_asset: to.clone(),
                    amount: payload.amount.unwrap_or(DEFAULT_SWAP_AMOUNT),
                    date: date.clone(),
                },
                _ => Intent::Unrecognized {
                    raw: payload.intent.clone(),
                },
            },
            "check_balance" => Intent::CheckBalance,
            "general_question" => Intent::GeneralQuestion,
            other => Intent::Unrecognized {
                raw: other.to_string(),
            },
        }
    }
}
