use serde::{Deserialize, Serialize};

/// Single portfolio action derived once per completed planning cycle.
/// Not persisted across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PortfolioDecision {
    #[serde(rename = "CONCENTRATED_BUY")]
    ConcentratedBuy {
        primary_asset: String,
        funding_asset: String,
        reasoning: String,
    },
    #[serde(rename = "REBALANCE")]
    Rebalance {
        primary_asset: String,
        funding_asset: String,
        reasoning: String,
    },
    #[serde(rename = "HOLD")]
    Hold { reasoning: String },
}

impl PortfolioDecision {
    pub fn primary_asset(&self) -> Option<&str> {
        match self {
            PortfolioDecision::ConcentratedBuy { primary_asset, .. }
            | PortfolioDecision::Rebalance { primary_asset, .. } => Some(primary_asset),
            PortfolioDecision::Hold { .. } => None,
        }
    }

    pub fn funding_asset(&self) -> Option<&str> {
        match self {
            PortfolioDecision::ConcentratedBuy { funding_asset, .. }
            | PortfolioDecision::Rebalance { funding_asset, .. } => Some(funding_asset),
            PortfolioDecision::Hold { .. } => None,
        }
    }

    pub fn reasoning(&self) -> &str {
        match self {
            PortfolioDecision::ConcentratedBuy { reasoning, .. }
            | PortfolioDecision::Rebalance { reasoning, .. }
            | PortfolioDecision::Hold { reasoning } => reasoning,
        }
    }
}
