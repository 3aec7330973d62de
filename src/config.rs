use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::model::plan::Goal;
use crate::orchestrator::{OrchestratorConfig, TrackedAsset};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub assets: Vec<AssetConfig>,
    pub goal: GoalConfig,
    pub cycle: CycleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub token_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalConfig {
    pub target_return: f64,
    pub time_horizon_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    pub period_secs: u64,
    pub scan_period_secs: u64,
    pub fanin_timeout_secs: u64,
    pub swap_lot: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            bail!("at least one tracked asset is required");
        }
        for asset in &self.assets {
            if asset.name.trim().is_empty() || asset.ticker.trim().is_empty() {
                bail!("asset entries need both a name and a ticker");
            }
        }
        if self.goal.target_return <= 1.0 {
            bail!(
                "goal.target_return must be > 1.0 (multiplier), got {}",
                self.goal.target_return
            );
        }
        if self.goal.time_horizon_days == 0 {
            bail!("goal.time_horizon_days must be > 0");
        }
        if self.cycle.fanin_timeout_secs == 0 {
            bail!("cycle.fanin_timeout_secs must be > 0");
        }
        if self.cycle.swap_lot <= 0.0 {
            bail!("cycle.swap_lot must be > 0");
        }
        Ok(())
    }

    pub fn tracked_assets(&self) -> Vec<TrackedAsset> {
        self.assets
            .iter()
            .map(|a| TrackedAsset {
                name: a.name.trim().to_string(),
                ticker: a.ticker.trim().to_string(),
                token_address: a.token_address.trim().to_string(),
            })
            .collect()
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            goal: Goal {
                target_return: self.goal.target_return,
                time_horizon_days: self.goal.time_horizon_days,
            },
            cycle_period: Duration::from_secs(self.cycle.period_secs),
            scan_period: Duration::from_secs(self.cycle.scan_period_secs),
            fanin_timeout: Duration::from_secs(self.cycle.fanin_timeout_secs),
            swap_lot: self.cycle.swap_lot,
        }
    }
}
