//! Load and validate runtime configuration.

use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdvisorCfg {
    /// Simulated analysis latency.
    pub analyze_ms: u64,
    /// Simulated supplemental-data latency.
    pub additional_ms: u64,
    /// Simulated trade execution latency.
    pub execute_ms: u64,
    /// Probability a trade execution succeeds.
    pub success_rate: f64,
    /// Optional deterministic RNG seed (overridable via ADVISOR_SEED).
    pub seed: Option<u64>,
}

impl Default for AdvisorCfg {
    fn default() -> Self {
        Self {
            analyze_ms: 2000,
            additional_ms: 1000,
            execute_ms: 1500,
            success_rate: 0.9,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FlowCfg {
    /// Delay before the flow auto-advances once an analysis resolves.
    pub auto_advance_ms: u64,
    /// Fixed share quantity for every trade request.
    pub trade_quantity: u32,
}

impl Default for FlowCfg {
    fn default() -> Self {
        Self {
            auto_advance_ms: 500,
            trade_quantity: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub advisor: AdvisorCfg,
    pub flow: FlowCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&s)?;
        Ok(cfg)
    }

    /// Load from `path`, falling back to built-in defaults when the file is
    /// absent. A malformed file is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
