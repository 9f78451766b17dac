//! Core domain types for the advisor flow: catalog entries, recommendations,
//! trades and user intents.

use serde::{Deserialize, Serialize};

/// Immutable catalog entry. The catalog is fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
}

/// Categorical recommendation call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Call {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Call::Buy => write!(f, "BUY"),
            Call::Sell => write!(f, "SELL"),
            Call::Hold => write!(f, "HOLD"),
        }
    }
}

/// Single explanatory factor behind a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Factor {
    pub name: String,
    /// Signed percentage impact, e.g. "+12%".
    pub impact: String,
    pub description: String,
}

/// Factors and risk notes accompanying a recommendation. Never exists on
/// its own; always embedded in a [`Recommendation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Explanation {
    pub factors: Vec<Factor>,
    pub risk_factors: Vec<String>,
}

/// One analysis result. Ephemeral: replaced wholesale on each new analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub symbol: String,
    pub call: Call,
    /// Integer percentage in [0, 100].
    pub confidence: u8,
    pub price: f64,
    /// Signed percentage change string, e.g. "+2.34%".
    pub change: String,
    pub explanation: Explanation,
}

/// Supplemental market data, fetched on demand at the decision step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalData {
    pub sector: String,
    pub market_cap: String,
    pub pe_ratio: f64,
    pub dividend: String,
    pub analyst_rating: String,
    pub price_target: String,
    pub volatility: String,
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// Order derived from a recommendation and the configured quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRequest {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

/// Outcome of submitting a trade. `success == false` is a normal business
/// result, not an error; it is surfaced to the user as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeResult {
    pub success: bool,
    pub trade_id: String,
    /// Wall-clock completion time, ISO-8601.
    pub timestamp: String,
    pub message: String,
}

/// User decision at the decision step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Buy,
    Reject,
    MoreData,
}

/// Advisor automation mode. Tracked and displayed, but inert: it never
/// alters provider behavior or transition logic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdvisorMode {
    #[default]
    Recommend,
    Advisor,
    Auto,
}

impl AdvisorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "recommend" => Some(AdvisorMode::Recommend),
            "advisor" => Some(AdvisorMode::Advisor),
            "auto" => Some(AdvisorMode::Auto),
            _ => None,
        }
    }
}

/// Immutable profile for an advisor mode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModeProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub automation_level: u8,
    /// Display-style tag consumed by the rendering layer.
    pub badge: &'static str,
}

/// Everything the rendering layer can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    Select(String),
    Next,
    Previous,
    Decide(Decision),
    Confirm(bool),
    SetMode(AdvisorMode),
    Reset,
    List,
    Explain,
    DumpState,
    Quit,
}
