//! The mock data provider behind the advisor seam.
//!
//! Three independent async operations, each with a fixed simulated latency
//! and no shared history between calls. All randomness lives here, behind
//! the [`Advisor`] trait, so a deterministic seed (or a real backend) can be
//! swapped in without touching the flow controller.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::config::AdvisorCfg;
use crate::error::{AdvisorError, Result};
use crate::types::{
    AdditionalData, Call, Explanation, Factor, Recommendation, TradeRequest, TradeResult,
};

const SUCCESS_MSG: &str = "Trade executed successfully!";
const FAILURE_MSG: &str = "Trade execution failed. Please try again.";

/// Asynchronous data source for the flow controller. Operations resolve
/// exactly once and never reject input; symbols are not validated against
/// the catalog.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Analyze a symbol and produce a recommendation.
    async fn analyze(&self, symbol: &str) -> Result<Recommendation>;

    /// Fetch supplemental market data for a symbol.
    async fn additional_data(&self, symbol: &str) -> Result<AdditionalData>;

    /// Submit a trade and report its outcome.
    async fn execute(&self, request: &TradeRequest) -> Result<TradeResult>;
}

/// Canned-data implementation with artificial delays.
pub struct MockAdvisor {
    cfg: AdvisorCfg,
    rng: Mutex<StdRng>,
    /// Process-local sequence; keeps trade ids unique even within one
    /// clock millisecond.
    seq: AtomicU64,
}

impl MockAdvisor {
    pub fn new(cfg: AdvisorCfg) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            cfg,
            rng: Mutex::new(rng),
            seq: AtomicU64::new(0),
        }
    }

    pub fn with_seed(mut cfg: AdvisorCfg, seed: u64) -> Self {
        cfg.seed = Some(seed);
        Self::new(cfg)
    }

    fn next_trade_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("T{}-{}", Utc::now().timestamp_millis(), seq)
    }
}

#[async_trait]
impl Advisor for MockAdvisor {
    async fn analyze(&self, symbol: &str) -> Result<Recommendation> {
        sleep(Duration::from_millis(self.cfg.analyze_ms)).await;
        // The only randomness is which archetype is returned; all values
        // within an archetype are constants.
        let idx = self.rng.lock().await.gen_range(0..3);
        let rec = archetype(idx, symbol);
        debug!("analyze {} -> {} ({}%)", symbol, rec.call, rec.confidence);
        Ok(rec)
    }

    async fn additional_data(&self, _symbol: &str) -> Result<AdditionalData> {
        sleep(Duration::from_millis(self.cfg.additional_ms)).await;
        // Intentionally static regardless of symbol.
        Ok(AdditionalData {
            sector: "Technology".to_string(),
            market_cap: "$2.1T".to_string(),
            pe_ratio: 28.5,
            dividend: "2.1%".to_string(),
            analyst_rating: "Overweight".to_string(),
            price_target: "$180.00".to_string(),
            volatility: "Medium".to_string(),
            beta: 1.2,
        })
    }

    async fn execute(&self, request: &TradeRequest) -> Result<TradeResult> {
        sleep(Duration::from_millis(self.cfg.execute_ms)).await;
        // gen_bool panics outside [0, 1]; a bad config is a backend error,
        // not a crash.
        if !(0.0..=1.0).contains(&self.cfg.success_rate) {
            return Err(AdvisorError::Backend(format!(
                "success_rate {} out of range",
                self.cfg.success_rate
            )));
        }
        let success = self.rng.lock().await.gen_bool(self.cfg.success_rate);
        debug!(
            "execute {} {}x{} -> success={}",
            request.action, request.symbol, request.quantity, success
        );
        Ok(TradeResult {
            success,
            trade_id: self.next_trade_id(),
            timestamp: Utc::now().to_rfc3339(),
            message: (if success { SUCCESS_MSG } else { FAILURE_MSG }).to_string(),
        })
    }
}

fn factor(name: &str, impact: &str, description: &str) -> Factor {
    Factor {
        name: name.to_string(),
        impact: impact.to_string(),
        description: description.to_string(),
    }
}

/// The three canned recommendation archetypes. Only the symbol field is
/// derived from the request.
fn archetype(idx: usize, symbol: &str) -> Recommendation {
    match idx {
        0 => Recommendation {
            symbol: symbol.to_string(),
            call: Call::Buy,
            confidence: 84,
            price: 156.78,
            change: "+2.34%".to_string(),
            explanation: Explanation {
                factors: vec![
                    factor("Volume", "+12%", "Trading volume increased significantly"),
                    factor("Sentiment", "+8%", "Positive news sentiment detected"),
                    factor("Technical", "+15%", "Strong technical indicators"),
                    factor("Earnings", "+6%", "Upcoming earnings beat expectations"),
                    factor("Market", "-3%", "Overall market volatility"),
                ],
                risk_factors: vec![
                    "High volatility period".to_string(),
                    "Sector rotation risk".to_string(),
                    "Interest rate sensitivity".to_string(),
                ],
            },
        },
        1 => Recommendation {
            symbol: symbol.to_string(),
            call: Call::Sell,
            confidence: 76,
            price: 89.45,
            change: "-1.23%".to_string(),
            explanation: Explanation {
                factors: vec![
                    factor("Volume", "-8%", "Declining trading volume"),
                    factor("Sentiment", "-12%", "Negative sentiment indicators"),
                    factor("Technical", "-18%", "Bearish technical patterns"),
                    factor("Earnings", "-5%", "Earnings miss expectations"),
                    factor("Market", "+2%", "Market conditions improving"),
                ],
                risk_factors: vec![
                    "Regulatory concerns".to_string(),
                    "Competition pressure".to_string(),
                    "Supply chain issues".to_string(),
                ],
            },
        },
        _ => Recommendation {
            symbol: symbol.to_string(),
            call: Call::Hold,
            confidence: 62,
            price: 234.12,
            change: "+0.45%".to_string(),
            explanation: Explanation {
                factors: vec![
                    factor("Volume", "+3%", "Stable trading volume"),
                    factor("Sentiment", "+1%", "Neutral sentiment"),
                    factor("Technical", "-2%", "Mixed technical signals"),
                    factor("Earnings", "+4%", "Earnings in line with expectations"),
                    factor("Market", "+2%", "Market conditions stable"),
                ],
                risk_factors: vec![
                    "Uncertainty in sector".to_string(),
                    "Pending regulatory decisions".to_string(),
                    "Seasonal factors".to_string(),
                ],
            },
        },
    }
}

#[cfg(test)]
pub mod test_fixtures {
    use crate::types::{Recommendation, Stock};

    pub fn stock(symbol: &str) -> Stock {
        Stock {
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc."),
            sector: "Technology".to_string(),
        }
    }

    /// Fixed BUY-archetype recommendation for controller/state tests.
    pub fn recommendation(symbol: &str) -> Recommendation {
        super::archetype(0, symbol)
    }
}
