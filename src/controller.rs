//! Flow controller: the state machine driving the six-step advisor flow.
//!
//! The controller processes one event at a time: a user intent from the
//! input layer, or a completion from the advisor. Provider calls run as
//! spawned tasks that report back through the event channel, so the loop
//! never blocks while a call is pending. Exactly one provider call is
//! honored at a time; completion events carry an epoch and anything from
//! before a reset or re-selection is discarded.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::catalog;
use crate::config::FlowCfg;
use crate::error::AdvisorError;
use crate::state::FlowState;
use crate::types::{
    AdditionalData, Decision, Recommendation, TradeAction, TradeRequest, TradeResult, UserIntent,
};

/// Completion events delivered back to the controller loop.
#[derive(Debug)]
pub enum FlowEvent {
    Analyzed {
        epoch: u64,
        outcome: Result<Recommendation, AdvisorError>,
    },
    /// One-shot delayed advance armed when an analysis resolves.
    AutoAdvance { epoch: u64 },
    DataReady {
        epoch: u64,
        outcome: Result<AdditionalData, AdvisorError>,
    },
    Executed {
        epoch: u64,
        outcome: Result<TradeResult, AdvisorError>,
    },
}

pub struct FlowController {
    state: FlowState,
    advisor: Arc<dyn Advisor>,
    cfg: FlowCfg,
    events: mpsc::Sender<FlowEvent>,
    /// Bumped on reset and re-selection; stale completions are dropped.
    epoch: u64,
    in_flight: bool,
}

impl FlowController {
    pub fn new(advisor: Arc<dyn Advisor>, cfg: FlowCfg, events: mpsc::Sender<FlowEvent>) -> Self {
        Self {
            state: FlowState::new(),
            advisor,
            cfg,
            events,
            epoch: 0,
            in_flight: false,
        }
    }

    pub fn snapshot(&self) -> FlowState {
        self.state.snapshot()
    }

    pub fn handle_intent(&mut self, intent: UserIntent) {
        match intent {
            UserIntent::Select(symbol) => self.on_select(&symbol),
            UserIntent::Next => {
                if self.state.advance() {
                    info!("step -> {}", self.state.step);
                } else {
                    warn!("cannot advance from step {} yet", self.state.step);
                }
            }
            UserIntent::Previous => {
                if self.state.retreat() {
                    info!("step -> {}", self.state.step);
                } else {
                    warn!("already at the first step");
                }
            }
            UserIntent::Decide(decision) => self.on_decide(decision),
            UserIntent::Confirm(confirmed) => self.on_confirm(confirmed),
            UserIntent::SetMode(mode) => {
                // Display setting only; transitions never consult it.
                self.state.mode = mode;
                info!("advisor mode set to {}", catalog::mode_profile(mode).name);
            }
            UserIntent::Reset => {
                self.epoch += 1;
                self.in_flight = false;
                self.state.reset();
                info!("flow reset");
            }
            // Render-only intents are handled by the caller.
            UserIntent::List | UserIntent::Explain | UserIntent::DumpState | UserIntent::Quit => {}
        }
    }

    pub fn handle_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Analyzed { epoch, outcome } => {
                if epoch != self.epoch {
                    debug!("dropping stale analysis result");
                    return;
                }
                self.in_flight = false;
                self.state.analyzing = false;
                match outcome {
                    Ok(rec) => {
                        info!("analysis done: {} {} ({}%)", rec.symbol, rec.call, rec.confidence);
                        self.state.recommendation = Some(rec);
                        self.arm_auto_advance();
                    }
                    Err(e) => warn!("analysis failed: {e:#}"),
                }
            }
            FlowEvent::AutoAdvance { epoch } => {
                if epoch != self.epoch {
                    debug!("dropping stale auto-advance");
                    return;
                }
                if self.state.step == 1 && self.state.recommendation.is_some() {
                    self.state.step = 2;
                    info!("auto-advance -> step 2");
                }
            }
            FlowEvent::DataReady { epoch, outcome } => {
                if epoch != self.epoch {
                    debug!("dropping stale additional data");
                    return;
                }
                self.in_flight = false;
                match outcome {
                    Ok(data) => {
                        self.state.additional = Some(data);
                        // Re-entrant: back to the decision step with data.
                        self.state.step = 3;
                        info!("additional data ready");
                    }
                    Err(e) => warn!("additional data fetch failed: {e:#}"),
                }
            }
            FlowEvent::Executed { epoch, outcome } => {
                if epoch != self.epoch {
                    debug!("dropping stale trade result");
                    return;
                }
                self.in_flight = false;
                self.state.executing = false;
                match outcome {
                    Ok(result) => {
                        info!("trade {}: {}", result.trade_id, result.message);
                        self.state.result = Some(result);
                    }
                    Err(e) => warn!("trade execution failed to complete: {e:#}"),
                }
                // No retry; success or failure lands on the result step.
                self.state.step = 6;
            }
        }
    }

    fn on_select(&mut self, symbol: &str) {
        if self.state.step != 1 {
            warn!("select is only available at step 1 (use prev/reset first)");
            return;
        }
        if self.in_flight {
            warn!("analysis already in flight; ignoring new selection");
            return;
        }
        let symbol = crate::utils::sanitize_symbol(symbol);
        let Some(stock) = catalog::find(&symbol) else {
            warn!("{symbol} is not in the catalog (try `list`)");
            return;
        };
        self.epoch += 1;
        self.state.select(stock.clone());
        self.in_flight = true;
        info!("analyzing {}...", stock.symbol);

        let advisor = Arc::clone(&self.advisor);
        let events = self.events.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let outcome = advisor.analyze(&stock.symbol).await;
            let _ = events.send(FlowEvent::Analyzed { epoch, outcome }).await;
        });
    }

    fn on_decide(&mut self, decision: Decision) {
        if self.state.step != 3 {
            warn!("decisions are made at step 3 (currently at {})", self.state.step);
            return;
        }
        let Some(rec) = self.state.recommendation.clone() else {
            warn!("no recommendation to decide on");
            return;
        };
        match decision {
            Decision::Buy => {
                let quantity = self.cfg.trade_quantity;
                self.state.decision = Some(Decision::Buy);
                self.state.trade = Some(TradeRequest {
                    symbol: rec.symbol,
                    action: TradeAction::Buy,
                    quantity,
                    price: rec.price,
                    total: rec.price * f64::from(quantity),
                });
                self.state.step = 4;
                info!("decision: buy -> confirm trade");
            }
            Decision::Reject => {
                self.state.decision = Some(Decision::Reject);
                self.state.step = 6;
                info!("decision: reject -> done, no trade");
            }
            Decision::MoreData => {
                if self.in_flight {
                    warn!("a provider call is already in flight; try again shortly");
                    return;
                }
                self.state.decision = Some(Decision::MoreData);
                self.in_flight = true;
                info!("fetching additional market data...");

                let advisor = Arc::clone(&self.advisor);
                let events = self.events.clone();
                let epoch = self.epoch;
                let symbol = rec.symbol;
                tokio::spawn(async move {
                    let outcome = advisor.additional_data(&symbol).await;
                    let _ = events.send(FlowEvent::DataReady { epoch, outcome }).await;
                });
            }
        }
    }

    fn on_confirm(&mut self, confirmed: bool) {
        if self.state.step != 4 {
            warn!("nothing to confirm at step {}", self.state.step);
            return;
        }
        let Some(trade) = self.state.trade.clone() else {
            warn!("no trade request to confirm");
            return;
        };
        if !confirmed {
            self.state.step = 6;
            info!("trade cancelled");
            return;
        }
        if self.in_flight {
            warn!("a provider call is already in flight; try again shortly");
            return;
        }
        self.state.step = 5;
        self.state.executing = true;
        self.in_flight = true;
        info!("executing trade: {} {} x{}", trade.action, trade.symbol, trade.quantity);

        let advisor = Arc::clone(&self.advisor);
        let events = self.events.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let outcome = advisor.execute(&trade).await;
            let _ = events.send(FlowEvent::Executed { epoch, outcome }).await;
        });
    }

    fn arm_auto_advance(&self) {
        let events = self.events.clone();
        let epoch = self.epoch;
        let delay = Duration::from_millis(self.cfg.auto_advance_ms);
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(FlowEvent::AutoAdvance { epoch }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::test_fixtures::recommendation;
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic advisor with call counters; always recommends BUY.
    #[derive(Default)]
    struct StubAdvisor {
        analyze_calls: AtomicU64,
        data_calls: AtomicU64,
        execute_calls: AtomicU64,
    }

    #[async_trait]
    impl Advisor for StubAdvisor {
        async fn analyze(&self, symbol: &str) -> Result<Recommendation> {
            self.analyze_calls.fetch_add(1, Ordering::Relaxed);
            Ok(recommendation(symbol))
        }

        async fn additional_data(&self, _symbol: &str) -> Result<AdditionalData> {
            self.data_calls.fetch_add(1, Ordering::Relaxed);
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

        async fn execute(&self, _request: &TradeRequest) -> Result<TradeResult> {
            let n = self.execute_calls.fetch_add(1, Ordering::Relaxed);
            Ok(TradeResult {
                success: true,
                trade_id: format!("T-test-{n}"),
                timestamp: chrono::Utc::now().to_rfc3339(),
                message: "Trade executed successfully!".to_string(),
            })
        }
    }

    fn fast_flow() -> FlowCfg {
        FlowCfg {
            auto_advance_ms: 0,
            trade_quantity: 100,
        }
    }

    struct Harness {
        ctrl: FlowController,
        rx: mpsc::Receiver<FlowEvent>,
        advisor: Arc<StubAdvisor>,
    }

    fn harness() -> Harness {
        let (tx, rx) = mpsc::channel(16);
        let advisor = Arc::new(StubAdvisor::default());
        let ctrl = FlowController::new(advisor.clone() as Arc<dyn Advisor>, fast_flow(), tx);
        Harness { ctrl, rx, advisor }
    }

    impl Harness {
        /// Pump pending completion events into the controller.
        async fn pump(&mut self, n: usize) {
            for _ in 0..n {
                let ev = self.rx.recv().await.expect("event");
                self.ctrl.handle_event(ev);
            }
        }

        /// Select a symbol and run analysis + auto-advance to step 2.
        async fn analyzed(&mut self, symbol: &str) {
            self.ctrl.handle_intent(UserIntent::Select(symbol.to_string()));
            self.pump(2).await; // Analyzed, then AutoAdvance
        }
    }

    #[tokio::test]
    async fn select_analyzes_and_auto_advances_once() {
        let mut h = harness();
        h.analyzed("AAPL").await;

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 2);
        assert_eq!(
            st.recommendation.as_ref().map(|r| r.symbol.as_str()),
            Some("AAPL")
        );
        assert!(!st.analyzing);
        assert_eq!(h.advisor.analyze_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn selection_while_analysis_pending_is_ignored() {
        let mut h = harness();
        h.ctrl.handle_intent(UserIntent::Select("AAPL".to_string()));
        h.ctrl.handle_intent(UserIntent::Select("MSFT".to_string()));
        h.pump(2).await;

        let st = h.ctrl.snapshot();
        assert_eq!(st.selected.map(|s| s.symbol), Some("AAPL".to_string()));
        assert_eq!(h.advisor.analyze_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn new_selection_discards_previous_run() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Previous);
        assert_eq!(h.ctrl.snapshot().step, 1);

        h.analyzed("MSFT").await;
        let st = h.ctrl.snapshot();
        assert_eq!(st.recommendation.map(|r| r.symbol), Some("MSFT".to_string()));
        assert!(st.additional.is_none());
        assert!(st.decision.is_none());
        assert!(st.result.is_none());
        assert_eq!(h.advisor.analyze_calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn reject_at_decision_ends_without_trade() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next); // 2 -> 3
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Reject));

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 6);
        assert!(st.result.is_none());
        assert!(st.trade.is_none());
        assert_eq!(h.advisor.execute_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn more_data_is_reentrant_at_step_three() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::MoreData));
        h.pump(1).await; // DataReady

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 3);
        assert!(st.additional.is_some());
        assert_eq!(h.advisor.data_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn buy_builds_trade_request_with_fixed_quantity() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 4);
        let trade = st.trade.expect("trade request");
        assert_eq!(trade.quantity, 100);
        assert_eq!(trade.action, TradeAction::Buy);
        assert_eq!(trade.total, trade.price * 100.0);
    }

    #[tokio::test]
    async fn confirm_executes_once_and_lands_on_result() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));
        h.ctrl.handle_intent(UserIntent::Confirm(true));
        assert_eq!(h.ctrl.snapshot().step, 5);
        h.pump(1).await; // Executed

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 6);
        let result = st.result.expect("trade result");
        assert!(!result.trade_id.is_empty());
        assert_eq!(h.advisor.execute_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn cancel_skips_execution_entirely() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));
        h.ctrl.handle_intent(UserIntent::Confirm(false));

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 6);
        assert!(st.result.is_none());
        assert_eq!(h.advisor.execute_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn trade_ids_differ_across_runs() {
        let mut h = harness();
        let mut ids = Vec::new();
        for _ in 0..2 {
            h.analyzed("AAPL").await;
            h.ctrl.handle_intent(UserIntent::Next);
            h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));
            h.ctrl.handle_intent(UserIntent::Confirm(true));
            h.pump(1).await;
            ids.push(h.ctrl.snapshot().result.expect("result").trade_id);
            h.ctrl.handle_intent(UserIntent::Reset);
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn reset_discards_inflight_analysis() {
        let mut h = harness();
        h.ctrl.handle_intent(UserIntent::Select("AAPL".to_string()));
        h.ctrl.handle_intent(UserIntent::Reset);
        h.pump(1).await; // stale Analyzed arrives after the reset

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 1);
        assert!(st.recommendation.is_none());
        assert!(st.selected.is_none());
    }

    #[tokio::test]
    async fn reset_clears_from_any_step_but_keeps_mode() {
        let mut h = harness();
        h.ctrl
            .handle_intent(UserIntent::SetMode(crate::types::AdvisorMode::Auto));
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));
        h.ctrl.handle_intent(UserIntent::Reset);

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 1);
        assert!(st.trade.is_none());
        assert_eq!(st.mode, crate::types::AdvisorMode::Auto);
    }

    #[tokio::test]
    async fn mode_changes_never_touch_transitions() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        let before = h.ctrl.snapshot().step;
        h.ctrl
            .handle_intent(UserIntent::SetMode(crate::types::AdvisorMode::Auto));
        assert_eq!(h.ctrl.snapshot().step, before);
        assert_eq!(h.advisor.execute_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn failed_analysis_leaves_selection_step_usable() {
        let mut h = harness();
        h.ctrl.handle_intent(UserIntent::Select("AAPL".to_string()));
        let _ = h.rx.recv().await.expect("real event"); // discard stub result
        h.ctrl.handle_event(FlowEvent::Analyzed {
            epoch: 1,
            outcome: Err(AdvisorError::Backend("boom".to_string())),
        });

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 1);
        assert!(st.recommendation.is_none());
        assert!(!st.analyzing);

        // The flow recovers: a new selection works.
        h.analyzed("MSFT").await;
        assert_eq!(h.ctrl.snapshot().step, 2);
    }

    #[tokio::test]
    async fn failed_execution_still_lands_on_result_step() {
        let mut h = harness();
        h.analyzed("AAPL").await;
        h.ctrl.handle_intent(UserIntent::Next);
        h.ctrl.handle_intent(UserIntent::Decide(Decision::Buy));
        h.ctrl.handle_intent(UserIntent::Confirm(true));
        let _ = h.rx.recv().await.expect("real event"); // discard stub result
        h.ctrl.handle_event(FlowEvent::Executed {
            epoch: 1,
            outcome: Err(AdvisorError::Backend("link down".to_string())),
        });

        let st = h.ctrl.snapshot();
        assert_eq!(st.step, 6);
        assert!(st.result.is_none());
        assert!(!st.executing);
    }

    #[tokio::test]
    async fn unknown_symbol_is_rejected_at_intent_level() {
        let mut h = harness();
        h.ctrl.handle_intent(UserIntent::Select("ZZZZ".to_string()));
        let st = h.ctrl.snapshot();
        assert!(st.selected.is_none());
        assert_eq!(h.advisor.analyze_calls.load(Ordering::Relaxed), 0);
    }
}
