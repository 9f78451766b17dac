//! Owned flow state. The controller holds the only mutable instance;
//! everything else sees cloned snapshots.

use serde::Serialize;

use crate::types::{
    AdditionalData, AdvisorMode, Decision, Recommendation, Stock, TradeRequest, TradeResult,
};

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 6;

/// Aggregate state for one flow run. At most one recommendation, trade
/// request and trade result are live at a time.
#[derive(Debug, Clone, Serialize)]
pub struct FlowState {
    /// Current step, always within [1, 6].
    pub step: u8,
    pub mode: AdvisorMode,
    pub selected: Option<Stock>,
    pub recommendation: Option<Recommendation>,
    pub additional: Option<AdditionalData>,
    pub decision: Option<Decision>,
    pub trade: Option<TradeRequest>,
    pub result: Option<TradeResult>,
    /// An analysis is in flight.
    pub analyzing: bool,
    /// A trade execution is in flight.
    pub executing: bool,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            step: FIRST_STEP,
            mode: AdvisorMode::default(),
            selected: None,
            recommendation: None,
            additional: None,
            decision: None,
            trade: None,
            result: None,
            analyzing: false,
            executing: false,
        }
    }
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to step 1 with every per-run field cleared. The mode setting
    /// survives a reset.
    pub fn reset(&mut self) {
        let mode = self.mode;
        *self = Self::default();
        self.mode = mode;
    }

    /// Record a new selection, discarding all prior analysis state.
    pub fn select(&mut self, stock: Stock) {
        self.recommendation = None;
        self.additional = None;
        self.decision = None;
        self.trade = None;
        self.result = None;
        self.executing = false;
        self.selected = Some(stock);
        self.analyzing = true;
    }

    /// Whether manual forward navigation out of the current step is
    /// allowed. Steps whose entry data is missing are not reachable by
    /// `next`; the data-driven transitions set `step` directly.
    pub fn next_allowed(&self) -> bool {
        match self.step {
            1 | 2 => self.recommendation.is_some(),
            3 => self.trade.is_some(),
            4 | 5 => self.result.is_some(),
            _ => false,
        }
    }

    /// Manual "Next". Returns true if the step moved.
    pub fn advance(&mut self) -> bool {
        if self.step < LAST_STEP && self.next_allowed() {
            self.step += 1;
            true
        } else {
            false
        }
    }

    /// Manual "Previous". Returns true if the step moved.
    pub fn retreat(&mut self) -> bool {
        if self.step > FIRST_STEP {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    /// Read-only projection for the rendering layer.
    pub fn snapshot(&self) -> FlowState {
        self.clone()
    }
}
