//! Presentational CLI rendering. Consumes read-only state snapshots and
//! prints the current step; never holds state of its own. Absent optional
//! data renders as a hint, not a panic.

use crate::catalog;
use crate::state::{FlowState, LAST_STEP};
use crate::utils::format_usd;

pub fn render(state: &FlowState) {
    println!();
    render_header(state);
    match state.step {
        1 => render_selection(state),
        2 => render_analysis(state),
        3 => render_decision(state),
        4 => render_confirmation(state),
        5 => render_execution(state),
        _ => render_result(state),
    }
    println!();
}

fn render_header(state: &FlowState) {
    let profile = catalog::mode_profile(state.mode);
    let bar: String = (1..=LAST_STEP)
        .map(|s| if s == state.step { "[*]" } else if s < state.step { "[x]" } else { "[ ]" })
        .collect();
    println!("{bar}  step {}/{LAST_STEP}  mode: {} ({}%)", state.step, profile.name, profile.automation_level);
}

fn render_selection(state: &FlowState) {
    if state.analyzing {
        let sym = state
            .selected
            .as_ref()
            .map(|s| s.symbol.as_str())
            .unwrap_or("?");
        println!("AI is analyzing {sym}...");
        return;
    }
    println!("Select a stock to analyze (`select <SYM>`, `list` for the catalog):");
    render_catalog();
}

fn render_analysis(state: &FlowState) {
    match &state.recommendation {
        Some(rec) => {
            println!("AI analysis complete for {}", rec.symbol);
            println!("  {}  (confidence {}%)", rec.call, rec.confidence);
            println!("  price {}  change {}", format_usd(rec.price), rec.change);
            println!("`why` for the explanation, `next` to continue.");
        }
        None => println!("No analysis yet. Go back and select a stock."),
    }
}

fn render_decision(state: &FlowState) {
    println!("Make your decision: `buy`, `reject`, or `more` for extra data.");
    if let Some(data) = &state.additional {
        println!("Additional market data:");
        println!("  sector {}   market cap {}", data.sector, data.market_cap);
        println!("  P/E {}   dividend {}", data.pe_ratio, data.dividend);
        println!("  rating {}   target {}", data.analyst_rating, data.price_target);
        println!("  volatility {}   beta {}", data.volatility, data.beta);
    }
    if state.recommendation.is_none() {
        println!("(no recommendation on file; `prev` back to selection)");
    }
}

fn render_confirmation(state: &FlowState) {
    match &state.trade {
        Some(trade) => {
            println!("Confirm your trade (`confirm` / `cancel`):");
            println!("  symbol   {}", trade.symbol);
            println!("  action   {}", trade.action);
            println!("  quantity {} shares", trade.quantity);
            println!("  price    {}", format_usd(trade.price));
            println!("  total    {}", format_usd(trade.total));
        }
        None => println!("No trade request pending."),
    }
}

fn render_execution(state: &FlowState) {
    if state.executing {
        println!("Processing your trade...");
    } else {
        println!("Nothing executing.");
    }
}

fn render_result(state: &FlowState) {
    match &state.result {
        Some(result) => {
            let tag = if result.success { "OK" } else { "FAILED" };
            println!("[{tag}] {}", result.message);
            println!("  trade id  {}", result.trade_id);
            println!("  timestamp {}", result.timestamp);
        }
        None => println!("Trade cancelled. No trade was executed."),
    }
    println!("`reset` to start a new analysis.");
}

pub fn render_catalog() {
    for stock in catalog::stocks() {
        println!("  {:<6} {:<22} {}", stock.symbol, stock.name, stock.sector);
    }
}

pub fn render_explanation(state: &FlowState) {
    let Some(rec) = &state.recommendation else {
        println!("No recommendation to explain yet.");
        return;
    };
    println!("Why {} for {}:", rec.call, rec.symbol);
    println!("Key factors:");
    for f in &rec.explanation.factors {
        println!("  {:<10} {:>5}  {}", f.name, f.impact, f.description);
    }
    println!("Risk factors:");
    for risk in &rec.explanation.risk_factors {
        println!("  - {risk}");
    }
}
