//! Parse user commands into flow intents.
//! Supported: select/pick, next/prev, buy/reject/more, confirm/cancel,
//! mode, reset, list, why, state, quit.

use crate::types::{AdvisorMode, Decision, UserIntent};
use regex::Regex;

pub fn parse_intent(text: &str) -> Option<UserIntent> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    // Single-word commands first
    match t.to_ascii_lowercase().as_str() {
        "next" | "n" => return Some(UserIntent::Next),
        "prev" | "previous" | "back" | "p" => return Some(UserIntent::Previous),
        "buy" => return Some(UserIntent::Decide(Decision::Buy)),
        "reject" => return Some(UserIntent::Decide(Decision::Reject)),
        "more" | "more-data" | "data" => return Some(UserIntent::Decide(Decision::MoreData)),
        "confirm" | "yes" | "y" => return Some(UserIntent::Confirm(true)),
        "cancel" | "no" => return Some(UserIntent::Confirm(false)),
        "reset" | "restart" => return Some(UserIntent::Reset),
        "list" | "stocks" => return Some(UserIntent::List),
        "why" | "explain" => return Some(UserIntent::Explain),
        "state" => return Some(UserIntent::DumpState),
        "quit" | "exit" | "q" => return Some(UserIntent::Quit),
        _ => {}
    }

    // "select AAPL" / "pick aapl"
    let re_select = Regex::new(r"(?i)^(select|pick)\s+([A-Z]{1,6})$").unwrap();
    if let Some(c) = re_select.captures(t) {
        return Some(UserIntent::Select(c[2].to_uppercase()));
    }

    // "mode recommend|advisor|auto"
    let re_mode = Regex::new(r"(?i)^mode\s+(\w+)$").unwrap();
    if let Some(c) = re_mode.captures(t) {
        return AdvisorMode::parse(&c[1]).map(UserIntent::SetMode);
    }

    None
}
