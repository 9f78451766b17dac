//! Static stock catalog and advisor mode profiles. Fixed at startup,
//! never mutated.

use crate::types::{AdvisorMode, ModeProfile, Stock};

/// The fixed list of stocks available for selection.
pub fn stocks() -> Vec<Stock> {
    let entries = [
        ("AAPL", "Apple Inc.", "Technology"),
        ("GOOGL", "Alphabet Inc.", "Technology"),
        ("MSFT", "Microsoft Corp.", "Technology"),
        ("TSLA", "Tesla Inc.", "Automotive"),
        ("AMZN", "Amazon.com Inc.", "E-commerce"),
        ("NVDA", "NVIDIA Corp.", "Technology"),
        ("META", "Meta Platforms Inc.", "Social Media"),
        ("NFLX", "Netflix Inc.", "Entertainment"),
    ];
    entries
        .iter()
        .map(|(symbol, name, sector)| Stock {
            symbol: symbol.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
        })
        .collect()
}

/// Case-insensitive catalog lookup.
pub fn find(symbol: &str) -> Option<Stock> {
    stocks()
        .into_iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
}

/// Profile for a given advisor mode. The mode is a display setting only;
/// nothing in the flow consults it.
pub fn mode_profile(mode: AdvisorMode) -> ModeProfile {
    match mode {
        AdvisorMode::Recommend => ModeProfile {
            name: "Recommend",
            description: "AI provides recommendations, human decides",
            automation_level: 20,
            badge: "blue",
        },
        AdvisorMode::Advisor => ModeProfile {
            name: "Advisor",
            description: "AI advises with explanations, human confirms",
            automation_level: 50,
            badge: "yellow",
        },
        AdvisorMode::Auto => ModeProfile {
            name: "Auto",
            description: "AI executes trades automatically",
            automation_level: 90,
            badge: "red",
        },
    }
}
