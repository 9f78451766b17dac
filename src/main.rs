//! Entry point. Wires Input -> Parser -> Controller -> Advisor.

mod advisor;
mod catalog;
mod config;
mod controller;
mod error;
mod input;
mod parser;
mod render;
mod state;
mod types;
mod utils;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::advisor::{Advisor, MockAdvisor};
use crate::controller::{FlowController, FlowEvent};
use crate::types::UserIntent;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load config; ADVISOR_SEED overrides the configured seed for
    // reproducible demo runs.
    let mut cfg = config::AppConfig::load_or_default("config.yaml")?;
    if let Ok(seed) = std::env::var("ADVISOR_SEED") {
        cfg.advisor.seed = seed.parse().ok();
    }

    let advisor: Arc<dyn Advisor> = Arc::new(MockAdvisor::new(cfg.advisor.clone()));

    // User intents and provider completions feed one controller loop.
    let (intent_tx, mut intent_rx) = tokio::sync::mpsc::channel::<UserIntent>(64);
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<FlowEvent>(64);

    let mut ctrl = FlowController::new(advisor, cfg.flow.clone(), event_tx);
    let input_handle = input::spawn_stdin_reader(intent_tx);

    info!(
        "Advisor demo started. AnalyzeLatency={}ms, AutoAdvance={}ms, Quantity={}",
        cfg.advisor.analyze_ms, cfg.flow.auto_advance_ms, cfg.flow.trade_quantity
    );
    println!("AI Stock Recommendation Demo");
    render::render(&ctrl.snapshot());

    loop {
        tokio::select! {
            maybe = intent_rx.recv() => {
                let Some(intent) = maybe else { break; };
                match intent {
                    UserIntent::Quit => break,
                    UserIntent::List => render::render_catalog(),
                    UserIntent::Explain => render::render_explanation(&ctrl.snapshot()),
                    UserIntent::DumpState => {
                        println!("{}", serde_json::to_string_pretty(&ctrl.snapshot())?);
                    }
                    other => {
                        ctrl.handle_intent(other);
                        render::render(&ctrl.snapshot());
                    }
                }
            }

            maybe = event_rx.recv() => {
                let Some(event) = maybe else { break; };
                ctrl.handle_event(event);
                render::render(&ctrl.snapshot());
            }
        }
    }

    info!("bye");
    input_handle.abort();
    Ok(())
}
