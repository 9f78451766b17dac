//! Stdin reader feeding the intent channel. Blocking reads run on a
//! dedicated blocking thread so the controller loop stays responsive.

use tokio::sync::mpsc;
use tracing::warn;

use crate::parser::parse_intent;
use crate::types::UserIntent;

pub fn spawn_stdin_reader(tx: mpsc::Sender<UserIntent>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_intent(&line) {
                Some(intent) => {
                    let quit = intent == UserIntent::Quit;
                    if tx.blocking_send(intent).is_err() || quit {
                        break;
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        warn!("unrecognized command: {} (try `list`, `select <SYM>`, `next`)", line.trim());
                    }
                }
            }
        }
        // EOF: ask the controller loop to shut down.
        let _ = tx.blocking_send(UserIntent::Quit);
    })
}
