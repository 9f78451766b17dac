//! Provider-side error channel.
//!
//! The shipped mock never fails, but a real backend slotted in behind
//! [`crate::advisor::Advisor`] needs a defined path for calls that do not
//! complete. Note the distinction from a trade that completes with
//! `success == false` — that is a normal business outcome, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The backing service failed to produce a result.
    #[error("advisor backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
