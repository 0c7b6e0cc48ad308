//! Error types shared across the planning crates.

use thiserror::Error;

/// Blocking errors that fail a plan request outright.
///
/// Everything past input validation degrades instead of failing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("need at least 2 valid points, found {found}")]
    InsufficientPoints { found: usize },
}

/// Failures at the routing-engine boundary.
///
/// Every call site pairs these with a defined fallback; they degrade a
/// plan, never abort it.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("routing engine request failed: {0}")]
    Request(String),
    #[error("routing engine response malformed: {0}")]
    Malformed(String),
    #[error("routing engine returned a {got}x{got} matrix, expected {expected}x{expected}")]
    Dimension { expected: usize, got: usize },
}

impl ProviderError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
