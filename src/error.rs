//! Error types (spec.md section 7).
//!
//! Two categories: malformed input, caught before any worker starts,
//! and infrastructure failure (a worker thread panicking), which is
//! fatal. Refcount/double-release bugs are a third category but are
//! programmer errors, not runtime conditions, so they are asserted on
//! in debug builds (`node::NodeHandle::release_one`) rather than
//! represented here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(&'static str),
}
