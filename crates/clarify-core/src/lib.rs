//! Shared foundation for the Clarify evaluation harness.
//!
//! This crate provides what the other Clarify crates build on:
//! - [`ClarifyError`] — unified error type using `thiserror`
//! - [`ClarifyConfig`] — configuration loaded from `.clarify.toml`
//! - Record types: [`PrRecord`], [`QuestionEntry`], [`ClarifiedRecord`],
//!   [`BaselineRecord`]

mod config;
mod error;
mod types;

pub use config::{ClarifyConfig, LlmConfig, RunConfig};
pub use error::ClarifyError;
pub use types::{BaselineRecord, ClarifiedRecord, PrRecord, QuestionEntry};

/// A convenience `Result` type for Clarify operations.
pub type Result<T> = std::result::Result<T, ClarifyError>;
