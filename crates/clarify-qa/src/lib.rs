//! Question/answer normalization and prompt assembly.
//!
//! The heart of the harness: turning messy human-authored question and
//! answer tables into aligned `Qn`/`An` transcripts embedded in review
//! prompts. Provides the TSV table model, the question and answer parsers,
//! the positional aligner, and the prompt templates.

pub mod answers;
pub mod prompt;
pub mod questions;
pub mod table;
pub mod transcript;
