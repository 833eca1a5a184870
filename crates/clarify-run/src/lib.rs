//! Batch orchestration for the Clarify harness.
//!
//! Loads PR streams and Q&A tables, drives the per-PR generation loop for
//! baseline and clarified reviews, and scaffolds the human-scoring sheet.

pub mod driver;
pub mod eval;
pub mod input;
pub mod llm;
