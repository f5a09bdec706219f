//! mockview-core: interview flow, answer scoring, and session storage.
//!
//! This crate holds the data model, the question bank, the answer evaluator
//! and the flow manager that sequences questions and follow-ups, plus the
//! session store, analytics and report data the rest of mockview builds on.

pub mod bank;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod flow;
pub mod generation;
pub mod interview;
pub mod model;
pub mod report;
pub mod scoring;
pub mod signals;
pub mod statistics;
pub mod store;
pub mod text;
pub mod traits;
pub mod transcription;

#[cfg(test)]
mod testing;
