//! Application layer: the gap-analysis orchestrator and the session
//! turn processor that drives the conversation flow.

pub mod analyzer;
pub mod turn;

pub use analyzer::GapAnalyzer;
pub use turn::TurnProcessor;
