//! The bounded tool-calling loop for docmind.
//!
//! One `run_turn` call takes the user's text plus the prior transcript and
//! drives the model until it produces a final answer, executing any tool
//! calls it requests along the way. Every model call counts against a hard
//! budget, so a model that never stops asking for tools terminates with an
//! error instead of spinning forever.

pub mod loop_runner;

pub use loop_runner::{AgentLoop, TurnOutput};
