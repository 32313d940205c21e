//! Agents: instructions, tools, handoffs and model settings.

pub mod agent;
pub mod settings;

pub use agent::{Agent, Handoff, Instructions, RunContext};
pub use settings::{ModelSettings, ToolChoice, Truncation};
