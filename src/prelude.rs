//! Convenience re-exports for common use.

pub use crate::agent::{Agent, Handoff, Instructions, ModelSettings, RunContext, ToolChoice};
pub use crate::config::RunConfig;
pub use crate::error::{BatonError, Result};
pub use crate::handoff::{
    condense, ContextCondenser, FilterChain, HandoffInputFilter, HandoffPayload, RemoveToolItems,
};
pub use crate::session::Session;
pub use crate::types::{
    ContentBlock, HistoryEntry, Message, MessageContent, Role, RunItem, Usage,
};
