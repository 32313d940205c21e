//! Handoff payloads and the filters applied to them.

pub mod condenser;
pub mod diagnostics;
pub mod filter;
pub mod payload;

pub use condenser::{condense, summarize_history, try_condense, ContextCondenser};
pub use diagnostics::render_payload;
pub use filter::{FilterChain, FnFilter, HandoffInputFilter, RemoveToolItems};
pub use payload::HandoffPayload;
