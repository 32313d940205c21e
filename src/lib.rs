//! Baton — conversation handoffs between agents
//!
//! Carries a conversation from one agent personality to another. The core is
//! the context condenser, which reduces prior history to a single system
//! summary while structural run items (tool calls, handoff calls) pass through
//! verbatim.
//!
//! # Quick Start
//!
//! ```
//! use baton::prelude::*;
//!
//! let spanish = Agent::builder()
//!     .name("Spanish Assistant")
//!     .instructions("You only speak Spanish and are extremely concise.")
//!     .build();
//! let handoff = Handoff::to(spanish).with_input_filter(ContextCondenser::new());
//!
//! let mut session = Session::new("Assistant");
//! session.push_user("Hi, my name is Sora.");
//! session.push_user("Por favor habla en español.");
//!
//! let next = session.hand_off(&handoff, Vec::new());
//! assert_eq!(next.agent(), "Spanish Assistant");
//! assert_eq!(next.to_input_list().len(), 1);
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod handoff;
pub mod prelude;
pub mod session;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
