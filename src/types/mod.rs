//! Core types for Baton.

pub mod items;
pub mod message;
pub mod usage;

pub use items::*;
pub use message::*;
pub use usage::*;
