//! Context condensation at handoff boundaries.
//!
//! The condenser reduces the prior history of a [`HandoffPayload`] to a single
//! system message summarizing user and assistant turns, while passing the
//! structural run items through untouched.
//!
//! ```
//! use baton::handoff::{condense, HandoffPayload};
//! use baton::types::{Message, MessageContent};
//!
//! let payload = HandoffPayload::new(
//!     vec![Message::user("A").into(), Message::assistant("B").into()],
//!     Vec::new(),
//!     Vec::new(),
//! );
//! let condensed = condense(&payload);
//! let summary = condensed.prior_history[0].as_message().unwrap();
//! assert_eq!(
//!     summary.content,
//!     Some(MessageContent::Text("Summary: User: A | Assistant: B".into()))
//! );
//! ```

use tracing::debug;

use super::diagnostics::render_payload;
use super::filter::HandoffInputFilter;
use super::payload::HandoffPayload;
use crate::error::{BatonError, Result};
use crate::types::{HistoryEntry, Message, MessageContent, Role};

pub const SUMMARY_PREFIX: &str = "Summary: ";
pub const FRAGMENT_SEPARATOR: &str = " | ";
/// Body used when no message contributes a fragment.
pub const NO_RELEVANT_HISTORY: &str = "No relevant history.";

/// Stateless, lossy summarizer for handoff history.
///
/// Condensation is one-shot: feeding an already condensed payload back in
/// yields `"Summary: No relevant history."` because system messages never
/// contribute fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextCondenser;

impl ContextCondenser {
    pub fn new() -> Self {
        Self
    }

    /// Replace prior history with a single summary message.
    pub fn condense(&self, payload: &HandoffPayload) -> HandoffPayload {
        let summary = summarize_history(&payload.prior_history);
        let condensed = payload.with_prior_history(vec![Message::system(summary).into()]);

        debug!(
            history_len = payload.prior_history.len(),
            pre_handoff_items = condensed.pre_handoff_items.len(),
            new_items = condensed.new_items.len(),
            "condensed handoff history"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(payload = %render_payload(&condensed), "condensed handoff payload");
        }

        condensed
    }
}

impl HandoffInputFilter for ContextCondenser {
    fn name(&self) -> &str {
        "condense"
    }

    fn filter(&self, payload: &HandoffPayload) -> HandoffPayload {
        self.condense(payload)
    }
}

/// Condense a payload with the default condenser.
pub fn condense(payload: &HandoffPayload) -> HandoffPayload {
    ContextCondenser.condense(payload)
}

/// Condense a payload that may be absent.
///
/// A missing payload is the only failure: there is nothing to transform.
pub fn try_condense(payload: Option<&HandoffPayload>) -> Result<HandoffPayload> {
    payload
        .map(condense)
        .ok_or_else(|| BatonError::invalid_argument("handoff payload is required"))
}

/// Build the summary text for a history: `"Summary: "` followed by the
/// ` | `-joined fragments in chronological order.
pub fn summarize_history(history: &[HistoryEntry]) -> String {
    let fragments: Vec<String> = history.iter().filter_map(fragment).collect();
    let body = if fragments.is_empty() {
        NO_RELEVANT_HISTORY.to_string()
    } else {
        fragments.join(FRAGMENT_SEPARATOR)
    };
    format!("{SUMMARY_PREFIX}{body}")
}

fn fragment(entry: &HistoryEntry) -> Option<String> {
    let message = entry.as_message()?;
    let content = message.content.as_ref()?;
    let (label, text) = match message.role {
        Role::User => ("User", user_text(content)?),
        Role::Assistant => ("Assistant", assistant_text(content)?),
        Role::System | Role::Tool => return None,
    };
    if text.is_empty() {
        return None;
    }
    Some(format!("{label}: {text}"))
}

// Block content from a user has no defined textual form; it is rendered as opaque JSON text.
fn user_text(content: &MessageContent) -> Option<String> {
    match content {
        MessageContent::Text(text) => Some(text.clone()),
        MessageContent::Blocks(blocks) => serde_json::to_string(blocks).ok(),
    }
}

// Only the first block is used, even when later blocks carry text.
fn assistant_text(content: &MessageContent) -> Option<String> {
    match content {
        MessageContent::Text(text) => Some(text.clone()),
        MessageContent::Blocks(blocks) => blocks.first()?.text.clone(),
    }
}
