//! Handoff input filters: the seam between a handoff and the history it carries.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::payload::HandoffPayload;
use crate::types::{HistoryEntry, Role, RunItem};

/// Transforms the payload handed to the next agent.
///
/// Filters must not mutate their input; they return a new payload.
pub trait HandoffInputFilter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn filter(&self, payload: &HandoffPayload) -> HandoffPayload;
}

type FilterFn = dyn Fn(&HandoffPayload) -> HandoffPayload + Send + Sync;

/// Closure-based filter for quick filter creation.
#[derive(Clone)]
pub struct FnFilter {
    name: String,
    handler: Arc<FilterFn>,
}

impl FnFilter {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&HandoffPayload) -> HandoffPayload + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for FnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}

impl HandoffInputFilter for FnFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, payload: &HandoffPayload) -> HandoffPayload {
        (self.handler)(payload)
    }
}

/// Strips tool plumbing so the next agent only sees conversation.
///
/// Removes tool-role messages, assistant messages carrying `tool_calls`,
/// `*_call` / `*_call_output` history items, and every tool or handoff run item.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveToolItems;

impl HandoffInputFilter for RemoveToolItems {
    fn name(&self) -> &str {
        "remove-tools"
    }

    fn filter(&self, payload: &HandoffPayload) -> HandoffPayload {
        let prior_history = payload
            .prior_history
            .iter()
            .filter(|entry| !is_tool_entry(entry))
            .cloned()
            .collect();

        HandoffPayload {
            prior_history,
            pre_handoff_items: without_tool_items(&payload.pre_handoff_items),
            new_items: without_tool_items(&payload.new_items),
        }
    }
}

fn is_tool_entry(entry: &HistoryEntry) -> bool {
    match entry {
        HistoryEntry::Message(message) => message.role == Role::Tool || message.has_tool_calls(),
        HistoryEntry::Opaque(value) => value
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind.ends_with("_call") || kind.ends_with("_call_output")),
    }
}

fn without_tool_items(items: &Arc<[RunItem]>) -> Arc<[RunItem]> {
    if !items.iter().any(RunItem::is_tool_related) {
        return Arc::clone(items);
    }
    items
        .iter()
        .filter(|item| !item.is_tool_related())
        .cloned()
        .collect()
}

/// Applies filters in order, each one seeing the previous one's output.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn HandoffInputFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl HandoffInputFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn push(&mut self, filter: Arc<dyn HandoffInputFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

impl HandoffInputFilter for FilterChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn filter(&self, payload: &HandoffPayload) -> HandoffPayload {
        self.filters
            .iter()
            .fold(payload.clone(), |acc, filter| filter.filter(&acc))
    }
}
