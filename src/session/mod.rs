//! Conversation state carried across turns of a single session.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::agent::Handoff;
use crate::config::{RunConfig, DEFAULT_MAX_TURNS};
use crate::error::{BatonError, Result};
use crate::handoff::HandoffPayload;
use crate::types::{ContentBlock, HistoryEntry, Message, MessageContent, Role, RunItem, Usage};

/// Append-only conversation history for one agent, plus usage and turn accounting.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    agent: String,
    created_at: DateTime<Utc>,
    history: Vec<HistoryEntry>,
    last_items: Vec<RunItem>,
    usage: Usage,
    turns: usize,
    max_turns: usize,
}

impl Session {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent: agent.into(),
            created_at: Utc::now(),
            history: Vec::new(),
            last_items: Vec::new(),
            usage: Usage::default(),
            turns: 0,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Session whose turn budget comes from the run configuration.
    pub fn from_config(agent: impl Into<String>, config: &RunConfig) -> Self {
        Self::new(agent).with_max_turns(config.max_turns)
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Agent currently owning the conversation.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push_entry(Message::user(text).into());
    }

    pub fn push_user_blocks(&mut self, blocks: Vec<ContentBlock>) {
        self.push_entry(Message::user_blocks(blocks).into());
    }

    /// Append an entry. Items of the previous response stop being "latest".
    pub fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.last_items.clear();
    }

    /// Count a model turn, failing once the budget is spent.
    pub fn begin_turn(&mut self) -> Result<usize> {
        if self.turns >= self.max_turns {
            return Err(BatonError::MaxTurnsExceeded {
                max_turns: self.max_turns,
            });
        }
        self.turns += 1;
        Ok(self.turns)
    }

    /// Append the items of a model response and accumulate its usage.
    pub fn record_response(&mut self, items: Vec<RunItem>, usage: &Usage) {
        self.history
            .extend(items.iter().map(RunItem::to_input_entry));
        self.last_items = items;
        self.usage.merge(usage);
    }

    /// Items recorded by the most recent response, if nothing was appended since.
    pub fn last_items(&self) -> &[RunItem] {
        &self.last_items
    }

    /// Full history in the shape fed to the next model call.
    pub fn to_input_list(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Text of the latest assistant message, trimmed.
    ///
    /// Block content joins the `output_text` blocks; plain content is used as-is.
    pub fn latest_assistant_text(&self) -> Option<String> {
        let message = self
            .history
            .iter()
            .rev()
            .filter_map(HistoryEntry::as_message)
            .find(|m| m.role == Role::Assistant)?;
        let text = match message.content.as_ref()? {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|b| b.is_output_text())
                .filter_map(|b| b.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
        };
        Some(text.trim().to_string())
    }

    /// Hand the conversation to the handoff's target agent.
    ///
    /// The latest recorded items become the payload's new items and the
    /// entries before them its prior history. After the handoff's filter runs,
    /// the new session starts from the filtered history followed by the
    /// pre-handoff and new items. `self` is left untouched.
    pub fn hand_off(&self, handoff: &Handoff, pre_handoff_items: Vec<RunItem>) -> Session {
        // `last_items` always mirrors the tail of `history`, one entry per item.
        let split = self.history.len() - self.last_items.len();
        let payload = HandoffPayload::new(
            self.history[..split].to_vec(),
            pre_handoff_items,
            self.last_items.clone(),
        );
        let filtered = handoff.apply(&payload);
        let target = &handoff.target().name;

        info!(
            session = %self.id,
            from = %self.agent,
            to = %target,
            history_before = self.history.len(),
            history_after = filtered.prior_history.len(),
            "handing off session"
        );

        Session {
            id: Uuid::new_v4(),
            agent: target.clone(),
            created_at: Utc::now(),
            history: filtered.to_input_list(),
            last_items: filtered.new_items.to_vec(),
            usage: self.usage.clone(),
            turns: self.turns,
            max_turns: self.max_turns,
        }
    }
}
