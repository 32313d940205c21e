//! Agent definitions, instructions and handoffs.

use std::fmt;
use std::sync::Arc;

use bon::Builder;
use serde_json::{Map, Value};

use super::settings::ModelSettings;
use crate::handoff::{HandoffInputFilter, HandoffPayload};
use crate::types::transfer_tool_name;

/// Free-form values available when instructions are resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunContext {
    values: Map<String, Value>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

type InstructionFn = dyn Fn(&RunContext, &Agent) -> String + Send + Sync;

/// System instructions: fixed text, or computed per run from the context.
#[derive(Clone)]
pub enum Instructions {
    Static(String),
    Dynamic(Arc<InstructionFn>),
}

impl Instructions {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&RunContext, &Agent) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }
}

impl Default for Instructions {
    fn default() -> Self {
        Self::Static(String::new())
    }
}

impl From<&str> for Instructions {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Instructions {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// An agent personality: instructions, tools, handoff targets and model settings.
///
/// ```
/// use baton::agent::{Agent, Handoff};
/// use baton::handoff::ContextCondenser;
///
/// let spanish = Agent::builder()
///     .name("Spanish Assistant")
///     .instructions("You only speak Spanish and are extremely concise.")
///     .handoff_description("A Spanish-speaking assistant.")
///     .build();
/// let triage = Agent::builder()
///     .name("Assistant")
///     .instructions("If the user speaks Spanish, handoff to the Spanish assistant.")
///     .handoffs(vec![Handoff::to(spanish).with_input_filter(ContextCondenser::new())])
///     .build();
/// assert!(triage.find_handoff("transfer_to_spanish_assistant").is_some());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Agent {
    #[builder(into)]
    pub name: String,
    #[builder(into, default)]
    pub instructions: Instructions,
    #[builder(into)]
    pub handoff_description: Option<String>,
    /// Names of tools the agent may call.
    #[builder(default)]
    pub tools: Vec<String>,
    #[builder(default)]
    pub handoffs: Vec<Handoff>,
    /// Model override; the run configuration's model is used when unset.
    #[builder(into)]
    pub model: Option<String>,
    #[builder(default)]
    pub model_settings: ModelSettings,
}

impl Agent {
    /// Instructions for this run.
    pub fn resolve_instructions(&self, ctx: &RunContext) -> String {
        match &self.instructions {
            Instructions::Static(text) => text.clone(),
            Instructions::Dynamic(f) => f(ctx, self),
        }
    }

    /// Look up a handoff by tool name or by target agent name.
    pub fn find_handoff(&self, name: &str) -> Option<&Handoff> {
        self.handoffs
            .iter()
            .find(|h| h.tool_name() == name || h.target().name == name)
    }

    pub fn handoff_tool_names(&self) -> Vec<String> {
        self.handoffs.iter().map(Handoff::tool_name).collect()
    }
}

/// A route from one agent to another, with an optional input filter.
#[derive(Clone)]
pub struct Handoff {
    target: Arc<Agent>,
    input_filter: Option<Arc<dyn HandoffInputFilter>>,
}

impl Handoff {
    pub fn to(agent: Agent) -> Self {
        Self::to_shared(Arc::new(agent))
    }

    pub fn to_shared(agent: Arc<Agent>) -> Self {
        Self {
            target: agent,
            input_filter: None,
        }
    }

    pub fn with_input_filter(mut self, filter: impl HandoffInputFilter + 'static) -> Self {
        self.input_filter = Some(Arc::new(filter));
        self
    }

    pub fn with_shared_filter(mut self, filter: Arc<dyn HandoffInputFilter>) -> Self {
        self.input_filter = Some(filter);
        self
    }

    pub fn target(&self) -> &Arc<Agent> {
        &self.target
    }

    pub fn input_filter(&self) -> Option<&Arc<dyn HandoffInputFilter>> {
        self.input_filter.as_ref()
    }

    /// Tool name the model calls to trigger this handoff.
    pub fn tool_name(&self) -> String {
        transfer_tool_name(&self.target.name)
    }

    pub fn tool_description(&self) -> String {
        let mut description = format!(
            "Handoff to the {} agent to handle the request.",
            self.target.name
        );
        if let Some(extra) = &self.target.handoff_description {
            description.push(' ');
            description.push_str(extra);
        }
        description
    }

    /// Run the input filter, or pass the payload through when none is set.
    pub fn apply(&self, payload: &HandoffPayload) -> HandoffPayload {
        match &self.input_filter {
            Some(filter) => {
                tracing::debug!(
                    filter = filter.name(),
                    target = %self.target.name,
                    "applying handoff input filter"
                );
                filter.filter(payload)
            }
            None => payload.clone(),
        }
    }
}

impl fmt::Debug for Handoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handoff")
            .field("target", &self.target.name)
            .field("input_filter", &self.input_filter.as_ref().map(|flt| flt.name()))
            .finish()
    }
}
