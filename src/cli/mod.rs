//! CLI entry point for Baton.

use std::io::Read;
use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{BatonError, Result};
use crate::handoff::{
    render_payload, try_condense, ContextCondenser, FilterChain, HandoffInputFilter,
    HandoffPayload, RemoveToolItems,
};

/// Baton handoff CLI
#[derive(Parser, Debug)]
#[command(name = "baton", version, about = "Baton — condense conversations at agent handoffs")]
pub struct Cli {
    /// Log filter decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Condense a handoff payload and print the result as JSON
    Condense(CondenseArgs),
    /// Print the diagnostic view of a handoff payload
    Inspect(InspectArgs),
}

/// Which handoff filter `condense` applies.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    /// Summarize prior history into one system message
    #[default]
    Condense,
    /// Drop tool calls and tool results
    RemoveTools,
    /// Drop tool plumbing, then summarize
    Both,
}

/// Arguments for `baton condense`.
#[derive(Parser, Debug)]
pub struct CondenseArgs {
    /// Payload JSON file, or `-` for stdin
    pub input: String,

    /// Filter to apply
    #[arg(short, long, value_enum, default_value_t = FilterKind::Condense)]
    pub filter: FilterKind,
}

/// Arguments for `baton inspect`.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Payload JSON file, or `-` for stdin
    pub input: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Run a parsed command and return what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Condense(args) => {
            let payload = parse_payload(&read_input(&args.input)?)?;
            let output = match args.filter {
                FilterKind::Condense => try_condense(payload.as_ref())?,
                FilterKind::RemoveTools => RemoveToolItems.filter(&require(payload)?),
                FilterKind::Both => FilterChain::new()
                    .with(RemoveToolItems)
                    .with(ContextCondenser::new())
                    .filter(&require(payload)?),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Commands::Inspect(args) => {
            let payload = require(parse_payload(&read_input(&args.input)?)?)?;
            Ok(render_payload(&payload))
        }
    }
}

/// Parse a payload document; JSON `null` means no payload.
pub fn parse_payload(raw: &str) -> Result<Option<HandoffPayload>> {
    Ok(serde_json::from_str(raw)?)
}

fn require(payload: Option<HandoffPayload>) -> Result<HandoffPayload> {
    payload.ok_or_else(|| BatonError::invalid_argument("handoff payload is required"))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    Ok(std::fs::read_to_string(Path::new(input))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write_payload(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("payload.json");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn parse_condense_with_defaults() {
        let cli = Cli::try_parse_from(["baton", "condense", "payload.json"]).unwrap();
        match cli.command {
            Commands::Condense(args) => {
                assert_eq!(args.input, "payload.json");
                assert_eq!(args.filter, FilterKind::Condense);
            }
            other => panic!("expected Condense, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_condense_with_filter_and_verbose() {
        let cli =
            Cli::try_parse_from(["baton", "condense", "-", "--filter", "remove-tools", "-v"])
                .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Condense(args) => assert_eq!(args.filter, FilterKind::RemoveTools),
            other => panic!("expected Condense, got {other:?}"),
        }
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["baton"]).is_err());
    }

    #[test]
    fn parse_unknown_filter_is_error() {
        assert!(Cli::try_parse_from(["baton", "condense", "x", "--filter", "shrink"]).is_err());
    }

    #[test]
    fn condense_command_prints_summary_payload() {
        let dir = TempDir::new().unwrap();
        let input = write_payload(
            &dir,
            r#"{"input_history": [{"role": "user", "content": "A"}, {"role": "assistant", "content": "B"}]}"#,
        );
        let cli = Cli::try_parse_from(["baton", "condense", input.as_str()]).unwrap();
        let out: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
        assert_eq!(
            out["input_history"],
            serde_json::json!([{"role": "system", "content": "Summary: User: A | Assistant: B"}])
        );
        assert_eq!(out["new_items"], serde_json::json!([]));
    }

    #[test]
    fn null_payload_is_invalid_argument() {
        let dir = TempDir::new().unwrap();
        let input = write_payload(&dir, "null");
        for filter in ["condense", "remove-tools", "both"] {
            let cli =
                Cli::try_parse_from(["baton", "condense", input.as_str(), "--filter", filter])
                    .unwrap();
            assert!(matches!(run(&cli), Err(BatonError::InvalidArgument(_))));
        }
    }

    #[test]
    fn inspect_renders_diagnostics() {
        let dir = TempDir::new().unwrap();
        let input = write_payload(
            &dir,
            r#"{"input_history": [], "new_items": [{"type": "handoff_call", "agent": "Assistant", "call_id": "c", "target": "Spanish Assistant"}]}"#,
        );
        let cli = Cli::try_parse_from(["baton", "inspect", input.as_str()]).unwrap();
        let out: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
        assert_eq!(out["new_items"][0]["type"], "handoff_call");
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let input = write_payload(&dir, "{not json");
        let cli = Cli::try_parse_from(["baton", "inspect", input.as_str()]).unwrap();
        assert!(matches!(run(&cli), Err(BatonError::Serialization(_))));
    }
}
