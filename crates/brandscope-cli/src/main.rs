//! Brandscope command-line runner
//!
//! Lists flows, prints their JSON Schemas and runs a flow on a JSON input
//! file against the Gemini backend.

mod config;

use anyhow::Context;
use async_trait::async_trait;
use brandscope_backend::{
    BackendError, GeminiBackend, GenerationBackend, GenerationRequest, GenerationResponse,
};
use brandscope_core::{EngineConfig, FlowExecutor, FlowRegistry};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use config::CliConfig;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stands in for a real backend when a command never generates anything
struct Offline;

#[async_trait]
impl GenerationBackend for Offline {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, BackendError> {
        Err(BackendError::Configuration("no backend configured".into()))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

fn cli() -> Command {
    Command::new("brandscope")
        .version(brandscope_core::VERSION)
        .about("Schema-constrained business-analysis flows")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(Command::new("list").about("List registered flow names"))
        .subcommand(
            Command::new("schema")
                .about("Print a flow's output JSON Schema")
                .arg(Arg::new("flow").required(true).help("Flow name"))
                .arg(
                    Arg::new("input")
                        .long("input")
                        .action(ArgAction::SetTrue)
                        .help("Print the input schema instead"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run a flow and print its output JSON")
                .arg(Arg::new("flow").required(true).help("Flow name"))
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file holding the flow input"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML file with [engine] and [backend] sections"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,brandscope=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn offline_registry() -> anyhow::Result<FlowRegistry> {
    let executor = FlowExecutor::new(Arc::new(Offline), EngineConfig::new());
    Ok(FlowRegistry::with_defaults(executor)?)
}

fn schema(args: &ArgMatches) -> anyhow::Result<()> {
    let registry = offline_registry()?;
    let flow = args
        .get_one::<String>("flow")
        .context("missing flow name")?;
    let schema = if args.get_flag("input") {
        registry.input_schema(flow)?
    } else {
        registry.output_schema(flow)?
    };
    println!("{}", serde_json::to_string_pretty(&schema.to_json_schema())?);
    Ok(())
}

async fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let flow = args
        .get_one::<String>("flow")
        .context("missing flow name")?;
    let input_path = args
        .get_one::<PathBuf>("input")
        .context("missing --input")?;
    let config = CliConfig::load(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    let text = std::fs::read_to_string(input_path)
        .with_context(|| format!("reading input {}", input_path.display()))?;
    let input: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing input {}", input_path.display()))?;

    let backend = GeminiBackend::new(config.backend_from_env()?)?;
    let registry = FlowRegistry::with_defaults(FlowExecutor::new(Arc::new(backend), config.engine))?;

    info!(flow = %flow, input = %input_path.display(), "running flow");
    let output = registry.run(flow, input).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("list", _)) => {
            for name in offline_registry()?.names() {
                println!("{name}");
            }
            Ok(())
        }
        Some(("schema", args)) => schema(args),
        Some(("run", args)) => run(args).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn run_requires_input() {
        let err = cli()
            .try_get_matches_from(["brandscope", "run", "generate-demographics"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn schema_flag_parses() {
        let matches = cli()
            .try_get_matches_from(["brandscope", "schema", "generate-personas", "--input"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("input"));
        assert_eq!(args.get_one::<String>("flow").unwrap(), "generate-personas");
    }

    #[tokio::test]
    async fn offline_registry_lists_but_never_generates() {
        let registry = offline_registry().unwrap();
        assert!(registry.contains("competitive-report"));

        let err = registry
            .run(
                "generate-demographics",
                serde_json::json!({ "brandName": "Acme", "industry": "Hardware" }),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no backend configured"));
    }
}
