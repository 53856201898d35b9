use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sechtml_core::{OsRandom, ProcessorConfig, RandomSource, RendererConfig};
use sechtml_widgets::{Button, ButtonConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Render CSP-friendly button widgets from JSON definitions.
#[derive(Debug, Parser)]
#[command(name = "sechtml", version)]
struct Args {
    /// Renderer configuration (JSON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Add this CSP nonce to generated script and style tags.
    #[arg(long)]
    nonce: Option<String>,

    /// Sanitize markup content of non-script tags.
    #[arg(long)]
    sanitize: bool,

    /// Print only the serialized attributes of each button.
    #[arg(long)]
    attributes_only: bool,

    /// A button definition or an array of them; stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SECHTML_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let source = read_file(path)?;
            RendererConfig::from_json(&source)
                .with_context(|| format!("invalid renderer config {}", path.display()))?
        }
        None => RendererConfig::default(),
    };
    if let Some(nonce) = &args.nonce {
        config = config.with_processor(ProcessorConfig::Nonce {
            nonce: nonce.clone(),
        });
    }
    if args.sanitize {
        config = config.with_processor(ProcessorConfig::Sanitize);
    }

    let random: Arc<dyn RandomSource> = Arc::new(OsRandom::new()?);
    let renderer = Arc::new(config.build(Arc::clone(&random)));

    let source = match &args.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    let buttons = parse_buttons(&source)?;
    tracing::debug!(count = buttons.len(), "rendering buttons");

    for button_config in buttons {
        let mut button = Button::new(button_config, Arc::clone(&renderer), Arc::clone(&random));
        let html = if args.attributes_only {
            button.before_to_html()?;
            button.attributes_html()
        } else {
            button.to_html()?
        };
        println!("{}", html);
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_buttons(source: &str) -> Result<Vec<ButtonConfig>> {
    let value: Value = serde_json::from_str(source).context("invalid button definition")?;
    let buttons: Vec<ButtonConfig> = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ButtonConfig>, _>>()
            .context("invalid button definition")?,
        other => vec![serde_json::from_value(other).context("invalid button definition")?],
    };
    Ok(buttons)
}
