//! Lay out a saved DAG snapshot
//!
//! Reads a snapshot (JSON, from a file or `-` for stdin), runs auto-layout,
//! prints the graph status to stderr and the laid-out snapshot to stdout.

use anyhow::{Context, Result};
use cim_domain_dag::{DagConfig, DagEditor, DagSnapshot, LayoutDirection};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dag-layout")]
#[command(about = "Auto-layout a DAG snapshot and report its status")]
#[command(version)]
struct Cli {
    /// Snapshot JSON file, or `-` to read stdin
    input: String,

    /// Flow direction (TB or LR); defaults to the config's direction
    #[arg(short, long)]
    direction: Option<LayoutDirection>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read snapshot from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DagConfig::from_file(path)?,
        None => DagConfig::default(),
    };
    let direction = cli.direction.unwrap_or(config.layout.direction);

    let snapshot: DagSnapshot =
        serde_json::from_str(&read_input(&cli.input)?).context("invalid snapshot JSON")?;
    let mut editor = DagEditor::from_snapshot(&snapshot, config)?;

    editor.auto_layout(direction);
    eprintln!("{}", editor.status());
    println!("{}", serde_json::to_string_pretty(&editor.snapshot())?);

    Ok(())
}
