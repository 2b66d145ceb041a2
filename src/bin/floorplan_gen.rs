//! Demo CLI: reads a `Brief` as JSON from a file or stdin, runs the
//! pipeline, and prints the resulting `LayoutResponse` as JSON. Grounded
//! on the clap + anyhow CLI pattern used by the retrieval pack's tooling
//! binaries; this is demonstration plumbing, not an HTTP surface.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use floorplan_core::brief::Brief;
use floorplan_core::logging::init_tracing_default;
use floorplan_core::Pipeline;

#[derive(Parser, Debug)]
#[command(name = "floorplan-gen", about = "Generate a floor plan from a brief")]
struct Args {
    /// Path to a JSON-encoded brief. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the JSON response.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    init_tracing_default();
    let args = Args::parse();

    let raw = match args.input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading brief from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading brief from stdin")?;
            buf
        }
    };

    let brief: Brief = serde_json::from_str(&raw).context("parsing brief JSON")?;
    let pipeline = Pipeline::default();
    let response = pipeline
        .generate(brief)
        .map_err(|e| anyhow::anyhow!("brief normalization failed: {e}"))?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}
