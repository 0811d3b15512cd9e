use clap::{Parser, Subcommand};
use flowdoc::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Inspect and upgrade workflow documents
#[derive(Parser, Debug)]
#[command(name = "flowdoc-cli", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect a document's generation and report every validation issue
    Validate {
        /// Path to the document
        file: PathBuf,
    },
    /// Rewrite a full or legacy document as a current-generation document
    Upgrade {
        /// Path to the document
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the bounding box of a document's top-level nodes
    Bbox {
        /// Path to the document
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowdoc=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Upgrade { file, output } => run_upgrade(&file, output.as_deref()),
        Commands::Bbox { file } => run_bbox(&file),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("\nError: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Reads a document and runs the format cascade, rejecting anything that fails it.
fn detect(path: &Path) -> std::result::Result<Detected, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let detected = validate_text(&text).map_err(|e| ValidationReport::from_error(&e).to_string())?;
    match detected {
        Detected::Invalid(rejection) => {
            let error: ImportError = rejection.into();
            Err(ValidationReport::from_error(&error).to_string())
        }
        valid => Ok(valid),
    }
}

fn run_validate(path: &Path) -> std::result::Result<(), String> {
    let detected = detect(path)?;
    println!("{}: {}", path.display(), detected.summary());
    Ok(())
}

fn run_upgrade(path: &Path, output: Option<&Path>) -> std::result::Result<(), String> {
    let document = match detect(path)? {
        Detected::Full(document) | Detected::Legacy(document) => document,
        Detected::Partial(_) | Detected::Invalid(_) => {
            return Err("Only full and legacy documents can be upgraded".to_string());
        }
    };
    let text = document
        .to_json_pretty()
        .map_err(|e| format!("Failed to serialize document: {}", e))?;

    match output {
        Some(out) => {
            fs::write(out, text).map_err(|e| format!("Failed to write '{}': {}", out.display(), e))?;
            println!("Wrote {} ({} node(s))", out.display(), document.nodes.len());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run_bbox(path: &Path) -> std::result::Result<(), String> {
    let detected = detect(path)?;
    let bbox = compute_bounding_box(detected.nodes());
    let text = serde_json::to_string_pretty(&bbox)
        .map_err(|e| format!("Failed to serialize bounding box: {}", e))?;
    println!("{}", text);
    Ok(())
}
