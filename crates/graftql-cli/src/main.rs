use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use graftql_core::SchemaDocument;
use graftql_parser::{format_document, load_schemas, read_schemas};

#[derive(Parser)]
#[command(name = "graftql")]
#[command(about = "Assemble and validate GraphQL schemas for code generation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate schema sources and report the merged document
    Check {
        /// Schema locators: file paths, URLs, or "-" for stdin
        #[arg(required = true)]
        schemas: Vec<String>,
    },

    /// Print the merged, validated schema as canonical SDL
    Print {
        /// Schema locators: file paths, URLs, or "-" for stdin
        #[arg(required = true)]
        schemas: Vec<String>,
    },

    /// Export the validated schema document as JSON for a code generator
    Export {
        /// Schema locators: file paths, URLs, or "-" for stdin
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { schemas } => handle_check(&schemas),
        Commands::Print { schemas } => handle_print(&schemas),
        Commands::Export { schemas, output } => handle_export(&schemas, output),
    }
}

/// Run the full pipeline over the given locators.
fn load(locators: &[String]) -> Result<SchemaDocument> {
    let inputs = read_schemas(locators)?;
    let doc = load_schemas(&inputs)?;
    Ok(doc)
}

fn handle_check(locators: &[String]) -> Result<()> {
    let doc = load(locators)?;
    let user_types = doc.definitions.iter().filter(|d| !d.built_in).count();
    info!(types = user_types, sources = locators.len(), "schema is valid");
    println!(
        "OK: {} types from {} source(s)",
        user_types,
        locators.len()
    );
    Ok(())
}

fn handle_print(locators: &[String]) -> Result<()> {
    let doc = load(locators)?;
    print!("{}", format_document(&doc));
    Ok(())
}

fn handle_export(locators: &[String], output: Option<PathBuf>) -> Result<()> {
    let doc = load(locators)?;
    let json = serde_json::to_string_pretty(&doc).context("failed to serialize document")?;
    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote schema document");
        }
        None => println!("{}", json),
    }
    Ok(())
}
