//! API Traits CLI
//!
//! Command-line interface for elaborating and checking trait documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use api_traits::{
    elaborate, load_document, ConflictPolicy, ElaborateOptions, Elaboration, SchemaGraph,
    Severity,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "api-traits")]
#[command(about = "Compose and check API operation traits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Elaborate a document and report diagnostics
    Check {
        /// Trait document to check
        document: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors
        #[arg(long, short)]
        quiet: bool,

        /// Replace conflicting trait properties instead of reporting them
        #[arg(long)]
        last_write_wins: bool,
    },

    /// Elaborate a document and print the composed models
    Compose {
        /// Trait document to compose
        document: PathBuf,

        /// Only print this model
        #[arg(long)]
        model: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Replace conflicting trait properties instead of reporting them
        #[arg(long)]
        last_write_wins: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            document,
            format,
            strict,
            quiet,
            last_write_wins,
        } => run_check(&document, &format, strict, quiet, last_write_wins),

        Commands::Compose {
            document,
            model,
            output,
            pretty,
            last_write_wins,
        } => run_compose(&document, model.as_deref(), output, pretty, last_write_wins),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load_and_elaborate(document: &Path, last_write_wins: bool) -> Result<Elaboration, u8> {
    let doc = load_document(document).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let policy = if last_write_wins {
        ConflictPolicy::LastWriteWins
    } else {
        ConflictPolicy::Report
    };
    let options = ElaborateOptions::new().on_conflict(policy);

    elaborate(&doc, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_check(
    document: &Path,
    format: &str,
    strict: bool,
    quiet: bool,
    last_write_wins: bool,
) -> Result<(), u8> {
    let Elaboration { diagnostics, .. } = load_and_elaborate(document, last_write_wins)?;
    let passed = diagnostics.is_ok() && (!strict || diagnostics.warnings() == 0);

    if format == "json" {
        let output = serde_json::json!({
            "document": document,
            "passed": passed,
            "errors": diagnostics.errors(),
            "warnings": diagnostics.warnings(),
            "diagnostics": diagnostics,
        });
        let json = serde_json::to_string_pretty(&output).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json);
    } else {
        if !quiet {
            println!("Checking {} ...\n", document.display());
        }

        for diag in &diagnostics {
            let color = match diag.severity {
                Severity::Error => "\x1b[31m",
                Severity::Warning => "\x1b[33m",
            };
            if !quiet || diag.severity == Severity::Error {
                println!(
                    "  {}{}[{}]\x1b[0m: {} - {}",
                    color,
                    diag.severity.as_str(),
                    diag.code,
                    diag.target,
                    diag.message
                );
            }
        }

        println!();
        if passed {
            println!("\x1b[32m✓ no errors\x1b[0m");
        } else {
            println!(
                "\x1b[31m✗ {} errors, {} warnings\x1b[0m",
                diagnostics.errors(),
                diagnostics.warnings()
            );
        }
    }

    if passed {
        Ok(())
    } else {
        Err(1)
    }
}

fn run_compose(
    document: &Path,
    model: Option<&str>,
    output: Option<PathBuf>,
    pretty: bool,
    last_write_wins: bool,
) -> Result<(), u8> {
    let Elaboration { graph, diagnostics } = load_and_elaborate(document, last_write_wins)?;

    for diag in diagnostics.iter().filter(|d| d.severity == Severity::Error) {
        eprintln!("{}[{}]: {} - {}", diag.severity.as_str(), diag.code, diag.target, diag.message);
    }

    let value = match model {
        Some(name) => {
            let Some(found) = graph.model(name) else {
                eprintln!("Error: unknown model '{}'", name);
                return Err(2);
            };
            serde_json::to_value(found)
        }
        None => serde_json::to_value(graph.models().collect::<Vec<_>>()),
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    if diagnostics.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}
