//! Command-line interface for the cuprum schema-driven element tools

mod inspect;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuprum_format::from_json_resource;
use cuprum_schema::{DefaultSchemaContext, SchemaLoader};
use cuprum_validator::{ValidationOutcome, Validator, ValidatorConfig};
use cuprum_visit::walk;
use inspect::OutlinePrinter;
use std::path::{Path, PathBuf};

/// Schema-driven FHIR element tools
#[derive(Parser)]
#[command(name = "cuprum")]
#[command(author, version, about = "Validate and inspect resources against a schema set", long_about = None)]
struct Cli {
    /// Directory of type schema JSON files
    #[arg(short, long, global = true, default_value = "schemas")]
    schemas: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate resource JSON files
    Validate {
        /// Resource files to validate
        files: Vec<PathBuf>,
        /// Stop each run at the first failing element
        #[arg(long)]
        fail_fast: bool,
        /// Cap on reported issues per resource
        #[arg(long, default_value_t = 1000)]
        max_issues: usize,
        /// Skip reference target checking
        #[arg(long)]
        no_references: bool,
        /// Emit OperationOutcome JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print an outline of a resource's element tree
    Inspect {
        /// Resource file to inspect
        file: PathBuf,
        /// Maximum tree depth to descend
        #[arg(short, long)]
        depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let context = load_context(&cli.schemas)?;

    match cli.command {
        Commands::Validate {
            files,
            fail_fast,
            max_issues,
            no_references,
            json,
        } => {
            let config = ValidatorConfig::new()
                .fail_fast(fail_fast)
                .max_issues(max_issues)
                .check_references(!no_references);
            let validator = Validator::from_config(&config, context)?;

            let mut failures = 0usize;
            for file in &files {
                if !run_validate(&validator, file, json)? {
                    failures += 1;
                }
            }
            if failures > 0 {
                tracing::warn!(failures, total = files.len(), "validation failures");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Inspect { file, depth } => {
            let resource = read_resource(&file, &context)?;
            let mut printer = OutlinePrinter::new(depth);
            walk(resource.type_name(), &resource, &mut printer);
            print!("{}", printer.into_string());
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_context(dir: &Path) -> Result<DefaultSchemaContext> {
    SchemaLoader::new()
        .load_dir(dir)
        .with_context(|| format!("loading schemas from {}", dir.display()))
}

fn read_resource(
    file: &Path,
    context: &DefaultSchemaContext,
) -> Result<cuprum_model::Element> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", file.display()))?;
    from_json_resource(&value, context)
        .with_context(|| format!("interpreting {}", file.display()))
}

/// Validate one file; returns whether it passed
fn run_validate(
    validator: &Validator<DefaultSchemaContext>,
    file: &Path,
    json: bool,
) -> Result<bool> {
    let resource = match read_resource(file, validator.context().as_ref()) {
        Ok(resource) => resource,
        Err(err) => {
            println!("{}: unreadable: {:#}", file.display(), err);
            return Ok(false);
        }
    };

    let outcome = validator.validate(&resource);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome.to_operation_outcome())?
        );
    } else {
        print_text_outcome(file, &outcome);
    }
    Ok(outcome.valid)
}

fn print_text_outcome(file: &Path, outcome: &ValidationOutcome) {
    if outcome.valid && outcome.issues.is_empty() {
        println!("{}: ok", file.display());
        return;
    }

    println!(
        "{}: {} error(s), {} warning(s)",
        file.display(),
        outcome.error_count(),
        outcome.warning_count()
    );
    for issue in &outcome.issues {
        let location = issue.location.as_deref().unwrap_or("-");
        println!(
            "  {} [{}] {}: {}",
            issue.severity.to_string().to_lowercase(),
            issue.code,
            location,
            issue.diagnostics
        );
    }
}
