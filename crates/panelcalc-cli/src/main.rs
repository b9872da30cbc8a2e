//! panelcalc CLI - compute panel assembly models from a formula catalog

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use panelcalc::prelude::*;
use panelcalc::{parse_number, translate, DIALECT_TABLE};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panelcalc")]
#[command(
    author,
    version,
    about = "Formula calculation tool for glass panel assembly models"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the outputs of a model
    Compute {
        /// Catalog file (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Model code
        #[arg(short, long)]
        model: String,

        /// Input value, repeatable
        #[arg(short, long = "input", value_name = "CODE=VALUE", value_parser = parse_input)]
        inputs: Vec<(String, f64)>,

        /// JSON file with an object of input values; --input entries override it
        #[arg(long, value_name = "PATH")]
        inputs_json: Option<PathBuf>,

        /// Check formula references before evaluating
        #[arg(long)]
        validate: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Translate a dialect expression to canonical syntax
    Translate {
        /// Expression in the authoring dialect
        expression: Option<String>,

        /// Print the dialect mapping table instead
        #[arg(long)]
        table: bool,
    },

    /// List the formulas of a model in evaluation order
    Plan {
        /// Catalog file (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Model code
        #[arg(short, long)]
        model: String,
    },

    /// Report unparseable formulas and forward references
    Check {
        /// Catalog file (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Only check this model (default: every model)
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute {
            catalog,
            model,
            inputs,
            inputs_json,
            validate,
            format,
        } => compute(
            &catalog,
            &model,
            inputs,
            inputs_json.as_deref(),
            validate,
            format,
        ),
        Commands::Translate { expression, table } => translate_expression(expression, table),
        Commands::Plan { catalog, model } => show_plan(&catalog, &model),
        Commands::Check { catalog, model } => check_catalog(&catalog, model.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Parse a `CODE=VALUE` argument
fn parse_input(arg: &str) -> std::result::Result<(String, f64), String> {
    let (code, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, got '{}'", arg))?;

    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing variable code in '{}'", arg));
    }

    let value =
        parse_number(value).ok_or_else(|| format!("'{}' is not a number", value.trim()))?;

    Ok((code.to_string(), value))
}

fn load_store(path: &Path) -> Result<InMemoryStore> {
    let catalog = Catalog::from_path(path)
        .with_context(|| format!("Failed to read catalog '{}'", path.display()))?;
    let store = catalog
        .into_store()
        .with_context(|| format!("Invalid catalog '{}'", path.display()))?;
    debug!(
        models = store.models().len(),
        formulas = store.formula_count(),
        "catalog loaded"
    );
    Ok(store)
}

fn read_inputs(inputs_json: Option<&Path>, overrides: Vec<(String, f64)>) -> Result<Inputs> {
    let mut inputs = match inputs_json {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            serde_json::from_str::<Inputs>(&text)
                .with_context(|| format!("'{}' is not an object of numbers", path.display()))?
        }
        None => Inputs::new(),
    };
    inputs.extend(overrides);
    Ok(inputs)
}

fn compute(
    catalog: &Path,
    model: &str,
    overrides: Vec<(String, f64)>,
    inputs_json: Option<&Path>,
    validate: bool,
    format: Format,
) -> Result<()> {
    let store = load_store(catalog)?;
    let inputs = read_inputs(inputs_json, overrides)?;

    let options = CalculationOptions {
        validate_dependencies: validate,
    };
    let calculator = Calculator::with_options(store, options);
    let outputs = calculator
        .compute(model, &inputs)
        .with_context(|| format!("Failed to compute model '{}'", model))?;

    let mut stdout = io::stdout().lock();
    match format {
        Format::Text => {
            for (code, value) in &outputs {
                writeln!(stdout, "{} = {}", code, value)?;
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&outputs)?;
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

fn translate_expression(expression: Option<String>, table: bool) -> Result<()> {
    if table {
        for (dialect, canonical) in DIALECT_TABLE {
            println!("{}\t{}", dialect, canonical);
        }
        return Ok(());
    }

    match expression {
        Some(expression) => {
            println!("{}", translate(&expression));
            Ok(())
        }
        None => bail!("Nothing to translate: pass an expression or --table"),
    }
}

fn show_plan(catalog: &Path, model: &str) -> Result<()> {
    let calculator = Calculator::new(load_store(catalog)?);
    let plan = calculator
        .plan(model)
        .with_context(|| format!("Failed to load formulas for '{}'", model))?;

    if plan.is_empty() {
        eprintln!("Model '{}' has no active formulas", model);
        return Ok(());
    }

    for formula in &plan {
        println!(
            "{}\t{}\t{}\t{}",
            formula.order,
            formula.variable.code,
            formula.variable.kind,
            translate(&formula.expression)
        );
    }

    Ok(())
}

fn check_catalog(catalog: &Path, model: Option<&str>) -> Result<()> {
    let store = load_store(catalog)?;
    let models: Vec<String> = match model {
        Some(code) => vec![code.to_string()],
        None => store.models().iter().map(|m| m.code.clone()).collect(),
    };

    let calculator = Calculator::new(store);
    let mut problem_count = 0;
    for code in &models {
        let problems = calculator
            .check(code)
            .with_context(|| format!("Failed to check model '{}'", code))?;
        for problem in &problems {
            println!("{}\t{}", code, problem);
        }
        problem_count += problems.len();
    }

    if problem_count > 0 {
        bail!(
            "{} problem(s) found in {} model(s)",
            problem_count,
            models.len()
        );
    }

    eprintln!("Checked {} model(s): no problems", models.len());
    Ok(())
}
