mod logging;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rotacheck_core::{
    Category, Error as CoreError, ValidationContext, ValidationEngine, ValidationResult,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use logging::init_logging;
use settings::{build_engine, load_settings, settings_path};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
    #[error("rule error: {0}")]
    Core(#[from] CoreError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Parser, Debug)]
#[command(name = "rotacheck", version, about = "Rotacheck validation CLI")]
struct Cli {
    /// Settings file (defaults to ./rotacheck.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append JSON logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an object, or a single field with --field.
    Validate(ValidateArgs),
    /// List the rules that apply to an entity.
    Rules(RulesArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Entity tag (employee, call, user, ...).
    #[arg(long)]
    entity: String,
    /// JSON file with the object (or field value) to validate.
    #[arg(long)]
    input: PathBuf,
    /// Validate the input as the value of this single field.
    #[arg(long)]
    field: Option<String>,
    /// JSON file with the validation context.
    #[arg(long)]
    context: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RulesArgs {
    /// Entity tag whose rules are listed (wildcard rules included).
    #[arg(long)]
    entity: String,
    /// Only list rules of this category.
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Format,
    Business,
    Security,
    Performance,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Format => Category::Format,
            CategoryArg::Business => Category::Business,
            CategoryArg::Security => Category::Security,
            CategoryArg::Performance => Category::Performance,
        }
    }
}

#[derive(Debug, Serialize)]
struct RuleSummary<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    severity: String,
    category: String,
    fields: &'a [String],
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let config_path = settings_path(cli.config.as_deref());
    let settings = load_settings(config_path.as_deref())?;
    init_logging(cli.log_file.as_deref(), &settings.log_level)?;

    let run_id = Uuid::new_v4();
    let started = Instant::now();
    let config_label = config_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    tracing::info!(event = "run_started", run_id = %run_id, config = %config_label);

    let engine = build_engine(&settings)?;

    let code = match cli.command {
        Command::Validate(args) => {
            let result = run_validate(&engine, args)?;
            print_json(&result)?;
            tracing::info!(
                event = "validation_finished",
                run_id = %run_id,
                is_valid = result.is_valid(),
                errors = result.errors.len(),
                warnings = result.warnings.len(),
                info = result.info.len()
            );
            if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Rules(args) => {
            let rules = match args.category {
                Some(category) => engine.rules_by_category(&args.entity, category.into()),
                None => engine.entity_rules(&args.entity),
            };
            let summaries: Vec<RuleSummary<'_>> = rules
                .into_iter()
                .map(|rule| RuleSummary {
                    id: &rule.id,
                    name: &rule.name,
                    description: &rule.description,
                    severity: rule.severity.to_string(),
                    category: rule.category.to_string(),
                    fields: &rule.fields,
                })
                .collect();
            print_json(&summaries)?;
            ExitCode::SUCCESS
        }
    };

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(event = "run_finished", run_id = %run_id, duration_ms = duration_ms);

    Ok(code)
}

fn run_validate(
    engine: &ValidationEngine,
    args: ValidateArgs,
) -> Result<ValidationResult, CliError> {
    let ValidateArgs {
        entity,
        input,
        field,
        context,
    } = args;

    let value = read_json(&input)?;
    let ctx: Option<ValidationContext> = match context {
        Some(path) => Some(serde_json::from_value(read_json(&path)?)?),
        None => None,
    };

    tracing::info!(
        event = "validation_started",
        entity = %entity,
        field = field.as_deref().unwrap_or("*")
    );

    match (field, value) {
        (Some(field), value) => Ok(engine.validate_field(&entity, &field, &value, ctx.as_ref())),
        (None, Value::Object(object)) => {
            Ok(engine.validate_object(&entity, &object, ctx.as_ref()))
        }
        (None, _) => Err(CliError::InvalidInput(
            "input must be a JSON object unless --field is given".to_string(),
        )),
    }
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
