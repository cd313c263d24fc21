mod registry;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use seqgen_core::{Alphabet, ConflictPolicy, DomainKind, Error as CoreError, RuleKind, Scope};
use seqgen_generate::{
    CancellationToken, GenerateOptions, GenerationEngine, GenerationError, GenerationResult,
    request_from_plan, validate_expressions,
};
use seqgen_plan::{
    CustomRule, GenerationPlan, PlanDomain, PlanError, ValidationReport, load_plan,
    plan_json_schema, validate_plan,
};
use registry::{
    CustomSummary, RequestSummary, RunContext, RunPaths, discard_run, init_console_logging,
    init_run_logging, latest_run, load_results, start_run, write_report, write_results,
};
use settings::{SETTINGS_FILE, Settings, SettingsError, init_settings, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

#[derive(Parser, Debug)]
#[command(name = "seqgen", version, about = "Constrained sequence generator")]
struct Cli {
    /// Settings file.
    #[arg(long, global = true, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate every sequence satisfying the selected rules.
    Generate(GenerateArgs),
    /// Print the k-th result (1-based) of a previous run.
    Nth(NthArgs),
    /// List the built-in rules.
    Rules,
    /// Validate a plan file.
    Validate(ValidateArgs),
    /// Print the plan JSON Schema.
    Schema,
    /// Write a settings file with the default values.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Plan file (.json or .toml) describing the request.
    #[arg(long, conflicts_with_all = ["alphabet", "numeric", "length", "rules", "custom"])]
    plan: Option<PathBuf>,
    /// Comma separated symbols, tried in the listed order.
    #[arg(long, value_name = "SYMBOLS", conflicts_with = "numeric")]
    alphabet: Option<String>,
    /// Use the digits 0-9 without a leading zero.
    #[arg(long, default_value_t = false)]
    numeric: bool,
    /// Length of every generated sequence.
    #[arg(long, short = 'n')]
    length: Option<u32>,
    /// Built-in rule id or alias; repeat to combine.
    #[arg(long = "rule", value_name = "NAME")]
    rules: Vec<String>,
    /// Custom condition, e.g. `first_below_last@final=num(first) < num(candidate)`.
    #[arg(long = "custom", value_name = "NAME[@SCOPE]=EXPR")]
    custom: Vec<String>,
    /// Drop the increasing rule of a conflicting pair instead of failing.
    #[arg(long, default_value_t = false)]
    prefer_decreasing: bool,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Number of sequences to print.
    #[arg(long)]
    preview: Option<usize>,
    #[arg(long)]
    max_search_space: Option<u64>,
    #[arg(long)]
    max_evaluations: Option<u64>,
    #[arg(long)]
    max_duration_ms: Option<u64>,
    /// Disable every search limit.
    #[arg(long, default_value_t = false)]
    unbounded: bool,
}

#[derive(Args, Debug)]
struct NthArgs {
    /// 1-based index into the results.
    index: usize,
    /// Run directory to read; defaults to the latest run.
    #[arg(long)]
    run: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Plan file (.json or .toml).
    plan: PathBuf,
}

#[derive(Args, Debug)]
struct InitConfigArgs {
    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args, &load_settings(&cli.config)?),
        Command::Nth(args) => run_nth(args, &load_settings(&cli.config)?),
        Command::Rules => {
            print_rules();
            Ok(())
        }
        Command::Validate(args) => run_validate(&args.plan, &load_settings(&cli.config)?),
        Command::Schema => {
            let schema = plan_json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::InitConfig(args) => {
            init_settings(&cli.config, args.force)?;
            println!("wrote {}", cli.config.display());
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs, settings: &Settings) -> Result<(), CliError> {
    let plan = plan_from_args(&args, settings)?;
    let options = options_from_args(&args, settings);
    let preview_limit = args.preview.unwrap_or(settings.preview_limit);

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir.unwrap_or_else(|| settings.run_dir.clone()),
        request: summarize(&plan, args.plan.as_deref()),
        options: options.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    let timer = Instant::now();
    let outcome = init_run_logging(&run_paths.logs_path, &settings.log_level)
        .map_err(CliError::from)
        .and_then(|()| {
            tracing::info!(event = "run_started", run_id = %run_id, length = plan.length);
            generate_into(&run_paths, &plan, options)
        });
    let result = keep_or_discard(&run_paths, outcome)?;

    let preview = result.preview(preview_limit);
    println!("run: {}", run_paths.root.display());
    println!(
        "results: {}  rejected: {}  evaluated: {}",
        result.len(),
        result.rejected,
        result.report.evaluated
    );
    if !result.report.dropped_rules.is_empty() {
        println!("dropped rules: {}", result.report.dropped_rules.join(", "));
    }
    for sequence in preview.shown {
        println!("{sequence}");
    }
    if preview.hidden > 0 {
        println!(
            "... {} more; use `seqgen nth <k>` to read any result",
            preview.hidden
        );
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

/// Run the engine for `plan` and write its results into `paths`.
fn generate_into(
    paths: &RunPaths,
    plan: &GenerationPlan,
    options: GenerateOptions,
) -> Result<GenerationResult, CliError> {
    let request = request_from_plan(plan)?;
    let result = GenerationEngine::new(options).run(&request, &CancellationToken::new())?;

    write_results(paths, &result)?;
    tracing::info!(event = "results_written", path = %paths.results_path.display());
    write_report(paths, &result.report)?;
    tracing::info!(event = "report_written", path = %paths.report_path.display());
    Ok(result)
}

/// Remove the run directory when `outcome` failed; `nth` only reads
/// finished runs.
fn keep_or_discard<T>(paths: &RunPaths, outcome: Result<T, CliError>) -> Result<T, CliError> {
    if let Err(err) = &outcome {
        tracing::info!(event = "run_finished", status = "failed", error = %err);
        if let Err(discard_err) = discard_run(paths) {
            tracing::warn!(
                run = %paths.root.display(),
                error = %discard_err,
                "failed to remove run directory"
            );
        }
    }
    outcome
}

fn run_nth(args: NthArgs, settings: &Settings) -> Result<(), CliError> {
    init_console_logging(&settings.log_level)?;

    let run = match args.run {
        Some(run) => run,
        None => latest_run(args.run_dir.as_deref().unwrap_or(&settings.run_dir))?,
    };
    let result = load_results(&run)?;
    let sequence = result.nth(args.index)?;
    tracing::debug!(run = %run.display(), index = args.index, "read result");
    println!("{sequence}");
    Ok(())
}

fn run_validate(path: &Path, settings: &Settings) -> Result<(), CliError> {
    init_console_logging(&settings.log_level)?;

    let report = check_plan(path)?;
    if report.is_ok() {
        let output = serde_json::json!({
            "valid": true,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
        Err(CliError::InvalidPlan(report.summary()))
    }
}

/// Every check `generate` would make before searching: schema, semantics
/// and custom expression compilation.
fn check_plan(path: &Path) -> Result<ValidationReport, CliError> {
    let plan_json = if path.extension().is_some_and(|ext| ext == "json") {
        let content = std::fs::read_to_string(path).map_err(PlanError::from)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::to_value(load_plan(path)?)?
    };
    let schema = serde_json::to_value(plan_json_schema())?;

    let (mut report, plan) = match validate_plan(&plan_json, &schema) {
        Ok(validated) => (
            ValidationReport {
                errors: Vec::new(),
                warnings: validated.warnings,
            },
            Some(validated.plan),
        ),
        Err(report) => (report, serde_json::from_value::<GenerationPlan>(plan_json).ok()),
    };
    if let Some(plan) = plan {
        report.merge(validate_expressions(&plan));
    }
    Ok(report)
}

fn print_rules() {
    for rule in RuleKind::ALL {
        println!(
            "{:<24} {:<36} {}",
            rule.id(),
            rule_names(rule).join(", "),
            rule.description()
        );
    }
}

/// Aliases of `rule`, with the domain noted for domain specific ones.
fn rule_names(rule: RuleKind) -> Vec<String> {
    let mut names = rule
        .aliases()
        .iter()
        .map(|alias| alias.to_string())
        .collect::<Vec<_>>();
    for domain in [DomainKind::Characters, DomainKind::Numeric] {
        if let Some(alias) = rule.domain_alias(domain) {
            names.push(format!("{alias} ({})", domain.label()));
        }
    }
    names
}

fn plan_from_args(args: &GenerateArgs, settings: &Settings) -> Result<GenerationPlan, CliError> {
    let mut plan = match &args.plan {
        Some(path) => load_plan(path)?,
        None => {
            let domain = match (&args.alphabet, args.numeric) {
                (Some(symbols), false) => PlanDomain::Characters {
                    alphabet: Alphabet::parse_list(symbols)?
                        .symbols()
                        .iter()
                        .map(|symbol| symbol.as_str().to_string())
                        .collect(),
                },
                (None, true) => PlanDomain::Numeric,
                _ => {
                    return Err(CliError::InvalidArgs(
                        "use --plan, --alphabet or --numeric".to_string(),
                    ));
                }
            };
            let length = args
                .length
                .ok_or_else(|| CliError::InvalidArgs("--length is required".to_string()))?;

            let mut plan = GenerationPlan::new(domain, length);
            plan.rules = args.rules.clone();
            plan.custom = args
                .custom
                .iter()
                .map(|spec| parse_custom(spec))
                .collect::<Result<Vec<_>, _>>()?;
            plan.conflict_policy = settings.conflict_policy;
            plan
        }
    };

    if args.prefer_decreasing {
        plan.conflict_policy = ConflictPolicy::PreferDecreasing;
    }
    Ok(plan)
}

fn options_from_args(args: &GenerateArgs, settings: &Settings) -> GenerateOptions {
    if args.unbounded {
        return GenerateOptions::unbounded();
    }
    let mut options = GenerateOptions::from(&settings.limits);
    if let Some(limit) = args.max_search_space {
        options.max_search_space = Some(limit);
    }
    if let Some(limit) = args.max_evaluations {
        options.max_evaluations = Some(limit);
    }
    if let Some(limit) = args.max_duration_ms {
        options.max_duration_ms = Some(limit);
    }
    options
}

/// Parse `NAME[@SCOPE]=EXPR`, where SCOPE is `every`, `first`, `final` or a
/// comma separated list of 0-based positions.
fn parse_custom(spec: &str) -> Result<CustomRule, CliError> {
    let (head, expr) = spec.split_once('=').ok_or_else(|| {
        CliError::InvalidArgs(format!("custom rule '{spec}' must look like NAME=EXPR"))
    })?;
    let (name, scope) = match head.split_once('@') {
        Some((name, scope)) => (name, parse_scope(scope)?),
        None => (head, Scope::Every),
    };

    Ok(CustomRule {
        name: name.trim().to_string(),
        expr: expr.trim().to_string(),
        scope,
    })
}

fn parse_scope(value: &str) -> Result<Scope, CliError> {
    match value.trim() {
        "every" => Ok(Scope::Every),
        "first" => Ok(Scope::First),
        "final" => Ok(Scope::Final),
        positions => positions
            .split(',')
            .map(|position| position.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(Scope::Positions)
            .map_err(|_| CliError::InvalidArgs(format!("invalid scope '{positions}'"))),
    }
}

fn summarize(plan: &GenerationPlan, source: Option<&Path>) -> RequestSummary {
    let (domain, alphabet) = match &plan.domain {
        PlanDomain::Characters { alphabet } => ("characters", Some(alphabet.clone())),
        PlanDomain::Numeric => ("numeric", None),
    };
    RequestSummary {
        domain: domain.to_string(),
        alphabet,
        length: plan.length as usize,
        rules: plan.rules.clone(),
        custom: plan
            .custom
            .iter()
            .map(|rule| CustomSummary {
                name: rule.name.clone(),
                expr: rule.expr.clone(),
                scope: rule.scope.clone(),
            })
            .collect(),
        conflict_policy: plan.conflict_policy,
        plan: source.map(Path::to_path_buf),
    }
}
