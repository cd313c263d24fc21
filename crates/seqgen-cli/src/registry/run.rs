use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use seqgen_core::{ConflictPolicy, Scope};
use seqgen_generate::{GenerateOptions, GenerationReport, GenerationResult};

use super::{RegistryError, RegistryResult};

const RESULTS_FILE: &str = "results.json";

/// Serializable description of what a run was asked to generate.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<Vec<String>>,
    pub length: usize,
    pub rules: Vec<String>,
    pub custom: Vec<CustomSummary>,
    pub conflict_policy: ConflictPolicy,
    /// Plan file the request was read from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomSummary {
    pub name: String,
    pub expr: String,
    pub scope: Scope,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub request: RequestSummary,
    pub options: GenerateOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub request: RequestSummary,
    pub options: GenerateOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub results_path: PathBuf,
    pub report_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%S%.3fZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");
    let results_path = root.join(RESULTS_FILE);
    let report_path = root.join("report.json");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        request: ctx.request.clone(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        root,
        logs_path,
        results_path,
        report_path,
    })
}

pub fn write_results(paths: &RunPaths, result: &GenerationResult) -> RegistryResult<()> {
    write_json(&paths.results_path, result)
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

/// Remove the directory of a run that failed before writing its results.
///
/// A directory that is already gone counts as removed.
pub fn discard_run(paths: &RunPaths) -> RegistryResult<()> {
    match std::fs::remove_dir_all(&paths.root) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Most recent run under `run_dir` that finished writing its results.
///
/// Run directory names start with a sortable UTC timestamp.
pub fn latest_run(run_dir: &Path) -> RegistryResult<PathBuf> {
    let entries = match std::fs::read_dir(run_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(RegistryError::NoResults(run_dir.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry?.path();
        let is_run = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains("__run_"));
        if !is_run || !path.join(RESULTS_FILE).is_file() {
            continue;
        }
        if latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    latest.ok_or_else(|| RegistryError::NoResults(run_dir.to_path_buf()))
}

pub fn load_results(run: &Path) -> RegistryResult<GenerationResult> {
    let path = run.join(RESULTS_FILE);
    if !path.is_file() {
        return Err(RegistryError::NoResults(run.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
