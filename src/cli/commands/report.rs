//! Report command handler
//!
//! Resolves the connection, loads the trips once, then runs every report the
//! scope asks for. Failed reports are counted and the run goes on.

use crate::args::Scope;
use crate::commands::stats;
use greenmove_analytics::config::Config;
use greenmove_analytics::core::intensity::IntensityThresholds;
use greenmove_analytics::core::loader::{load_trip_table, ConnectionParams, PostgresSource};
use greenmove_analytics::core::metrics::Aggregates;
use greenmove_analytics::core::models::TripTable;
use greenmove_analytics::core::report::{
    generate_report, resolve_output_path, OutputFormat, RenderConfig, ReportContext, ReportFormat,
    ReportKind, ReportOutcome,
};
use greenmove_analytics::core::users::most_active_users;
use greenmove_analytics::{GreenmoveError, Result};
use logger::{debug, failure, progress, success, warn};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Options shared by every report of a run
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Requested document formats
    pub format: OutputFormat,
    /// Explicit output file, or directory for multi-user runs
    pub output: Option<PathBuf>,
}

/// One artifact to produce
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    kind: ReportKind,
    format: ReportFormat,
}

/// Run a report scope and return the process exit code
///
/// # Errors
/// Returns configuration, connection and query errors; those abort the run.
pub fn run(scope: &Scope, options: &ReportOptions, config: &Config) -> Result<i32> {
    let thresholds = config.thresholds().map_err(GreenmoveError::Config)?;
    let params = resolve_connection(config)?;

    progress!("Loading trips from {params}...");
    let table = load_trip_table(&PostgresSource::new(params))?;
    if table.is_empty() {
        warn!("The trip query returned no rows");
    }
    success!("{} trips loaded", table.len());

    let aggregates = Aggregates::compute(&table);
    if *scope == Scope::Stats {
        stats::print(&aggregates);
        return Ok(0);
    }

    let render = RenderConfig::default();
    let ctx = ReportContext::new(&table, &aggregates, &thresholds, &render);
    let jobs = plan_jobs(scope, options.format, &table, config.analysis.top_users);
    let dir = output_dir(scope, options, config);
    let explicit = if is_batch(scope) {
        None
    } else {
        options.output.as_deref()
    };

    let failures = run_jobs(&ctx, &jobs, explicit, &dir);
    if failures > 0 {
        failure!("{failures} of {} report(s) failed", jobs.len());
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Generate every job, logging each outcome; returns the number of failures
fn run_jobs(ctx: &ReportContext, jobs: &[Job], explicit: Option<&Path>, dir: &Path) -> usize {
    let mut failures = 0;
    for (i, job) in jobs.iter().enumerate() {
        let path = resolve_output_path(explicit, dir, &job.kind, job.format);
        progress!(
            "[{}/{}] Generating {} ({}): {}",
            i + 1,
            jobs.len(),
            job.kind,
            job.format,
            path.display()
        );
        match generate_report(ctx, &job.kind, job.format, &path) {
            Ok(ReportOutcome::Written(path)) => success!("Report generated: {}", path.display()),
            Ok(ReportOutcome::Skipped { reason }) => warn!("Skipped {}: {reason}", job.kind),
            Err(e) => {
                failure!("{} ({}): {e}", job.kind, job.format);
                failures += 1;
            }
        }
    }
    failures
}

/// Reports to produce for `scope`, in generation order
fn plan_jobs(scope: &Scope, format: OutputFormat, table: &TripTable, top_users: usize) -> Vec<Job> {
    let per_format = |kind: ReportKind| {
        format
            .formats()
            .into_iter()
            .map(move |format| Job {
                kind: kind.clone(),
                format,
            })
            .collect::<Vec<_>>()
    };
    let users = |n: usize| {
        most_active_users(table, n)
            .into_iter()
            .flat_map(|user| per_format(ReportKind::User(user)))
            .collect::<Vec<_>>()
    };
    let narrative = Job {
        kind: ReportKind::Narrative,
        format: ReportFormat::Text,
    };

    match scope {
        Scope::Global => per_format(ReportKind::Global),
        Scope::Analyse => per_format(ReportKind::Strategic),
        Scope::Text => vec![narrative],
        Scope::User(user) => per_format(ReportKind::User(user.clone())),
        Scope::Users(n) => users(*n),
        Scope::All => {
            let mut jobs = per_format(ReportKind::Global);
            jobs.extend(per_format(ReportKind::Strategic));
            jobs.push(narrative);
            jobs.extend(users(top_users));
            jobs
        }
        Scope::Stats => Vec::new(),
    }
}

/// Whether the scope writes several reports of the same format
const fn is_batch(scope: &Scope) -> bool {
    matches!(scope, Scope::All | Scope::Users(_))
}

/// Directory for default file names; `-o` names it in batch runs
fn output_dir(scope: &Scope, options: &ReportOptions, config: &Config) -> PathBuf {
    match &options.output {
        Some(dir) if is_batch(scope) => dir.clone(),
        _ => PathBuf::from(&config.paths.reports_dir),
    }
}

/// Connection parameters from the config, prompting for missing ones on a terminal
fn resolve_connection(config: &Config) -> Result<ConnectionParams> {
    match config.connection_params() {
        Ok(params) => Ok(params),
        Err(missing) if std::io::stdin().is_terminal() => {
            debug!("Prompting for {}", missing.join(", "));
            let mut filled = config.clone();
            for key in &missing {
                prompt_value(&mut filled, key)?;
            }
            filled.connection_params().map_err(missing_params)
        }
        Err(missing) => Err(missing_params(missing)),
    }
}

fn missing_params(missing: Vec<&'static str>) -> GreenmoveError {
    GreenmoveError::Config(format!(
        "Missing connection parameters: {} (use --host, --db, --user, --password or `greenmove config set`)",
        missing.join(", ")
    ))
}

fn prompt_value(config: &mut Config, key: &str) -> Result<()> {
    let db = &mut config.database;
    match key {
        "password" => {
            db.password = dialoguer::Password::new()
                .with_prompt("PostgreSQL password")
                .interact()
                .map_err(prompt_error)?;
        }
        "host" => db.host = ask("PostgreSQL host")?,
        "database" => db.name = ask("Database name")?,
        "user" => db.user = ask("Database user")?,
        _ => {}
    }
    Ok(())
}

fn ask(prompt: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_error)
}

fn prompt_error(e: dialoguer::Error) -> GreenmoveError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            GreenmoveError::Interrupted
        }
        other => GreenmoveError::Config(format!("Prompt failed: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use greenmove_analytics::core::models::TripRecord;

    fn table() -> TripTable {
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let trip = |user: &str, hour: u32| {
            TripRecord::new(user, day.and_hms_opt(hour, 0, 0).unwrap(), "bus", Some(4.0), Some(15.0), Some(300.0))
        };
        TripTable::from_records(vec![trip("a", 7), trip("b", 8), trip("b", 9), trip("c", 10)])
    }

    #[test]
    fn test_single_scope_jobs() {
        let jobs = plan_jobs(&Scope::Global, OutputFormat::Both, &table(), 5);
        assert_eq!(
            jobs,
            vec![
                Job { kind: ReportKind::Global, format: ReportFormat::Pdf },
                Job { kind: ReportKind::Global, format: ReportFormat::Html },
            ]
        );

        let jobs = plan_jobs(&Scope::Text, OutputFormat::Html, &table(), 5);
        assert_eq!(jobs, vec![Job { kind: ReportKind::Narrative, format: ReportFormat::Text }]);
    }

    #[test]
    fn test_users_scope_follows_activity() {
        let jobs = plan_jobs(&Scope::Users(2), OutputFormat::Pdf, &table(), 5);
        let kinds: Vec<ReportKind> = jobs.into_iter().map(|j| j.kind).collect();
        assert_eq!(kinds, vec![ReportKind::User("b".into()), ReportKind::User("a".into())]);
    }

    #[test]
    fn test_all_scope_order() {
        let jobs = plan_jobs(&Scope::All, OutputFormat::Pdf, &table(), 1);
        let kinds: Vec<ReportKind> = jobs.into_iter().map(|j| j.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReportKind::Global,
                ReportKind::Strategic,
                ReportKind::Narrative,
                ReportKind::User("b".into()),
            ]
        );
    }

    #[test]
    fn test_output_is_a_directory_in_batches() {
        let config = Config::from_defaults();
        let options = ReportOptions {
            format: OutputFormat::Pdf,
            output: Some(PathBuf::from("out")),
        };
        assert_eq!(output_dir(&Scope::Users(3), &options, &config), PathBuf::from("out"));
        assert_eq!(
            output_dir(&Scope::Global, &options, &config),
            PathBuf::from(&config.paths.reports_dir)
        );
    }

    #[test]
    fn test_failed_report_does_not_stop_the_batch() {
        let table = table();
        let aggregates = Aggregates::compute(&table);
        let thresholds = IntensityThresholds::default();
        let render = RenderConfig::default();
        let ctx = ReportContext::new(&table, &aggregates, &thresholds, &render);

        let dir = tempfile::tempdir().unwrap();
        // A directory where the first report's file should go makes that write fail
        std::fs::create_dir(dir.path().join("greenmove_user_b.pdf")).unwrap();

        let jobs = plan_jobs(&Scope::Users(2), OutputFormat::Pdf, &table, 5);
        let failures = run_jobs(&ctx, &jobs, None, dir.path());

        assert_eq!(failures, 1);
        let later = std::fs::read(dir.path().join("greenmove_user_a.pdf")).unwrap();
        assert!(later.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_params_names_keys() {
        let err = missing_params(vec!["host", "password"]);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("host, password"));
    }
}
