//! Command-line front end for the study log.
//!
//! # Responsibility
//! - Build a record store from flags/environment and hand it to the
//!   view-model.
//! - Drive the view-model like a screen would: mount, load, act, render.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use studylog_core::config::{DEFAULT_DB_FILE_NAME, DEFAULT_REMOTE_TABLE};
use studylog_core::{
    default_log_level, init_logging, Record, RecordId, RecordListViewModel, RecordStore,
    RestConfig, StoreConfig, ViewModelError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "studylog: track study time per topic", long_about = None)]
struct Cli {
    /// SQLite database file used when no remote store is configured.
    #[arg(long, global = true, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Hosted backend URL; selects the remote table store.
    #[arg(long, global = true, env = "STUDYLOG_REMOTE_URL")]
    remote_url: Option<String>,

    /// API key for the hosted backend.
    #[arg(long, global = true, env = "STUDYLOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Remote table name.
    #[arg(long, global = true, env = "STUDYLOG_TABLE", default_value = DEFAULT_REMOTE_TABLE)]
    table: String,

    /// Write rolling logs into this absolute directory.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error); only applies with `--log-dir`.
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show all records and the total.
    List,
    /// Add a record.
    Add {
        title: String,
        /// Hours spent; must be a non-negative number.
        #[arg(allow_hyphen_values = true)]
        hours: String,
    },
    /// Delete a record by id.
    Remove { id: RecordId },
    /// Show the total hours only.
    Total,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Total => "total",
        }
    }
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        match &self.remote_url {
            Some(base_url) => StoreConfig::Rest(RestConfig {
                base_url: base_url.clone(),
                api_key: self.api_key.clone().unwrap_or_default(),
                table: self.table.clone(),
            }),
            None => StoreConfig::Sqlite {
                path: self.db.clone(),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let store = cli.store_config().open_store()?;
    let mut view = RecordListViewModel::new(store);
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    run(&mut view, &cli.command, cli.json, &mut std::io::stdout().lock())?;

    if let Some(warning) = stale_warning(&view) {
        eprintln!("{warning}");
    }
    Ok(())
}

/// Mounts the view-model and runs one command against it.
///
/// `list` and `total` fail when the initial load fails; `add` and `remove`
/// still reach the store and leave the load failure to [`stale_warning`].
fn run<S: RecordStore>(
    view: &mut RecordListViewModel<S>,
    command: &Commands,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let loaded = view.load();

    match command {
        Commands::List => {
            loaded.map_err(|err| inline_error(view, err))?;
            render_list(view, json, out)
        }
        Commands::Total => {
            loaded.map_err(|err| inline_error(view, err))?;
            render_total(view, json, out)
        }
        Commands::Add { title, hours } => {
            view.set_title(title.as_str());
            view.set_hours_input(hours);
            view.submit().map_err(|err| inline_error(view, err))?;
            render_list(view, json, out)
        }
        Commands::Remove { id } => {
            view.remove(*id).map_err(|err| inline_error(view, err))?;
            render_list(view, json, out)
        }
    }
}

/// Warning line for a list that could not be refreshed.
fn stale_warning<S: RecordStore>(view: &RecordListViewModel<S>) -> Option<String> {
    let load_error = view.load_error()?;
    Some(match view.error_message() {
        Some(message) => format!("warning: {message}; list may be stale: {load_error}"),
        None => format!("warning: list may be stale: {load_error}"),
    })
}

/// Pairs the view-model's inline message with the underlying cause.
fn inline_error<S: RecordStore>(
    view: &RecordListViewModel<S>,
    err: ViewModelError,
) -> anyhow::Error {
    match view.error_message() {
        Some(message) => anyhow!("{message}: {err}"),
        None => anyhow!(err),
    }
}

fn render_list<S: RecordStore>(
    view: &RecordListViewModel<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        let body = serde_json::json!({
            "records": view.records(),
            "total_hours": view.total_hours(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }

    if view.records().is_empty() {
        writeln!(out, "no study records yet")?;
    }
    for record in view.records() {
        writeln!(out, "{}", format_record(record))?;
    }
    writeln!(out, "total: {} hours", view.total_hours())?;
    Ok(())
}

fn render_total<S: RecordStore>(
    view: &RecordListViewModel<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        let body = serde_json::json!({ "total_hours": view.total_hours() });
        writeln!(out, "{}", serde_json::to_string(&body)?)?;
    } else {
        writeln!(out, "{}", view.total_hours())?;
    }
    Ok(())
}

fn format_record(record: &Record) -> String {
    format!("{:>5}  {}  {} hours", record.id, record.title, record.hours)
}
