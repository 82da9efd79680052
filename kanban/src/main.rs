//! `kanban`: a kanban board in your terminal.
//!
//! The board is stored as JSON under the data directory and reloaded on every
//! run. Configuration via CLI flags, environment variables, or config file
//! (`~/.config/kanban/config.toml`).
//!
//! New tasks are attributed to `--user` (or `KANBAN_USER`, or `[user] id` in
//! the config file), falling back to `anonymous`. The binary does not talk to
//! an identity provider; see [`kanban::auth`] for wiring one in.
//!
//! ```bash
//! # Show the board
//! cargo run --bin kanban
//!
//! # Add a task and move it along
//! cargo run --bin kanban -- add todo "Write docs" -d "user guide first"
//! cargo run --bin kanban -- move todo in-progress 0190f3a2
//!
//! # Replay a drag from the top of "todo" onto "done"
//! cargo run --bin kanban -- drag 0190f3a2 --from todo:0 --to done:0
//! ```

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use kanban::auth::AuthContext;
use kanban::board::BoardStore;
use kanban::cli::{self, CliCommand};
use kanban::commands::CommandTranslator;
use kanban::config::{CliArgs, KanbanConfig};
use kanban::storage::FileStorage;

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match KanbanConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            KanbanConfig::default()
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::debug!(data_dir = %config.data_dir.display(), key = %config.storage_key, "opening board");

    let auth = match &config.user_id {
        Some(id) => AuthContext::signed_in(id.clone()),
        None => AuthContext::anonymous(),
    };
    let storage = FileStorage::new(&config.data_dir);
    let (store, mut warnings) =
        BoardStore::open_with_warnings(storage, config.storage_key.clone(), auth, 16);
    let translator = CommandTranslator::new(config.max_title_len);

    let command = cli.command.unwrap_or(CliCommand::Show { json: false });
    let result = cli::execute(
        &store,
        &translator,
        &config.timestamp_format,
        command,
        &mut io::stdout().lock(),
    );

    while let Ok(warning) = warnings.try_recv() {
        eprintln!("Warning: board changed but was not saved: {}", warning.reason);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging.
///
/// Logs go to stderr unless `file_path` is given, in which case they are
/// written to that file through a non-blocking writer. The returned
/// [`WorkerGuard`] must be held until shutdown so buffered entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some((log_dir, file_name)) = file_path.and_then(|p| {
        let dir = p.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
        Some((dir, p.file_name()?))
    }) else {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
