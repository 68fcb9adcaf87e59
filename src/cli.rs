//! Terminal front end: reads inbound messages, prints replies, and delivers
//! scheduled reports to the console.

use std::{
    io::{self, BufRead, IsTerminal},
    path::PathBuf,
    sync::Arc,
};

use colored::Colorize;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tally_config::{Config, ConfigManager};
use tally_core::SystemClock;
use tally_storage_json::JsonLedgerStorage;

use crate::{
    app::{App, Reply},
    delivery::ConsoleChannel,
    errors::AppError,
    runtime::Runtime,
};

const HOME_ENV: &str = "TALLY_HOME";
const SCRIPT_ENV: &str = "TALLY_CLI_SCRIPT";
const NO_SCHEDULE_ENV: &str = "TALLY_NO_SCHEDULE";
const PROMPT: &str = "tally> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

enum LoopControl {
    Continue,
    Exit,
}

pub fn run_cli() -> Result<(), AppError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() || !io::stdin().is_terminal() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let use_color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    colored::control::set_override(use_color);

    let (config, base) = load_config()?;
    let ledger_path = ledger_path(&config, base.as_ref());
    tracing::info!(ledger = %ledger_path.display(), timezone = %config.timezone, "starting");

    let storage = JsonLedgerStorage::new(ledger_path)?;
    let app = App::from_config(
        &config,
        Box::new(storage),
        Box::new(ConsoleChannel::stdout()),
        Arc::new(SystemClock),
    )?;
    let runtime = if std::env::var_os(NO_SCHEDULE_ENV).is_some() {
        Runtime::start_without_schedule(app)?
    } else {
        Runtime::start(app)?
    };

    println!("Tally ready. Type /help for commands, exit to quit.");
    let outcome = match mode {
        CliMode::Interactive => run_interactive(&runtime),
        CliMode::Script => run_script(&runtime),
    };
    runtime.shutdown()?;
    outcome
}

/// Loads (and on first run writes) the configuration file.
fn load_config() -> Result<(Config, Option<PathBuf>), AppError> {
    let home = std::env::var_os(HOME_ENV).map(PathBuf::from);
    let base = home.clone().unwrap_or_else(default_base_dir);
    let manager = ConfigManager::with_base_dir(base)?;
    let config = manager.load()?;
    if !manager.config_path().exists() {
        manager.save(&config)?;
    }
    config.validate()?;
    Ok((config, home))
}

fn default_base_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
}

/// An explicit `ledger_path` wins; otherwise an overridden home keeps the ledger beside its config.
fn ledger_path(config: &Config, home: Option<&PathBuf>) -> PathBuf {
    match (&config.ledger_path, home) {
        (Some(path), _) => path.clone(),
        (None, Some(home)) => home.join("ledger.json"),
        (None, None) => config.resolve_ledger_path(),
    }
}

fn run_interactive(runtime: &Runtime) -> Result<(), AppError> {
    let mut editor = Editor::<(), DefaultHistory>::new()
        .map_err(|err| AppError::Readline(err.to_string()))?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if let LoopControl::Exit = handle_line(runtime, trimmed)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(AppError::Readline(err.to_string())),
        }
    }
    Ok(())
}

fn run_script(runtime: &Runtime) -> Result<(), AppError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let LoopControl::Exit = handle_line(runtime, trimmed)? {
            break;
        }
    }
    Ok(())
}

fn handle_line(runtime: &Runtime, line: &str) -> Result<LoopControl, AppError> {
    if matches!(line.to_ascii_lowercase().as_str(), "exit" | "quit" | "/exit") {
        return Ok(LoopControl::Exit);
    }
    print_reply(&runtime.submit(line)?);
    Ok(LoopControl::Continue)
}

fn print_reply(reply: &Reply) {
    if reply.is_error {
        println!("{}", reply.text.red());
    } else {
        println!("{}", reply.text.trim_end());
    }
}
