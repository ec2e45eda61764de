//! Shell startup, dispatch, and the helpers shared by command handlers.

use std::{
    env, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use slip_config::{Config, ConfigError, ConfigManager};
use slip_core::{
    analysis::MockAnalyzer,
    format::{date_formatter_for, CurrencyFormatter, SymbolCurrencyFormatter},
    storage::KeyValueStore,
    CoreError, MemoryStore, NoPause, ReceiptRepository, RepositoryEvent, StorageService,
    ThreadPause,
};
use slip_storage_json::JsonFileStore;
use strsim::levenshtein;

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext, DATA_DIR_ENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Subdirectory of the data directory holding the key-value files.
const STORE_DIR: &str = "store";
const SHORT_ID_LEN: usize = 8;

impl ShellContext {
    /// Builds a context from the environment: `SLIP_DATA_DIR` if set, otherwise
    /// the configured (or default) data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let override_dir = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let base = override_dir
            .clone()
            .unwrap_or_else(|| Config::default().resolve_data_dir());
        let config_manager = ConfigManager::with_base_dir(base)?;
        let (config, config_warning) = match config_manager.load() {
            Ok(config) => (config, None),
            Err(err) => (
                Config::default(),
                Some(format!("Ignoring unreadable config ({err}); using defaults.")),
            ),
        };
        let data_dir = override_dir.unwrap_or_else(|| config.resolve_data_dir());

        let context = Self::with_parts(mode, config_manager, config, data_dir)?;
        if let Some(warning) = config_warning {
            cli_io::print_warning(warning);
        }
        Ok(context)
    }

    /// Builds a context rooted at `data_dir`, ignoring the environment.
    pub fn with_data_dir(mode: CliMode, data_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(data_dir.clone())?;
        let config = config_manager.load()?;
        Self::with_parts(mode, config_manager, config, data_dir)
    }

    fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        data_dir: PathBuf,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let store: Box<dyn KeyValueStore> = match JsonFileStore::new(data_dir.join(STORE_DIR)) {
            Ok(store) => Box::new(store),
            Err(err) => {
                tracing::error!(error = %err, "Receipt store unavailable; using memory");
                cli_io::print_warning(format!(
                    "Receipt storage unavailable ({err}). Changes will not be saved."
                ));
                Box::new(MemoryStore::new())
            }
        };

        let mut repository = ReceiptRepository::new(StorageService::new(store));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        repository.subscribe(move |event: &RepositoryEvent| {
            if let Ok(mut queue) = sink.lock() {
                queue.push(event.clone());
            }
        });

        let mut context = ShellContext {
            mode,
            registry,
            repository,
            theme: ColorfulTheme::default(),
            config_manager,
            currency: SymbolCurrencyFormatter::new(config.currency_symbol.clone()),
            dates: date_formatter_for(&config.locale),
            pause: Box::new(NoPause),
            config,
            data_dir,
            analyzer: Box::new(MockAnalyzer::from_entropy()),
            events,
            persistence_warned: false,
            last_command: None,
            running: true,
        };
        context.apply_config();

        let report = context.repository.load();
        for warning in &report.warnings {
            cli_io::print_warning(warning);
        }
        context.announce_events();
        Ok(context)
    }

    /// Re-derives output, currency, dates, and pacing from the current config.
    pub(crate) fn apply_config(&mut self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
        self.currency = SymbolCurrencyFormatter::new(self.config.currency_symbol.clone());
        self.dates = date_formatter_for(&self.config.locale);
        self.pause = if self.config.simulate_delays && self.mode == CliMode::Interactive {
            Box::new(ThreadPause)
        } else {
            Box::new(NoPause)
        };
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        format!("slip ({})> ", self.repository.len())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.repository.clock().today()
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.currency.format_amount(amount)
    }

    pub(crate) fn date(&self, date: NaiveDate) -> String {
        self.dates.format_date(date)
    }

    pub(crate) fn relative_date(&self, date: NaiveDate) -> String {
        self.dates.format_relative(date, self.today())
    }

    /// Asks before destructive actions; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    /// Accepts a full receipt id or an unambiguous prefix of one.
    pub(crate) fn resolve_receipt_id(&self, raw: &str) -> Result<String, CommandError> {
        if self.repository.get_by_id(raw).is_some() {
            return Ok(raw.to_string());
        }
        let matches: Vec<&str> = self
            .repository
            .receipts()
            .iter()
            .map(|receipt| receipt.id.as_str())
            .filter(|id| id.starts_with(raw))
            .collect();
        match matches.as_slice() {
            [id] => Ok(id.to_string()),
            [] => Err(CommandError::ReceiptNotFound(raw.to_string())),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{}` matches {} receipts; type more of the id",
                raw,
                matches.len()
            ))),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let outcome = if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        };
        self.announce_events();
        outcome
    }

    /// Reports queued repository events and any change in persistence health.
    pub(crate) fn announce_events(&mut self) {
        let events = match self.events.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        };
        for event in events {
            match event {
                RepositoryEvent::Loaded(source) => cli_io::print_info(format!(
                    "Loaded {} receipts ({}).",
                    self.repository.len(),
                    source
                )),
                RepositoryEvent::Added(id) => {
                    cli_io::print_success(format!("Receipt saved ({}).", short_id(&id)))
                }
                RepositoryEvent::Updated(id) => {
                    cli_io::print_success(format!("Receipt {} updated.", short_id(&id)))
                }
                RepositoryEvent::Deleted(id) => {
                    cli_io::print_success(format!("Receipt {} deleted.", short_id(&id)))
                }
                RepositoryEvent::Reset => cli_io::print_success("Sample receipts restored."),
            }
        }

        match (self.repository.persistence().is_degraded(), self.persistence_warned) {
            (true, false) => {
                cli_io::print_warning(
                    "Receipts could not be saved; changes are kept for this session only.",
                );
                self.persistence_warned = true;
            }
            (false, true) => {
                cli_io::print_info("Receipt storage is writable again.");
                self.persistence_warned = false;
            }
            _ => {}
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .list()
            .map(|entry| (levenshtein(entry.name, &lowered), entry.name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit Slip?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        tracing::debug!(command = ?self.last_command, error = %err, "Command failed");
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::ReceiptNotFound(id) => {
                self.print_error(&format!("No receipt with id `{id}`."));
                cli_io::print_hint("Use `list` to see receipt ids.");
                Ok(())
            }
            CommandError::Core(CoreError::Validation(message)) => {
                self.print_error(&message);
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}

/// Leading characters of an id, enough to tell receipts apart in listings.
pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Command(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("No receipt with id `{0}`")]
    ReceiptNotFound(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    data_dir: PathBuf,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_data_dir(CliMode::Script, data_dir)?;
    for line in lines {
        app.last_command = Some(line.to_string());
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
