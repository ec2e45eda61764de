use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use dialoguer::theme::ColorfulTheme;
use slip_config::{Config, ConfigManager};
use slip_core::{
    analysis::ReceiptAnalyzer,
    format::{DateFormatter, SymbolCurrencyFormatter},
    Pause, ReceiptRepository,
    RepositoryEvent,
};

use super::registry::CommandRegistry;

/// Set to any value to read commands from stdin without prompts or delays.
pub const SCRIPT_ENV: &str = "SLIP_CLI_SCRIPT";
/// Overrides the data directory (receipt store and config).
pub const DATA_DIR_ENV: &str = "SLIP_DATA_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub repository: ReceiptRepository,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub data_dir: PathBuf,
    pub currency: SymbolCurrencyFormatter,
    /// Chosen from `Config::locale`.
    pub dates: Box<dyn DateFormatter>,
    pub pause: Box<dyn Pause>,
    pub analyzer: Box<dyn ReceiptAnalyzer>,
    /// Repository notifications not yet reported to the user.
    pub events: Arc<Mutex<Vec<RepositoryEvent>>>,
    pub persistence_warned: bool,
    pub last_command: Option<String>,
    pub running: bool,
}
