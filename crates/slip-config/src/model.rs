use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = "Slip";

/// User preferences for the Slip shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_recent_count")]
    pub recent_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `~/Documents/Slip`.
    pub data_dir: Option<PathBuf>,

    /// Whether analysis and saving pause briefly for feedback.
    #[serde(default = "Config::default_true")]
    pub simulate_delays: bool,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency_symbol: Self::default_currency_symbol(),
            recent_count: Self::default_recent_count(),
            data_dir: None,
            simulate_delays: true,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    /// Names accepted by [`Config::get`] and [`Config::set`].
    pub const KEYS: [&'static str; 6] = [
        "locale",
        "currency_symbol",
        "recent_count",
        "data_dir",
        "simulate_delays",
        "ui_color_enabled",
    ];

    pub fn default_locale() -> String {
        "ms-MY".into()
    }

    pub fn default_currency_symbol() -> String {
        "RM".into()
    }

    pub fn default_recent_count() -> usize {
        5
    }

    fn default_true() -> bool {
        true
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(DATA_DIR_NAME)
    }

    /// Current value of a setting rendered as text, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "recent_count" => self.recent_count.to_string(),
            "data_dir" => self.resolve_data_dir().display().to_string(),
            "simulate_delays" => self.simulate_delays.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Parses `value` into the setting named `key`.
    ///
    /// `data_dir` accepts `default` to clear the override.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), crate::ConfigError> {
        let value = value.trim();
        let invalid = || crate::ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "locale" if !value.is_empty() => self.locale = value.to_string(),
            "currency_symbol" if !value.is_empty() => self.currency_symbol = value.to_string(),
            "recent_count" => {
                self.recent_count = value
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(invalid)?
            }
            "data_dir" if value.eq_ignore_ascii_case("default") => self.data_dir = None,
            "data_dir" if !value.is_empty() => self.data_dir = Some(PathBuf::from(value)),
            "simulate_delays" => self.simulate_delays = parse_flag(value).ok_or_else(invalid)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(value).ok_or_else(invalid)?,
            _ if Self::KEYS.iter().any(|known| *known == key) => return Err(invalid()),
            _ => return Err(crate::ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"currency_symbol":"$"}"#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.locale, "ms-MY");
        assert_eq!(config.recent_count, 5);
        assert!(config.simulate_delays);
    }

    #[test]
    fn set_parses_typed_values() {
        let mut config = Config::default();
        config.set("recent_count", "10").unwrap();
        config.set("simulate_delays", "off").unwrap();
        config.set("data_dir", "/tmp/slip").unwrap();
        assert_eq!(config.recent_count, 10);
        assert!(!config.simulate_delays);
        assert_eq!(config.get("data_dir").as_deref(), Some("/tmp/slip"));

        config.set("data_dir", "default").unwrap();
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("recent_count", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("locale", " "),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(config, Config::default());
    }
}
