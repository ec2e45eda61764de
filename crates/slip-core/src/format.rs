//! Currency and date presentation, selected by configured symbol and locale.

use chrono::{Datelike, NaiveDate};

/// Currency symbol used when no configuration overrides it.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "RM";

const MALAY_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mac", "Apr", "Mei", "Jun", "Jul", "Ogo", "Sep", "Okt", "Nov", "Dis",
];

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;

    /// Relative phrasing of `date` as seen from `today`. Future dates read as today.
    fn format_relative(&self, date: NaiveDate, today: NaiveDate) -> String;
}

/// `<symbol> <amount to 2dp>`, e.g. `RM 87.40`.
#[derive(Debug, Clone)]
pub struct SymbolCurrencyFormatter {
    symbol: String,
}

impl SymbolCurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl Default for SymbolCurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl CurrencyFormatter for SymbolCurrencyFormatter {
    fn format_amount(&self, amount: f64) -> String {
        format!("{} {:.2}", self.symbol, amount)
    }
}

/// Age of a date in whole days, clamped at zero.
enum Age {
    Today,
    Yesterday,
    Days(i64),
    Weeks(i64),
    Older,
}

fn age(date: NaiveDate, today: NaiveDate) -> Age {
    match (today - date).num_days().max(0) {
        0 => Age::Today,
        1 => Age::Yesterday,
        days @ 2..=6 => Age::Days(days),
        days @ 7..=29 => Age::Weeks(days / 7),
        _ => Age::Older,
    }
}

/// Day, Malay short month and year, e.g. `15 Dis 2024`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MalayDateFormatter;

impl DateFormatter for MalayDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let month = MALAY_MONTHS[date.month0() as usize];
        format!("{} {} {}", date.day(), month, date.year())
    }

    fn format_relative(&self, date: NaiveDate, today: NaiveDate) -> String {
        match age(date, today) {
            Age::Today => "Hari ini".to_string(),
            Age::Yesterday => "Semalam".to_string(),
            Age::Days(days) => format!("{days} hari lepas"),
            Age::Weeks(weeks) => format!("{weeks} minggu lepas"),
            Age::Older => self.format_date(date),
        }
    }
}

/// ISO calendar dates with English relative phrasing, e.g. `2024-12-15`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoDateFormatter;

impl DateFormatter for IsoDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn format_relative(&self, date: NaiveDate, today: NaiveDate) -> String {
        match age(date, today) {
            Age::Today => "Today".to_string(),
            Age::Yesterday => "Yesterday".to_string(),
            Age::Days(days) => format!("{days} days ago"),
            Age::Weeks(1) => "1 week ago".to_string(),
            Age::Weeks(weeks) => format!("{weeks} weeks ago"),
            Age::Older => self.format_date(date),
        }
    }
}

/// Malay formatting for `ms` locales (`ms`, `ms-MY`, `ms_BN`), ISO for everything else.
pub fn date_formatter_for(locale: &str) -> Box<dyn DateFormatter> {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if language == "ms" {
        Box::new(MalayDateFormatter)
    } else {
        Box::new(IsoDateFormatter)
    }
}

/// Cuts `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
