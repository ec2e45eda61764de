//! Pure encoders turning a receipt list into downloadable JSON or CSV bytes.

use std::{borrow::Borrow, fmt, str::FromStr};

use chrono::NaiveDate;
use slip_domain::Receipt;

use crate::CoreError;

const FILE_PREFIX: &str = "slip_receipts";
const CSV_HEADER: [&str; 5] = ["Store", "Date", "Total", "Category", "Notes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// `slip_receipts_<YYYY-MM-DD>.<ext>`
    pub fn file_name(self, date: NaiveDate) -> String {
        format!("{FILE_PREFIX}_{}.{}", date.format("%Y-%m-%d"), self.extension())
    }

    pub fn encode<R: Borrow<Receipt>>(self, receipts: &[R]) -> Result<Vec<u8>, CoreError> {
        let text = match self {
            ExportFormat::Json => encode_json(receipts)?,
            ExportFormat::Csv => encode_csv(receipts),
        };
        Ok(text.into_bytes())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(CoreError::Validation(format!(
                "unknown export format `{other}` (expected json or csv)"
            ))),
        }
    }
}

/// Pretty-printed JSON array; parses back into an equal list via [`decode_json`].
pub fn encode_json<R: Borrow<Receipt>>(receipts: &[R]) -> Result<String, CoreError> {
    let records: Vec<&Receipt> = receipts.iter().map(|record| record.borrow()).collect();
    serde_json::to_string_pretty(&records).map_err(|err| CoreError::Serde(err.to_string()))
}

pub fn decode_json(text: &str) -> Result<Vec<Receipt>, CoreError> {
    serde_json::from_str(text).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Header row plus one fully quoted row per receipt, joined with `\n`.
/// Embedded double quotes are doubled.
pub fn encode_csv<R: Borrow<Receipt>>(receipts: &[R]) -> String {
    let mut lines = Vec::with_capacity(receipts.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for receipt in receipts {
        let receipt: &Receipt = receipt.borrow();
        let cells = [
            receipt.store_name.clone(),
            receipt.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", receipt.total),
            receipt.category.key().to_string(),
            receipt.notes_or_empty().to_string(),
        ];
        let row: Vec<String> = cells.iter().map(|cell| quote(cell)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slip_domain::{seed_receipts, Category, ReceiptDraft};

    #[test]
    fn csv_row_matches_expected_layout() {
        let mut receipt = seed_receipts().remove(0);
        receipt.notes = None;
        let csv = encode_csv(&[receipt]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Store,Date,Total,Category,Notes");
        assert_eq!(lines[1], r#""Jaya Grocer","2024-12-15","87.40","food","""#);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let draft = ReceiptDraft::new(
            "Kedai \"Pak\" Ali, Sdn Bhd",
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            5.0,
            Category::Other,
        )
        .with_notes("said \"thanks\"");
        let receipt = Receipt::from_draft(draft, "q", chrono::Utc::now());
        let csv = encode_csv(&[&receipt]);
        assert!(csv.ends_with(
            r#""Kedai ""Pak"" Ali, Sdn Bhd","2025-03-09","5.00","other","said ""thanks""""#
        ));
    }

    #[test]
    fn empty_list_exports_header_only() {
        let empty: [Receipt; 0] = [];
        assert_eq!(encode_csv(&empty), "Store,Date,Total,Category,Notes");
        assert_eq!(encode_json(&empty).unwrap(), "[]");
    }

    #[test]
    fn json_round_trips_seed_collection() {
        let seed = seed_receipts();
        let text = encode_json(&seed).unwrap();
        assert!(text.contains("\n  {"), "expected pretty output");
        assert_eq!(decode_json(&text).unwrap(), seed);
    }

    #[test]
    fn file_names_follow_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        assert_eq!(
            ExportFormat::Json.file_name(date),
            "slip_receipts_2024-12-15.json"
        );
        assert_eq!(
            ExportFormat::Csv.file_name(date),
            "slip_receipts_2024-12-15.csv"
        );
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
