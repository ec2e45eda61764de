//! Manual entry form: raw text fields validated into a [`ReceiptDraft`].

use chrono::NaiveDate;
use slip_domain::{Category, ReceiptDraft};

use crate::CoreError;

/// Text as typed (or prefilled by analysis) before it becomes a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptForm {
    pub store_name: String,
    pub total: String,
    pub category: Category,
    pub date: String,
    pub notes: String,
}

impl ReceiptForm {
    /// Blank form: category `other`, dated `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            store_name: String::new(),
            total: String::new(),
            category: Category::Other,
            date: today.format("%Y-%m-%d").to_string(),
            notes: String::new(),
        }
    }

    /// Checks the required fields and converts the form into a draft.
    ///
    /// Store name and total are required; the total must be a finite,
    /// non-negative number. Blank notes are dropped.
    pub fn validate(&self, image_url: Option<String>) -> Result<ReceiptDraft, CoreError> {
        let store_name = self.store_name.trim();
        if store_name.is_empty() || self.total.trim().is_empty() {
            return Err(CoreError::Validation(
                "Please fill in store name and total.".into(),
            ));
        }
        let total = parse_total(&self.total)?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            CoreError::Validation(format!("`{}` is not a valid date (YYYY-MM-DD)", self.date))
        })?;

        let mut draft = ReceiptDraft::new(store_name, date, total, self.category);
        let notes = self.notes.trim();
        if !notes.is_empty() {
            draft = draft.with_notes(notes);
        }
        if let Some(image) = image_url {
            draft = draft.with_image(image);
        }
        Ok(draft)
    }
}

/// Parses a user-entered amount, accepting an optional `RM` prefix.
pub fn parse_total(raw: &str) -> Result<f64, CoreError> {
    let cleaned = raw.trim();
    let cleaned = cleaned
        .strip_prefix("RM")
        .or_else(|| cleaned.strip_prefix("rm"))
        .unwrap_or(cleaned)
        .trim();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| CoreError::Validation(format!("`{raw}` is not a valid total")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "total must be a non-negative amount, got `{raw}`"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn filled() -> ReceiptForm {
        ReceiptForm {
            store_name: "  Jaya Grocer ".into(),
            total: "87.40".into(),
            category: Category::Food,
            date: "2024-12-15".into(),
            notes: "   ".into(),
        }
    }

    #[test]
    fn blank_form_defaults() {
        let form = ReceiptForm::blank(today());
        assert_eq!(form.category, Category::Other);
        assert_eq!(form.date, "2025-05-20");
        assert!(form.store_name.is_empty());
    }

    #[test]
    fn valid_form_becomes_trimmed_draft() {
        let draft = filled().validate(Some("data:image/png;base64,AA==".into())).unwrap();
        assert_eq!(draft.store_name, "Jaya Grocer");
        assert_eq!(draft.total, 87.4);
        assert_eq!(draft.notes, None);
        assert_eq!(draft.image_url.as_deref(), Some("data:image/png;base64,AA=="));
        assert!(draft.items.is_empty());
    }

    #[test]
    fn missing_store_or_total_is_rejected() {
        let mut form = filled();
        form.store_name = " ".into();
        assert!(matches!(form.validate(None), Err(CoreError::Validation(_))));

        let mut form = filled();
        form.total.clear();
        assert!(matches!(form.validate(None), Err(CoreError::Validation(_))));
    }

    #[test]
    fn bad_totals_and_dates_are_rejected() {
        let mut form = filled();
        form.total = "-3".into();
        assert!(form.validate(None).is_err());

        let mut form = filled();
        form.total = "abc".into();
        assert!(form.validate(None).is_err());

        let mut form = filled();
        form.date = "15/12/2024".into();
        assert!(form.validate(None).is_err());
    }

    #[test]
    fn totals_accept_currency_prefix() {
        assert_eq!(parse_total("RM 12.50").unwrap(), 12.5);
        assert_eq!(parse_total("0").unwrap(), 0.0);
        assert!(parse_total("NaN").is_err());
    }
}
