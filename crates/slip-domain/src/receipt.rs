//! Domain models for receipts, their line items, and partial updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::common::{Amounted, BelongsToCategory};

/// One recorded purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub store_name: String,
    pub date: NaiveDate,
    pub total: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Records saved without a creation stamp read back as the Unix epoch.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Stamps a draft with its identity. `created_at` is never changed afterwards.
    pub fn from_draft(draft: ReceiptDraft, id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            store_name: draft.store_name,
            date: draft.date,
            total: draft.total,
            category: draft.category,
            items: draft.items,
            notes: draft.notes,
            image_url: draft.image_url,
            created_at,
        }
    }

    /// Shallow-merges the provided fields. `id` and `created_at` are untouched.
    pub fn apply(&mut self, patch: ReceiptPatch) {
        if let Some(store_name) = patch.store_name {
            self.store_name = store_name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
    }

    /// Returns the notes or an empty string.
    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

impl BelongsToCategory for Receipt {
    fn category(&self) -> Category {
        self.category
    }
}

impl Amounted for Receipt {
    fn amount(&self) -> f64 {
        self.total
    }
}

/// A single purchased item printed on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub price: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl Amounted for LineItem {
    fn amount(&self) -> f64 {
        self.price
    }
}

/// A receipt that has not been assigned an id or creation time yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDraft {
    pub store_name: String,
    pub date: NaiveDate,
    pub total: f64,
    pub category: Category,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

impl ReceiptDraft {
    pub fn new(store_name: impl Into<String>, date: NaiveDate, total: f64, category: Category) -> Self {
        Self {
            store_name: store_name.into(),
            date,
            total,
            category,
            items: Vec::new(),
            notes: None,
            image_url: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Fields to merge into an existing receipt. `None` leaves a field unchanged;
/// `notes` and `image_url` use an inner `Option` so they can also be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptPatch {
    pub store_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub total: Option<f64>,
    pub category: Option<Category>,
    pub items: Option<Vec<LineItem>>,
    pub notes: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl ReceiptPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn items(mut self, items: Vec<LineItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Some(image_url);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Receipt {
        let draft = ReceiptDraft::new(
            "Jaya Grocer",
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
            87.4,
            Category::Food,
        )
        .with_notes("Belanja mingguan");
        Receipt::from_draft(draft, "r-1", Utc.with_ymd_and_hms(2024, 12, 15, 10, 30, 0).unwrap())
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut receipt = sample();
        let created_at = receipt.created_at;
        receipt.apply(ReceiptPatch::new().total(90.0).notes(None));

        assert_eq!(receipt.total, 90.0);
        assert_eq!(receipt.notes, None);
        assert_eq!(receipt.store_name, "Jaya Grocer");
        assert_eq!(receipt.id, "r-1");
        assert_eq!(receipt.created_at, created_at);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["storeName"], "Jaya Grocer");
        assert_eq!(json["date"], "2024-12-15");
        assert_eq!(json["category"], "food");
        assert!(json["imageUrl"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn deserializes_sparse_records() {
        let raw = r#"{
            "id": "9",
            "storeName": "Kedai Runcit",
            "date": "2024-11-02",
            "total": 12.5,
            "category": "snacks",
            "createdAt": "2024-11-02T08:00:00Z"
        }"#;
        let receipt: Receipt = serde_json::from_str(raw).expect("parse receipt");
        assert_eq!(receipt.category, Category::Other);
        assert!(receipt.items.is_empty());
        assert_eq!(receipt.notes, None);
        assert_eq!(receipt.image_url, None);
    }

    #[test]
    fn missing_creation_stamp_reads_as_epoch() {
        let raw = r#"{"id":"u1","storeName":"My Own Shop","date":"2025-01-01","total":42.5,"category":"food"}"#;
        let receipt: Receipt = serde_json::from_str(raw).expect("parse receipt");
        assert_eq!(receipt.created_at, Utc.timestamp_opt(0, 0).unwrap());
        assert_eq!(receipt.category, Category::Food);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(ReceiptPatch::new().is_empty());
        assert!(!ReceiptPatch::new().category(Category::Food).is_empty());
    }
}
