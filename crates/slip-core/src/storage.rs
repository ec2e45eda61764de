//! Key-value persistence contract and the typed wrapper around the reserved keys.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use serde_json::{Map, Value};
use slip_domain::Receipt;

use crate::CoreError;

/// Key holding the full receipt collection as a JSON array.
pub const RECEIPTS_KEY: &str = "slip_receipts";
/// Key reserved for user settings, stored as a JSON object.
pub const SETTINGS_KEY: &str = "slip_settings";

/// Free-form user settings persisted under [`SETTINGS_KEY`].
pub type Settings = Map<String, Value>;

/// Receipts decoded from storage, plus how many array elements could not be read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoredReceipts {
    pub receipts: Vec<Receipt>,
    pub skipped: usize,
}

/// Synchronous string key-value storage. Values are JSON text.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}

/// Process-local store. Used in tests and whenever no durable backend is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

fn poisoned() -> CoreError {
    CoreError::StorageUnavailable("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// Typed access to the receipt and settings keys of a [`KeyValueStore`].
pub struct StorageService {
    store: Box<dyn KeyValueStore>,
}

impl StorageService {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Reads the persisted receipts.
    ///
    /// `Ok(None)` means nothing is stored. Unreadable storage yields
    /// [`CoreError::StorageUnavailable`]; text that is not a JSON array yields
    /// [`CoreError::MalformedPersistedData`]. Array elements that do not decode
    /// as receipts are skipped and counted.
    pub fn load_receipts(&self) -> Result<Option<StoredReceipts>, CoreError> {
        let raw = match self.store.read(RECEIPTS_KEY)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };
        let value: Value = serde_json::from_str(&raw)
            .map_err(|err| CoreError::MalformedPersistedData(err.to_string()))?;
        let Value::Array(elements) = value else {
            return Err(CoreError::MalformedPersistedData(
                "expected a JSON array of receipts".into(),
            ));
        };

        let mut stored = StoredReceipts::default();
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<Receipt>(element) {
                Ok(receipt) => stored.receipts.push(receipt),
                Err(err) => {
                    tracing::warn!(index, error = %err, "Skipping unreadable stored receipt");
                    stored.skipped += 1;
                }
            }
        }
        Ok(Some(stored))
    }

    /// Serializes the full collection and writes it under [`RECEIPTS_KEY`].
    pub fn persist_receipts(&self, receipts: &[Receipt]) -> Result<(), CoreError> {
        let json =
            serde_json::to_string(receipts).map_err(|err| CoreError::Serde(err.to_string()))?;
        self.store.write(RECEIPTS_KEY, &json)
    }

    /// Loads settings, returning an empty object when absent or unreadable.
    pub fn load_settings(&self) -> Settings {
        let raw = match self.store.read(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::new(),
            Err(err) => {
                tracing::error!(error = %err, "Error reading settings");
                return Settings::new();
            }
        };
        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::error!(error = %err, "Error reading settings");
                Settings::new()
            }
        }
    }

    /// Persists settings, returning `false` (and logging) on failure.
    pub fn save_settings(&self, settings: &Settings) -> bool {
        let result = serde_json::to_string(settings)
            .map_err(|err| CoreError::Serde(err.to_string()))
            .and_then(|json| self.store.write(SETTINGS_KEY, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "Error saving settings");
                false
            }
        }
    }

    /// Removes both reserved keys. Failures are logged and skipped.
    pub fn clear_all(&self) {
        for key in [RECEIPTS_KEY, SETTINGS_KEY] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!(key, error = %err, "Failed to clear storage key");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        store.write("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn only_empty_receipt_text_counts_as_absent() {
        let service = StorageService::new(Box::new(MemoryStore::with_entry(RECEIPTS_KEY, "")));
        assert!(service.load_receipts().unwrap().is_none());

        let service = StorageService::new(Box::new(MemoryStore::with_entry(RECEIPTS_KEY, "  ")));
        let err = service.load_receipts().expect_err("blank text is not JSON");
        assert!(matches!(err, CoreError::MalformedPersistedData(_)));
    }

    #[test]
    fn non_array_receipt_text_is_malformed() {
        let service =
            StorageService::new(Box::new(MemoryStore::with_entry(RECEIPTS_KEY, "{\"a\":1}")));
        let err = service.load_receipts().expect_err("object is not a receipt list");
        assert!(matches!(err, CoreError::MalformedPersistedData(_)));
    }

    #[test]
    fn unreadable_elements_are_skipped_not_fatal() {
        let raw = json!([
            {"id": "u1", "storeName": "My Own Shop", "date": "2025-01-01", "total": 42.5, "category": "food"},
            {"id": "u2", "storeName": "Bad Total", "date": "2025-01-02", "total": "12.00"},
            7
        ])
        .to_string();
        let service = StorageService::new(Box::new(MemoryStore::with_entry(RECEIPTS_KEY, &raw)));

        let stored = service.load_receipts().unwrap().expect("array is present");
        assert_eq!(stored.skipped, 2);
        assert_eq!(stored.receipts.len(), 1);
        assert_eq!(stored.receipts[0].id, "u1");
    }

    #[test]
    fn settings_default_to_empty_and_persist() {
        let service = StorageService::in_memory();
        assert!(service.load_settings().is_empty());

        let mut settings = Settings::new();
        settings.insert("currency".into(), json!("RM"));
        assert!(service.save_settings(&settings));
        assert_eq!(service.load_settings()["currency"], "RM");

        service.clear_all();
        assert!(service.load_settings().is_empty());
    }

    #[test]
    fn corrupt_settings_fall_back_to_empty() {
        let service = StorageService::new(Box::new(MemoryStore::with_entry(SETTINGS_KEY, "[1,")));
        assert!(service.load_settings().is_empty());
    }
}
