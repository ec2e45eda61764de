//! The canonical receipt collection and its synchronisation with storage.
//!
//! A repository starts in [`RepositoryPhase::Loading`] and becomes ready after
//! [`ReceiptRepository::load`]. Every mutation rewrites the whole collection to
//! the store; storage failures are logged and leave the session running from
//! memory.

use std::{fmt, sync::Arc};

use slip_domain::{seed_receipts, Category, Receipt, ReceiptDraft, ReceiptPatch};

use crate::{
    filter::ReceiptFilter,
    ids::{IdGenerator, UuidGenerator},
    storage::StorageService,
    summary_service::{CategoryBreakdown, CategoryShare, SummaryService},
    time::{Clock, SystemClock},
    CoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryPhase {
    Loading,
    Ready,
}

/// Where the collection adopted by [`ReceiptRepository::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the store.
    Stored,
    /// Nothing was stored; the seed collection was adopted.
    Seeded,
    /// Stored data was unreadable or malformed; the seed collection replaced it.
    Recovered,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadSource::Stored => "stored",
            LoadSource::Seeded => "seeded",
            LoadSource::Recovered => "recovered",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source: LoadSource,
    pub receipt_count: usize,
    pub warnings: Vec<String>,
}

/// Whether the last write reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Synced,
    Degraded(String),
}

impl Persistence {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Persistence::Degraded(_))
    }
}

/// Notification delivered to subscribers after state and storage are updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryEvent {
    Loaded(LoadSource),
    Added(String),
    Updated(String),
    Deleted(String),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&RepositoryEvent) + Send + Sync>;

pub struct ReceiptRepository {
    storage: StorageService,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    receipts: Vec<Receipt>,
    phase: RepositoryPhase,
    persistence: Persistence,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl ReceiptRepository {
    pub fn new(storage: StorageService) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            receipts: Vec::new(),
            phase: RepositoryPhase::Loading,
            persistence: Persistence::Synced,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn phase(&self) -> RepositoryPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == RepositoryPhase::Ready
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn storage(&self) -> &StorageService {
        &self.storage
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Reads the stored collection, seeding or recovering as needed, and
    /// transitions to [`RepositoryPhase::Ready`] unconditionally.
    pub fn load(&mut self) -> LoadReport {
        let mut warnings = Vec::new();
        let source = match self.storage.load_receipts() {
            Ok(Some(stored)) => {
                if stored.skipped > 0 {
                    warnings.push(format!(
                        "{} stored receipts could not be read and were skipped",
                        stored.skipped
                    ));
                }
                self.receipts = stored.receipts;
                LoadSource::Stored
            }
            Ok(None) => {
                self.receipts = seed_receipts();
                LoadSource::Seeded
            }
            Err(err) => {
                tracing::error!(error = %err, "Error loading receipts; restoring seed data");
                warnings.push(format!("Stored receipts discarded: {err}"));
                self.receipts = seed_receipts();
                LoadSource::Recovered
            }
        };
        self.phase = RepositoryPhase::Ready;

        if source != LoadSource::Stored && !self.persist() {
            warnings.push("Receipts will not be saved this session".to_string());
        }

        tracing::info!(%source, count = self.receipts.len(), "Receipts loaded");
        self.notify(&RepositoryEvent::Loaded(source));
        LoadReport {
            source,
            receipt_count: self.receipts.len(),
            warnings,
        }
    }

    /// Stores a new receipt at the front of the collection and returns it.
    pub fn add(&mut self, draft: ReceiptDraft) -> Result<Receipt, CoreError> {
        self.ensure_ready()?;
        let receipt = Receipt::from_draft(draft, self.ids.next_id(), self.clock.now());
        self.receipts.insert(0, receipt.clone());
        self.persist();
        tracing::debug!(id = %receipt.id, store = %receipt.store_name, "Receipt added");
        self.notify(&RepositoryEvent::Added(receipt.id.clone()));
        Ok(receipt)
    }

    /// Merges `patch` into the receipt with `id`. Unknown ids are a silent no-op.
    pub fn update(&mut self, id: &str, patch: ReceiptPatch) -> Result<Option<Receipt>, CoreError> {
        self.ensure_ready()?;
        let updated = self
            .receipts
            .iter_mut()
            .find(|receipt| receipt.id == id)
            .map(|receipt| {
                receipt.apply(patch);
                receipt.clone()
            });
        self.persist();
        if updated.is_some() {
            self.notify(&RepositoryEvent::Updated(id.to_string()));
        }
        Ok(updated)
    }

    /// Removes the receipt with `id`, returning it. Unknown ids are a silent no-op.
    pub fn delete(&mut self, id: &str) -> Result<Option<Receipt>, CoreError> {
        self.ensure_ready()?;
        let removed = self
            .receipts
            .iter()
            .position(|receipt| receipt.id == id)
            .map(|index| self.receipts.remove(index));
        self.persist();
        if removed.is_some() {
            self.notify(&RepositoryEvent::Deleted(id.to_string()));
        }
        Ok(removed)
    }

    /// Replaces the whole collection with the seed data.
    pub fn reset_to_seed(&mut self) -> Result<(), CoreError> {
        self.ensure_ready()?;
        self.receipts = seed_receipts();
        self.persist();
        self.notify(&RepositoryEvent::Reset);
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Receipt> {
        self.receipts().iter().find(|receipt| receipt.id == id)
    }

    /// Current snapshot; empty while loading.
    pub fn receipts(&self) -> &[Receipt] {
        match self.phase {
            RepositoryPhase::Loading => &[],
            RepositoryPhase::Ready => &self.receipts,
        }
    }

    pub fn len(&self) -> usize {
        self.receipts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts().is_empty()
    }

    pub fn total_spending(&self) -> f64 {
        SummaryService::total_spending(self.receipts())
    }

    pub fn spending_by_category(&self) -> CategoryBreakdown {
        SummaryService::spending_by_category(self.receipts())
    }

    pub fn recent_receipts(&self, count: usize) -> Vec<&Receipt> {
        SummaryService::recent_receipts(self.receipts(), count)
    }

    pub fn top_category(&self) -> Option<(Category, f64)> {
        SummaryService::top_category(self.receipts())
    }

    pub fn category_shares(&self) -> Vec<CategoryShare> {
        SummaryService::category_shares(self.receipts())
    }

    pub fn filtered(&self, filter: &ReceiptFilter) -> Vec<&Receipt> {
        filter.apply(self.receipts())
    }

    /// Registers a listener invoked after every load and mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&RepositoryEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn ensure_ready(&self) -> Result<(), CoreError> {
        match self.phase {
            RepositoryPhase::Ready => Ok(()),
            RepositoryPhase::Loading => Err(CoreError::NotReady),
        }
    }

    fn persist(&mut self) -> bool {
        match self.storage.persist_receipts(&self.receipts) {
            Ok(()) => {
                if self.persistence.is_degraded() {
                    tracing::info!("Receipt storage is writable again");
                }
                self.persistence = Persistence::Synced;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error saving receipts; keeping changes in memory");
                self.persistence = Persistence::Degraded(err.to_string());
                false
            }
        }
    }

    fn notify(&self, event: &RepositoryEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, RECEIPTS_KEY};
    use chrono::NaiveDate;

    fn ready_repository() -> ReceiptRepository {
        let mut repository = ReceiptRepository::new(StorageService::in_memory());
        repository.load();
        repository
    }

    fn draft(total: f64) -> ReceiptDraft {
        ReceiptDraft::new(
            "Kedai",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            total,
            Category::Food,
        )
    }

    #[test]
    fn add_prepends_new_receipts() {
        let mut repository = ready_repository();
        let added = repository.add(draft(3.0)).unwrap();
        assert_eq!(repository.receipts()[0].id, added.id);
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let mut repository = ready_repository();
        let before = repository.receipts().to_vec();
        assert_eq!(
            repository
                .update("missing", ReceiptPatch::new().total(1.0))
                .unwrap(),
            None
        );
        assert_eq!(repository.delete("missing").unwrap(), None);
        assert_eq!(repository.receipts(), before.as_slice());
    }

    #[test]
    fn stored_empty_array_is_respected() {
        let storage = StorageService::new(Box::new(MemoryStore::with_entry(RECEIPTS_KEY, "[]")));
        let mut repository = ReceiptRepository::new(storage);
        let report = repository.load();
        assert_eq!(report.source, LoadSource::Stored);
        assert!(repository.is_empty());
    }
}
