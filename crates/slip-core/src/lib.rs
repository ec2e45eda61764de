//! slip-core
//!
//! Receipt repository, aggregates, filtering, and export encoders.
//! Depends on slip-domain. No CLI, no terminal I/O; persistence goes through
//! the [`storage::KeyValueStore`] abstraction.

pub mod analysis;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod format;
pub mod gesture;
pub mod ids;
pub mod pause;
pub mod repository;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use analysis::{MockAnalyzer, ReceiptAnalyzer};
pub use error::CoreError;
pub use export::ExportFormat;
pub use filter::{CategoryFilter, ReceiptFilter};
pub use form::ReceiptForm;
pub use ids::{IdGenerator, UuidGenerator};
pub use pause::{NoPause, Pause, ThreadPause};
pub use repository::{
    LoadReport, LoadSource, Persistence, ReceiptRepository, RepositoryEvent, RepositoryPhase,
    SubscriptionId,
};
pub use storage::{KeyValueStore, MemoryStore, Settings, StorageService, StoredReceipts};
pub use summary_service::{CategoryBreakdown, CategoryShare, SummaryService};
pub use time::{Clock, FixedClock, SystemClock};
