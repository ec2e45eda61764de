//! slip-domain
//!
//! Pure domain models (Receipt, Category, line items, entry forms, seed data).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod receipt;
pub mod seed;

pub use category::*;
pub use common::*;
pub use receipt::*;
pub use seed::seed_receipts;
