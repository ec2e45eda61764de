//! Shared traits for receipt primitives.

use crate::category::Category;

/// Associates entities with a spending category.
pub trait BelongsToCategory {
    fn category(&self) -> Category;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}
