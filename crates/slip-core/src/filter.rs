//! Search and category filtering for receipt lists.

use std::fmt;

use slip_domain::{Category, Receipt};

/// Category selector: every category, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses `all` or a category key (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::parse(value).map(CategoryFilter::Only)
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptFilter {
    search: String,
    category: CategoryFilter,
}

impl ReceiptFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into().to_lowercase(),
            category,
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self::new(search, CategoryFilter::All)
    }

    pub fn category(category: Category) -> Self {
        Self::new("", CategoryFilter::Only(category))
    }

    /// True when the store name contains the search text (ignoring case) and the
    /// category selector accepts the receipt's category.
    pub fn matches(&self, receipt: &Receipt) -> bool {
        let matches_search =
            self.search.is_empty() || receipt.store_name.to_lowercase().contains(&self.search);
        matches_search && self.category.matches(receipt.category)
    }

    pub fn apply<'a>(&self, receipts: &'a [Receipt]) -> Vec<&'a Receipt> {
        receipts.iter().filter(|receipt| self.matches(receipt)).collect()
    }
}
