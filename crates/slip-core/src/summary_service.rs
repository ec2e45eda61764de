//! Read-only aggregates over a receipt snapshot. Nothing here is cached.

use slip_domain::{Amounted, BelongsToCategory, Category, Receipt};

/// Number of receipts shown in the "recent" list when no count is given.
pub const DEFAULT_RECENT_COUNT: usize = 5;

/// Spend per category, in the order each category was first encountered.
/// Categories without receipts are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    entries: Vec<(Category, f64)>,
}

impl CategoryBreakdown {
    pub fn from_receipts<'a, I>(receipts: I) -> Self
    where
        I: IntoIterator<Item = &'a Receipt>,
    {
        receipts
            .into_iter()
            .fold(Self::default(), |mut breakdown, receipt| {
                breakdown.add(receipt.category(), receipt.amount());
                breakdown
            })
    }

    fn add(&mut self, category: Category, amount: f64) {
        match self.entries.iter_mut().find(|(key, _)| *key == category) {
            Some((_, sum)) => *sum += amount,
            None => self.entries.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| *key == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    /// Entry with the largest amount; ties keep the first-encountered category.
    pub fn top(&self) -> Option<(Category, f64)> {
        self.iter().fold(None, |best, entry| match best {
            Some((_, amount)) if amount >= entry.1 => best,
            _ => Some(entry),
        })
    }
}

/// One dashboard row: a category, its spend and whole-number share of the total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    pub percentage: u32,
}

pub struct SummaryService;

impl SummaryService {
    pub fn total_spending(receipts: &[Receipt]) -> f64 {
        receipts.iter().map(Amounted::amount).sum()
    }

    pub fn spending_by_category(receipts: &[Receipt]) -> CategoryBreakdown {
        CategoryBreakdown::from_receipts(receipts)
    }

    /// Up to `count` receipts, newest `created_at` first. Ties keep their original order.
    pub fn recent_receipts(receipts: &[Receipt], count: usize) -> Vec<&Receipt> {
        let mut sorted: Vec<&Receipt> = receipts.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(count);
        sorted
    }

    pub fn top_category(receipts: &[Receipt]) -> Option<(Category, f64)> {
        Self::spending_by_category(receipts).top()
    }

    /// Breakdown sorted by amount (descending, stable) with percentages of the total.
    pub fn category_shares(receipts: &[Receipt]) -> Vec<CategoryShare> {
        let total = Self::total_spending(receipts);
        let mut shares: Vec<CategoryShare> = Self::spending_by_category(receipts)
            .iter()
            .map(|(category, amount)| CategoryShare {
                category,
                amount,
                percentage: percentage_of(amount, total),
            })
            .collect();
        shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        shares
    }
}

fn percentage_of(amount: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    ((amount / total) * 100.0).round().max(0.0) as u32
}
