//! Sales
//!
//! A day's closing sales tally and the single pass that applies it to the
//! catalog.

use rustc_hash::FxHashMap;

use crate::catalog::Catalog;

/// A day's closing tally of units sold per product name.
///
/// Immutable after construction; this is a summary, not a transaction log.
#[derive(Debug, Clone, Default)]
pub struct SalesRecord {
    quantities: FxHashMap<String, i64>,
}

impl SalesRecord {
    /// Build a sales record from `(name, quantity)` pairs.
    ///
    /// Later entries for the same name replace earlier ones.
    pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (N, i64)>) -> Self {
        let quantities = pairs
            .into_iter()
            .map(|(name, quantity)| (name.into(), quantity))
            .collect();

        Self { quantities }
    }

    /// Units sold for the given product name, zero when absent.
    #[must_use]
    pub fn quantity_sold(&self, name: &str) -> i64 {
        self.quantities.get(name).copied().unwrap_or(0)
    }

    /// Whether the record contains an entry for the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.quantities.contains_key(name)
    }

    /// Iterate over `(name, quantity)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.quantities
            .iter()
            .map(|(name, quantity)| (name.as_str(), *quantity))
    }

    /// Number of distinct products sold.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Check whether any sales were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Total units sold across all products.
    #[must_use]
    pub fn total_units(&self) -> i64 {
        self.quantities.values().sum()
    }

    /// Entries ordered for best-seller display: quantity descending, ties
    /// broken by name ascending.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, i64)> {
        let mut entries: Vec<(&str, i64)> = self.iter().collect();

        entries.sort_by(|left, right| {
            right
                .1
                .cmp(&left.1)
                .then_with(|| left.0.cmp(right.0))
        });

        entries
    }
}

/// Apply a day's sales to the catalog, decrementing stock in place.
///
/// Entries whose name matches no catalog product are silently ignored. This
/// pass is not idempotent: applying the same record twice double-decrements.
pub fn apply_sales(catalog: &mut Catalog<'_>, sales: &SalesRecord) {
    for (name, quantity) in sales.iter() {
        if let Some(product) = catalog.get_mut(name) {
            product.reduce_stock(quantity);
        }
    }
}
