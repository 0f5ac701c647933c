//! Pricing
//!
//! Revenue calculations over the catalog and a day's sales record.

use rusty_money::{Money, iso::Currency};

use crate::{
    catalog::{Catalog, Product},
    sales::SalesRecord,
};

/// Revenue for one sales line: `price * quantity`.
#[must_use]
pub fn line_revenue<'a>(product: &Product<'a>, quantity: i64) -> Money<'a, Currency> {
    let minor = product.price().to_minor_units() * quantity;

    Money::from_minor(minor, product.price().currency())
}

/// Total revenue for a day's sales.
///
/// Each entry is matched to a catalog product by name; unmatched entries
/// contribute nothing. Accumulated in minor units, so large totals stay in
/// range.
#[must_use]
pub fn total_revenue<'a>(catalog: &Catalog<'a>, sales: &SalesRecord) -> Money<'a, Currency> {
    let minor: i64 = sales
        .iter()
        .filter_map(|(name, quantity)| {
            catalog
                .get(name)
                .map(|product| product.price().to_minor_units() * quantity)
        })
        .sum();

    Money::from_minor(minor, catalog.currency())
}
