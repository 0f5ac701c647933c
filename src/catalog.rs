//! Catalog
//!
//! The catalog holds every product the store knows about, keyed by a
//! [`ProductKey`] with a name index for lookups by display name.

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product category.
///
/// A fixed enumeration; every product belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Prepared and fresh food.
    Food,

    /// Drinks.
    Beverage,

    /// Snacks and confectionery.
    Snack,
}

impl Category {
    /// Display label used in report output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Beverage => "Beverage",
            Category::Snack => "Snack",
        }
    }
}

/// A single product and its current state.
///
/// `initial_stock` is the day-start snapshot and never changes after
/// construction; `stock` is only mutated by applying a sales record.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    name: String,
    price: Money<'a, Currency>,
    category: Category,
    stock: i64,
    expires_on: Option<Date>,
    initial_stock: i64,
}

impl<'a> Product<'a> {
    /// Creates a new product with no expiration date.
    ///
    /// The initial-stock baseline defaults to the given stock level.
    pub fn new(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        category: Category,
        stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            category,
            stock,
            expires_on: None,
            initial_stock: stock,
        }
    }

    /// Sets the expiration date.
    #[must_use]
    pub fn with_expiry(mut self, expires_on: Date) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// Sets the day-start stock baseline when it differs from the current stock.
    #[must_use]
    pub fn with_initial_stock(mut self, initial_stock: i64) -> Self {
        self.initial_stock = initial_stock;
        self
    }

    /// The product name (unique within a catalog).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit price.
    #[must_use]
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// The product category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Current on-hand stock.
    #[must_use]
    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Day-start stock baseline.
    #[must_use]
    pub fn initial_stock(&self) -> i64 {
        self.initial_stock
    }

    /// The expiration date, if the product has one.
    #[must_use]
    pub fn expires_on(&self) -> Option<Date> {
        self.expires_on
    }

    /// Whole calendar days from `today` until the expiration date.
    ///
    /// Returns `None` for products without an expiration date. The value is a
    /// date difference, so it is negative for already-expired products and
    /// never affected by time-of-day.
    #[must_use]
    pub fn days_until_expiration(&self, today: Date) -> Option<i64> {
        self.expires_on
            .map(|expires_on| i64::from((expires_on - today).get_days()))
    }

    /// Current stock as a fraction of the day-start baseline.
    ///
    /// Returns `None` when the baseline is zero or negative, so callers never
    /// divide by zero.
    #[must_use]
    pub fn stock_ratio(&self) -> Option<Decimal> {
        if self.initial_stock > 0 {
            Some(Decimal::from(self.stock) / Decimal::from(self.initial_stock))
        } else {
            None
        }
    }

    /// Decrement stock by the given quantity.
    ///
    /// Deliberately unclamped: the day's tally is trusted, and a negative
    /// result is visible in the report rather than silently corrected.
    pub(crate) fn reduce_stock(&mut self, quantity: i64) {
        self.stock -= quantity;
    }
}

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency
    /// (product name, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// Two products share the same name.
    #[error("Duplicate product name: {0}")]
    DuplicateName(String),
}

/// The full set of known products and their current state.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    by_name: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog with the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: SlotMap::with_key(),
            by_name: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from the given products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a product's currency differs from the
    /// catalog currency, or if two products share a name.
    pub fn with_products(
        products: impl Into<Vec<Product<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(currency);

        for product in products.into() {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the product's currency differs from the
    /// catalog currency, or if its name is already taken.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.name().to_string(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.by_name.contains_key(product.name()) {
            return Err(CatalogError::DuplicateName(product.name().to_string()));
        }

        let name = product.name().to_string();
        let key = self.products.insert(product);

        self.by_name.insert(name, key);
        self.order.push(key);

        Ok(key)
    }

    /// Look up a product by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Product<'a>> {
        self.by_name
            .get(name)
            .and_then(|key| self.products.get(*key))
    }

    /// Look up a product by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Product<'a>> {
        self.by_name
            .get(name)
            .and_then(|key| self.products.get_mut(*key))
    }

    /// Iterate over products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The currency shared by every product in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of current stock across all products.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.iter().map(Product::stock).sum()
    }

    /// Monetary value of all stock on hand (`stock * price` summed).
    ///
    /// Accumulated in minor units, so large catalogs stay in range.
    #[must_use]
    pub fn inventory_value(&self) -> Money<'a, Currency> {
        let minor: i64 = self
            .iter()
            .map(|product| product.stock() * product.price().to_minor_units())
            .sum();

        Money::from_minor(minor, self.currency)
    }
}
