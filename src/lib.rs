//! Stocktake
//!
//! A single-location retail inventory report generator. A fixed in-memory
//! catalog of products is reduced by one day's recorded sales, then a
//! six-section report is written: restock alerts, expiry-based discounts,
//! best sellers, a revenue summary, business analysis and overall status.

pub mod catalog;
pub mod discounts;
pub mod fixtures;
pub mod pricing;
pub mod report;
pub mod sales;
