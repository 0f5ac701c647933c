//! Fixtures
//!
//! The bundled corner-store dataset: one day's catalog, closing sales tally,
//! discount policy and report thresholds, all literal values anchored to a
//! caller-supplied report day.

use decimal_percentage::Percentage;
use jiff::{Span, civil::Date};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::KRW};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, Category, Product},
    discounts::DiscountPolicy,
    report::ReportConfig,
    sales::SalesRecord,
};

/// Fixture construction errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A relative expiration date fell outside the representable range.
    #[error(transparent)]
    Date(#[from] jiff::Error),

    /// Catalog construction error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// One day's worth of store data, ready for a report run.
#[derive(Debug)]
pub struct Fixture<'a> {
    /// The product catalog at day start.
    pub catalog: Catalog<'a>,

    /// The day's closing sales tally.
    pub sales: SalesRecord,

    /// The expiry discount policy.
    pub policy: DiscountPolicy,

    /// Report thresholds and presentation settings.
    pub config: ReportConfig,
}

impl Fixture<'_> {
    /// The bundled corner-store dataset, with expirations anchored to the
    /// given report day.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if a relative date cannot be computed or
    /// the catalog is invalid; neither happens for any representable `today`.
    pub fn corner_store(today: Date) -> Result<Self, FixtureError> {
        let in_one_day = today.checked_add(Span::new().days(1))?;
        let in_two_days = today.checked_add(Span::new().days(2))?;

        let catalog = Catalog::with_products(
            vec![
                Product::new("새우깡", Money::from_minor(1500, KRW), Category::Snack, 20)
                    .with_initial_stock(30),
                Product::new(
                    "콜라 500ml",
                    Money::from_minor(1500, KRW),
                    Category::Beverage,
                    20,
                ),
                Product::new(
                    "김치찌개 도시락",
                    Money::from_minor(5500, KRW),
                    Category::Food,
                    20,
                )
                .with_expiry(in_two_days),
                Product::new(
                    "참치마요 삼각김밥",
                    Money::from_minor(1500, KRW),
                    Category::Food,
                    22,
                )
                .with_expiry(in_one_day),
                Product::new(
                    "딸기 샌드위치",
                    Money::from_minor(2800, KRW),
                    Category::Food,
                    5,
                )
                .with_expiry(today)
                .with_initial_stock(10),
                Product::new(
                    "물 500ml",
                    Money::from_minor(1000, KRW),
                    Category::Beverage,
                    32,
                ),
                Product::new("초코파이", Money::from_minor(3000, KRW), Category::Snack, 23),
                Product::new("즉석라면", Money::from_minor(1200, KRW), Category::Food, 45),
            ],
            KRW,
        )?;

        let sales = SalesRecord::from_pairs([
            ("새우깡", 15),
            ("콜라 500ml", 12),
            ("참치마요 삼각김밥", 10),
            ("초코파이", 8),
            ("물 500ml", 7),
            ("딸기 샌드위치", 3),
            ("김치찌개 도시락", 17),
        ]);

        let policy = DiscountPolicy::new([
            (3, Percentage::from(0.0)),
            (2, Percentage::from(0.3)),
            (1, Percentage::from(0.5)),
            (0, Percentage::from(0.7)),
        ]);

        let config = ReportConfig {
            stock_threshold: Decimal::new(3, 1),
            warning_days: 3,
            excess_stock_threshold: Decimal::new(7, 1),
            today,
            sales_display_order: [
                "새우깡",
                "콜라 500ml",
                "참치마요 삼각김밥",
                "초코파이",
                "물 500ml",
                "딸기 샌드위치",
                "김치찌개 도시락",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        };

        Ok(Fixture {
            catalog,
            sales,
            policy,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn corner_store_has_eight_products() -> TestResult {
        let fixture = Fixture::corner_store(date(2025, 6, 2))?;

        assert_eq!(fixture.catalog.len(), 8);
        assert_eq!(fixture.sales.len(), 7);

        Ok(())
    }

    #[test]
    fn expirations_are_anchored_to_today() -> TestResult {
        let today = date(2025, 6, 2);
        let fixture = Fixture::corner_store(today)?;

        let sandwich = fixture.catalog.get("딸기 샌드위치");
        let rice_ball = fixture.catalog.get("참치마요 삼각김밥");
        let lunchbox = fixture.catalog.get("김치찌개 도시락");

        assert_eq!(
            sandwich.and_then(|p| p.days_until_expiration(today)),
            Some(0)
        );
        assert_eq!(
            rice_ball.and_then(|p| p.days_until_expiration(today)),
            Some(1)
        );
        assert_eq!(
            lunchbox.and_then(|p| p.days_until_expiration(today)),
            Some(2)
        );

        Ok(())
    }

    #[test]
    fn shelf_stable_products_never_expire() -> TestResult {
        let today = date(2025, 6, 2);
        let fixture = Fixture::corner_store(today)?;

        assert_eq!(
            fixture
                .catalog
                .get("새우깡")
                .and_then(|p| p.days_until_expiration(today)),
            None
        );

        Ok(())
    }
}
