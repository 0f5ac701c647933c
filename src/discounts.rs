//! Discounts
//!
//! Expiry-based discounting: a read-only table mapping days-until-expiry to a
//! discount rate, and the price calculation that applies it.

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::catalog::Product;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// A rate calculation could not be safely represented in minor units.
    #[error("discount rate conversion overflowed or was not finite")]
    RateConversion,
}

/// A table mapping days-until-expiry to a discount rate.
///
/// Lookups fail open: a missing key means no discount.
#[derive(Debug, Clone, Default)]
pub struct DiscountPolicy {
    rates: FxHashMap<i64, Percentage>,
}

impl DiscountPolicy {
    /// Build a policy from `(days-left, rate)` pairs.
    pub fn new(rates: impl IntoIterator<Item = (i64, Percentage)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// The configured rate for a days-left bucket, zero when absent.
    fn bucket_rate(&self, days_left: i64) -> Percentage {
        self.rates
            .get(&days_left)
            .copied()
            .unwrap_or_else(|| Percentage::from(0.0))
    }

    /// The discount rate applicable to a product on the given day.
    ///
    /// Products without an expiration date, and products whose expiry is at
    /// least `warning_days` away, are never discounted. Inside the warning
    /// window the days-left value is classified into exactly three buckets:
    /// `<= 0` (due today or past), `== 1` and `== 2`. Anything else falls
    /// through to a zero rate, as does a bucket missing from the table.
    #[must_use]
    pub fn rate_for(&self, product: &Product<'_>, warning_days: i64, today: Date) -> Percentage {
        let Some(days_left) = product.days_until_expiration(today) else {
            return Percentage::from(0.0);
        };

        if days_left >= warning_days {
            return Percentage::from(0.0);
        }

        match days_left {
            days if days <= 0 => self.bucket_rate(0),
            1 => self.bucket_rate(1),
            2 => self.bucket_rate(2),
            _ => Percentage::from(0.0),
        }
    }

    /// The product price after applying the applicable discount rate.
    ///
    /// The final minor-unit amount is `floor(price * (1 - rate))`, truncating
    /// toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::RateConversion`] if the decimal calculation
    /// cannot be represented in minor units. Missing policy keys are not an
    /// error; they fall through to a zero rate.
    pub fn discounted_price<'a>(
        &self,
        product: &Product<'a>,
        warning_days: i64,
        today: Date,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let rate = self.rate_for(product, warning_days, today);
        let keep = Decimal::ONE - rate * Decimal::ONE;

        let price_minor = Decimal::from(product.price().to_minor_units());

        let discounted = price_minor
            .checked_mul(keep)
            .ok_or(DiscountError::RateConversion)?;

        let minor = discounted
            .trunc()
            .to_i64()
            .ok_or(DiscountError::RateConversion)?;

        Ok(Money::from_minor(minor, product.price().currency()))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::KRW};
    use testresult::TestResult;

    use crate::catalog::Category;

    use super::*;

    const WARNING_DAYS: i64 = 3;

    fn test_policy() -> DiscountPolicy {
        DiscountPolicy::new([
            (3, Percentage::from(0.0)),
            (2, Percentage::from(0.3)),
            (1, Percentage::from(0.5)),
            (0, Percentage::from(0.7)),
        ])
    }

    fn food_expiring<'a>(minor: i64, expires_on: Date) -> Product<'a> {
        Product::new("lunchbox", Money::from_minor(minor, KRW), Category::Food, 20)
            .with_expiry(expires_on)
    }

    fn rate_points(rate: Percentage) -> Decimal {
        rate * Decimal::ONE
    }

    #[test]
    fn no_expiry_means_no_discount() {
        let today = date(2025, 6, 2);
        let product = Product::new("crisps", Money::from_minor(1500, KRW), Category::Snack, 20);

        let rate = test_policy().rate_for(&product, WARNING_DAYS, today);

        assert_eq!(rate_points(rate), Decimal::ZERO);
    }

    #[test]
    fn outside_warning_window_means_no_discount() {
        let today = date(2025, 6, 2);
        let product = food_expiring(5500, date(2025, 6, 5));

        let rate = test_policy().rate_for(&product, WARNING_DAYS, today);

        assert_eq!(rate_points(rate), Decimal::ZERO);
    }

    #[test]
    fn buckets_map_to_configured_rates() {
        let today = date(2025, 6, 2);
        let policy = test_policy();

        let due_today = food_expiring(5500, today);
        let one_day = food_expiring(5500, date(2025, 6, 3));
        let two_days = food_expiring(5500, date(2025, 6, 4));

        assert_eq!(
            rate_points(policy.rate_for(&due_today, WARNING_DAYS, today)),
            Decimal::new(7, 1)
        );
        assert_eq!(
            rate_points(policy.rate_for(&one_day, WARNING_DAYS, today)),
            Decimal::new(5, 1)
        );
        assert_eq!(
            rate_points(policy.rate_for(&two_days, WARNING_DAYS, today)),
            Decimal::new(3, 1)
        );
    }

    #[test]
    fn expired_products_use_the_due_today_bucket() {
        let today = date(2025, 6, 2);
        let product = food_expiring(5500, date(2025, 5, 30));

        let rate = test_policy().rate_for(&product, WARNING_DAYS, today);

        assert_eq!(rate_points(rate), Decimal::new(7, 1));
    }

    #[test]
    fn days_left_outside_buckets_falls_through_to_zero() {
        // A wider warning window than the table covers: 4 days left is
        // inside the window but matches no bucket.
        let today = date(2025, 6, 2);
        let product = food_expiring(5500, date(2025, 6, 6));

        let rate = test_policy().rate_for(&product, 5, today);

        assert_eq!(rate_points(rate), Decimal::ZERO);
    }

    #[test]
    fn missing_bucket_key_fails_open() {
        let today = date(2025, 6, 2);
        let policy = DiscountPolicy::new([(0, Percentage::from(0.7))]);
        let one_day = food_expiring(5500, date(2025, 6, 3));

        let rate = policy.rate_for(&one_day, WARNING_DAYS, today);

        assert_eq!(rate_points(rate), Decimal::ZERO);
    }

    #[test]
    fn discounted_price_applies_rate() -> TestResult {
        let today = date(2025, 6, 2);
        let product = food_expiring(2800, today);

        let discounted = test_policy().discounted_price(&product, WARNING_DAYS, today)?;

        assert_eq!(discounted, Money::from_minor(840, KRW));

        Ok(())
    }

    #[test]
    fn discounted_price_truncates_toward_zero() -> TestResult {
        let today = date(2025, 6, 2);
        let policy = DiscountPolicy::new([(1, Percentage::from(0.333))]);
        let product = food_expiring(999, date(2025, 6, 3));

        // 999 * 0.667 = 666.333, floored to 666.
        let discounted = policy.discounted_price(&product, WARNING_DAYS, today)?;

        assert_eq!(discounted, Money::from_minor(666, KRW));

        Ok(())
    }

    #[test]
    fn undiscounted_price_is_unchanged() -> TestResult {
        let today = date(2025, 6, 2);
        let product = Product::new("water", Money::from_minor(1000, KRW), Category::Beverage, 32);

        let discounted = test_policy().discounted_price(&product, WARNING_DAYS, today)?;

        assert_eq!(discounted, Money::from_minor(1000, KRW));

        Ok(())
    }
}
