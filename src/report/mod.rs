//! Report
//!
//! The six-section daily report: restock alerts, expiring discounts, best
//! sellers, sales summary, business analysis and overall status. Every
//! section is an independent read-only pass over the already-updated catalog
//! and the day's sales record, written to an injected writer.

use std::io;

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::{Decimal, RoundingStrategy};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, Product},
    discounts::{DiscountError, DiscountPolicy},
    pricing::{line_revenue, total_revenue},
    sales::SalesRecord,
};

/// Number of entries shown in the best-sellers section.
const BEST_SELLER_COUNT: usize = 5;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error calculating a discounted price.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// IO error writing report output.
    #[error("IO error")]
    Io(#[from] io::Error),
}

/// Thresholds and presentation settings for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Stock-ratio threshold at or below which a product needs restocking.
    pub stock_threshold: Decimal,

    /// Products expiring in fewer than this many days are discounted.
    pub warning_days: i64,

    /// Stock-ratio threshold at or above which a product counts as excess
    /// stock in the business-analysis section.
    pub excess_stock_threshold: Decimal,

    /// The report day; expiry distances are measured from here.
    pub today: Date,

    /// Preset display order for the sales-summary breakdown. A literal list,
    /// not derived from the data; names absent from the sales record are
    /// skipped.
    pub sales_display_order: Vec<String>,
}

/// The daily report over a catalog and a day's sales.
#[derive(Debug)]
pub struct Report<'a> {
    catalog: &'a Catalog<'a>,
    sales: &'a SalesRecord,
    policy: &'a DiscountPolicy,
    config: &'a ReportConfig,
}

impl<'a> Report<'a> {
    /// Create a report over the given catalog, sales record and policy.
    #[must_use]
    pub fn new(
        catalog: &'a Catalog<'a>,
        sales: &'a SalesRecord,
        policy: &'a DiscountPolicy,
        config: &'a ReportConfig,
    ) -> Self {
        Self {
            catalog,
            sales,
            policy,
            config,
        }
    }

    /// Write the full six-section report.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if a discounted price cannot be calculated
    /// or the writer fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "Daily inventory report for {}", self.config.today)?;
        writeln!(out)?;

        self.write_restock_alerts(&mut out)?;
        writeln!(out)?;

        self.write_expiring_discounts(&mut out)?;
        writeln!(out)?;

        self.write_best_sellers(&mut out)?;
        writeln!(out)?;

        self.write_sales_summary(&mut out)?;
        writeln!(out)?;

        self.write_business_analysis(&mut out)?;
        writeln!(out)?;

        self.write_overall_status(&mut out)?;

        Ok(())
    }

    /// Products at or below the restock threshold, sorted by name.
    ///
    /// Products with a zero (or negative) day-start baseline are excluded,
    /// so the ratio never divides by zero.
    fn restock_candidates(&self) -> Vec<&Product<'a>> {
        let mut candidates: Vec<&Product<'a>> = self
            .catalog
            .iter()
            .filter(|product| {
                product
                    .stock_ratio()
                    .is_some_and(|ratio| ratio <= self.config.stock_threshold)
            })
            .collect();

        candidates.sort_by(|left, right| left.name().cmp(right.name()));

        candidates
    }

    /// Products inside the expiry warning window, most days left first.
    fn expiring_candidates(&self) -> Vec<(&Product<'a>, i64)> {
        let mut candidates: Vec<(&Product<'a>, i64)> = self
            .catalog
            .iter()
            .filter_map(|product| {
                product
                    .days_until_expiration(self.config.today)
                    .filter(|days_left| *days_left < self.config.warning_days)
                    .map(|days_left| (product, days_left))
            })
            .collect();

        candidates.sort_by_key(|(_, days_left)| std::cmp::Reverse(*days_left));

        candidates
    }

    fn write_restock_alerts(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let threshold = percent_label(self.config.stock_threshold);

        writeln!(out, "Restock alerts (stock ratio at or below {threshold}%)")?;

        let candidates = self.restock_candidates();

        if candidates.is_empty() {
            writeln!(out, "  (none)")?;
            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Product", "Category", "Stock", "Day start", "Reorder", "Ratio"]);

        for product in candidates {
            let ratio = product.stock_ratio().unwrap_or(Decimal::ZERO);
            let points = ratio_percent_points(ratio);
            let reorder = product.initial_stock() - product.stock();

            builder.push_record([
                product.name().to_string(),
                product.category().label().to_string(),
                product.stock().to_string(),
                product.initial_stock().to_string(),
                reorder.to_string(),
                format!("{points:.2}%"),
            ]);
        }

        write_table(out, builder, 2..6)
    }

    fn write_expiring_discounts(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(
            out,
            "Expiring discounts (within {} days)",
            self.config.warning_days
        )?;

        let candidates = self.expiring_candidates();

        if candidates.is_empty() {
            writeln!(out, "  (none)")?;
            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Product", "Expires", "Rate", "Price", "Discounted"]);

        for (product, days_left) in candidates {
            let rate = self
                .policy
                .rate_for(product, self.config.warning_days, self.config.today);

            let discounted = self.policy.discounted_price(
                product,
                self.config.warning_days,
                self.config.today,
            )?;

            builder.push_record([
                product.name().to_string(),
                days_left_label(days_left),
                format!("{}%", rate_percent_truncated(rate)),
                format!("{}", product.price()),
                format!("{discounted}"),
            ]);
        }

        write_table(out, builder, 2..5)
    }

    fn write_best_sellers(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "Best sellers (top {BEST_SELLER_COUNT})")?;

        let ranked = self.sales.ranked();

        if ranked.is_empty() {
            writeln!(out, "  (none)")?;
            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Product", "Units", "Revenue"]);

        // Rank follows the position in the ranked tally, so an entry with no
        // matching product still consumes its rank.
        for (rank, (name, quantity)) in ranked.into_iter().take(BEST_SELLER_COUNT).enumerate() {
            let Some(product) = self.catalog.get(name) else {
                continue;
            };

            let revenue = line_revenue(product, quantity);

            builder.push_record([
                (rank + 1).to_string(),
                name.to_string(),
                quantity.to_string(),
                format!("{revenue}"),
            ]);
        }

        write_table(out, builder, 2..4)
    }

    fn write_sales_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "Sales summary")?;

        let total = total_revenue(self.catalog, self.sales);
        let units = self.sales.total_units();

        writeln!(out, "  Total revenue: {total} ({units} units sold)")?;

        let mut builder = Builder::default();

        builder.push_record(["Product", "Revenue", "Units", "Unit price"]);

        let mut rows = 0usize;

        for name in &self.config.sales_display_order {
            if !self.sales.contains(name) {
                continue;
            }

            let Some(product) = self.catalog.get(name) else {
                continue;
            };

            let quantity = self.sales.quantity_sold(name);
            let revenue = line_revenue(product, quantity);

            builder.push_record([
                name.clone(),
                format!("{revenue}"),
                quantity.to_string(),
                format!("{}", product.price()),
            ]);

            rows += 1;
        }

        if rows == 0 {
            writeln!(out, "  (no itemised sales)")?;
            return Ok(());
        }

        write_table(out, builder, 1..4)
    }

    fn write_business_analysis(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "Business analysis")?;

        let (highest, lowest) = self.turnover_extremes();

        if let Some(highest) = highest {
            writeln!(
                out,
                "  - Highest turnover: {} (stock {}, sold {}, {}% turnover)",
                highest.product.name(),
                highest.product.stock(),
                highest.units,
                highest.points
            )?;
        } else {
            writeln!(out, "  - Highest turnover: (no sales recorded)")?;
        }

        if let Some(lowest) = lowest {
            writeln!(
                out,
                "  - Lowest turnover: {} (stock {}, sold {}, {}% turnover)",
                lowest.product.name(),
                lowest.product.stock(),
                lowest.units,
                lowest.points
            )?;
        } else {
            writeln!(out, "  - Lowest turnover: (no products in stock)")?;
        }

        if let Some(best) = self.best_efficiency() {
            let available = best.product.stock() + best.units;

            writeln!(
                out,
                "  - Best sales efficiency: {} (sold {} of {} available, {}% efficiency)",
                best.product.name(),
                best.units,
                available,
                best.points
            )?;
        } else {
            writeln!(out, "  - Best sales efficiency: (no sales recorded)")?;
        }

        let excess = self.excess_stock();

        if excess.is_empty() {
            writeln!(out, "  - Excess stock: (none)")?;
        } else {
            let listed: SmallVec<[String; 8]> = excess
                .iter()
                .map(|product| format!("{} ({})", product.name(), product.stock()))
                .collect();

            writeln!(out, "  - Excess stock: {}", listed.join(", "))?;
        }

        let candidates = self.restock_candidates();
        let reorder_units: i64 = candidates
            .iter()
            .map(|product| product.initial_stock() - product.stock())
            .sum();

        writeln!(
            out,
            "  - Reorder recommendation: {} products, {} units",
            candidates.len(),
            reorder_units
        )?;

        Ok(())
    }

    fn write_overall_status(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "Overall status")?;
        writeln!(out, "  - Products registered: {}", self.catalog.len())?;

        let breakdown: SmallVec<[String; 8]> = self
            .catalog
            .iter()
            .map(|product| format!("{} {}", product.name(), product.stock()))
            .collect();

        writeln!(
            out,
            "  - Stock on hand: {} ({})",
            self.catalog.total_stock(),
            breakdown.join(" + ")
        )?;

        writeln!(
            out,
            "  - Inventory value: {}",
            self.catalog.inventory_value()
        )?;

        writeln!(
            out,
            "  - Low-stock products: {} (at or below {}%)",
            self.restock_candidates().len(),
            percent_label(self.config.stock_threshold)
        )?;

        writeln!(
            out,
            "  - Expiring soon: {} (within {} days)",
            self.expiring_candidates().len(),
            self.config.warning_days
        )?;

        writeln!(out, "  - Units sold today: {}", self.sales.total_units())?;

        Ok(())
    }

    /// The products with the highest and lowest turnover rate.
    ///
    /// Turnover is `units sold / current stock`, truncated to whole percent
    /// points. Products with no stock are skipped; unsold products count as
    /// 0% and so anchor the low end. The highest slot only considers
    /// products that actually sold. Ties keep the first product in catalog
    /// order.
    fn turnover_extremes(&self) -> (Option<Metric<'_, 'a>>, Option<Metric<'_, 'a>>) {
        let mut highest: Option<Metric<'_, 'a>> = None;
        let mut lowest: Option<Metric<'_, 'a>> = None;

        for product in self.catalog.iter() {
            let units = self.sales.quantity_sold(product.name());

            let Some(points) = turnover_percent(units, product.stock()) else {
                continue;
            };

            let metric = Metric {
                product,
                units,
                points,
            };

            if units > 0 && highest.as_ref().is_none_or(|best| points > best.points) {
                highest = Some(metric.clone());
            }

            if lowest.as_ref().is_none_or(|worst| points < worst.points) {
                lowest = Some(metric);
            }
        }

        (highest, lowest)
    }

    /// The product converting its available stock into sales fastest.
    ///
    /// Efficiency is `units sold / (current stock + units sold)`, truncated
    /// to whole percent points. Only sold products are considered.
    fn best_efficiency(&self) -> Option<Metric<'_, 'a>> {
        let mut best: Option<Metric<'_, 'a>> = None;

        for product in self.catalog.iter() {
            let units = self.sales.quantity_sold(product.name());

            if units <= 0 {
                continue;
            }

            let Some(points) = efficiency_percent(units, product.stock()) else {
                continue;
            };

            if best.as_ref().is_none_or(|current| points > current.points) {
                best = Some(Metric {
                    product,
                    units,
                    points,
                });
            }
        }

        best
    }

    /// Products holding excess stock, largest holdings first.
    fn excess_stock(&self) -> Vec<&Product<'a>> {
        let mut products: Vec<&Product<'a>> = self
            .catalog
            .iter()
            .filter(|product| {
                product
                    .stock_ratio()
                    .is_some_and(|ratio| ratio >= self.config.excess_stock_threshold)
            })
            .collect();

        products.sort_by_key(|product| std::cmp::Reverse(product.stock()));

        products
    }
}

/// A product paired with its sold units and a computed percent metric.
#[derive(Debug, Clone)]
struct Metric<'r, 'a> {
    product: &'r Product<'a>,
    units: i64,
    points: Decimal,
}

/// Render a section table: bold header row, a single separator under it and
/// right-aligned numeric columns.
fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: std::ops::Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric_columns), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Human label for a days-left value.
fn days_left_label(days_left: i64) -> String {
    if days_left <= 0 {
        "due today".to_string()
    } else if days_left == 1 {
        "1 day left".to_string()
    } else {
        format!("{days_left} days left")
    }
}

/// A stock ratio as percent points with two decimals, rounding half up.
fn ratio_percent_points(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A fractional discount rate as truncated whole percent points.
fn rate_percent_truncated(rate: Percentage) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).trunc()
}

/// A threshold fraction as a bare percent-points label (trailing zeros
/// stripped).
fn percent_label(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}

/// Turnover rate in truncated percent points, `None` when the product has no
/// stock to measure against.
fn turnover_percent(units: i64, stock: i64) -> Option<Decimal> {
    if stock <= 0 {
        return None;
    }

    Some((Decimal::from(units) / Decimal::from(stock) * Decimal::ONE_HUNDRED).trunc())
}

/// Sales efficiency in truncated percent points, `None` when no stock was
/// available at the start of the day.
fn efficiency_percent(units: i64, stock: i64) -> Option<Decimal> {
    let available = stock + units;

    if available <= 0 {
        return None;
    }

    Some((Decimal::from(units) / Decimal::from(available) * Decimal::ONE_HUNDRED).trunc())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::KRW};
    use testresult::TestResult;

    use crate::catalog::Category;

    use super::*;

    fn test_config() -> ReportConfig {
        ReportConfig {
            stock_threshold: Decimal::new(3, 1),
            warning_days: 3,
            excess_stock_threshold: Decimal::new(7, 1),
            today: date(2025, 6, 2),
            sales_display_order: vec!["crisps".to_string(), "cola".to_string()],
        }
    }

    fn test_catalog<'a>() -> Result<Catalog<'a>, crate::catalog::CatalogError> {
        Catalog::with_products(
            vec![
                Product::new("crisps", Money::from_minor(1500, KRW), Category::Snack, 5)
                    .with_initial_stock(30),
                Product::new("cola", Money::from_minor(1500, KRW), Category::Beverage, 8)
                    .with_initial_stock(20),
                Product::new("noodles", Money::from_minor(1200, KRW), Category::Food, 45),
            ],
            KRW,
        )
    }

    #[test]
    fn ratio_percent_points_rounds_half_up() {
        // 5/30 = 0.1666..., displayed as 16.67.
        let ratio = Decimal::from(5) / Decimal::from(30);

        assert_eq!(ratio_percent_points(ratio).to_string(), "16.67");
    }

    #[test]
    fn days_left_labels() {
        assert_eq!(days_left_label(0), "due today");
        assert_eq!(days_left_label(-2), "due today");
        assert_eq!(days_left_label(1), "1 day left");
        assert_eq!(days_left_label(2), "2 days left");
    }

    #[test]
    fn turnover_percent_truncates() {
        // 17/3 = 566.66...%, truncated to 566.
        assert_eq!(turnover_percent(17, 3), Some(Decimal::from(566)));
        assert_eq!(turnover_percent(5, 0), None);
    }

    #[test]
    fn efficiency_percent_truncates() {
        // 10/22 = 45.45...%, truncated to 45.
        assert_eq!(efficiency_percent(10, 12), Some(Decimal::from(45)));
        assert_eq!(efficiency_percent(0, 0), None);
    }

    #[test]
    fn restock_candidates_sorted_by_name() -> TestResult {
        let catalog = test_catalog()?;
        let sales = SalesRecord::default();
        let policy = DiscountPolicy::default();
        let config = test_config();
        let report = Report::new(&catalog, &sales, &policy, &config);

        // crisps at 5/30 and noodles at 45/45; only crisps is at or below 30%.
        let names: Vec<&str> = report
            .restock_candidates()
            .into_iter()
            .map(Product::name)
            .collect();

        assert_eq!(names, vec!["crisps"]);

        Ok(())
    }

    #[test]
    fn zero_baseline_products_never_alert() -> TestResult {
        let catalog = Catalog::with_products(
            vec![
                Product::new("sold out", Money::from_minor(1000, KRW), Category::Food, 0)
                    .with_initial_stock(0),
            ],
            KRW,
        )?;

        let sales = SalesRecord::default();
        let policy = DiscountPolicy::default();
        let config = test_config();
        let report = Report::new(&catalog, &sales, &policy, &config);

        assert!(report.restock_candidates().is_empty());

        Ok(())
    }

    #[test]
    fn expiring_candidates_most_days_first() -> TestResult {
        let today = date(2025, 6, 2);
        let catalog = Catalog::with_products(
            vec![
                Product::new("sandwich", Money::from_minor(2800, KRW), Category::Food, 5)
                    .with_expiry(today),
                Product::new("lunchbox", Money::from_minor(5500, KRW), Category::Food, 20)
                    .with_expiry(date(2025, 6, 4)),
                Product::new("rice ball", Money::from_minor(1500, KRW), Category::Food, 22)
                    .with_expiry(date(2025, 6, 3)),
                Product::new("water", Money::from_minor(1000, KRW), Category::Beverage, 32),
            ],
            KRW,
        )?;

        let sales = SalesRecord::default();
        let policy = DiscountPolicy::default();
        let config = test_config();
        let report = Report::new(&catalog, &sales, &policy, &config);

        let order: Vec<(&str, i64)> = report
            .expiring_candidates()
            .into_iter()
            .map(|(product, days_left)| (product.name(), days_left))
            .collect();

        assert_eq!(
            order,
            vec![("lunchbox", 2), ("rice ball", 1), ("sandwich", 0)]
        );

        Ok(())
    }

    #[test]
    fn empty_sections_render_placeholders() -> TestResult {
        let catalog = Catalog::with_products(Vec::new(), KRW)?;
        let sales = SalesRecord::default();
        let policy = DiscountPolicy::default();
        let config = test_config();
        let report = Report::new(&catalog, &sales, &policy, &config);

        let mut buffer = Vec::new();
        report.write_to(&mut buffer)?;

        let output = String::from_utf8(buffer)?;

        assert!(output.contains("Restock alerts"), "missing section header");
        assert!(output.contains("(none)"), "missing empty placeholder");
        assert!(
            output.contains("(no itemised sales)"),
            "missing empty sales breakdown"
        );

        Ok(())
    }
}
