//! Daily inventory report for the bundled corner-store dataset.

use std::io;

use anyhow::Result;

use stocktake::{fixtures::Fixture, report::Report, sales::apply_sales};

fn main() -> Result<()> {
    let today = jiff::Zoned::now().date();

    let Fixture {
        mut catalog,
        sales,
        policy,
        config,
    } = Fixture::corner_store(today)?;

    apply_sales(&mut catalog, &sales);

    let report = Report::new(&catalog, &sales, &policy, &config);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report.write_to(&mut handle)?;

    Ok(())
}
