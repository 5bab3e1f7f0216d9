// 🎲 Generator - synthetic transaction tables
//
// Randomness is always injected. generate_seeded() is the reproducible
// entry point the runner and tests use.

use crate::entities::{Location, ProductCategory};
use crate::error::{PipelineError, Result};
use crate::table::{Table, Transaction};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use tracing::{debug, instrument};

pub const CUSTOMER_ID_RANGE: Range<u32> = 1000..2000;
pub const AMOUNT_RANGE: Range<f64> = 10.0..1000.0;

/// Length of the date window starting at [`window_start`].
pub const DATE_WINDOW_DAYS: i64 = 365;

/// First day a generated transaction can fall on.
pub fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("2023-01-01 is a valid date")
}

/// Last day a generated transaction can fall on (inclusive).
pub fn window_end() -> NaiveDate {
    window_start() + Duration::days(DATE_WINDOW_DAYS - 1)
}

/// Build a table of `row_count` fully populated records.
///
/// Ids run 1..=row_count in generation order; every other field is drawn
/// uniformly from its domain. A zero row count is rejected.
#[instrument(level = "debug", skip(rng))]
pub fn generate<R: Rng>(row_count: usize, rng: &mut R) -> Result<Table> {
    if row_count == 0 {
        return Err(PipelineError::InvalidArgument(
            "row_count must be a positive integer, got 0".to_string(),
        ));
    }

    let start = window_start();
    let records: Vec<Transaction> = (1..=row_count as u64)
        .map(|id| {
            let customer_id = rng.gen_range(CUSTOMER_ID_RANGE);
            let day_offset = rng.gen_range(0..DATE_WINDOW_DAYS);
            let amount = rng.gen_range(AMOUNT_RANGE);
            let category = ProductCategory::ALL[rng.gen_range(0..ProductCategory::ALL.len())];
            let location = Location::ALL[rng.gen_range(0..Location::ALL.len())];

            Transaction::new(
                id,
                customer_id,
                start + Duration::days(day_offset),
                amount,
                category,
                location,
            )
        })
        .collect();

    debug!(rows = records.len(), "generated transactions");
    Ok(Table::new(records))
}

/// Same as [`generate`] with a `StdRng` seeded from `seed`.
pub fn generate_seeded(row_count: usize, seed: u64) -> Result<Table> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(row_count, &mut rng)
}
