//! Property tests for the four pipeline stages.

use approx::assert_relative_eq;
use chrono::{Datelike, Duration};
use proptest::prelude::*;
use std::collections::HashSet;
use transaction_pipeline::generator::{window_end, window_start};
use transaction_pipeline::{
    aggregate, clean, generate_seeded, transform, Location, Pipeline, PipelineConfig,
    PipelineError, ProductCategory, Table, Transaction,
};

// ============================================================================
// STRATEGIES
// ============================================================================

fn category() -> impl Strategy<Value = ProductCategory> {
    prop::sample::select(ProductCategory::ALL.to_vec())
}

fn location() -> impl Strategy<Value = Location> {
    prop::sample::select(Location::ALL.to_vec())
}

fn amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -50.0f64..1000.0,
        1 => Just(0.0),
        1 => Just(f64::NAN),
    ]
}

/// Tables with gaps, zero/negative amounts and NaN, like untrusted input.
fn dirty_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(
        (
            prop::option::weighted(0.9, 1000u32..2000),
            prop::option::weighted(
                0.9,
                (0i64..365).prop_map(|d| window_start() + Duration::days(d)),
            ),
            prop::option::weighted(0.9, amount()),
            prop::option::weighted(0.9, category()),
            prop::option::weighted(0.9, location()),
        ),
        0..60,
    )
    .prop_map(|rows| {
        Table::new(
            rows.into_iter()
                .enumerate()
                .map(|(i, (customer_id, transaction_date, amount, product_category, location))| {
                    Transaction {
                        transaction_id: i as u64 + 1,
                        customer_id,
                        transaction_date,
                        amount,
                        product_category,
                        location,
                        transaction_year: None,
                    }
                })
                .collect(),
        )
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generated_rows_are_complete_and_in_domain(n in 1usize..300, seed in any::<u64>()) {
        let table = generate_seeded(n, seed).unwrap();

        prop_assert_eq!(table.len(), n);
        prop_assert_eq!(table.ids(), (1..=n as u64).collect::<Vec<_>>());

        for tx in table.iter() {
            let customer = tx.customer_id.unwrap();
            prop_assert!((1000..2000).contains(&customer));

            let amount = tx.amount.unwrap();
            prop_assert!((10.0..1000.0).contains(&amount));

            let date = tx.transaction_date.unwrap();
            prop_assert!(date >= window_start() && date <= window_end());

            prop_assert!(tx.product_category.is_some());
            prop_assert!(tx.location.is_some());
        }
    }

    #[test]
    fn cleaning_is_idempotent(table in dirty_table()) {
        let once = clean(&table);
        let twice = clean(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn cleaning_keeps_an_ordered_subset_of_valid_rows(table in dirty_table()) {
        let cleaned = clean(&table);

        prop_assert!(cleaned.len() <= table.len());
        for tx in cleaned.iter() {
            prop_assert!(tx.amount.unwrap() > 0.0);
            prop_assert!(tx.customer_id.is_some());
            prop_assert!(tx.transaction_date.is_some());
            prop_assert!(tx.product_category.is_some());
            prop_assert!(tx.location.is_some());
        }

        // order-preserving subsequence, rows untouched
        let mut input = table.iter();
        for kept in cleaned.iter() {
            let original = input.find(|tx| tx.transaction_id == kept.transaction_id);
            prop_assert_eq!(original, Some(kept));
        }
    }

    #[test]
    fn transform_adds_year_or_fails_on_missing_date(table in dirty_table()) {
        let first_missing = table
            .iter()
            .find(|tx| tx.transaction_date.is_none())
            .map(|tx| tx.transaction_id);

        match (transform(&table), first_missing) {
            (Err(PipelineError::MissingField { transaction_id, field }), Some(id)) => {
                prop_assert_eq!(transaction_id, id);
                prop_assert_eq!(field, "transaction_date");
            }
            (Ok(out), None) => {
                prop_assert_eq!(out.len(), table.len());
                prop_assert_eq!(out.ids(), table.ids());
                for tx in out.iter() {
                    prop_assert_eq!(tx.transaction_year, tx.transaction_date.map(|d| d.year()));
                }
            }
            (other, missing) => {
                prop_assert!(false, "unexpected {:?} with missing date {:?}", other, missing);
            }
        }
    }

    #[test]
    fn aggregation_sums_each_present_category(table in dirty_table()) {
        if table.is_empty() {
            let rejected = matches!(aggregate(&table), Err(PipelineError::EmptyInput { .. }));
            prop_assert!(rejected);
            return Ok(());
        }

        let agg = aggregate(&table).unwrap();

        let present: HashSet<ProductCategory> =
            table.iter().filter_map(|tx| tx.product_category).collect();
        let reported: HashSet<ProductCategory> =
            agg.rows().iter().map(|r| r.product_category).collect();
        prop_assert_eq!(&present, &reported);
        prop_assert!(agg.len() <= 4);

        for row in agg.rows() {
            let expected: f64 = table
                .iter()
                .filter(|tx| tx.product_category == Some(row.product_category))
                .filter_map(|tx| tx.amount)
                .filter(|a| !a.is_nan())
                .sum();
            assert_relative_eq!(row.amount, expected, epsilon = 1e-9);
        }

        let names: Vec<&str> = agg.rows().iter().map(|r| r.product_category.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_end_to_end_with_fixed_seed() {
    let generated = generate_seeded(100, 2023).unwrap();
    let cleaned = clean(&generated);
    let transformed = transform(&cleaned).unwrap();
    let aggregated = aggregate(&transformed).unwrap();

    assert!(aggregated.len() <= 4);
    assert_eq!(aggregated.columns(), &["product_category", "amount"]);
    assert!(aggregated.rows().iter().all(|r| r.amount >= 0.0));
    assert_relative_eq!(
        aggregated.total(),
        generated.iter().filter_map(|tx| tx.amount).sum::<f64>(),
        epsilon = 1e-6
    );
}

#[test]
fn test_pipeline_runner_matches_manual_composition() {
    let run = Pipeline::new(PipelineConfig {
        rows: 100,
        seed: Some(2023),
        ..PipelineConfig::default()
    })
    .unwrap()
    .run()
    .unwrap();

    let generated = generate_seeded(100, 2023).unwrap();
    let manual = aggregate(&transform(&clean(&generated)).unwrap()).unwrap();

    assert_eq!(run.generated, generated);
    assert_eq!(run.aggregated, manual);
}

#[test]
fn test_books_only_table() {
    let date = window_start();
    let table = Table::new(vec![
        Transaction::new(1, 1100, date, 19.99, ProductCategory::Books, Location::Chicago),
        Transaction::new(2, 1200, date, 5.01, ProductCategory::Books, Location::Houston),
    ]);

    let agg = aggregate(&table).unwrap();

    assert_eq!(agg.len(), 1);
    assert_eq!(agg.rows()[0].product_category, ProductCategory::Books);
    assert_relative_eq!(agg.rows()[0].amount, 25.0, epsilon = 1e-9);
}

#[test]
fn test_stage_errors_propagate_unchanged() {
    assert!(matches!(
        generate_seeded(0, 1),
        Err(PipelineError::InvalidArgument(_))
    ));

    // a table where cleaning removes every row cannot be aggregated
    let mut tx = Transaction::new(
        1,
        1000,
        window_start(),
        10.0,
        ProductCategory::Clothing,
        Location::NewYork,
    );
    tx.amount = Some(-1.0);
    let emptied = transform(&clean(&Table::new(vec![tx]))).unwrap();

    assert!(matches!(
        aggregate(&emptied),
        Err(PipelineError::EmptyInput { stage: "aggregate" })
    ));
}
