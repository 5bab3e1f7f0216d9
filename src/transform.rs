// 🔧 Transformer - derive transaction_year from transaction_date

use crate::error::{PipelineError, Result};
use crate::table::{Column, Table, Transaction};
use chrono::Datelike;
use tracing::{debug, instrument};

/// Add `transaction_year` to every record.
///
/// Fails on the first record without a date; nothing is produced in that
/// case. Row count, order and all other fields pass through unchanged.
/// Running it on a table that already has the column recomputes it.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn transform(table: &Table) -> Result<Table> {
    let records = table
        .iter()
        .map(|tx| {
            let date = tx.transaction_date.ok_or_else(|| PipelineError::MissingField {
                transaction_id: tx.transaction_id,
                field: Column::TransactionDate.name(),
            })?;

            Ok(Transaction {
                transaction_year: Some(date.year()),
                ..tx.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut columns = table.columns().to_vec();
    if !columns.contains(&Column::TransactionYear) {
        columns.push(Column::TransactionYear);
    }

    debug!(rows = records.len(), "derived transaction_year");
    Ok(Table::with_columns(columns, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Location, ProductCategory};
    use chrono::NaiveDate;

    fn tx_on(id: u64, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            id,
            1001,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            10.0,
            ProductCategory::Electronics,
            Location::NewYork,
        )
    }

    #[test]
    fn test_year_added_for_every_row() {
        let table = Table::new(vec![
            tx_on(1, 2023, 1, 1),
            tx_on(2, 2023, 12, 31),
            tx_on(3, 2024, 2, 29),
        ]);

        let out = transform(&table).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out.ids(), table.ids());
        assert_eq!(out.columns().last(), Some(&Column::TransactionYear));
        let years: Vec<_> = out.iter().map(|tx| tx.transaction_year).collect();
        assert_eq!(years, vec![Some(2023), Some(2023), Some(2024)]);
    }

    #[test]
    fn test_other_fields_pass_through() {
        let table = Table::new(vec![tx_on(1, 2023, 5, 5)]);
        let out = transform(&table).unwrap();

        let mut expected = table.records()[0].clone();
        expected.transaction_year = Some(2023);
        assert_eq!(out.records()[0], expected);
        // input untouched
        assert_eq!(table.records()[0].transaction_year, None);
    }

    #[test]
    fn test_missing_date_fails() {
        let mut broken = tx_on(2, 2023, 1, 1);
        broken.transaction_date = None;
        let table = Table::new(vec![tx_on(1, 2023, 1, 1), broken]);

        match transform(&table) {
            Err(PipelineError::MissingField { transaction_id, field }) => {
                assert_eq!(transaction_id, 2);
                assert_eq!(field, "transaction_date");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_twice_keeps_single_column() {
        let table = Table::new(vec![tx_on(1, 2023, 7, 4)]);
        let once = transform(&table).unwrap();
        let twice = transform(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(
            twice.columns().iter().filter(|c| **c == Column::TransactionYear).count(),
            1
        );
    }

    #[test]
    fn test_empty_table_transforms_to_empty() {
        let out = transform(&Table::new(vec![])).unwrap();
        assert!(out.is_empty());
        assert!(out.has_column(Column::TransactionYear));
    }
}
