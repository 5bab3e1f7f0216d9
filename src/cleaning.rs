// 🧹 Cleaner - drop incomplete records and non-positive amounts
//
// Two rules, checked in order:
//   1. any column of the table missing a value (NaN amount included)
//   2. amount <= 0
// Survivors keep their order and are copied untouched.

use crate::table::{Column, Table, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ============================================================================
// DROP REASONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DropReason {
    /// A column of the table has no value for this record
    MissingField(String),

    /// Amount is zero or negative
    NonPositiveAmount(f64),
}

impl DropReason {
    pub fn describe(&self) -> String {
        match self {
            DropReason::MissingField(field) => format!("missing {}", field),
            DropReason::NonPositiveAmount(amount) => format!("amount {:.2} <= 0", amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRecord {
    pub transaction_id: u64,
    pub reason: DropReason,
}

// ============================================================================
// CLEANING REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub kept_rows: usize,
    pub missing_field_count: usize,
    pub non_positive_amount_count: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl CleaningReport {
    pub fn dropped_rows(&self) -> usize {
        self.input_rows - self.kept_rows
    }

    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows in, {} kept, {} dropped ({} missing field, {} non-positive amount)",
            self.input_rows,
            self.kept_rows,
            self.dropped_rows(),
            self.missing_field_count,
            self.non_positive_amount_count
        )
    }
}

// ============================================================================
// CLEANER
// ============================================================================

/// Why `tx` must be dropped from a table with `columns`, if at all.
fn check(tx: &Transaction, columns: &[Column]) -> Option<DropReason> {
    if let Some(column) = columns.iter().find(|c| tx.is_missing(**c)) {
        return Some(DropReason::MissingField(column.name().to_string()));
    }

    match tx.amount {
        Some(amount) if amount <= 0.0 => Some(DropReason::NonPositiveAmount(amount)),
        _ => None,
    }
}

/// Remove invalid records. Idempotent; the input is not modified.
pub fn clean(table: &Table) -> Table {
    clean_with_report(table).0
}

/// [`clean`], also returning what was dropped and why.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn clean_with_report(table: &Table) -> (Table, CleaningReport) {
    let mut report = CleaningReport {
        input_rows: table.len(),
        ..CleaningReport::default()
    };
    let mut kept = Vec::with_capacity(table.len());

    for tx in table.iter() {
        match check(tx, table.columns()) {
            None => kept.push(tx.clone()),
            Some(reason) => {
                debug!(
                    transaction_id = tx.transaction_id,
                    reason = %reason.describe(),
                    "dropping record"
                );
                match reason {
                    DropReason::MissingField(_) => report.missing_field_count += 1,
                    DropReason::NonPositiveAmount(_) => report.non_positive_amount_count += 1,
                }
                report.dropped.push(DroppedRecord {
                    transaction_id: tx.transaction_id,
                    reason,
                });
            }
        }
    }

    report.kept_rows = kept.len();
    info!(summary = %report.summary(), "cleaning finished");

    (Table::with_columns(table.columns().to_vec(), kept), report)
}

// ============================================================================
// TESTS
// ============================================================================
