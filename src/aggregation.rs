// 📊 Aggregator - total amount per product category
//
// Output rows are sorted by category display name so the same input always
// produces the same table: Books, Clothing, Electronics, Home Goods.

use crate::error::{PipelineError, Result};
use crate::table::{AggregateRow, AggregateTable, Table};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Group by `product_category` and sum `amount`.
///
/// Categories without records do not appear. Records without a category
/// are left out of every group; a missing amount adds nothing to its group.
/// An empty input table is an error.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn aggregate(table: &Table) -> Result<AggregateTable> {
    if table.is_empty() {
        return Err(PipelineError::EmptyInput { stage: "aggregate" });
    }

    let mut groups: BTreeMap<&'static str, AggregateRow> = BTreeMap::new();
    let mut uncategorised = 0usize;

    for tx in table.iter() {
        let Some(category) = tx.product_category else {
            uncategorised += 1;
            continue;
        };

        let row = groups.entry(category.as_str()).or_insert(AggregateRow {
            product_category: category,
            amount: 0.0,
            transactions: 0,
        });
        row.transactions += 1;
        if let Some(amount) = tx.amount.filter(|a| !a.is_nan()) {
            row.amount += amount;
        }
    }

    if uncategorised > 0 {
        warn!(uncategorised, "records without a category were not aggregated");
    }

    let rows: Vec<AggregateRow> = groups.into_values().collect();
    debug!(groups = rows.len(), "aggregated categories");
    Ok(AggregateTable::new(rows))
}
