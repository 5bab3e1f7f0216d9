// 💾 CSV export/import for stage tables
//
// Header row = column names. Dates are YYYY-MM-DD. A blank cell is a missing
// value in both directions.

use crate::entities::{Location, ProductCategory};
use crate::error::{PipelineError, Result};
use crate::table::{AggregateTable, Column, Table, Transaction};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// WRITING
// ============================================================================

pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns().iter().map(|c| c.name()))?;

    for tx in table.iter() {
        wtr.write_record(
            table
                .columns()
                .iter()
                .map(|c| tx.cell(*c).unwrap_or_default()),
        )?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_aggregate<W: Write>(writer: W, aggregate: &AggregateTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(aggregate.columns())?;

    for row in aggregate.rows() {
        wtr.write_record([row.product_category.to_string(), row.amount.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    write_table(File::create(path)?, table)?;
    debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

pub fn write_aggregate_csv(path: &Path, aggregate: &AggregateTable) -> Result<()> {
    write_aggregate(File::create(path)?, aggregate)?;
    debug!(path = %path.display(), rows = aggregate.len(), "wrote aggregate");
    Ok(())
}

// ============================================================================
// READING
// ============================================================================

fn invalid(column: Column, value: &str) -> PipelineError {
    PipelineError::InvalidValue {
        column: column.name().to_string(),
        value: value.to_string(),
    }
}

/// Parse a non-blank cell; blank means missing.
fn parse_cell<T: FromStr>(column: Column, raw: &str) -> Result<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| invalid(column, raw))
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid(Column::TransactionDate, raw))
}

/// Read a transaction table. Every base column must be present in the
/// header exactly once; `transaction_year` is optional. Transaction ids
/// must be unique.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::Reader::from_reader(reader);

    let columns = rdr
        .headers()?
        .iter()
        .map(|name| {
            Column::from_name(name).ok_or_else(|| PipelineError::InvalidValue {
                column: "header".to_string(),
                value: name.to_string(),
            })
        })
        .collect::<Result<Vec<Column>>>()?;

    let mut seen_columns = HashSet::new();
    if let Some(repeated) = columns.iter().find(|c| !seen_columns.insert(**c)) {
        return Err(PipelineError::InvalidValue {
            column: "header".to_string(),
            value: repeated.name().to_string(),
        });
    }

    if let Some(absent) = Column::BASE.iter().find(|c| !columns.contains(*c)) {
        return Err(PipelineError::InvalidArgument(format!(
            "CSV is missing column '{}'",
            absent
        )));
    }

    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();
    for result in rdr.records() {
        let row = result?;
        let mut tx = Transaction {
            transaction_id: 0,
            customer_id: None,
            transaction_date: None,
            amount: None,
            product_category: None,
            location: None,
            transaction_year: None,
        };

        for (column, raw) in columns.iter().zip(row.iter()) {
            match column {
                Column::TransactionId => {
                    tx.transaction_id =
                        parse_cell(*column, raw)?.ok_or_else(|| invalid(*column, raw))?;
                }
                Column::CustomerId => tx.customer_id = parse_cell(*column, raw)?,
                Column::TransactionDate => tx.transaction_date = parse_date(raw)?,
                Column::Amount => tx.amount = parse_cell(*column, raw)?,
                Column::ProductCategory => {
                    tx.product_category = parse_cell::<ProductCategory>(*column, raw)?
                }
                Column::Location => tx.location = parse_cell::<Location>(*column, raw)?,
                Column::TransactionYear => tx.transaction_year = parse_cell(*column, raw)?,
            }
        }

        if !seen_ids.insert(tx.transaction_id) {
            return Err(invalid(
                Column::TransactionId,
                &tx.transaction_id.to_string(),
            ));
        }

        records.push(tx);
    }

    debug!(rows = records.len(), "read table from CSV");
    Ok(Table::with_columns(columns, records))
}

pub fn read_table_csv(path: &Path) -> Result<Table> {
    read_table(File::open(path)?)
}
