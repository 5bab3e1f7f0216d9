// 📋 Working table - transaction records plus an explicit column list
//
// transaction_id is row identity and always present. Every other source
// field is optional so imported data can carry gaps; generated data never
// does. transaction_year only exists once the transformer has run.

use crate::entities::{Location, ProductCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// COLUMNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    TransactionId,
    CustomerId,
    TransactionDate,
    Amount,
    ProductCategory,
    Location,
    TransactionYear,
}

impl Column {
    /// Columns every transaction table starts with.
    pub const BASE: [Column; 6] = [
        Column::TransactionId,
        Column::CustomerId,
        Column::TransactionDate,
        Column::Amount,
        Column::ProductCategory,
        Column::Location,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::TransactionId => "transaction_id",
            Column::CustomerId => "customer_id",
            Column::TransactionDate => "transaction_date",
            Column::Amount => "amount",
            Column::ProductCategory => "product_category",
            Column::Location => "location",
            Column::TransactionYear => "transaction_year",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::BASE
            .iter()
            .chain(std::iter::once(&Column::TransactionYear))
            .copied()
            .find(|c| c.name() == name.trim())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// TRANSACTION RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: u64,
    pub customer_id: Option<u32>,
    pub transaction_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub product_category: Option<ProductCategory>,
    pub location: Option<Location>,

    /// Derived by the transformer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_year: Option<i32>,
}

impl Transaction {
    /// Fully populated record, as the generator produces them.
    pub fn new(
        transaction_id: u64,
        customer_id: u32,
        transaction_date: NaiveDate,
        amount: f64,
        product_category: ProductCategory,
        location: Location,
    ) -> Self {
        Transaction {
            transaction_id,
            customer_id: Some(customer_id),
            transaction_date: Some(transaction_date),
            amount: Some(amount),
            product_category: Some(product_category),
            location: Some(location),
            transaction_year: None,
        }
    }

    /// True when `column` has no usable value. A NaN amount counts as missing.
    pub fn is_missing(&self, column: Column) -> bool {
        match column {
            Column::TransactionId => false,
            Column::CustomerId => self.customer_id.is_none(),
            Column::TransactionDate => self.transaction_date.is_none(),
            Column::Amount => self.amount.map_or(true, f64::is_nan),
            Column::ProductCategory => self.product_category.is_none(),
            Column::Location => self.location.is_none(),
            Column::TransactionYear => self.transaction_year.is_none(),
        }
    }

    /// Canonical text of one cell, `None` when missing.
    pub fn cell(&self, column: Column) -> Option<String> {
        if self.is_missing(column) {
            return None;
        }
        match column {
            Column::TransactionId => Some(self.transaction_id.to_string()),
            Column::CustomerId => self.customer_id.map(|v| v.to_string()),
            Column::TransactionDate => self
                .transaction_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            Column::Amount => self.amount.map(|v| v.to_string()),
            Column::ProductCategory => self.product_category.map(|c| c.to_string()),
            Column::Location => self.location.map(|l| l.to_string()),
            Column::TransactionYear => self.transaction_year.map(|y| y.to_string()),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Ordered records sharing one schema. Stages never mutate a table they
/// receive; they build a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    records: Vec<Transaction>,
}

impl Table {
    /// Table with the base transaction columns.
    pub fn new(records: Vec<Transaction>) -> Self {
        Table {
            columns: Column::BASE.to_vec(),
            records,
        }
    }

    pub fn with_columns(columns: Vec<Column>, records: Vec<Transaction>) -> Self {
        Table { columns, records }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Transaction] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn ids(&self) -> Vec<u64> {
        self.records.iter().map(|tx| tx.transaction_id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.records.iter()
    }
}

// ============================================================================
// AGGREGATE TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub product_category: ProductCategory,
    pub amount: f64,

    /// Number of records folded into this row
    pub transactions: usize,
}

/// Aggregator output: one row per category present, sorted by category name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateTable {
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub const COLUMNS: [&'static str; 2] = ["product_category", "amount"];

    pub fn new(rows: Vec<AggregateRow>) -> Self {
        AggregateTable { rows }
    }

    pub fn columns(&self) -> &[&'static str] {
        &Self::COLUMNS
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, category: ProductCategory) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| r.product_category == category)
    }

    /// Sum across every category.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.amount).sum()
    }
}
