// 👀 Text previews of stage tables
//
// Dataframe-style head(): a positional index column, right-aligned cells,
// amounts to two decimals and NaN for missing values.

use crate::table::{AggregateTable, Column, Table, Transaction};

const MISSING: &str = "NaN";

fn format_cell(tx: &Transaction, column: Column) -> String {
    match column {
        Column::Amount => match tx.amount {
            Some(amount) if !amount.is_nan() => format!("{:.2}", amount),
            _ => MISSING.to_string(),
        },
        _ => tx.cell(column).unwrap_or_else(|| MISSING.to_string()),
    }
}

fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return format!("Empty table\nColumns: [{}]\n", headers.join(", "));
    }

    let index_width = (rows.len() - 1).to_string().len();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    out.push_str(&" ".repeat(index_width));
    for (h, w) in headers.iter().zip(&widths) {
        out.push_str(&format!("  {:>w$}", h, w = *w));
    }
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("{:<w$}", i, w = index_width));
        for (cell, w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", cell, w = *w));
        }
        out.push('\n');
    }

    out
}

/// First `n` rows of a transaction table.
pub fn render_table(table: &Table, n: usize) -> String {
    let headers: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
    let rows: Vec<Vec<String>> = table
        .head(n)
        .iter()
        .map(|tx| table.columns().iter().map(|c| format_cell(tx, *c)).collect())
        .collect();

    render_grid(&headers, &rows)
}

/// First `n` rows of an aggregate table.
pub fn render_aggregate(aggregate: &AggregateTable, n: usize) -> String {
    let rows: Vec<Vec<String>> = aggregate
        .rows()
        .iter()
        .take(n)
        .map(|r| vec![r.product_category.to_string(), format!("{:.2}", r.amount)])
        .collect();

    render_grid(aggregate.columns(), &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Location, ProductCategory};
    use crate::table::AggregateRow;
    use chrono::NaiveDate;

    fn sample(id: u64, amount: Option<f64>) -> Transaction {
        let mut tx = Transaction::new(
            id,
            1042,
            NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
            0.0,
            ProductCategory::HomeGoods,
            Location::NewYork,
        );
        tx.amount = amount;
        tx
    }

    #[test]
    fn test_preview_limits_rows() {
        let table = Table::new((1..=10).map(|id| sample(id, Some(12.345))).collect());
        let text = render_table(&table, 5);

        // header + 5 rows
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().next().unwrap().contains("product_category"));
        assert!(text.contains("12.35"));
        assert!(text.contains("Home Goods"));
    }

    #[test]
    fn test_missing_shows_nan() {
        let table = Table::new(vec![sample(1, None)]);
        let text = render_table(&table, 5);
        assert!(text.lines().nth(1).unwrap().contains("NaN"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let table = Table::new(vec![sample(1, Some(5.0)), sample(22, Some(1234.5))]);
        let text = render_table(&table, 5);
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{}", text);
    }

    #[test]
    fn test_aggregate_preview() {
        let agg = AggregateTable::new(vec![AggregateRow {
            product_category: ProductCategory::Books,
            amount: 1000.0,
            transactions: 3,
        }]);
        let text = render_aggregate(&agg, 5);

        assert_eq!(
            text,
            "   product_category   amount\n0             Books  1000.00\n"
        );
    }

    #[test]
    fn test_empty_table_preview() {
        let text = render_table(&Table::new(vec![]), 5);
        assert!(text.starts_with("Empty table"));
    }
}
