//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
use tempfile::TempDir;

const DEAL_TYPES: [&str; 3] = ["Acquisition", "Merger", "Tender Offer"];
const PAYMENT_TYPES: [&str; 3] = ["Cash", "Mixed", "Stock"];

/// Create a deal history with known characteristics for testing
///
/// This DataFrame has 40 rows:
/// - every 10th deal is `Pending` (4 rows, dropped as unresolved)
/// - the rest are `Terminated` when `i % 3 == 0`, otherwise `Completed`
/// - row 5 has no `Deal Premium` and row 11 has no `Deal Type`
/// - hostile bids only appear on terminated deals
/// - `Target Name` is an extra column the pipeline ignores
pub fn create_deal_dataframe() -> DataFrame {
    create_deal_dataframe_with_rows(40)
}

/// Same pattern as [`create_deal_dataframe`] for any number of rows
pub fn create_deal_dataframe_with_rows(rows: usize) -> DataFrame {
    let mut names = Vec::with_capacity(rows);
    let mut status = Vec::with_capacity(rows);
    let mut size = Vec::with_capacity(rows);
    let mut premium = Vec::with_capacity(rows);
    let mut length = Vec::with_capacity(rows);
    let mut deal_type = Vec::with_capacity(rows);
    let mut nature = Vec::with_capacity(rows);
    let mut payment = Vec::with_capacity(rows);

    for i in 0..rows {
        let terminated = i % 3 == 0;
        names.push(format!("Target {}", i));
        status.push(if i % 10 == 9 {
            "Pending"
        } else if terminated {
            "Terminated"
        } else {
            "Completed"
        });
        size.push(Some(100.0 + ((i * 37) % 500) as f64));
        premium.push(if i == 5 {
            None
        } else {
            Some(0.05 + (i % 7) as f64 * 0.05)
        });
        length.push(Some(60.0 + (i % 9) as f64 * 20.0));
        deal_type.push(if i == 11 {
            None
        } else {
            Some(DEAL_TYPES[i % 4 % 3])
        });
        nature.push(if terminated && i % 2 == 0 {
            "Hostile"
        } else {
            "Friendly"
        });
        payment.push(PAYMENT_TYPES[(i / 2) % 3]);
    }

    df! {
        "Target Name" => names,
        "Deal Status" => status,
        "Size" => size,
        "Deal Premium" => premium,
        "Deal Lenght" => length,
        "Deal Type" => deal_type,
        "Nature Of Bid" => nature,
        "Payment Type" => payment,
    }
    .unwrap()
}

/// Resolved deals that all completed
pub fn create_single_class_dataframe() -> DataFrame {
    df! {
        "Deal Status" => ["Completed", "Completed", "Completed", "Completed", "Pending"],
        "Size" => [100.0f64, 200.0, 300.0, 400.0, 500.0],
        "Deal Premium" => [0.1f64, 0.2, 0.3, 0.4, 0.5],
        "Deal Lenght" => [90.0f64, 120.0, 150.0, 180.0, 210.0],
        "Deal Type" => ["Merger", "Merger", "Acquisition", "Acquisition", "Merger"],
        "Nature Of Bid" => ["Friendly", "Friendly", "Friendly", "Friendly", "Hostile"],
        "Payment Type" => ["Cash", "Stock", "Cash", "Stock", "Cash"],
    }
    .unwrap()
}

/// Resolved deals where every row is missing at least one feature
pub fn create_all_incomplete_dataframe() -> DataFrame {
    df! {
        "Deal Status" => ["Completed", "Terminated", "Completed", "Terminated"],
        "Size" => [Some(100.0f64), None, Some(300.0), Some(400.0)],
        "Deal Premium" => [None, Some(0.2f64), Some(0.3), Some(0.4)],
        "Deal Lenght" => [Some(90.0f64), Some(120.0), None, Some(180.0)],
        "Deal Type" => [Some("Merger"), Some("Merger"), Some("Acquisition"), None],
        "Nature Of Bid" => ["Friendly", "Hostile", "Friendly", "Hostile"],
        "Payment Type" => ["Cash", "Stock", "Cash", "Stock"],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("deals.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("deals.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Create a temporary directory with a workbook holding one sheet per frame,
/// in the given order. Nulls are left as empty cells.
pub fn create_temp_xlsx(sheets: &[(&str, &DataFrame)]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let xlsx_path = temp_dir.path().join("Book1.xlsx");

    let mut workbook = Workbook::new();
    for (name, df) in sheets {
        let sheet = workbook.add_worksheet().set_name(*name).unwrap();

        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let col = col_idx as u16;
            sheet.write_string(0, col, column.name().as_str()).unwrap();

            for (row_idx, value) in column.as_materialized_series().iter().enumerate() {
                let row = row_idx as u32 + 1;
                match value {
                    AnyValue::Null => {}
                    AnyValue::Float64(v) => {
                        sheet.write_number(row, col, v).unwrap();
                    }
                    AnyValue::String(s) => {
                        sheet.write_string(row, col, s).unwrap();
                    }
                    other => {
                        sheet.write_string(row, col, &other.to_string()).unwrap();
                    }
                }
            }
        }
    }
    workbook.save(&xlsx_path).unwrap();

    (temp_dir, xlsx_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a probability lies in the closed unit interval
pub fn assert_probability(p: f64) {
    assert!(p.is_finite(), "Probability is not finite: {}", p);
    assert!((0.0..=1.0).contains(&p), "Probability out of range: {}", p);
}
