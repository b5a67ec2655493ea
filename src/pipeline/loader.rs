//! Dataset loader for spreadsheet, CSV and Parquet files

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;

use super::error::PrepareError;

/// Options that control how the input file is read
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Worksheet name for spreadsheet input. `None` reads the first sheet.
    pub sheet: Option<String>,
    /// Rows used for CSV schema inference. 0 scans the whole file.
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            infer_schema_length: 10000,
        }
    }
}

/// Input formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Spreadsheet,
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, PrepareError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(PrepareError::UnsupportedFormat(extension)),
        }
    }
}

/// Load a dataset into memory, choosing the reader from the file extension
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    match FileFormat::from_path(path)? {
        FileFormat::Spreadsheet => load_spreadsheet(path, options.sheet.as_deref()),
        FileFormat::Csv => {
            let infer = if options.infer_schema_length == 0 {
                None
            } else {
                Some(options.infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(infer)
                .finish()
                .and_then(|lf| lf.collect())
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))
        }
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display())),
    }
}

/// Get the column names of a dataset without fitting anything
pub fn get_column_names(path: &Path, options: &LoadOptions) -> Result<Vec<String>> {
    let df = load_dataset(path, options)?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Row count, column count and estimated size in MB
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}

fn load_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .with_context(|| format!("Failed to read sheet '{}' in {}", name, path.display()))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| PrepareError::EmptyWorkbook(path.display().to_string()))?
            .with_context(|| format!("Failed to read first sheet in {}", path.display()))?,
    };

    let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
    cells_to_dataframe(&rows)
        .with_context(|| format!("Failed to convert spreadsheet: {}", path.display()))
}

/// Build a DataFrame from spreadsheet cells; the first row is the header.
///
/// A column whose non-empty cells are all numbers becomes `Float64`, any other
/// column becomes `String`. Empty cells, blank strings and cell errors are null.
pub fn cells_to_dataframe(rows: &[Vec<Data>]) -> Result<DataFrame> {
    let (header, body) = rows
        .split_first()
        .ok_or_else(|| PrepareError::EmptyWorkbook("sheet has no header row".to_string()))?;

    let mut columns: Vec<Column> = Vec::with_capacity(header.len());

    for (idx, head) in header.iter().enumerate() {
        let name = match head {
            Data::Empty => format!("Unnamed: {}", idx),
            other => other.to_string(),
        };

        let cells: Vec<Option<&Data>> = body
            .iter()
            .map(|row| row.get(idx).filter(|cell| !is_blank(cell)))
            .collect();

        let all_numeric = cells
            .iter()
            .flatten()
            .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)));

        let column = if all_numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v as f64),
                    Some(Data::Float(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| cell.map(|c| c.to_string()))
                .collect();
            Column::new(name.into(), values)
        };

        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
