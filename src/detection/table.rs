// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ground-truth detection table
//!
//! Loaded once at startup from a spreadsheet (xlsx, xls, ods) or a CSV
//! export, then shared read-only. Columns are positional:
//! identifier, label, xmin, ymin, xmax, ymax. The first row is a header.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Number of leading columns every table must provide
pub const REQUIRED_COLUMNS: usize = 6;

/// Spreadsheet extensions handled by calamine
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Errors raised while loading a detection table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Detection table not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported table format '{0}' (expected csv, xlsx, xlsm, xlsb, xls or ods)")]
    UnsupportedFormat(String),

    #[error("Detection table needs at least 6 columns, found {found}")]
    MissingColumns { found: usize },

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One ground-truth row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Image identifier cell; `None` for an empty cell, which never matches
    pub identifier: Option<String>,
    /// Disease label, trimmed
    pub label: String,
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl TableRow {
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        xmin: i32,
        ymin: i32,
        xmax: i32,
        ymax: i32,
    ) -> Self {
        Self {
            identifier: Some(identifier.into()),
            label: label.into().trim().to_string(),
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

/// Immutable, row-ordered detection table
#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    rows: Vec<TableRow>,
    source: Option<PathBuf>,
    skipped_rows: usize,
}

/// Cell value before column-specific interpretation
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl DetectionTable {
    /// Build a table from rows already in memory
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            source: None,
            skipped_rows: 0,
        }
    }

    /// Load a table from disk, choosing the reader by file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TableError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let raw_rows = if extension == "csv" {
            read_csv(path)?
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            read_workbook(path)?
        } else {
            return Err(TableError::UnsupportedFormat(extension));
        };

        let mut table = Self::from_raw_rows(raw_rows);
        table.source = Some(path.to_path_buf());

        info!(
            "Loaded detection table from {}: {} rows ({} skipped)",
            path.display(),
            table.rows.len(),
            table.skipped_rows
        );

        Ok(table)
    }

    fn from_raw_rows(raw_rows: Vec<Vec<RawCell>>) -> Self {
        let mut rows = Vec::with_capacity(raw_rows.len());
        let mut skipped_rows = 0;

        for (index, cells) in raw_rows.iter().enumerate() {
            match parse_row(cells) {
                Some(row) => rows.push(row),
                None => {
                    // +2: one for the header, one for 1-based numbering
                    warn!(
                        "Skipping detection table row {}: missing or non-numeric coordinates",
                        index + 2
                    );
                    skipped_rows += 1;
                }
            }
        }

        Self {
            rows,
            source: None,
            skipped_rows,
        }
    }

    /// Rows in source order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path the table was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rows dropped during load because their coordinates were unusable
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<RawCell>>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let header_len = reader.headers()?.len();
    if header_len < REQUIRED_COLUMNS {
        return Err(TableError::MissingColumns { found: header_len });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(cells);
    }

    debug!("Read {} CSV records from {}", rows.len(), path.display());
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<RawCell>>, TableError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::EmptyWorkbook)??;

    let width = range.width();
    if width < REQUIRED_COLUMNS {
        return Err(TableError::MissingColumns { found: width });
    }

    let rows: Vec<Vec<RawCell>> = range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    debug!("Read {} worksheet rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn cell_from_data(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.clone())
            }
        }
        other => RawCell::Text(other.to_string()),
    }
}

fn parse_row(cells: &[RawCell]) -> Option<TableRow> {
    let coord = |i: usize| cells.get(i).and_then(parse_coordinate);

    Some(TableRow {
        identifier: cells.first().and_then(cell_to_string),
        label: cells
            .get(1)
            .and_then(cell_to_string)
            .map(|l| l.trim().to_string())
            .unwrap_or_default(),
        xmin: coord(2)?,
        ymin: coord(3)?,
        xmax: coord(4)?,
        ymax: coord(5)?,
    })
}

/// Stringify a cell the way a dataframe would: integral numbers drop `.0`
fn cell_to_string(cell: &RawCell) -> Option<String> {
    match cell {
        RawCell::Empty => None,
        RawCell::Text(s) => Some(s.clone()),
        RawCell::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        RawCell::Number(n) => Some(n.to_string()),
    }
}

/// Integer coordinate, truncating floats toward zero
fn parse_coordinate(cell: &RawCell) -> Option<i32> {
    let value = match cell {
        RawCell::Empty => return None,
        RawCell::Number(n) => *n,
        RawCell::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => return i32::try_from(i).ok(),
                Err(_) => s.parse::<f64>().ok()?,
            }
        }
    };

    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i32)
}
