//! Loader for the two channel exports
//!
//! Each channel (QRIS, manual transfer) is exported as a spreadsheet whose
//! first row is a title banner, followed by the header row and the data.
//! Both `.csv` and Excel/ODS workbooks are accepted; only the first sheet of
//! a workbook is read. No cleaning happens here.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use tracing::debug;

use crate::clean::format_timestamp;
use crate::error::{Error, Result};
use crate::models::{PaymentMethod, RawTable, RawTransaction};
use crate::schema::SchemaConfig;

/// Locations of the two channel exports
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePaths {
    pub qris: PathBuf,
    pub manual: PathBuf,
}

impl SourcePaths {
    pub fn new(qris: impl Into<PathBuf>, manual: impl Into<PathBuf>) -> Self {
        Self {
            qris: qris.into(),
            manual: manual.into(),
        }
    }

    pub fn path(&self, channel: PaymentMethod) -> &Path {
        match channel {
            PaymentMethod::Qris => &self.qris,
            PaymentMethod::Manual => &self.manual,
        }
    }
}

/// Source file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(Error::InvalidData(format!(
                "Unsupported source file type: {} (expected .csv, .xlsx, .xls or .ods)",
                path.display()
            ))),
        }
    }
}

/// Load both channel exports, QRIS first
pub fn load_sources(paths: &SourcePaths, config: &SchemaConfig) -> Result<(RawTable, RawTable)> {
    let qris = load_table(&paths.qris, PaymentMethod::Qris, config)?;
    let manual = load_table(&paths.manual, PaymentMethod::Manual, config)?;
    Ok((qris, manual))
}

/// Load one channel export into raw rows
pub fn load_table(path: &Path, channel: PaymentMethod, config: &SchemaConfig) -> Result<RawTable> {
    if !path.is_file() {
        return Err(Error::MissingFile {
            channel,
            path: path.to_path_buf(),
        });
    }

    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => {
            let file = File::open(path)?;
            read_csv(file, channel, path, config)
        }
        SourceFormat::Workbook => read_workbook(path, channel, config),
    }
}

/// Parse CSV text laid out like the channel export
pub fn read_csv<R: Read>(
    reader: R,
    channel: PaymentMethod,
    path: &Path,
    config: &SchemaConfig,
) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    build_table(rows, channel, path, config)
}

/// Read the first sheet of a workbook
fn read_workbook(path: &Path, channel: PaymentMethod, config: &SchemaConfig) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Err(Error::InvalidData(format!(
                "Workbook has no sheets: {}",
                path.display()
            )))
        }
    };

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    build_table(rows, channel, path, config)
}

/// Render a workbook cell the way it would appear in a CSV export
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Sequence numbers and amounts typed as numbers must not gain a ".0"
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(format_timestamp)
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(format_timestamp)
            .unwrap_or_else(|_| s.clone()),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{:?}", e),
    }
}

/// Skip the banner, resolve the header and map data rows to raw records
fn build_table(
    rows: Vec<Vec<String>>,
    channel: PaymentMethod,
    path: &Path,
    config: &SchemaConfig,
) -> Result<RawTable> {
    let mapping = config.mapping(channel);
    let mut rows = rows.into_iter().skip(config.loader.banner_rows);

    let headers = rows.next().unwrap_or_default();
    let idx = mapping.resolve(&headers).map_err(|missing| Error::Schema {
        channel,
        path: path.to_path_buf(),
        missing,
    })?;

    let mut table = RawTable::new(channel, path);
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let field = |col: usize| row.get(col).cloned().unwrap_or_default();
        let donor = field(idx.donor);

        table.rows.push(RawTransaction {
            row: i + 1,
            sequence: field(idx.sequence),
            timestamp: field(idx.timestamp),
            campaign: field(idx.campaign),
            donor: if donor.is_empty() { None } else { Some(donor) },
            amount: field(idx.amount),
            status: field(idx.status),
        });
    }

    debug!(
        "Loaded {} {} rows from {}",
        table.len(),
        channel,
        path.display()
    );
    Ok(table)
}
