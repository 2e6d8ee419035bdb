//! Error types for Donasi

use std::path::PathBuf;

use thiserror::Error;

use crate::models::PaymentMethod;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{channel} source file not found: {}", path.display())]
    MissingFile {
        channel: PaymentMethod,
        path: PathBuf,
    },

    #[error(
        "{channel} source {} is missing expected column(s): {}",
        path.display(),
        missing.join(", ")
    )]
    Schema {
        channel: PaymentMethod,
        path: PathBuf,
        missing: Vec<String>,
    },

    #[error(
        "{channel} source {} row {row}: unable to parse date '{raw}' (expected e.g. '16 Desember 2023 10:30')",
        path.display()
    )]
    DateParse {
        channel: PaymentMethod,
        path: PathBuf,
        row: usize,
        raw: String,
    },

    #[error(
        "{channel} source {} row {row}: amount '{raw}' is too large",
        path.display()
    )]
    AmountOverflow {
        channel: PaymentMethod,
        path: PathBuf,
        row: usize,
        raw: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
