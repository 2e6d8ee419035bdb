//! Donasi Core Library
//!
//! Shared functionality for the donation transaction dashboard:
//! - Loader for the QRIS and manual-transfer exports (CSV or spreadsheet)
//! - Schema mapping config between source columns and the cleaner
//! - Cleaner/merger producing the canonical donation table
//! - Fingerprinted session cache for the cleaned dataset
//! - Filters and reports (summary, donors, trend, weekdays, monthly, campaigns)
//! - CSV/JSON export and Rupiah formatting

pub mod cache;
pub mod calendar;
pub mod clean;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod models;
pub mod reports;
pub mod schema;

pub use cache::{DatasetCache, FileFingerprint, SourceFingerprint};
pub use calendar::Season;
pub use clean::{clean_amount, format_timestamp, parse_timestamp, AmountCleaning, Cleaner};
pub use error::{Error, Result};
pub use export::{
    export_table, export_table_to_file, format_rupiah, write_canonical, write_csv, ExportFormat,
    ExportTable, TableRow,
};
pub use filter::DonationFilter;
pub use import::{load_sources, load_table, SourcePaths};
pub use models::{
    CleanStats, CleanedDataset, Donation, DonationRow, PaymentMethod, RawTable, RawTransaction,
};
pub use schema::SchemaConfig;

/// Load both sources and build the canonical dataset without caching
pub fn load_dataset(paths: &SourcePaths, config: &SchemaConfig) -> Result<CleanedDataset> {
    let (qris, manual) = load_sources(paths, config)?;
    Cleaner::new(config)?.clean_and_merge(&qris, &manual)
}
