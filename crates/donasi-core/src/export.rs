//! Export of the canonical table and report tables
//!
//! Supports:
//! - Canonical CSV export (`data_bersih.csv`), full overwrite
//! - Any report table as CSV or JSON
//! - Rupiah formatting for display

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{
    CampaignStats, CleanedDataset, DailyPoint, Donation, DonationRow, DonorStats,
    FavouriteMethodShare, HourStats, MethodShare, MethodValueStats, MonthStats, SeasonTotal,
    StatusMethodCount, WeekdayStats,
};
use crate::reports;
use crate::schema::CleaningRules;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {} (valid: csv, json)", s)),
        }
    }
}

/// Tables that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    /// Filtered canonical rows
    Donations,
    StatusByMethod,
    MethodValues,
    MethodPopularity,
    FavouriteMethods,
    Donors,
    Daily,
    Weekdays,
    Hours,
    Monthly,
    Seasons,
    Campaigns,
}

impl ExportTable {
    pub fn all() -> &'static [ExportTable] {
        &[
            Self::Donations,
            Self::StatusByMethod,
            Self::MethodValues,
            Self::MethodPopularity,
            Self::FavouriteMethods,
            Self::Donors,
            Self::Daily,
            Self::Weekdays,
            Self::Hours,
            Self::Monthly,
            Self::Seasons,
            Self::Campaigns,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donations => "donations",
            Self::StatusByMethod => "status-by-method",
            Self::MethodValues => "method-values",
            Self::MethodPopularity => "method-popularity",
            Self::FavouriteMethods => "favourite-methods",
            Self::Donors => "donors",
            Self::Daily => "daily",
            Self::Weekdays => "weekdays",
            Self::Hours => "hours",
            Self::Monthly => "monthly",
            Self::Seasons => "seasons",
            Self::Campaigns => "campaigns",
        }
    }
}

impl std::str::FromStr for ExportTable {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .find(|t| t.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::all().iter().map(|t| t.as_str()).collect();
                format!("Unknown table: {} (valid: {})", s, valid.join(", "))
            })
    }
}

impl std::fmt::Display for ExportTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A row of an exportable table.
///
/// `HEADERS` must list the serialized field names in declaration order; the
/// CSV writer only derives a header from the first record, so empty tables
/// fall back to this list.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

macro_rules! table_row {
    ($($row:ty => [$($col:literal),+ $(,)?];)+) => {
        $(impl TableRow for $row {
            const HEADERS: &'static [&'static str] = &[$($col),+];
        })+
    };
}

table_row! {
    DonationRow => [
        "tanggal_jam", "tanggal", "tahun", "bulan", "minggu", "hari", "jam",
        "nama_campaign", "nama_donatur", "total_donasi", "metode_pembayaran", "status",
    ];
    StatusMethodCount => ["method", "status", "count"];
    MethodValueStats => ["method", "total", "mean", "count"];
    MethodShare => ["method", "transaction_count", "percentage"];
    FavouriteMethodShare => ["method", "donor_count", "percentage"];
    DonorStats => ["donor", "total", "mean", "count", "favourite_method", "tier"];
    DailyPoint => ["date", "total", "count", "ma_7", "ma_30"];
    WeekdayStats => ["weekday", "total", "mean", "count", "unique_donors", "weekend"];
    HourStats => ["hour", "total", "count"];
    MonthStats => [
        "year", "month", "month_name", "total", "mean", "count", "unique_donors",
        "active_campaigns", "per_donor", "per_campaign", "season", "mom_growth",
    ];
    SeasonTotal => ["season", "total"];
    CampaignStats => [
        "campaign", "total", "mean", "count", "unique_donors", "first_donation",
        "last_donation", "duration_days", "per_day", "conversion_rate", "repeat_rate", "band",
    ];
}

/// Write rows as UTF-8 CSV with a header row, also for an empty table
pub fn write_csv<T, W>(rows: &[T], writer: W) -> Result<()>
where
    T: TableRow,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(T::HEADERS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array
pub fn write_json<T, W>(rows: &[T], mut writer: W) -> Result<()>
where
    T: Serialize,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}

fn write_rows<T, W>(rows: &[T], format: ExportFormat, writer: W) -> Result<usize>
where
    T: TableRow,
    W: Write,
{
    match format {
        ExportFormat::Csv => write_csv(rows, writer)?,
        ExportFormat::Json => write_json(rows, writer)?,
    }
    Ok(rows.len())
}

/// Write the full canonical table, replacing any existing file
pub fn write_canonical(dataset: &CleanedDataset, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(&dataset.rows(), file)?;
    info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// Compute one table over a selection and write it; returns the row count
pub fn export_table<W: Write>(
    table: ExportTable,
    selection: &[&Donation],
    rules: &CleaningRules,
    format: ExportFormat,
    writer: W,
) -> Result<usize> {
    match table {
        ExportTable::Donations => {
            let rows: Vec<DonationRow> = selection.iter().map(|d| DonationRow::from(*d)).collect();
            write_rows(&rows, format, writer)
        }
        ExportTable::StatusByMethod => {
            write_rows(&reports::summary(selection, rules).status_by_method, format, writer)
        }
        ExportTable::MethodValues => {
            write_rows(&reports::summary(selection, rules).method_values, format, writer)
        }
        ExportTable::MethodPopularity => write_rows(
            &reports::summary(selection, rules).method_popularity,
            format,
            writer,
        ),
        ExportTable::FavouriteMethods => write_rows(
            &reports::summary(selection, rules).favourite_methods,
            format,
            writer,
        ),
        ExportTable::Donors => write_rows(&reports::donors(selection).donors, format, writer),
        ExportTable::Daily => write_rows(&reports::trend(selection).days, format, writer),
        ExportTable::Weekdays => write_rows(&reports::weekdays(selection).weekdays, format, writer),
        ExportTable::Hours => write_rows(&reports::weekdays(selection).hours, format, writer),
        ExportTable::Monthly => write_rows(&reports::monthly(selection).months, format, writer),
        ExportTable::Seasons => write_rows(&reports::monthly(selection).seasons, format, writer),
        ExportTable::Campaigns => {
            write_rows(&reports::campaigns(selection).campaigns, format, writer)
        }
    }
}

/// Export a table to a file, replacing it
pub fn export_table_to_file(
    table: ExportTable,
    selection: &[&Donation],
    rules: &CleaningRules,
    format: ExportFormat,
    path: &Path,
) -> Result<usize> {
    if path.is_dir() {
        return Err(Error::InvalidData(format!(
            "Output path is a directory: {}",
            path.display()
        )));
    }
    let file = File::create(path)?;
    let rows = export_table(table, selection, rules, format, file)?;
    info!("Exported {} {} rows to {}", rows, table, path.display());
    Ok(rows)
}

/// Format an amount as Indonesian Rupiah: `Rp 1.234.567`
pub fn format_rupiah(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::reports::tests::donation;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(1_234_567.0), "Rp 1.234.567");
        assert_eq!(format_rupiah(50_000.0), "Rp 50.000");
        assert_eq!(format_rupiah(999.0), "Rp 999");
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(1_000.6), "Rp 1.001");
        assert_eq!(format_rupiah(-25_000.0), "Rp -25.000");
    }

    #[test]
    fn test_table_names() {
        assert_eq!("donors".parse::<ExportTable>().unwrap(), ExportTable::Donors);
        assert_eq!(
            "status_by_method".parse::<ExportTable>().unwrap(),
            ExportTable::StatusByMethod
        );
        assert!("nope".parse::<ExportTable>().is_err());
        for table in ExportTable::all() {
            assert_eq!(table.as_str().parse::<ExportTable>().unwrap(), *table);
        }
    }

    #[test]
    fn test_write_csv_header_and_quoting() {
        let data = vec![donation(
            "2023-12-16 10:30",
            "Save the Children, Aceh",
            "Budi",
            50_000,
            PaymentMethod::Qris,
            "Berhasil",
        )];
        let rows: Vec<DonationRow> = data.iter().map(DonationRow::from).collect();

        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "tanggal_jam,tanggal,tahun,bulan,minggu,hari,jam,nama_campaign,nama_donatur,total_donasi,metode_pembayaran,status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-12-16 10:30:00,2023-12-16,2023,12,50,Saturday,10,\"Save the Children, Aceh\",Budi,50000,QRIS,Berhasil"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_table_json() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "A", 10_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-02 10:00", "Wakaf", "B", 20_000, PaymentMethod::Manual, "Pending"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();

        let mut out = Vec::new();
        let n = export_table(
            ExportTable::Campaigns,
            &refs,
            &CleaningRules::default(),
            ExportFormat::Json,
            &mut out,
        )
        .unwrap();
        assert_eq!(n, 2);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["campaign"], "Wakaf");
        assert_eq!(value[0]["band"], "Sangat Tinggi");
    }

    #[test]
    fn test_export_table_to_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("donors.csv");
        std::fs::write(&path, "stale contents that are longer than the export\n".repeat(50))
            .unwrap();

        let data = vec![donation(
            "2024-01-01 10:00",
            "Zakat",
            "A",
            10_000,
            PaymentMethod::Qris,
            "Berhasil",
        )];
        let refs: Vec<&Donation> = data.iter().collect();
        let n = export_table_to_file(
            ExportTable::Donors,
            &refs,
            &CleaningRules::default(),
            ExportFormat::Csv,
            &path,
        )
        .unwrap();
        assert_eq!(n, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("donor,total,mean,count,favourite_method,tier\n"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn test_empty_table_keeps_header() {
        for table in ExportTable::all() {
            let mut out = Vec::new();
            let n = export_table(
                *table,
                &[],
                &CleaningRules::default(),
                ExportFormat::Csv,
                &mut out,
            )
            .unwrap();
            assert_eq!(n, 0);
            let text = String::from_utf8(out).unwrap();
            assert_eq!(text.lines().count(), 1, "{} should be header only", table);
        }

        let mut out = Vec::new();
        export_table(
            ExportTable::Donations,
            &[],
            &CleaningRules::default(),
            ExportFormat::Csv,
            &mut out,
        )
        .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("tanggal_jam,tanggal,"));
    }

    #[test]
    fn test_empty_header_matches_serialized_header() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "A", 10_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-02-03 21:00", "Wakaf", "B", 20_000, PaymentMethod::Manual, "Pending"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();
        let rules = CleaningRules::default();

        for table in ExportTable::all() {
            let mut full = Vec::new();
            let n = export_table(*table, &refs, &rules, ExportFormat::Csv, &mut full).unwrap();
            assert!(n > 0, "{} should have rows", table);
            let mut empty = Vec::new();
            export_table(*table, &[], &rules, ExportFormat::Csv, &mut empty).unwrap();

            let full = String::from_utf8(full).unwrap();
            let empty = String::from_utf8(empty).unwrap();
            assert_eq!(full.lines().next(), empty.lines().next(), "{} header", table);
        }
    }

    #[test]
    fn test_write_canonical_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_bersih.csv");
        let dataset = CleanedDataset::new(Vec::new(), Default::default());

        write_canonical(&dataset, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![DonationRow::HEADERS.join(",")]);
    }

    #[test]
    fn test_export_to_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_table_to_file(
            ExportTable::Daily,
            &[],
            &CleaningRules::default(),
            ExportFormat::Csv,
            dir.path(),
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
