//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use donasi_core::{PaymentMethod, SchemaConfig};

use crate::cli::FilterArgs;
use crate::commands::{self, truncate, Session};

const QRIS: &str = "Laporan Transaksi QRIS,,,,,
No,Tanggal,Nama Campaign,Nama Donatur,Total Donasi,Status
1,16 Desember 2023 10:30,Save the Children,Budi,Rp 50.000,Berhasil
2,16 Desember 2023 19:15,Sedekah Jumat,hamba allah,Rp 25.000,Berhasil
3,02 Januari 2024 12:00,-,Rina,Rp 15.000,Berhasil
4,05 Januari 2024 20:00,Wakaf Quran,BUDI,Rp 100.000,Berhasil";

const MANUAL: &str = "Laporan Transaksi Manual,,,,,
No,Tanggal,Nama Campaign,Nama Donatur,Total Donasi,Status
1,17 Desember 2023 09:00,Save the Children,Andi,\"Rp1.234.567,-\",Belum Di Konfirmasi
2,06 Januari 2024 10:00,Wakaf Quran,,Rp 200.000,Berhasil";

fn setup_session(dir: &Path) -> Session {
    let qris = dir.join("transaksi_qris.csv");
    let manual = dir.join("transaksi_manual.csv");
    fs::write(&qris, QRIS).unwrap();
    fs::write(&manual, MANUAL).unwrap();
    Session::new(&qris, &manual, SchemaConfig::default())
}

fn filter() -> FilterArgs {
    FilterArgs::default()
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Save the Children", 30), "Save the Children");
    assert_eq!(truncate("Save the Children", 10), "Save th...");
    assert_eq!(truncate("Sedekah Jumat 🙏🙏", 10), "Sedekah...");
}

#[test]
fn test_parse_date() {
    let date = commands::parse_date("2024-01-31", "from").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

    let err = commands::parse_date("31/01/2024", "from").unwrap_err();
    assert!(err.to_string().contains("--from"));
}

// ========== Filter Tests ==========

#[test]
fn test_build_filter() {
    let args = FilterArgs {
        from: Some("2023-12-01".to_string()),
        to: Some("2023-12-31".to_string()),
        methods: vec!["qris".to_string(), "MANUAL".to_string()],
        statuses: vec!["Berhasil".to_string()],
    };
    let filter = commands::build_filter(&args).unwrap();
    assert_eq!(filter.from, NaiveDate::from_ymd_opt(2023, 12, 1));
    assert_eq!(filter.to, NaiveDate::from_ymd_opt(2023, 12, 31));
    assert_eq!(filter.methods, vec![PaymentMethod::Qris, PaymentMethod::Manual]);
    assert_eq!(filter.statuses, vec!["Berhasil".to_string()]);
}

#[test]
fn test_build_filter_empty() {
    let filter = commands::build_filter(&filter()).unwrap();
    assert!(filter.from.is_none());
    assert!(filter.to.is_none());
    assert!(filter.methods.is_empty());
}

#[test]
fn test_build_filter_bad_date() {
    let args = FilterArgs {
        to: Some("January".to_string()),
        ..Default::default()
    };
    assert!(commands::build_filter(&args).is_err());
}

#[test]
fn test_build_filter_bad_method() {
    let args = FilterArgs {
        methods: vec!["cash".to_string()],
        ..Default::default()
    };
    let err = commands::build_filter(&args).unwrap_err();
    assert!(err.to_string().contains("cash"));
}

#[test]
fn test_build_filter_inverted_range() {
    let args = FilterArgs {
        from: Some("2024-02-01".to_string()),
        to: Some("2024-01-01".to_string()),
        ..Default::default()
    };
    assert!(commands::build_filter(&args).is_err());
}

// ========== Session Tests ==========

#[test]
fn test_session_caches_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());

    let first = session.dataset().unwrap();
    let second = session.dataset().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    // QRIS #3 is dropped for its placeholder campaign
    assert_eq!(first.len(), 5);
}

#[test]
fn test_session_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(
        &dir.path().join("missing_qris.csv"),
        &dir.path().join("missing_manual.csv"),
        SchemaConfig::default(),
    );
    assert!(session.dataset().is_err());
}

#[test]
fn test_select_applies_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let dataset = session.dataset().unwrap();

    let args = FilterArgs {
        methods: vec!["manual".to_string()],
        ..Default::default()
    };
    let filter = commands::build_filter(&args).unwrap();
    let selection = commands::select(&dataset, &filter).unwrap();
    assert_eq!(selection.len(), 2);
    assert!(selection.iter().all(|d| d.method == PaymentMethod::Manual));
}

// ========== Clean Command Tests ==========

#[test]
fn test_cmd_clean_writes_canonical_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("data_bersih.csv");

    commands::cmd_clean(&mut session, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "tanggal_jam,tanggal,tahun,bulan,minggu,hari,jam,nama_campaign,nama_donatur,total_donasi,metode_pembayaran,status"
    );
    assert_eq!(lines.count(), 5);
}

#[test]
fn test_cmd_clean_overwrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("data_bersih.csv");
    fs::write(&output, "stale\ncontent\n").unwrap();

    commands::cmd_clean(&mut session, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains("stale"));
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_reports_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());

    assert!(commands::cmd_report_summary(&mut session, &filter(), false).is_ok());
    assert!(commands::cmd_report_donors(&mut session, &filter(), 5, false).is_ok());
    assert!(commands::cmd_report_overall(&mut session, &filter(), false).is_ok());
    assert!(commands::cmd_report_daily(&mut session, &filter(), false).is_ok());
    assert!(commands::cmd_report_monthly(&mut session, &filter(), false).is_ok());
    assert!(commands::cmd_report_campaigns(&mut session, &filter(), 2, false).is_ok());
}

#[test]
fn test_cmd_reports_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());

    assert!(commands::cmd_report_summary(&mut session, &filter(), true).is_ok());
    assert!(commands::cmd_report_donors(&mut session, &filter(), 5, true).is_ok());
    assert!(commands::cmd_report_campaigns(&mut session, &filter(), 5, true).is_ok());
}

#[test]
fn test_cmd_report_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    assert!(commands::cmd_report_all(&mut session, &filter(), 10).is_ok());
}

#[test]
fn test_cmd_report_empty_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let args = FilterArgs {
        from: Some("2030-01-01".to_string()),
        ..Default::default()
    };

    assert!(commands::cmd_report_all(&mut session, &args, 10).is_ok());
}

#[test]
fn test_cmd_report_invalid_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let args = FilterArgs {
        statuses: vec!["Berhasil".to_string()],
        from: Some("yesterday".to_string()),
        ..Default::default()
    };

    assert!(commands::cmd_report_summary(&mut session, &args, false).is_err());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("donors.csv");

    commands::cmd_export(&mut session, "donors", &output, "csv", &filter()).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let header = content.lines().next().unwrap();
    assert!(header.starts_with("donor,total"));
    // Budi, Andi, Hamba Allah
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_cmd_export_json_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("campaigns.json");
    let args = FilterArgs {
        methods: vec!["qris".to_string()],
        ..Default::default()
    };

    commands::cmd_export(&mut session, "campaigns", &output, "json", &args).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["campaign"], "Wakaf Quran");
}

#[test]
fn test_cmd_export_unknown_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("out.csv");

    let err = commands::cmd_export(&mut session, "tags", &output, "csv", &filter()).unwrap_err();
    assert!(err.to_string().contains("tags"));
    assert!(!output.exists());
}

#[test]
fn test_cmd_export_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = setup_session(dir.path());
    let output = dir.path().join("out.xml");

    assert!(commands::cmd_export(&mut session, "donors", &output, "xml", &filter()).is_err());
}

// ========== Schema Command Tests ==========

#[test]
fn test_cmd_schema() {
    let config = SchemaConfig::default();
    assert!(commands::cmd_schema(&config, None).is_ok());
    assert!(commands::cmd_schema(&config, Some(Path::new("custom.toml"))).is_ok());
}
