//! Domain models for Donasi

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, Season};

/// Payment channel a donation arrived through.
///
/// Each channel has its own source file, so the method is stamped from the
/// file a row came from and never inferred from the row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "QRIS")]
    Qris,
    #[serde(rename = "Manual")]
    Manual,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qris => "QRIS",
            Self::Manual => "Manual",
        }
    }

    /// Channels in merge order (channel A first)
    pub fn all() -> &'static [PaymentMethod] {
        &[Self::Qris, Self::Manual]
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qris" => Ok(Self::Qris),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown payment method: {} (valid: qris, manual)", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One data row as read from a source file, before any cleaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// 1-based data row within the source (after banner and header)
    pub row: usize,
    pub sequence: String,
    pub timestamp: String,
    pub campaign: String,
    pub donor: Option<String>,
    pub amount: String,
    pub status: String,
}

/// All raw rows of one channel's source file
#[derive(Debug, Clone)]
pub struct RawTable {
    pub channel: PaymentMethod,
    pub path: PathBuf,
    pub rows: Vec<RawTransaction>,
}

impl RawTable {
    pub fn new(channel: PaymentMethod, path: impl Into<PathBuf>) -> Self {
        Self {
            channel,
            path: path.into(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A cleaned donation (canonical record).
///
/// Calendar fields are derived from `timestamp` on every call so they can
/// never drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Donation {
    pub timestamp: NaiveDateTime,
    pub campaign: String,
    pub donor: String,
    pub amount: u64,
    pub method: PaymentMethod,
    pub status: String,
}

impl Donation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// ISO 8601 week number
    pub fn iso_week(&self) -> u32 {
        self.timestamp.iso_week().week()
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Flat canonical row, in the fixed canonical column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRow {
    pub tanggal_jam: String,
    pub tanggal: NaiveDate,
    pub tahun: i32,
    pub bulan: u32,
    pub minggu: u32,
    pub hari: &'static str,
    pub jam: u32,
    pub nama_campaign: String,
    pub nama_donatur: String,
    pub total_donasi: u64,
    pub metode_pembayaran: PaymentMethod,
    pub status: String,
}

impl From<&Donation> for DonationRow {
    fn from(d: &Donation) -> Self {
        Self {
            tanggal_jam: d.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            tanggal: d.date(),
            tahun: d.year(),
            bulan: d.month(),
            minggu: d.iso_week(),
            hari: calendar::weekday_name(d.weekday()),
            jam: d.hour(),
            nama_campaign: d.campaign.clone(),
            nama_donatur: d.donor.clone(),
            total_donasi: d.amount,
            metode_pembayaran: d.method,
            status: d.status.clone(),
        }
    }
}

/// Counters collected during one cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub qris_rows: usize,
    pub manual_rows: usize,
    /// Rows dropped because the cleaned amount was zero
    pub zero_amount: usize,
    /// Subset of `zero_amount` whose raw amount was non-blank but had no digits
    pub malformed_amount: usize,
    /// Rows dropped because the campaign was the placeholder sentinel
    pub placeholder_campaign: usize,
    /// Donor names collapsed to the anonymity token
    pub anonymized: usize,
    pub rows_out: usize,
}

impl CleanStats {
    pub fn rows_in(&self) -> usize {
        self.qris_rows + self.manual_rows
    }

    pub fn excluded(&self) -> usize {
        self.zero_amount + self.placeholder_campaign
    }
}

/// The canonical table produced from one pair of source files.
///
/// Read-only once built; a reload produces a new dataset.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    donations: Vec<Donation>,
    stats: CleanStats,
}

impl CleanedDataset {
    pub(crate) fn new(donations: Vec<Donation>, stats: CleanStats) -> Self {
        Self { donations, stats }
    }

    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    pub fn stats(&self) -> &CleanStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.donations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donations.is_empty()
    }

    /// Canonical rows in table order
    pub fn rows(&self) -> Vec<DonationRow> {
        self.donations.iter().map(DonationRow::from).collect()
    }

    /// Earliest and latest donation date
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.donations.iter().map(Donation::date).min()?;
        let max = self.donations.iter().map(Donation::date).max()?;
        Some((min, max))
    }

    /// Distinct statuses in first-seen order
    pub fn statuses(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for d in &self.donations {
            if !seen.contains(&d.status.as_str()) {
                seen.push(&d.status);
            }
        }
        seen
    }
}

// =============================================================================
// Report models
// =============================================================================

/// Report period info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: String,
    pub to: String,
}

/// Transactions per (method, status) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMethodCount {
    pub method: PaymentMethod,
    pub status: String,
    pub count: usize,
}

/// Share of successful transactions for one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSuccessRate {
    pub method: PaymentMethod,
    pub success_rate: f64,
}

/// How often a method is used
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodShare {
    pub method: PaymentMethod,
    pub transaction_count: usize,
    pub percentage: f64,
}

/// Donation value by method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodValueStats {
    pub method: PaymentMethod,
    pub total: u64,
    pub mean: f64,
    pub count: usize,
}

/// Donors whose favourite method is `method`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavouriteMethodShare {
    pub method: PaymentMethod,
    pub donor_count: usize,
    pub percentage: f64,
}

/// Main summary tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<ReportPeriod>,
    pub total_amount: u64,
    pub transaction_count: usize,
    pub unique_donors: usize,
    pub active_campaigns: usize,
    pub avg_per_transaction: f64,
    /// Transactions per unique donor
    pub loyalty_ratio: f64,
    pub success_rate: f64,
    pub avg_per_campaign: f64,
    pub success_total: u64,
    pub pending_total: u64,
    pub status_by_method: Vec<StatusMethodCount>,
    pub success_by_method: Vec<MethodSuccessRate>,
    pub method_popularity: Vec<MethodShare>,
    pub method_values: Vec<MethodValueStats>,
    pub favourite_methods: Vec<FavouriteMethodShare>,
    /// Donors who only ever used one method
    pub single_method_donors: usize,
    pub multi_method_donors: usize,
    pub method_loyalty_rate: f64,
}

/// Donor tier by total contribution quartile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DonorTier {
    Premium,
    Gold,
    Silver,
    Bronze,
}

impl DonorTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

impl std::fmt::Display for DonorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-donor aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorStats {
    pub donor: String,
    pub total: u64,
    pub mean: f64,
    pub count: usize,
    pub favourite_method: PaymentMethod,
    pub tier: DonorTier,
}

/// Donor-total quartiles used for tiering
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Quartiles {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

/// Donors tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorReport {
    /// All donors, highest total first
    pub donors: Vec<DonorStats>,
    pub quartiles: Quartiles,
    pub premium: usize,
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
    /// Donors whose cumulative share stays within 80% of the total
    pub core_contributors: usize,
    pub core_percentage: f64,
    pub frequent_small: usize,
    pub infrequent_large: usize,
}

impl DonorReport {
    pub fn top(&self, n: usize) -> &[DonorStats] {
        &self.donors[..n.min(self.donors.len())]
    }

    /// Healthy 80/20 distribution: the core is at most a fifth of donors
    pub fn is_pareto_healthy(&self) -> bool {
        !self.donors.is_empty() && self.core_percentage <= 20.0
    }
}

/// One day in the overall trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: u64,
    pub count: usize,
    pub ma_7: f64,
    pub ma_30: f64,
}

/// Overall transactions tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub days: Vec<DailyPoint>,
    pub best_day: Option<DailyPoint>,
    pub worst_day: Option<DailyPoint>,
    pub average_daily: f64,
    /// Standard deviation of daily totals as % of the mean
    pub volatility: f64,
    /// Last 30 days vs the 30 before, when at least 60 days exist
    pub trend_change: Option<f64>,
}

/// Per-weekday aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStats {
    pub weekday: &'static str,
    pub total: u64,
    pub mean: f64,
    pub count: usize,
    pub unique_donors: usize,
    pub weekend: bool,
}

/// Per-hour aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourStats {
    pub hour: u32,
    pub total: u64,
    pub count: usize,
}

/// Daily (weekday) tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayReport {
    /// Monday first, only weekdays with donations
    pub weekdays: Vec<WeekdayStats>,
    pub best: Option<WeekdayStats>,
    pub worst: Option<WeekdayStats>,
    pub average: f64,
    pub weekday_average: f64,
    pub weekend_average: f64,
    /// Weekend average relative to weekday average, in %
    pub weekend_lift: f64,
    pub hours: Vec<HourStats>,
    pub peak_hour: Option<HourStats>,
    pub quiet_hour: Option<HourStats>,
}

/// Per calendar month aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub total: u64,
    pub mean: f64,
    pub count: usize,
    pub unique_donors: usize,
    pub active_campaigns: usize,
    pub per_donor: f64,
    pub per_campaign: f64,
    pub season: Season,
    /// Growth vs the previous listed month, in %
    pub mom_growth: Option<f64>,
}

impl MonthStats {
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name, self.year)
    }
}

/// Total per season
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTotal {
    pub season: Season,
    pub total: u64,
}

/// Monthly tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthStats>,
    pub best: Option<MonthStats>,
    pub worst: Option<MonthStats>,
    pub average_monthly: f64,
    /// Highest total first
    pub seasons: Vec<SeasonTotal>,
}

/// Campaign band over five equal-width bins of campaign totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceBand {
    #[serde(rename = "Sangat Rendah")]
    VeryLow,
    #[serde(rename = "Rendah")]
    Low,
    #[serde(rename = "Sedang")]
    Medium,
    #[serde(rename = "Tinggi")]
    High,
    #[serde(rename = "Sangat Tinggi")]
    VeryHigh,
}

impl PerformanceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "Sangat Rendah",
            Self::Low => "Rendah",
            Self::Medium => "Sedang",
            Self::High => "Tinggi",
            Self::VeryHigh => "Sangat Tinggi",
        }
    }

    pub(crate) fn from_bin(bin: usize) -> Self {
        match bin {
            0 => Self::VeryLow,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

/// Per-campaign aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignStats {
    pub campaign: String,
    pub total: u64,
    pub mean: f64,
    pub count: usize,
    pub unique_donors: usize,
    pub first_donation: NaiveDateTime,
    pub last_donation: NaiveDateTime,
    pub duration_days: i64,
    pub per_day: f64,
    /// Unique donors per transaction, in %
    pub conversion_rate: f64,
    /// Repeat transactions per unique donor, in %
    pub repeat_rate: f64,
    pub band: PerformanceBand,
}

/// Campaigns tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignReport {
    /// Highest total first
    pub campaigns: Vec<CampaignStats>,
    pub average_per_campaign: f64,
    pub most_efficient: Option<String>,
    pub longest_running: Option<String>,
    pub above_average: usize,
    /// Campaigns flagged for review
    pub problematic: Vec<String>,
}

/// Relative performance against a benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryGood => "SANGAT BAIK",
            Self::Good => "BAIK",
            Self::Fair => "CUKUP",
            Self::NeedsImprovement => "PERLU PERBAIKAN",
        }
    }
}
