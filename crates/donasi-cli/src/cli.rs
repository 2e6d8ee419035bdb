//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Donasi - Clean, merge and analyse donation transactions
#[derive(Parser)]
#[command(name = "donasi")]
#[command(about = "Donation transaction cleaner and dashboard reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// QRIS transaction export (.xlsx, .xls, .ods or .csv)
    #[arg(
        long,
        env = "DONASI_QRIS",
        default_value = "data/transaksi_qris.xlsx",
        global = true
    )]
    pub qris: PathBuf,

    /// Manual transfer transaction export (.xlsx, .xls, .ods or .csv)
    #[arg(
        long,
        env = "DONASI_MANUAL",
        default_value = "data/transaksi_manual.xlsx",
        global = true
    )]
    pub manual: PathBuf,

    /// Schema mapping config (defaults to the data dir override, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean and merge both exports into the canonical CSV
    Clean {
        /// Output file (overwritten)
        #[arg(short, long, default_value = "data_bersih.csv")]
        output: PathBuf,
    },

    /// Show dashboard reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Export a report table (or the filtered donations) to a file
    Export {
        /// Table: donations, status-by-method, method-values, method-popularity,
        /// favourite-methods, donors, daily, weekdays, hours, monthly, seasons, campaigns
        table: String,

        /// Output file (overwritten)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the effective schema mapping and where it was loaded from
    Schema,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Headline metrics and payment method analysis
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Donor tiers, top donors and behaviour segments
    Donors {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of top donors to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Daily totals with moving averages and volatility
    Overall {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Day-of-week and hour-of-day patterns
    Daily {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly performance and seasonality
    Monthly {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Campaign efficiency and campaigns needing review
    Campaigns {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of campaigns to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// All of the above
    All {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of top donors and campaigns to show
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

/// Selection shared by reports and exports
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Payment method: qris or manual (repeatable)
    #[arg(long = "method")]
    pub methods: Vec<String>,

    /// Transaction status, e.g. Berhasil or Pending (repeatable)
    #[arg(long = "status")]
    pub statuses: Vec<String>,
}
