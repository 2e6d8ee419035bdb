//! Donasi CLI - Donation transaction cleaner and reports
//!
//! Usage:
//!   donasi clean                       Clean and merge into data_bersih.csv
//!   donasi report summary              Headline metrics
//!   donasi report all --from 2024-01-01 --to 2024-03-31
//!   donasi export donors --output donors.csv

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let mut session = Session::new(&cli.qris, &cli.manual, config);

    match cli.command {
        Commands::Clean { output } => commands::cmd_clean(&mut session, &output),
        Commands::Report { report_type } => match report_type {
            ReportType::Summary { filter, json } => {
                commands::cmd_report_summary(&mut session, &filter, json)
            }
            ReportType::Donors { filter, top, json } => {
                commands::cmd_report_donors(&mut session, &filter, top, json)
            }
            ReportType::Overall { filter, json } => {
                commands::cmd_report_overall(&mut session, &filter, json)
            }
            ReportType::Daily { filter, json } => {
                commands::cmd_report_daily(&mut session, &filter, json)
            }
            ReportType::Monthly { filter, json } => {
                commands::cmd_report_monthly(&mut session, &filter, json)
            }
            ReportType::Campaigns { filter, top, json } => {
                commands::cmd_report_campaigns(&mut session, &filter, top, json)
            }
            ReportType::All { filter, top } => commands::cmd_report_all(&mut session, &filter, top),
        },
        Commands::Export {
            table,
            output,
            format,
            filter,
        } => commands::cmd_export(&mut session, &table, &output, &format, &filter),
        Commands::Schema => commands::cmd_schema(session.config(), cli.config.as_deref()),
    }
}
