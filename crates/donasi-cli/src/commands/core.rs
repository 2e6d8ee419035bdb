//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `Session` - Source paths, schema config and the dataset cache for one run
//! - `load_config` - Resolve the schema mapping config
//! - `build_filter` - Turn CLI filter flags into a `DonationFilter`
//! - `cmd_schema` - Show the effective schema mapping

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use donasi_core::schema::default_config_path;
use donasi_core::{
    CleanedDataset, DatasetCache, Donation, DonationFilter, PaymentMethod, SchemaConfig,
    SourcePaths,
};

use crate::cli::FilterArgs;

/// Load the schema config (explicit path, data dir override, then built-in)
pub fn load_config(explicit: Option<&Path>) -> Result<SchemaConfig> {
    SchemaConfig::load(explicit).context("Failed to load schema config")
}

/// Inputs and cached dataset for one CLI invocation
pub struct Session {
    paths: SourcePaths,
    config: SchemaConfig,
    cache: DatasetCache,
}

impl Session {
    pub fn new(qris: &Path, manual: &Path, config: SchemaConfig) -> Self {
        Self {
            paths: SourcePaths::new(qris, manual),
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Cleaned dataset, rebuilt only when a source file changed
    pub fn dataset(&mut self) -> Result<Arc<CleanedDataset>> {
        self.cache
            .get_or_load(&self.paths, &self.config)
            .context("Failed to load donation data")
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD): {}", flag, value))
}

pub fn build_filter(args: &FilterArgs) -> Result<DonationFilter> {
    let from = args
        .from
        .as_deref()
        .map(|v| parse_date(v, "from"))
        .transpose()?;
    let to = args.to.as_deref().map(|v| parse_date(v, "to")).transpose()?;

    let methods = args
        .methods
        .iter()
        .map(|m| m.parse::<PaymentMethod>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;

    let filter = DonationFilter::new()
        .from(from)
        .to(to)
        .methods(methods)
        .statuses(args.statuses.clone());
    filter.validate().context("Invalid date range")?;
    Ok(filter)
}

/// Apply a filter to the dataset
pub fn select<'a>(dataset: &'a CleanedDataset, filter: &DonationFilter) -> Result<Vec<&'a Donation>> {
    filter
        .apply(dataset.donations())
        .context("Failed to apply filter")
}

pub fn cmd_schema(config: &SchemaConfig, explicit: Option<&Path>) -> Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        },
    };

    println!();
    println!("🗂️  Schema Mapping");
    println!("   Source: {}", source);
    if explicit.is_none() {
        if let Some(path) = default_config_path() {
            println!("   Override location: {}", path.display());
        }
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Banner rows skipped: {}", config.loader.banner_rows);
    println!();

    println!(
        "   {:14} │ {:20} │ {:20}",
        "Field", "QRIS column", "Manual column"
    );
    println!("   ───────────────┼──────────────────────┼─────────────────────");
    let (q, m) = (&config.channels.qris, &config.channels.manual);
    let rows = [
        ("sequence", &q.sequence, &m.sequence),
        ("timestamp", &q.timestamp, &m.timestamp),
        ("campaign", &q.campaign, &m.campaign),
        ("donor", &q.donor, &m.donor),
        ("amount", &q.amount, &m.amount),
        ("status", &q.status, &m.status),
    ];
    for (field, qris, manual) in rows {
        println!("   {:14} │ {:20} │ {:20}", field, qris, manual);
    }

    let rules = &config.cleaning;
    println!();
    println!("   Placeholder campaign: {:?}", rules.placeholder_campaign);
    println!("   Anonymity token:      {}", rules.anonymity_token);
    println!("   Anonymous idioms:     {}", rules.anonymity_idioms.join(", "));
    let mut synonyms: Vec<_> = rules.status_synonyms.iter().collect();
    synonyms.sort();
    for (from, to) in synonyms {
        println!("   Status synonym:       {} → {}", from, to);
    }

    Ok(())
}

