//! Schema mapping between the source spreadsheets and the cleaner
//!
//! The loader and cleaner agree on columns through this structure rather
//! than through hard-coded names, and the mapping is validated against the
//! actual header row at load time.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (`--config`)
//! 2. Override in data dir (~/.local/share/donasi/config/schema.toml)
//! 3. Embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::PaymentMethod;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/schema.toml");

/// Loader settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    /// Rows above the header row that are not data
    #[serde(default = "default_banner_rows")]
    pub banner_rows: usize,
}

fn default_banner_rows() -> usize {
    1
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            banner_rows: default_banner_rows(),
        }
    }
}

/// Normalization rules applied by the cleaner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CleaningRules {
    /// Campaign value meaning "no campaign"; such rows are dropped
    pub placeholder_campaign: String,
    /// The single name every anonymous donor collapses to
    pub anonymity_token: String,
    /// Names (case-insensitive, whole value) that mean "anonymous"
    #[serde(default)]
    pub anonymity_idioms: Vec<String>,
    /// Raw status values rewritten before trimming and title-casing
    #[serde(default)]
    pub status_synonyms: HashMap<String, String>,
    pub success_status: String,
    pub pending_status: String,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            placeholder_campaign: "-".to_string(),
            anonymity_token: "Anonim".to_string(),
            anonymity_idioms: vec!["Hamba Allah".to_string()],
            status_synonyms: HashMap::from([(
                "Belum Di Konfirmasi".to_string(),
                "Pending".to_string(),
            )]),
            success_status: "Berhasil".to_string(),
            pending_status: "Pending".to_string(),
        }
    }
}

/// Source column names for one channel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    pub sequence: String,
    pub timestamp: String,
    pub campaign: String,
    pub donor: String,
    pub amount: String,
    pub status: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sequence: "No".to_string(),
            timestamp: "Tanggal".to_string(),
            campaign: "Nama Campaign".to_string(),
            donor: "Nama Donatur".to_string(),
            amount: "Total Donasi".to_string(),
            status: "Status".to_string(),
        }
    }
}

/// Resolved positions of the mapped columns in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub sequence: usize,
    pub timestamp: usize,
    pub campaign: usize,
    pub donor: usize,
    pub amount: usize,
    pub status: usize,
}

impl ColumnMapping {
    fn names(&self) -> [&str; 6] {
        [
            &self.sequence,
            &self.timestamp,
            &self.campaign,
            &self.donor,
            &self.amount,
            &self.status,
        ]
    }

    /// Locate every mapped column in `headers`.
    ///
    /// Header cells are compared after trimming. On failure returns the names
    /// of all columns that are absent.
    pub fn resolve<S: AsRef<str>>(
        &self,
        headers: &[S],
    ) -> std::result::Result<ColumnIndices, Vec<String>> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        let found: Vec<Option<usize>> = self.names().iter().map(|&name| find(name)).collect();
        let missing: Vec<String> = self
            .names()
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let idx: Vec<usize> = found.into_iter().flatten().collect();
        Ok(ColumnIndices {
            sequence: idx[0],
            timestamp: idx[1],
            campaign: idx[2],
            donor: idx[3],
            amount: idx[4],
            status: idx[5],
        })
    }
}

/// Column mappings for both channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChannelMappings {
    #[serde(default)]
    pub qris: ColumnMapping,
    #[serde(default)]
    pub manual: ColumnMapping,
}

/// Full schema mapping configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub cleaning: CleaningRules,
    #[serde(default)]
    pub channels: ChannelMappings,
}

impl SchemaConfig {
    /// Load configuration (explicit path, then data dir override, then default)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Some(path) = default_config_path() {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        debug!("Using embedded schema config");
        Self::parse(DEFAULT_CONFIG)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading schema config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: SchemaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn mapping(&self, channel: PaymentMethod) -> &ColumnMapping {
        match channel {
            PaymentMethod::Qris => &self.channels.qris,
            PaymentMethod::Manual => &self.channels.manual,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.cleaning.anonymity_token.trim().is_empty() {
            return Err(Error::Config("anonymity_token must not be empty".into()));
        }
        for channel in PaymentMethod::all() {
            if self.mapping(*channel).names().iter().any(|n| n.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "{} column mapping has an empty column name",
                    channel
                )));
            }
        }
        Ok(())
    }
}

/// Override location for the schema config
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("donasi").join("config").join("schema.toml"))
}
