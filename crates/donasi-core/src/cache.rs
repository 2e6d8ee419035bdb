//! Session cache for the cleaned dataset
//!
//! Keyed by a fingerprint of both source files (size, modification time and
//! a SHA-256 of the contents). Any change to either file means the next
//! request rebuilds the whole dataset; there is no partial reuse.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::clean::Cleaner;
use crate::error::{Error, Result};
use crate::import::{load_sources, SourcePaths};
use crate::models::{CleanedDataset, PaymentMethod};
use crate::schema::SchemaConfig;

/// Identity of one source file at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Hex-encoded SHA-256 of the file contents
    pub sha256: String,
}

impl FileFingerprint {
    pub fn compute(path: &Path, channel: PaymentMethod) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingFile {
                channel,
                path: path.to_path_buf(),
            });
        }
        let metadata = fs::metadata(path)?;
        let contents = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            sha256: hex::encode(hasher.finalize()),
        })
    }
}

/// Fingerprints of both channel sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub qris: FileFingerprint,
    pub manual: FileFingerprint,
}

impl SourceFingerprint {
    pub fn compute(paths: &SourcePaths) -> Result<Self> {
        Ok(Self {
            qris: FileFingerprint::compute(&paths.qris, PaymentMethod::Qris)?,
            manual: FileFingerprint::compute(&paths.manual, PaymentMethod::Manual)?,
        })
    }
}

/// What a cached dataset was built from
#[derive(Debug)]
struct CacheEntry {
    fingerprint: SourceFingerprint,
    config: SchemaConfig,
    dataset: Arc<CleanedDataset>,
}

/// Holds at most one cleaned dataset together with the source fingerprint
/// and schema config it was built from
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
    builds: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset if both sources and the config are
    /// unchanged, otherwise load and clean them again.
    pub fn get_or_load(
        &mut self,
        paths: &SourcePaths,
        config: &SchemaConfig,
    ) -> Result<Arc<CleanedDataset>> {
        let fingerprint = SourceFingerprint::compute(paths)?;

        if let Some(entry) = &self.entry {
            if entry.fingerprint != fingerprint {
                info!("Source files changed, rebuilding dataset");
            } else if entry.config != *config {
                info!("Schema config changed, rebuilding dataset");
            } else {
                debug!("Source files unchanged, reusing cleaned dataset");
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        // Drop the stale entry before rebuilding so a failed rebuild never
        // leaves it behind.
        self.entry = None;

        let (qris, manual) = load_sources(paths, config)?;
        let dataset = Arc::new(Cleaner::new(config)?.clean_and_merge(&qris, &manual)?);
        self.builds += 1;
        self.entry = Some(CacheEntry {
            fingerprint,
            config: config.clone(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Force the next `get_or_load` to rebuild
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    /// Number of full rebuilds performed by this cache
    pub fn builds(&self) -> usize {
        self.builds
    }
}
