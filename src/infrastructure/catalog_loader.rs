//! Catalog snapshot loader
//!
//! Downloads the periodic gzipped title snapshot, caches the decompressed TSV
//! under a dated filename, and parses it into an ordered, id-deduplicated list
//! of catalog entries ("movie" title rows only). Downloading and parsing are
//! split so tests can feed a local fixture.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use flate2::read::GzDecoder;
use tracing::info;

use crate::domain::entities::CatalogEntry;
use crate::infrastructure::config::CatalogConfig;

// Column layout of the title snapshot
const COL_ID: usize = 0;
const COL_TITLE_TYPE: usize = 1;
const COL_PRIMARY_TITLE: usize = 2;
const COL_ORIGINAL_TITLE: usize = 3;

pub struct CatalogLoader {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogLoader {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| anyhow!("failed to create snapshot download client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Load the full movie catalog, downloading today's snapshot if it is not
    /// cached yet.
    pub async fn load_movies(&self) -> Result<Vec<CatalogEntry>> {
        let path = self.snapshot_path();

        if !path.exists() {
            info!("catalog snapshot not cached, downloading {}", self.config.snapshot_url);
            self.download_snapshot(&path)
                .await
                .context("downloading title snapshot")?;
        }

        // The snapshot is hundreds of megabytes; keep the parse off the runtime
        let parse_path = path.clone();
        let entries = tokio::task::spawn_blocking(move || parse_catalog(&parse_path))
            .await
            .context("catalog parse task failed")??;

        info!(movies = entries.len(), "catalog loaded from {}", path.display());
        Ok(entries)
    }

    /// Cache path for today's snapshot, e.g. `data/20260823_title.basics.tsv`.
    fn snapshot_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d");
        self.config
            .data_dir
            .join(format!("{stamp}_title.basics.tsv"))
    }

    async fn download_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let compressed = self
            .client
            .get(&self.config.snapshot_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let mut decoder = GzDecoder::new(compressed.as_ref());
        let mut tsv = Vec::new();
        decoder
            .read_to_end(&mut tsv)
            .context("decompressing title snapshot")?;

        tokio::fs::write(path, tsv).await?;
        Ok(())
    }
}

/// Parse a cached snapshot TSV into catalog entries.
///
/// Keeps rows whose titleType is "movie", maps tconst/originalTitle/
/// primaryTitle onto the entry fields, and drops repeated ids while
/// preserving first-seen order.
pub fn parse_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening catalog snapshot {}", path.display()))?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record?;

        if record.get(COL_TITLE_TYPE) != Some("movie") {
            continue;
        }
        let (Some(id), Some(primary_title), Some(original_title)) = (
            record.get(COL_ID),
            record.get(COL_PRIMARY_TITLE),
            record.get(COL_ORIGINAL_TITLE),
        ) else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }

        entries.push(CatalogEntry {
            id: id.to_string(),
            title: original_title.to_string(),
            english_title: primary_title.to_string(),
        });
    }

    Ok(entries)
}
