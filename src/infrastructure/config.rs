//! Configuration infrastructure
//!
//! Process configuration is sourced from `ISITFILM_*` environment variables
//! with documented defaults, so the binary runs out of the box against a
//! local SQLite file and a single worker.
//!
//! | Variable                        | Default                                          |
//! |---------------------------------|--------------------------------------------------|
//! | `ISITFILM_WORKER_COUNT`         | `1`                                              |
//! | `ISITFILM_QUEUE_CAPACITY`       | `10000`                                          |
//! | `ISITFILM_DATABASE_URL`         | `sqlite:data/isitfilm.db`                        |
//! | `ISITFILM_BASE_URL`             | `https://www.imdb.com`                           |
//! | `ISITFILM_REQUEST_TIMEOUT_SECS` | `30`                                             |
//! | `ISITFILM_USER_AGENT`           | `isitfilm/0.2 (Research Tool)`                   |
//! | `ISITFILM_DATA_DIR`             | `data`                                           |
//! | `ISITFILM_CATALOG_URL`          | `https://datasets.imdbws.com/title.basics.tsv.gz`|
//! | `ISITFILM_LOG_DIR`              | unset (console logging only)                     |
//! | `ISITFILM_LOG` / `RUST_LOG`     | `info` (tracing filter directives)               |

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Worker pool settings
    pub workers: WorkerConfig,

    /// Store connection settings
    pub store: StoreConfig,

    /// Technical-page fetch settings
    pub fetch: FetchConfig,

    /// Catalog snapshot settings
    pub catalog: CatalogConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Worker pool configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent enrichment workers
    pub worker_count: usize,

    /// Maximum number of pending catalog entries in the work queue
    pub queue_capacity: usize,
}

/// Store connection configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// sqlx database URL (e.g. `sqlite:data/isitfilm.db`)
    pub database_url: String,
}

/// Technical-page fetch configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL of the remote source
    pub base_url: String,

    /// Request timeout in seconds; an unbounded fetch would starve the pool
    pub request_timeout_seconds: u64,

    /// User agent string
    pub user_agent: String,
}

/// Catalog snapshot configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory for the cached daily snapshot
    pub data_dir: PathBuf,

    /// URL of the gzipped title snapshot
    pub snapshot_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for daily-rolling log files; `None` logs to console only
    pub log_dir: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: 1,
            queue_capacity: 10_000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/isitfilm.db".to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.imdb.com".to_string(),
            request_timeout_seconds: 30,
            user_agent: "isitfilm/0.2 (Research Tool)".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            snapshot_url: "https://datasets.imdbws.com/title.basics.tsv.gz".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_dir: None }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: WorkerConfig::default(),
            store: StoreConfig::default(),
            fetch: FetchConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            workers: WorkerConfig {
                worker_count: env_parse("ISITFILM_WORKER_COUNT", defaults.workers.worker_count)?,
                queue_capacity: env_parse(
                    "ISITFILM_QUEUE_CAPACITY",
                    defaults.workers.queue_capacity,
                )?,
            },
            store: StoreConfig {
                database_url: env_string("ISITFILM_DATABASE_URL", defaults.store.database_url),
            },
            fetch: FetchConfig {
                base_url: env_string("ISITFILM_BASE_URL", defaults.fetch.base_url),
                request_timeout_seconds: env_parse(
                    "ISITFILM_REQUEST_TIMEOUT_SECS",
                    defaults.fetch.request_timeout_seconds,
                )?,
                user_agent: env_string("ISITFILM_USER_AGENT", defaults.fetch.user_agent),
            },
            catalog: CatalogConfig {
                data_dir: std::env::var("ISITFILM_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.catalog.data_dir),
                snapshot_url: env_string("ISITFILM_CATALOG_URL", defaults.catalog.snapshot_url),
            },
            logging: LoggingConfig {
                log_dir: std::env::var("ISITFILM_LOG_DIR").ok().map(PathBuf::from),
            },
        })
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}
