//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! key is optional; missing values fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Default number of customers generated for an empty store.
pub const DEFAULT_SEED_COUNT: usize = 300;

/// Default upper bound (exclusive) of the simulated read latency.
pub const DEFAULT_MAX_LATENCY_MS: u64 = 1500;

/// Default number of customers fetched by a full load.
pub const DEFAULT_LOAD_CAP: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CustomersConfig {
    pub store: StoreSettings,
    pub service: ServiceSettings,
    pub logging: LoggingSettings,
}

/// Persistent store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Document name inside the private data directory.
    pub file_name: String,
    /// Number of customers generated on first run.
    pub seed_count: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            file_name: "customers.json".to_string(),
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

/// Customer service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Delay UI-facing reads by a random amount to mimic remote I/O.
    pub simulate_latency: bool,
    pub max_latency_ms: u64,
    pub load_cap: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            simulate_latency: true,
            max_latency_ms: DEFAULT_MAX_LATENCY_MS,
            load_cap: DEFAULT_LOAD_CAP,
        }
    }
}

impl ServiceSettings {
    /// Settings for tests: no latency.
    pub fn immediate() -> Self {
        Self {
            simulate_latency: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
