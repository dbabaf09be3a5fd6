//! Unified path management for the customers data files.
//!
//! Every file the application owns lives under one private data directory so
//! that tests and embedders can redirect everything with a single override.

use std::path::{Path, PathBuf};

use customers_core::config::StoreSettings;
use customers_core::error::{CustomersError, Result};

const APP_DIR_NAME: &str = "customers";

/// Resolves the locations of the customers data files.
///
/// # Directory Structure
///
/// ```text
/// <data_local_dir>/customers/   # e.g. ~/.local/share/customers
/// ├── config.toml               # Application configuration
/// └── customers.json            # Persistent customer store
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomersPaths {
    base_dir: Option<PathBuf>,
}

impl CustomersPaths {
    /// Creates a resolver.
    ///
    /// `base_dir` replaces the platform data directory when given.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the private data directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: The override, or `<data_local_dir>/customers`
    /// - `Err(CustomersError::Config)`: The platform has no data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| CustomersError::config("Cannot find local data directory"))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("config.toml"))
    }

    /// Returns the path of the customer document named by `settings`.
    pub fn customers_file(&self, settings: &StoreSettings) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&settings.file_name))
    }

    /// Creates the data directory if it does not exist.
    pub fn ensure_data_dir(&self) -> Result<PathBuf> {
        let dir = self.data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
