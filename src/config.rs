//! Data file locations for the HR store.

use crate::error::{HrError, Result};
use std::path::PathBuf;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "HR_DATA_DIR";

#[derive(Debug, Clone)]
pub struct HrConfig {
    pub data_dir: PathBuf,
    pub employees_file: String,
    pub leave_balances_file: String,
    pub leave_requests_file: String,
    pub performance_reviews_file: String,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self::with_data_dir("data")
    }
}

impl HrConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            employees_file: "employees.csv".to_string(),
            leave_balances_file: "leave_balances.csv".to_string(),
            leave_requests_file: "leave_requests.csv".to_string(),
            performance_reviews_file: "performance_reviews.csv".to_string(),
        }
    }

    /// Reads `HR_DATA_DIR`, falling back to `./data`
    pub fn from_env() -> Result<Self> {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if dir.trim().is_empty() => Err(HrError::Config(format!(
                "{} is set but empty",
                DATA_DIR_ENV
            ))),
            Ok(dir) => Ok(Self::with_data_dir(dir)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn employees_path(&self) -> PathBuf {
        self.resolve(&self.employees_file)
    }

    pub fn leave_balances_path(&self) -> PathBuf {
        self.resolve(&self.leave_balances_file)
    }

    pub fn leave_requests_path(&self) -> PathBuf {
        self.resolve(&self.leave_requests_file)
    }

    pub fn performance_reviews_path(&self) -> PathBuf {
        self.resolve(&self.performance_reviews_file)
    }

    fn resolve(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
