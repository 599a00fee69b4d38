//! Configuration for an annotation run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Mode;

/// Where inputs are read from and results are written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dialogue table (CSV or JSON Lines)
    pub items_path: PathBuf,

    /// Directory holding `adult.csv` and `pediatric.csv`
    pub categories_dir: PathBuf,

    /// Directory for saved result files
    pub results_dir: PathBuf,

    /// Mode used when none is chosen at login
    pub default_mode: Mode,
}

impl Config {
    pub fn new() -> Self {
        Self {
            items_path: PathBuf::from("data").join("evaluation_data.csv"),
            categories_dir: PathBuf::from("data").join("categories"),
            results_dir: PathBuf::from("results"),
            default_mode: Mode::Plain,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
