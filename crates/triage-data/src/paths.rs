//! Path resolution for input tables and result files

use std::path::{Path, PathBuf};

use triage_core::Config;

/// Resolves configured paths against a base directory, expanding `~/`
#[derive(Debug, Clone)]
pub struct Paths {
    pub base_dir: PathBuf,
    pub home: Option<PathBuf>,
}

impl Paths {
    /// Create a resolver for the current working directory
    pub fn new() -> std::io::Result<Self> {
        let base_dir = std::env::current_dir()?;
        Ok(Self::with_base(base_dir))
    }

    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            home: dirs::home_dir(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if let (Ok(rest), Some(home)) = (path.strip_prefix("~"), self.home.as_ref()) {
            return home.join(rest);
        }
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn items_file(&self, config: &Config) -> PathBuf {
        self.resolve(&config.items_path)
    }

    pub fn categories_dir(&self, config: &Config) -> PathBuf {
        self.resolve(&config.categories_dir)
    }

    pub fn results_dir(&self, config: &Config) -> PathBuf {
        self.resolve(&config.results_dir)
    }
}
