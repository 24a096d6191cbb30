use crate::errors::{HistError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Folder scanned by `/hist` and served as static files.
    pub folder: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Parallel image workers; 0 uses every available core.
    pub workers: usize,
    pub plot: PlotConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Upper bound on a single network fetch.
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            folder: PathBuf::from("."),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            plot: PlotConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl BatchConfig {
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

impl SourceConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Config {
    /// Default location: `<platform config dir>/histview/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "histview", "histview")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file, else the default file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Loading config from {:?}", path);
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                log::info!("Loading config from {:?}", path);
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HistError::Config {
                message: "port must be non-zero".to_string(),
            });
        }
        let plot = &self.batch.plot;
        if plot.canvas_width == 0 || plot.canvas_height == 0 {
            return Err(HistError::Config {
                message: format!(
                    "canvas must be non-empty, got {}x{}",
                    plot.canvas_width, plot.canvas_height
                ),
            });
        }
        Ok(())
    }
}
