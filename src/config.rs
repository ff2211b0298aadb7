//! Designer configuration loaded from TOML
//!
//! ```toml
//! [resolver]
//! endpoint = "http://127.0.0.1:8080/api/update_layout"
//! timeout_secs = 30
//!
//! [canvas]
//! width = 1600
//! height = 1000
//! scale = 200
//! figure_width = 7
//! figure_height = 5
//!
//! [cache]
//! autosave = true
//! dir = "/home/me/.cache/plot-designer"
//! ```
//!
//! Every table and key is optional.
//!
//! The `[canvas]` pixel size and scale apply to every design sent to the
//! resolver. The figure size belongs to the design and only fills in for
//! an empty one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::Viewport;
use crate::sync::{HttpResolver, LayoutPayload, LocalCache};

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the resolver, the canvas and the local cache
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerConfig {
    /// Where layout requests are posted
    pub endpoint: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub viewport: Viewport,
    pub autosave: bool,
    /// Cache directory; `None` uses the platform cache dir
    pub cache_dir: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    resolver: TomlResolver,
    canvas: TomlCanvas,
    cache: TomlCache,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlResolver {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlCanvas {
    width: Option<f64>,
    height: Option<f64>,
    scale: Option<f64>,
    figure_width: Option<f64>,
    figure_height: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlCache {
    autosave: Option<bool>,
    dir: Option<PathBuf>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            endpoint: HttpResolver::DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            viewport: Viewport::default(),
            autosave: false,
            cache_dir: None,
        }
    }
}

impl DesignerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        let canvas = parsed.canvas;

        Ok(Self {
            endpoint: parsed.resolver.endpoint.unwrap_or(defaults.endpoint),
            timeout: parsed.resolver.timeout_secs.map(Duration::from_secs),
            viewport: Viewport {
                width: canvas.width.unwrap_or(defaults.viewport.width),
                height: canvas.height.unwrap_or(defaults.viewport.height),
                scale: canvas.scale.unwrap_or(defaults.viewport.scale),
                figure_width: canvas.figure_width.unwrap_or(defaults.viewport.figure_width),
                figure_height: canvas.figure_height.unwrap_or(defaults.viewport.figure_height),
            },
            autosave: parsed.cache.autosave.unwrap_or(defaults.autosave),
            cache_dir: parsed.cache.dir,
        })
    }

    /// Set the resolver endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Put the configured canvas on a design about to be synced
    pub fn apply_canvas(&self, payload: &mut LayoutPayload) {
        let viewport = &mut payload.viewport;
        viewport.width = self.viewport.width;
        viewport.height = self.viewport.height;
        viewport.scale = self.viewport.scale;
        if payload.elements.is_empty() && payload.constraints.is_empty() {
            viewport.figure_width = self.viewport.figure_width;
            viewport.figure_height = self.viewport.figure_height;
        }
    }

    pub fn http_resolver(&self) -> HttpResolver {
        let resolver = HttpResolver::new(self.endpoint.clone());
        match self.timeout {
            Some(timeout) => resolver.with_timeout(timeout),
            None => resolver,
        }
    }

    /// Cache in the configured or platform directory, if either exists
    pub fn cache(&self) -> Option<LocalCache> {
        let dir = self.cache_dir.clone().or_else(LocalCache::default_dir)?;
        Some(LocalCache::new(dir).with_autosave(self.autosave))
    }
}
