//! Configuration module.
//!
//! Handles loading, validating, and merging `media-squeeze.toml`. Stock
//! defaults are overridden by whatever keys the user file sets; the file is
//! optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! work_dir = "tmp"          # Where candidate directories are created
//!
//! [sizes]
//! platform = "5.3"          # "5.3" adds 1536/2048/2560 breakpoints, or "legacy"
//! medium = [300, 300]       # Settings → Media → Medium size
//! large = [1024, 1024]      # Settings → Media → Large size
//! thumbnail = [150, 150]    # Settings → Media → Thumbnail size
//!
//! [formats]
//! png = true
//! jpg = true
//! webp = true
//! fullsize_only = false     # Convert the original only, skip resized variants
//!
//! [quality]
//! png_colors = [255, 128, 64, 32, 16]
//! jpg = [80, 70, 60, 50]
//! webp = [80, 70, 60, 50]
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::SizeTable;
use crate::recipes::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "media-squeeze.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Largest configurable box side. Keeps `side * source_side` rounding in `u64`.
pub const MAX_BOX_SIDE: u32 = 65_535;

/// Tool configuration loaded from `media-squeeze.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqueezeConfig {
    /// Directory that receives one subdirectory per candidate.
    pub work_dir: PathBuf,
    /// The platform's size settings.
    pub sizes: SizeTable,
    /// Which output formats to explore.
    pub formats: FormatsConfig,
    /// Quality levels to try per format.
    pub quality: QualityConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("tmp"),
            sizes: SizeTable::default(),
            formats: FormatsConfig::default(),
            quality: QualityConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SqueezeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, bounds) in [
            ("sizes.medium", self.sizes.medium),
            ("sizes.large", self.sizes.large),
            ("sizes.thumbnail", self.sizes.thumbnail),
        ] {
            if bounds.max_width == 0 || bounds.max_height == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} values must be non-zero"
                )));
            }
            if bounds.max_width > MAX_BOX_SIDE || bounds.max_height > MAX_BOX_SIDE {
                return Err(ConfigError::Validation(format!(
                    "{name} values must be at most {MAX_BOX_SIDE}"
                )));
            }
        }

        let enabled = self.formats.enabled();
        if enabled.is_empty() {
            return Err(ConfigError::Validation(
                "at least one of formats.png, formats.jpg, formats.webp must be enabled".into(),
            ));
        }

        for format in enabled {
            let levels = self.quality.levels(format);
            let (key, range) = match format {
                OutputFormat::Png => ("quality.png_colors", 2..=256),
                OutputFormat::Jpg => ("quality.jpg", 1..=100),
                OutputFormat::Webp => ("quality.webp", 1..=100),
            };
            if levels.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if let Some(bad) = levels.iter().find(|q| !range.contains(*q)) {
                return Err(ConfigError::Validation(format!(
                    "{key} values must be {}-{}, got {bad}",
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }
}

/// Output formats to explore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatsConfig {
    pub png: bool,
    pub jpg: bool,
    pub webp: bool,
    /// Only convert the full-size image; no resized variants.
    pub fullsize_only: bool,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            png: true,
            jpg: true,
            webp: true,
            fullsize_only: false,
        }
    }
}

impl FormatsConfig {
    /// Enabled formats in exploration order.
    pub fn enabled(&self) -> Vec<OutputFormat> {
        [
            (OutputFormat::Png, self.png),
            (OutputFormat::Jpg, self.jpg),
            (OutputFormat::Webp, self.webp),
        ]
        .into_iter()
        .filter_map(|(format, on)| on.then_some(format))
        .collect()
    }
}

/// Quality levels per format.
///
/// For PNG the level is the palette size passed to `-colors`; for JPEG and
/// WebP it is the `-quality` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub png_colors: Vec<u32>,
    pub jpg: Vec<u32>,
    pub webp: Vec<u32>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            png_colors: vec![255, 128, 64, 32, 16],
            jpg: vec![80, 70, 60, 50],
            webp: vec![80, 70, 60, 50],
        }
    }
}

impl QualityConfig {
    pub fn levels(&self, format: OutputFormat) -> &[u32] {
        match format {
            OutputFormat::Png => &self.png_colors,
            OutputFormat::Jpg => &self.jpg,
            OutputFormat::Webp => &self.webp,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SqueezeConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SqueezeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SqueezeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<SqueezeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        tracing::debug!(path = %path.display(), "no config file, using stock defaults");
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# media-squeeze configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory receiving one subdirectory per candidate compression profile.
work_dir = "tmp"

# ---------------------------------------------------------------------------
# Platform sizes (WordPress: Settings -> Media)
# ---------------------------------------------------------------------------
[sizes]
# "5.3" also generates the 1536x1536, 2048x2048 and 2560x2560 sizes
# introduced in WordPress 5.3. Use "legacy" for older sites.
platform = "5.3"

# Maximum [width, height]. Images are scaled to fit, never upscaled.
medium = [300, 300]
large = [1024, 1024]

# Thumbnails are zoom-cropped to exactly this box.
thumbnail = [150, 150]

# ---------------------------------------------------------------------------
# Output formats to explore
# ---------------------------------------------------------------------------
[formats]
png = true
jpg = true
webp = true

# Convert only the full-size image, without resized variants.
fullsize_only = false

# ---------------------------------------------------------------------------
# Quality levels tried per format
# ---------------------------------------------------------------------------
[quality]
# Palette sizes for PNG quantisation (-colors).
png_colors = [255, 128, 64, 32, 16]

# -quality values (1-100).
jpg = [80, 70, 60, 50]
webp = [80, 70, 60, 50]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel conversion workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
