//! Configuration for the measurement engine
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Initial drawing style (colour, width level, line style)
//! - Circle generation (default radius, ring resolution)
//! - Label text and glyph sizing
//! - Free annotation text sizes

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tacmap_core::{DistanceUnit, SizeTier, Style, WidthLevel, MAX_CIRCLE_RADIUS_KM};

use crate::error::{SettingsError, SettingsResult};

/// Circle tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSettings {
    /// Radius used by the circle tool until the operator changes it
    pub default_radius_km: f64,
    /// Number of ring segments approximating the circle
    pub steps: usize,
}

impl Default for CircleSettings {
    fn default() -> Self {
        Self {
            default_radius_km: 10.0,
            steps: 64,
        }
    }
}

/// Measurement label settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Unit used in label text
    pub unit: DistanceUnit,
    /// Digits after the decimal point
    pub decimals: usize,
    /// Glyph scale at width level zero
    pub glyph_base_size: f64,
    /// Glyph scale added per width level
    pub glyph_size_step: f64,
}

impl LabelSettings {
    /// Label and arrow-head glyph scale for a width level. Strictly
    /// increasing in `level`.
    pub fn glyph_size(&self, level: WidthLevel) -> f64 {
        self.glyph_base_size + self.glyph_size_step * f64::from(level.get())
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Kilometers,
            decimals: 2,
            glyph_base_size: 0.6,
            glyph_size_step: 0.1,
        }
    }
}

/// Free annotation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Size tier given to new annotations
    pub default_size_tier: SizeTier,
    /// Font size in pixels for the small tier
    pub font_size_small: f64,
    /// Font size in pixels for the medium tier
    pub font_size_medium: f64,
    /// Font size in pixels for the large tier
    pub font_size_large: f64,
}

impl AnnotationSettings {
    pub fn font_size(&self, tier: SizeTier) -> f64 {
        match tier {
            SizeTier::Small => self.font_size_small,
            SizeTier::Medium => self.font_size_medium,
            SizeTier::Large => self.font_size_large,
        }
    }
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            default_size_tier: SizeTier::Medium,
            font_size_small: 12.0,
            font_size_medium: 16.0,
            font_size_large: 24.0,
        }
    }
}

/// Complete engine configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Style active when the engine is mounted
    pub style: Style,
    /// Circle tool settings
    pub circle: CircleSettings,
    /// Label settings
    pub labels: LabelSettings,
    /// Annotation settings
    pub annotations: AnnotationSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location, `<config dir>/tacmap/config.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("tacmap").join("config.toml"))
            .ok_or(SettingsError::NoConfigDirectory)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match format {
            Format::Json => {
                serde_json::from_str(&content).map_err(|e| SettingsError::malformed(path, e))?
            }
            Format::Toml => toml::from_str(&content).map_err(|e| SettingsError::malformed(path, e))?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file is missing or
    /// invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => {
                serde_json::to_string_pretty(self).map_err(|e| SettingsError::Encode(e.to_string()))?
            }
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| SettingsError::Encode(e.to_string()))?
            }
        };

        let write_error = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let radius = self.circle.default_radius_km;
        if !radius.is_finite() || radius <= 0.0 || radius >= MAX_CIRCLE_RADIUS_KM {
            return Err(SettingsError::invalid(
                "circle.default_radius_km",
                "must be positive and less than half the Earth's circumference",
            ));
        }

        if self.circle.steps < 3 {
            return Err(SettingsError::invalid("circle.steps", "must be at least 3"));
        }

        if self.labels.decimals > 6 {
            return Err(SettingsError::invalid("labels.decimals", "must be 0..=6"));
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.labels.glyph_base_size) || !positive(self.labels.glyph_size_step) {
            return Err(SettingsError::invalid(
                "labels.glyph_size",
                "base size and step must be > 0",
            ));
        }

        let a = &self.annotations;
        let increasing = positive(a.font_size_small)
            && a.font_size_small < a.font_size_medium
            && a.font_size_medium < a.font_size_large;
        if !increasing {
            return Err(SettingsError::invalid(
                "annotations.font_size",
                "sizes must be positive and increase small < medium < large",
            ));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}
