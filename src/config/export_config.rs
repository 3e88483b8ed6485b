//! Export Configuration - MSW export settings as operator-tunable TOML values
//!
//! Every struct implements `Default`, so an empty or missing file yields a
//! usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::table::Layout;

// ============================================================================
// Enumerated settings
// ============================================================================

/// How WELSEGS reports segment length and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthAndDepth {
    /// Deltas from the outlet segment.
    #[serde(rename = "INC", alias = "inc", alias = "incremental")]
    Incremental,
    /// Absolute midpoint MD/TVD.
    #[serde(rename = "ABS", alias = "abs", alias = "absolute")]
    Absolute,
}

impl LengthAndDepth {
    pub const fn as_keyword(self) -> &'static str {
        match self {
            Self::Incremental => "INC",
            Self::Absolute => "ABS",
        }
    }
}

impl std::str::FromStr for LengthAndDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INC" | "INCREMENTAL" => Ok(Self::Incremental),
            "ABS" | "ABSOLUTE" => Ok(Self::Absolute),
            other => Err(format!("unknown length-and-depth mode '{other}' (expected INC or ABS)")),
        }
    }
}

/// Pressure drop components the simulator includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureDrop {
    /// Hydrostatic, friction and acceleration.
    #[serde(rename = "HFA")]
    HydrostaticFrictionAcceleration,
    /// Hydrostatic and friction.
    #[serde(rename = "HF-")]
    HydrostaticFriction,
    /// Hydrostatic only.
    #[serde(rename = "H--")]
    Hydrostatic,
}

impl PressureDrop {
    pub const fn as_keyword(self) -> &'static str {
        match self {
            Self::HydrostaticFrictionAcceleration => "HFA",
            Self::HydrostaticFriction => "HF-",
            Self::Hydrostatic => "H--",
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `ExportConfig::load()` which searches:
/// 1. `$MSW_EXPORT_CONFIG` env var
/// 2. `./msw_export.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Segmentation and table content
    #[serde(default)]
    pub export: ExportSettings,

    /// Text layout of the written deck
    #[serde(default)]
    pub formatting: FormattingConfig,
}

impl ExportConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded export config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load export config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded export config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No export config found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys are logged, never fatal.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Export config saved");
        Ok(())
    }

    /// Validate every setting, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = self.export.validation_errors();

        if self.formatting.column_spacing == 0 {
            errors.push("formatting.column_spacing must be > 0".to_string());
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Export Settings
// ============================================================================

/// Settings shared by every table of one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Longest segment written before a segment is split (m)
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: f64,

    /// INC or ABS
    #[serde(default = "default_length_and_depth")]
    pub length_and_depth: LengthAndDepth,

    /// Pressure drop model written to the WELSEGS top record
    #[serde(default = "default_pressure_drop")]
    pub pressure_drop: PressureDrop,

    /// Tubing/liner diameter for main-bore and valve segments (m)
    #[serde(default = "default_liner_diameter")]
    pub liner_diameter: f64,

    /// Roughness for main-bore and valve segments (m)
    #[serde(default = "default_roughness_factor")]
    pub roughness_factor: f64,

    #[serde(default = "default_true")]
    pub include_optional_comments: bool,
}

fn default_max_segment_length() -> f64 {
    defaults::MAX_SEGMENT_LENGTH
}
fn default_length_and_depth() -> LengthAndDepth {
    LengthAndDepth::Incremental
}
fn default_pressure_drop() -> PressureDrop {
    PressureDrop::HydrostaticFriction
}
fn default_liner_diameter() -> f64 {
    defaults::LINER_DIAMETER
}
fn default_roughness_factor() -> f64 {
    defaults::ROUGHNESS_FACTOR
}
fn default_true() -> bool {
    true
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            max_segment_length: default_max_segment_length(),
            length_and_depth: default_length_and_depth(),
            pressure_drop: default_pressure_drop(),
            liner_diameter: default_liner_diameter(),
            roughness_factor: default_roughness_factor(),
            include_optional_comments: true,
        }
    }
}

impl ExportSettings {
    pub fn is_incremental(&self) -> bool {
        self.length_and_depth == LengthAndDepth::Incremental
    }

    fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.max_segment_length.is_finite() || self.max_segment_length <= 0.0 {
            errors.push(format!(
                "export.max_segment_length must be a finite value > 0 (got {})",
                self.max_segment_length
            ));
        }
        if !self.liner_diameter.is_finite() || self.liner_diameter <= 0.0 {
            errors.push(format!(
                "export.liner_diameter must be a finite value > 0 (got {})",
                self.liner_diameter
            ));
        }
        if !self.roughness_factor.is_finite() || self.roughness_factor < 0.0 {
            errors.push(format!(
                "export.roughness_factor must be a finite value >= 0 (got {})",
                self.roughness_factor
            ));
        }
        errors
    }
}

// ============================================================================
// Formatting
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingConfig {
    #[serde(default = "default_column_spacing")]
    pub column_spacing: usize,

    /// Text written before every data row
    #[serde(default = "default_row_prefix")]
    pub row_prefix: String,
}

fn default_column_spacing() -> usize {
    defaults::COLUMN_SPACING
}
fn default_row_prefix() -> String {
    defaults::ROW_PREFIX.to_string()
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self { column_spacing: default_column_spacing(), row_prefix: default_row_prefix() }
    }
}

impl FormattingConfig {
    pub fn layout(&self) -> Layout {
        Layout { column_spacing: self.column_spacing, row_prefix: self.row_prefix.clone() }
    }
}

// ============================================================================
// Tests
// ============================================================================
