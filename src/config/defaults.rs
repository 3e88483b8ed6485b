//! Built-in default values for the export configuration.

// ============================================================================
// Configuration discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MSW_EXPORT_CONFIG";

/// Config file looked up in the current working directory.
pub const CONFIG_FILE_NAME: &str = "msw_export.toml";

// ============================================================================
// Segmentation
// ============================================================================

/// Longest segment written before splitting (m).
pub const MAX_SEGMENT_LENGTH: f64 = 10.0;

/// Tubing/liner diameter for main-bore and valve segments (m). 6 inch liner.
pub const LINER_DIAMETER: f64 = 0.152;

/// Roughness for main-bore and valve segments (m).
pub const ROUGHNESS_FACTOR: f64 = 1.0e-5;

/// First number handed out; segment 1 is the implicit top segment.
pub const FIRST_SEGMENT_NUMBER: u32 = 2;

/// Outlet reported by rows that connect to the top of the well.
pub const TOP_SEGMENT_NUMBER: u32 = 1;

// ============================================================================
// Text layout
// ============================================================================

pub const COLUMN_SPACING: usize = 2;

/// Aligns data rows under the `-- ` of header lines.
pub const ROW_PREFIX: &str = "   ";

/// Significant digits for valve cross-section areas in WSEGVALV.
pub const VALVE_AREA_SIGNIFICANT_DIGITS: usize = 4;
