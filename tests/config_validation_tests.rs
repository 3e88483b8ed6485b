//! Config Validation Tests
//!
//! Typo detection, range validation and file round trips for the export
//! configuration, exercised independently from the table generators.

use std::io::Write;

use msw_export::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use msw_export::{ConfigError, ExportConfig, LengthAndDepth, PressureDrop};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_export_section_warns_with_suggestion() {
    let toml_str = r#"
[export]
max_segmnet_length = 12.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("max_segmnet_length"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("export.max_segment_length"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn unknown_section_warns_without_suggestion() {
    let toml_str = r#"
[simulator]
flavour = "E300"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[export]
max_segment_length = 12.0
length_and_depth = "ABS"
pressure_drop = "HFA"
liner_diameter = 0.127
roughness_factor = 1.0e-5
include_optional_comments = false

[formatting]
column_spacing = 3
row_prefix = "  "
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);
}

#[test]
fn suggestion_needs_a_close_match() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("formatting.colum_spacing", &known).as_deref(),
        Some("formatting.column_spacing")
    );
    assert!(suggest_correction("export.something_else_entirely", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn roughness_not_below_liner_is_an_error() {
    let mut config = ExportConfig::default();
    config.export.liner_diameter = 0.1;
    config.export.roughness_factor = 0.1;
    let (errors, _) = validate_physical_ranges(&config);
    assert_eq!(errors.len(), 1);
    assert!(config.validate().is_err());
}

#[test]
fn unusual_values_only_warn() {
    let mut config = ExportConfig::default();
    config.export.max_segment_length = 0.05;
    config.export.liner_diameter = 1.5;
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 2);
    assert!(config.validate().is_ok(), "Warnings never fail validation");
}

#[test]
fn non_positive_max_length_fails_validation() {
    let mut config = ExportConfig::default();
    config.export.max_segment_length = 0.0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("max_segment_length")));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn partial_file_fills_in_defaults() {
    let config = ExportConfig::from_toml_str(
        r#"
[export]
length_and_depth = "abs"
"#,
    )
    .expect("partial config parses");
    assert_eq!(config.export.length_and_depth, LengthAndDepth::Absolute);
    assert_eq!(config.export.pressure_drop, PressureDrop::HydrostaticFriction);
    assert!(config.export.include_optional_comments);
    assert_eq!(config.formatting.column_spacing, 2);
}

#[test]
fn load_from_file_reports_path_on_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[export]\nmax_segment_length = \"long\"").expect("write");

    match ExportConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse(path, _)) => assert_eq!(path, file.path()),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = ExportConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}

#[test]
fn save_then_load_keeps_settings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("msw_export.toml");

    let mut config = ExportConfig::default();
    config.export.max_segment_length = 25.0;
    config.export.length_and_depth = LengthAndDepth::Absolute;
    config.export.pressure_drop = PressureDrop::Hydrostatic;
    config.formatting.row_prefix = " ".to_string();
    config.save_to_file(&path).expect("save");

    let loaded = ExportConfig::load_from_file(&path).expect("load");
    assert_eq!(loaded.export, config.export);
    assert_eq!(loaded.formatting, config.formatting);
}
