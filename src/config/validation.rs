//! Config validation: unknown-key detection with edit-distance suggestions
//! and physical range checks.
//!
//! The raw TOML is walked as a `toml::Value` tree first and every key is
//! compared against the known field names. Unknown keys only produce
//! warnings; serde deserialization then proceeds as usual.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `ExportConfig`.
///
/// Must be kept in step with the structs in export_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [export]
        "export",
        "export.max_segment_length",
        "export.length_and_depth",
        "export.pressure_drop",
        "export.liner_diameter",
        "export.roughness_factor",
        "export.include_optional_comments",
        // [formatting]
        "formatting",
        "formatting.column_spacing",
        "formatting.row_prefix",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Every dotted key path in a `toml::Value` tree, parents before children.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(value, prefix, &mut keys);
    keys
}

fn collect_keys(value: &toml::Value, prefix: &str, keys: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        return;
    };
    for (name, child) in table {
        let path = match prefix {
            "" => name.clone(),
            _ => format!("{prefix}.{name}"),
        };
        if child.is_table() {
            keys.push(path.clone());
            collect_keys(child, &path, keys);
        } else {
            keys.push(path);
        }
    }
}

// ============================================================================
// Suggestions
// ============================================================================

const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Closest known key within `MAX_SUGGESTION_DISTANCE` edits, if any.
/// Equal distances resolve to the alphabetically first key.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|key| (strsim::levenshtein(unknown, key), *key))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, key)| key.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every unknown key in a raw TOML string.
///
/// Parse errors are left to serde and produce no warnings here.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Returns (errors, warnings). Errors are impossible combinations; warnings
/// are values outside what completion design normally uses.
pub fn validate_physical_ranges(
    config: &super::ExportConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let e = &config.export;

    if e.liner_diameter > 0.0 && e.roughness_factor >= e.liner_diameter {
        errors.push(format!(
            "export.roughness_factor ({}) must be smaller than liner_diameter ({})",
            e.roughness_factor, e.liner_diameter
        ));
    }

    // Liners are a few inches; a metre-plus diameter is almost certainly a unit mix-up.
    if e.liner_diameter > 1.0 {
        warnings.push(ValidationWarning {
            field: "export.liner_diameter".to_string(),
            message: format!(
                "liner_diameter = {:.3} m is outside typical range (0.05-1.0 m)",
                e.liner_diameter
            ),
            suggestion: None,
        });
    }

    if e.max_segment_length > 0.0 && e.max_segment_length < 0.1 {
        warnings.push(ValidationWarning {
            field: "export.max_segment_length".to_string(),
            message: format!(
                "max_segment_length = {} m will produce a very large number of segments",
                e.max_segment_length
            ),
            suggestion: None,
        });
    }

    if e.roughness_factor > 0.01 {
        warnings.push(ValidationWarning {
            field: "export.roughness_factor".to_string(),
            message: format!(
                "roughness_factor = {} m is outside typical range (0-0.01 m)",
                e.roughness_factor
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
