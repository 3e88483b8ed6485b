//! MSW table export
//!
//! Table generators walk the branch tree of one `MswExportInfo` and write
//! keyword tables through a `TableSink`. WELSEGS must run first: it numbers
//! the segments the other tables refer to.
//!
//! ## Table order for one well
//!
//! 1. WELSEGS (segment numbering, one row per split segment)
//! 2. COMPSEGS / COMPSEGL (grid cell connections, main grid then sub grids)
//! 3. WSEGVALV (ICD/ICV devices)
//! 4. WSEGAICD (autonomous ICDs)
//!
//! Every export call owns its counter and written-cell set, so different
//! wells can be exported in parallel.

mod compsegs;
pub mod depth;
pub mod splitting;
mod welsegs;
mod wsegaicd;
mod wsegvalv;

pub use compsegs::{generate_compsegs_tables, CompsegsSummary};
pub use welsegs::generate_welsegs_table;
pub use wsegaicd::generate_wsegaicd_table;
pub use wsegvalv::generate_wsegvalv_table;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{ExportConfig, ExportSettings};
use crate::table::{TableCollector, TableSink, TextTableFormatter};
use crate::types::{Branch, MswExportInfo, Trajectory, WellPathGeometry};

// ============================================================================
// Errors
// ============================================================================

/// Conditions that abort an export. Invalid valves and empty completions are
/// not errors: they are logged and skipped.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Branch '{branch}' references well path '{well_path}' which has no trajectory")]
    MissingTrajectory { branch: String, well_path: String },

    #[error("Segment '{label}' has an invalid MD interval [{start_md}, {end_md}]")]
    InvalidSegment { label: String, start_md: f64, end_md: f64 },

    #[error("Maximum segment length must be a finite value > 0 (got {0})")]
    InvalidMaxSegmentLength(f64),

    #[error("Segment '{label}' has no segment number; WELSEGS must be written first")]
    UnnumberedSegment { label: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trajectory a branch is drawn along. Missing or empty is fatal.
pub fn lookup_trajectory<'a>(
    well_paths: &'a BTreeMap<String, Trajectory>,
    branch: &Branch,
) -> Result<&'a Trajectory, ExportError> {
    well_paths
        .get(&branch.well_path)
        .filter(|t| t.is_defined())
        .ok_or_else(|| ExportError::MissingTrajectory {
            branch: branch.label.clone(),
            well_path: branch.well_path.clone(),
        })
}

// ============================================================================
// Orchestration
// ============================================================================

/// What one export wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub well_name: String,
    pub segments: u32,
    pub compsegs_rows: usize,
    pub compsegl_rows: usize,
    pub valves: usize,
    pub aicds: usize,
}

/// Sort and validate the model, then write every table for the well.
pub fn export_msw_tables<S: TableSink>(
    sink: &mut S,
    info: &mut MswExportInfo,
    settings: &ExportSettings,
) -> Result<DeckSummary, ExportError> {
    info.prepare()?;

    let segments = generate_welsegs_table(sink, info, settings)?;
    let compsegs = generate_compsegs_tables(sink, info);
    let valves = generate_wsegvalv_table(sink, info)?;
    let aicds = generate_wsegaicd_table(sink, info)?;

    let summary = DeckSummary {
        well_name: info.well_name.clone(),
        segments,
        compsegs_rows: compsegs.main_grid_rows,
        compsegl_rows: compsegs.sub_grid_rows,
        valves,
        aicds,
    };
    info!(
        well = %summary.well_name,
        segments = summary.segments,
        compsegs = summary.compsegs_rows,
        compsegl = summary.compsegl_rows,
        valves = summary.valves,
        aicds = summary.aicds,
        "MSW export complete"
    );
    Ok(summary)
}

/// Render the deck text for one well.
///
/// With `stamp` set, a provenance comment is written before the first table;
/// without it the output depends only on the model and the configuration.
pub fn render_deck(
    info: &mut MswExportInfo,
    config: &ExportConfig,
    stamp: Option<DateTime<Utc>>,
) -> Result<(String, DeckSummary), ExportError> {
    let mut formatter = TextTableFormatter::new()
        .with_layout(config.formatting.layout())
        .with_optional_comments(config.export.include_optional_comments);

    if let Some(stamp) = stamp {
        formatter.comment(&format!(
            "Exported by msw-export {} at {}",
            env!("CARGO_PKG_VERSION"),
            stamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        formatter.comment(&format!("Well: {}", info.well_name));
    }

    let summary = export_msw_tables(&mut formatter, info, &config.export)?;
    Ok((formatter.into_string(), summary))
}

/// Render the deck and write it to `path`.
pub fn write_deck(
    path: &Path,
    info: &mut MswExportInfo,
    config: &ExportConfig,
    stamp: Option<DateTime<Utc>>,
) -> Result<DeckSummary, ExportError> {
    let (deck, summary) = render_deck(info, config, stamp)?;
    std::fs::write(path, deck)?;
    info!(path = %path.display(), well = %summary.well_name, "Deck written");
    Ok(summary)
}

/// Collect the tables as data instead of text.
pub fn collect_tables(
    info: &mut MswExportInfo,
    settings: &ExportSettings,
) -> Result<(TableCollector, DeckSummary), ExportError> {
    let mut collector = TableCollector::new();
    if !settings.include_optional_comments {
        collector = collector.without_optional_comments();
    }
    let summary = export_msw_tables(&mut collector, info, settings)?;
    Ok((collector, summary))
}

/// Result of exporting one well in a batch.
#[derive(Debug)]
pub struct WellExport {
    pub well_name: String,
    pub result: Result<(String, DeckSummary), ExportError>,
}

/// Export independent wells on the rayon pool. Each well owns its tree,
/// counter and written-cell set. Output order follows input order.
pub fn export_wells_parallel(
    wells: Vec<MswExportInfo>,
    config: &ExportConfig,
    stamp: Option<DateTime<Utc>>,
) -> Vec<WellExport> {
    wells
        .into_par_iter()
        .map(|mut info| WellExport {
            well_name: info.well_name.clone(),
            result: render_deck(&mut info, config, stamp),
        })
        .collect()
}
