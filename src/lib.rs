//! msw-export: Multi-Segment Well table export
//!
//! Walks a branch/segment/completion tree for one well and writes the
//! well-segmentation keyword tables a reservoir simulator reads.
//!
//! ## Layout
//!
//! - **types**: export model (branches, segments, completions, trajectories)
//! - **export**: segment splitting, MD to TVD, and the table generators
//! - **table**: row sink contract, deck-text formatter, in-memory collector
//! - **config**: TOML export settings with validation

pub mod config;
pub mod export;
pub mod table;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, ExportConfig, ExportSettings, LengthAndDepth, PressureDrop};

// Re-export the export entry points
pub use export::{
    collect_tables, export_msw_tables, export_wells_parallel, generate_compsegs_tables,
    generate_welsegs_table, generate_wsegaicd_table, generate_wsegvalv_table, render_deck,
    write_deck, CompsegsSummary, DeckSummary, ExportError, WellExport,
};

// Re-export the model
pub use types::{
    Aicd, AicdParameters, Branch, CellIntersection, Completion, CompletionBody, CompletionType,
    MswExportInfo, Segment, TieInValve, Trajectory, Valve, ValveKind, WellPathGeometry,
};

// Re-export sinks
pub use table::{TableCollector, TableSink, TextTableFormatter};
