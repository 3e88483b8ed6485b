//! Multi-segment well export model
//!
//! The tree built for one export: branches own segments, segments own
//! completions, completions own their sub-segments and grid intersections.

mod branch;
mod completion;
mod export_info;
mod segment;
mod trajectory;

pub use branch::{Branch, TieInValve};
pub use completion::{
    Aicd, AicdParameters, Completion, CompletionBody, CompletionType, Valve, ValveKind,
};
pub use export_info::MswExportInfo;
pub use segment::{CellIntersection, Segment, SegmentOutput};
pub use trajectory::{Point3, Trajectory, TrajectoryPoint, WellPathGeometry};
