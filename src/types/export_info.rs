//! Per-export model root
//!
//! `MswExportInfo` owns the whole branch tree for one well together with the
//! trajectories its branches reference. It is built (or loaded) fresh for each
//! export and carries no state between exports.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Branch, Segment, Trajectory};
use crate::export::{lookup_trajectory, ExportError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MswExportInfo {
    pub well_name: String,
    #[serde(default)]
    pub top_well_bore_volume: Option<f64>,
    pub well_paths: BTreeMap<String, Trajectory>,
    pub main_bore: Branch,
}

impl MswExportInfo {
    pub fn new(well_name: impl Into<String>, main_bore: Branch) -> Self {
        Self {
            well_name: well_name.into(),
            top_well_bore_volume: None,
            well_paths: BTreeMap::new(),
            main_bore,
        }
    }

    pub fn with_well_path(mut self, name: impl Into<String>, trajectory: Trajectory) -> Self {
        self.well_paths.insert(name.into(), trajectory);
        self
    }

    /// Load a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ExportError> {
        let contents = std::fs::read_to_string(path)?;
        let info: Self = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), well = %info.well_name, "Loaded MSW model");
        Ok(info)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Trajectory a branch is drawn along. A missing or empty trajectory is a
    /// malformed model and aborts the export.
    pub fn trajectory_for(&self, branch: &Branch) -> Result<&Trajectory, ExportError> {
        lookup_trajectory(&self.well_paths, branch)
    }

    pub fn has_sub_grid_intersections(&self) -> bool {
        self.main_bore
            .iter_depth_first()
            .flat_map(|b| b.segments.iter())
            .any(Segment::has_sub_grid_intersections)
    }

    /// Sort segments and check every precondition the table generators rely on.
    pub fn prepare(&mut self) -> Result<(), ExportError> {
        self.main_bore.sort_segments();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        for branch in self.main_bore.iter_depth_first() {
            self.trajectory_for(branch)?;
            for segment in &branch.segments {
                check_interval(segment)?;
                for completion in &segment.completions {
                    for sub in completion.segments() {
                        check_interval(sub)?;
                    }
                }
            }
            if let Some(valve) = &branch.outlet_valve {
                for sub in &valve.segments {
                    check_interval(sub)?;
                }
            }
        }
        Ok(())
    }

    /// Forget segment numbers and midpoints from a previous export.
    pub(crate) fn reset_outputs(&mut self) {
        self.main_bore.clear_outputs();
    }
}

fn check_interval(segment: &Segment) -> Result<(), ExportError> {
    if !segment.start_md.is_finite() || !segment.end_md.is_finite() || segment.start_md > segment.end_md {
        return Err(ExportError::InvalidSegment {
            label: segment.label.clone(),
            start_md: segment.start_md,
            end_md: segment.end_md,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellIntersection, CompletionBody, Completion};

    fn info() -> MswExportInfo {
        MswExportInfo::new(
            "OP-1",
            Branch::new("Main", 1, "OP-1", 1000.0, 1000.0)
                .with_segment(Segment::new("s2", 1020.0, 1040.0))
                .with_segment(Segment::new("s1", 1000.0, 1020.0)),
        )
        .with_well_path("OP-1", Trajectory::vertical(0.0, 0.0, 0.0, 3000.0))
    }

    #[test]
    fn test_prepare_sorts_and_validates() {
        let mut info = info();
        info.prepare().expect("well-formed model");
        assert_eq!(info.main_bore.segments[0].label, "s1");
    }

    #[test]
    fn test_missing_trajectory_is_fatal() {
        let mut info = info();
        info.well_paths.clear();
        let err = info.validate().unwrap_err();
        assert!(matches!(err, ExportError::MissingTrajectory { .. }));
    }

    #[test]
    fn test_empty_trajectory_is_fatal() {
        let mut info = info();
        info.well_paths.insert("OP-1".into(), Trajectory::default());
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_inverted_segment_rejected() {
        let mut info = info();
        info.main_bore.segments.push(Segment::new("bad", 1100.0, 1090.0));
        let err = info.validate().unwrap_err();
        assert!(matches!(err, ExportError::InvalidSegment { .. }));
    }

    #[test]
    fn test_detects_sub_grid_intersections_in_completions() {
        let mut info = info();
        assert!(!info.has_sub_grid_intersections());
        info.main_bore.segments[0].completions.push(Completion::Perforation(
            CompletionBody::new("Perf", 1).with_segment(
                Segment::new("p", 1020.0, 1040.0).with_intersection(CellIntersection::sub_grid("LGR1", 0, 0, 0)),
            ),
        ));
        assert!(info.has_sub_grid_intersections());
    }

    #[test]
    fn test_json_roundtrip_keeps_tree() {
        let json = info().to_json().expect("serialize");
        let back: MswExportInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.main_bore.segments.len(), 2);
        assert_eq!(back.well_name, "OP-1");
    }
}
