//! Segments and grid-cell intersections

use serde::{Deserialize, Serialize};

use super::Completion;

/// A grid cell crossed by a completion sub-segment.
///
/// An empty `grid_name` means the main grid; anything else names a local
/// grid refinement. Cell indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIntersection {
    #[serde(default)]
    pub grid_name: String,
    pub ijk: [usize; 3],
}

impl CellIntersection {
    pub fn main_grid(i: usize, j: usize, k: usize) -> Self {
        Self { grid_name: String::new(), ijk: [i, j, k] }
    }

    pub fn sub_grid(grid_name: impl Into<String>, i: usize, j: usize, k: usize) -> Self {
        Self { grid_name: grid_name.into(), ijk: [i, j, k] }
    }

    pub fn is_sub_grid(&self) -> bool {
        !self.grid_name.is_empty()
    }
}

/// Number and midpoint assigned to a segment while WELSEGS is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOutput {
    pub number: u32,
    pub md: f64,
    pub tvd: f64,
}

/// A measured-depth interval of a branch or of a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub label: String,
    pub start_md: f64,
    pub end_md: f64,
    /// Grid-intersection subdivision index, when the segment was split per cell.
    #[serde(default)]
    pub sub_index: Option<usize>,
    #[serde(default)]
    pub effective_diameter: f64,
    #[serde(default)]
    pub open_hole_roughness: f64,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub intersections: Vec<CellIntersection>,
    #[serde(skip)]
    output: Option<SegmentOutput>,
}

impl Segment {
    pub fn new(label: impl Into<String>, start_md: f64, end_md: f64) -> Self {
        Self {
            label: label.into(),
            start_md,
            end_md,
            sub_index: None,
            effective_diameter: 0.0,
            open_hole_roughness: 0.0,
            completions: Vec::new(),
            intersections: Vec::new(),
            output: None,
        }
    }

    pub fn with_sub_index(mut self, sub_index: usize) -> Self {
        self.sub_index = Some(sub_index);
        self
    }

    pub fn with_hydraulics(mut self, effective_diameter: f64, open_hole_roughness: f64) -> Self {
        self.effective_diameter = effective_diameter;
        self.open_hole_roughness = open_hole_roughness;
        self
    }

    pub fn with_completion(mut self, completion: impl Into<Completion>) -> Self {
        self.completions.push(completion.into());
        self
    }

    pub fn with_intersection(mut self, intersection: CellIntersection) -> Self {
        self.intersections.push(intersection);
        self
    }

    pub fn midpoint_md(&self) -> f64 {
        0.5 * (self.start_md + self.end_md)
    }

    /// Segment number from the last WELSEGS pass, if this segment was written.
    pub fn segment_number(&self) -> Option<u32> {
        self.output.map(|o| o.number)
    }

    pub fn output(&self) -> Option<SegmentOutput> {
        self.output
    }

    pub(crate) fn set_output(&mut self, output: SegmentOutput) {
        self.output = Some(output);
    }

    pub(crate) fn clear_output(&mut self) {
        self.output = None;
    }

    pub(crate) fn has_sub_grid_intersections(&self) -> bool {
        self.intersections.iter().any(CellIntersection::is_sub_grid)
            || self
                .completions
                .iter()
                .flat_map(|c| c.segments())
                .any(Segment::has_sub_grid_intersections)
    }
}
