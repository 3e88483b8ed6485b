//! Branch tree: main bore, laterals and tie-in branches

use serde::{Deserialize, Serialize};

use super::{Segment, SegmentOutput};

/// Inflow control valve placed where a tie-in branch joins its parent.
///
/// The valve's first sub-segment stands in for the branch's first segment,
/// which is therefore not written on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieInValve {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub flow_coefficient: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl TieInValve {
    pub fn new(label: impl Into<String>, flow_coefficient: f64, area: f64, segment: Segment) -> Self {
        Self {
            label: label.into(),
            flow_coefficient: Some(flow_coefficient),
            area: Some(area),
            segments: vec![segment],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.flow_coefficient.is_some() && self.area.is_some()
    }

    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }
}

/// A wellbore branch. The root is the main bore (branch number 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub label: String,
    pub branch_number: u32,
    pub start_md: f64,
    pub start_tvd: f64,
    /// Key into `MswExportInfo::well_paths`.
    pub well_path: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Present when this branch ties in to its parent through an ICV.
    #[serde(default)]
    pub outlet_valve: Option<TieInValve>,
}

impl Branch {
    pub fn new(
        label: impl Into<String>,
        branch_number: u32,
        well_path: impl Into<String>,
        start_md: f64,
        start_tvd: f64,
    ) -> Self {
        Self {
            label: label.into(),
            branch_number,
            start_md,
            start_tvd,
            well_path: well_path.into(),
            segments: Vec::new(),
            branches: Vec::new(),
            outlet_valve: None,
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn with_outlet_valve(mut self, valve: TieInValve) -> Self {
        self.outlet_valve = Some(valve);
        self
    }

    /// True when a usable tie-in valve takes the place of the first segment.
    pub fn is_tie_in_valve_branch(&self) -> bool {
        self.outlet_valve.as_ref().is_some_and(|valve| valve.is_valid() && !valve.segments.is_empty())
    }

    /// Segments that get their own WELSEGS rows. The first segment of a tie-in
    /// valve branch is replaced by the valve rows.
    pub fn exported_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().skip(usize::from(self.is_tie_in_valve_branch()))
    }

    /// Stable sort of segments by start MD, applied to the whole subtree.
    pub fn sort_segments(&mut self) {
        self.segments.sort_by(|a, b| a.start_md.total_cmp(&b.start_md));
        for child in &mut self.branches {
            child.sort_segments();
        }
    }

    /// Output of the segment whose MD midpoint is closest to `md`.
    ///
    /// Ties keep the first candidate encountered.
    pub fn closest_segment_output(&self, md: f64) -> Option<SegmentOutput> {
        let mut closest: Option<&Segment> = None;
        let mut closest_distance = f64::INFINITY;
        for segment in &self.segments {
            let distance = (segment.midpoint_md() - md).abs();
            if distance < closest_distance {
                closest = Some(segment);
                closest_distance = distance;
            }
        }
        closest.and_then(Segment::output)
    }

    /// Depth-first iterator over this branch and every descendant.
    pub fn iter_depth_first(&self) -> impl Iterator<Item = &Branch> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let branch = stack.pop()?;
            stack.extend(branch.branches.iter().rev());
            Some(branch)
        })
    }

    pub(crate) fn clear_outputs(&mut self) {
        for segment in &mut self.segments {
            segment.clear_output();
            for completion in &mut segment.completions {
                for sub in completion.segments_mut() {
                    sub.clear_output();
                }
            }
        }
        if let Some(valve) = &mut self.outlet_valve {
            for sub in &mut valve.segments {
                sub.clear_output();
            }
        }
        for child in &mut self.branches {
            child.clear_outputs();
        }
    }
}
