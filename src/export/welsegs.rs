//! WELSEGS: segment numbering and the segment table
//!
//! Numbers are handed out in visit order from a single counter that starts at
//! 2 (segment 1 is the implicit top segment):
//!
//! 1. A tie-in valve branch writes its valve first and drops its own first
//!    segment, which the valve stands in for.
//! 2. Each branch segment is split by the maximum length, one row per piece.
//! 3. Completions on the segment follow. Perforations are not written here.
//!    Valves and AICDs get device rows hanging off the host segment; other
//!    completions get chained rows hanging off the host, or off the last
//!    valve written on the same host.
//! 4. Child branches tie in to the parent segment with the closest midpoint.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::depth::tvd_from_measured_depth;
use super::splitting::split_interval;
use super::{lookup_trajectory, ExportError};
use crate::config::{defaults, ExportSettings};
use crate::table::{columns, Cell, Column, DoubleFormat, TableSink};
use crate::types::{
    Branch, Completion, CompletionType, MswExportInfo, Segment, SegmentOutput, Trajectory,
};

/// Write the WELSEGS table and number every segment in the tree.
///
/// Returns how many segment numbers were assigned. Numbers from a previous
/// run on the same tree are discarded first.
pub fn generate_welsegs_table<S: TableSink>(
    sink: &mut S,
    info: &mut MswExportInfo,
    settings: &ExportSettings,
) -> Result<u32, ExportError> {
    let max = settings.max_segment_length;
    if !max.is_finite() || max <= 0.0 {
        return Err(ExportError::InvalidMaxSegmentLength(max));
    }

    info.reset_outputs();
    let MswExportInfo { well_name, top_well_bore_volume, well_paths, main_bore } = info;

    sink.keyword("WELSEGS");
    sink.header(columns(&["Name", "Dep 1", "Tlen 1", "Vol 1", "Len&Dep", "PresDrop"]));
    sink.add(Cell::from(well_name.as_str()));
    sink.add(Cell::Float(main_bore.start_tvd));
    sink.add(Cell::Float(main_bore.start_md));
    sink.add(Cell::value_or_default(*top_well_bore_volume));
    sink.add(Cell::from(settings.length_and_depth.as_keyword()));
    sink.add(Cell::Text(format!("'{}'", settings.pressure_drop.as_keyword())));
    sink.row_completed();

    let mut header = columns(&["First Seg", "Last Seg", "Branch Num", "Outlet Seg", "Length", "Depth Change", "Diam"]);
    header.push(Column::new("Rough").with_format(DoubleFormat::Float(7)));
    sink.header(header);

    let mut writer = WelsegsWriter {
        sink: &mut *sink,
        settings,
        well_paths: &*well_paths,
        next_number: defaults::FIRST_SEGMENT_NUMBER,
    };
    writer.write_branch(main_bore, None)?;
    let assigned = writer.next_number - defaults::FIRST_SEGMENT_NUMBER;

    sink.table_completed();
    info!(well = %well_name, segments = assigned, mode = settings.length_and_depth.as_keyword(), "WELSEGS table written");
    Ok(assigned)
}

/// Segment that completion rows hang off, with the hydraulics they inherit.
#[derive(Debug, Clone, Copy)]
struct Outlet {
    output: SegmentOutput,
    sub_index: Option<usize>,
    diameter: f64,
    roughness: f64,
}

impl Outlet {
    fn of(segment: &Segment, output: SegmentOutput) -> Self {
        Self {
            output,
            sub_index: segment.sub_index,
            diameter: segment.effective_diameter,
            roughness: segment.open_hole_roughness,
        }
    }
}

struct WelsegsWriter<'a, S: TableSink> {
    sink: &'a mut S,
    settings: &'a ExportSettings,
    well_paths: &'a BTreeMap<String, Trajectory>,
    next_number: u32,
}

impl<S: TableSink> WelsegsWriter<'_, S> {
    fn take_number(&mut self) -> u32 {
        let number = self.next_number;
        self.next_number += 1;
        number
    }

    #[allow(clippy::too_many_arguments)]
    fn write_row(
        &mut self,
        number: u32,
        branch_number: u32,
        outlet_number: u32,
        length: f64,
        depth: f64,
        diameter: f64,
        roughness: f64,
    ) {
        self.sink.add(Cell::from(number));
        self.sink.add(Cell::from(number));
        self.sink.add(Cell::from(branch_number));
        self.sink.add(Cell::from(outlet_number));
        self.sink.add(Cell::Float(length));
        self.sink.add(Cell::Float(depth));
        self.sink.add(Cell::Float(diameter));
        self.sink.add(Cell::Float(roughness));
        self.sink.row_completed();
    }

    /// Length and depth columns for a device or completion piece.
    fn piece_length_and_depth(&self, trajectory: &Trajectory, start_md: f64, end_md: f64) -> (f64, f64) {
        let end_tvd = tvd_from_measured_depth(trajectory, end_md);
        if self.settings.is_incremental() {
            (end_md - start_md, end_tvd - tvd_from_measured_depth(trajectory, start_md))
        } else {
            (end_md, end_tvd)
        }
    }

    fn write_branch(&mut self, branch: &mut Branch, connected_to: Option<SegmentOutput>) -> Result<(), ExportError> {
        let trajectory = lookup_trajectory(self.well_paths, branch)?;
        debug!(branch = %branch.label, number = branch.branch_number, segments = branch.segments.len(), "WELSEGS branch");

        let mut outlet = connected_to;
        let tie_in = branch.is_tie_in_valve_branch();
        let mut skip_first = false;

        if let Some(valve) = branch.outlet_valve.as_mut() {
            if tie_in {
                let host = connected_to.map_or(defaults::TOP_SEGMENT_NUMBER, |o| o.number);
                let first = self.write_device_segments(
                    &valve.label,
                    &mut valve.segments,
                    branch.branch_number,
                    host,
                    trajectory,
                );
                if let Some(first) = first {
                    if let Some(replaced) = branch.segments.first_mut() {
                        replaced.set_output(first);
                    }
                    outlet = Some(first);
                    skip_first = true;
                }
            } else {
                warn!(
                    branch = %branch.label,
                    valve = %valve.label,
                    "Tie-in valve is invalid or has no segments, branch connects without it"
                );
            }
        }

        self.sink.optional_comment(&format!("Segments on branch {}", branch.label));

        let start = BranchStart::from(&*branch);
        for segment in branch.segments.iter_mut().skip(usize::from(skip_first)) {
            if let Some(sub_index) = segment.sub_index {
                self.sink.optional_comment(&format!("{}, sub {}", segment.label, sub_index));
            }
            let written = self.write_segment(segment, outlet, start, trajectory);
            outlet = Some(written);
            let host = Outlet::of(segment, written);
            self.write_completions(segment, host, trajectory);
        }

        let child_outlets: Vec<Option<SegmentOutput>> = branch
            .branches
            .iter()
            .map(|child| branch.closest_segment_output(child.start_md).or(outlet))
            .collect();
        for (child, child_outlet) in branch.branches.iter_mut().zip(child_outlets) {
            self.write_branch(child, child_outlet)?;
        }
        Ok(())
    }

    /// One row per split piece. Pieces chain: each is measured from the
    /// previous piece rather than from the segment's outlet, the first from
    /// the outlet (or the branch start).
    fn write_segment(
        &mut self,
        segment: &mut Segment,
        outlet: Option<SegmentOutput>,
        branch: BranchStart,
        trajectory: &Trajectory,
    ) -> SegmentOutput {
        let mut previous = outlet.unwrap_or(SegmentOutput {
            number: defaults::TOP_SEGMENT_NUMBER,
            md: branch.start_md,
            tvd: branch.start_tvd,
        });

        for (start_md, end_md) in split_interval(segment.start_md, segment.end_md, self.settings.max_segment_length) {
            let md = 0.5 * (start_md + end_md);
            let tvd = tvd_from_measured_depth(trajectory, md);
            let (length, depth) = if self.settings.is_incremental() {
                (md - previous.md, tvd - previous.tvd)
            } else {
                (md, tvd)
            };

            let number = self.take_number();
            self.write_row(
                number,
                branch.number,
                previous.number,
                length,
                depth,
                self.settings.liner_diameter,
                self.settings.roughness_factor,
            );
            previous = SegmentOutput { number, md, tvd };
        }

        segment.set_output(previous);
        previous
    }

    fn write_completions(&mut self, segment: &mut Segment, host: Outlet, trajectory: &Trajectory) {
        // Completions after a valve hang off the valve, on this segment only.
        let mut outlet = host;

        for completion in &mut segment.completions {
            match completion {
                // TODO: confirm whether perforations should get their own WELSEGS rows.
                Completion::Perforation(_) => continue,
                Completion::Valve(_) | Completion::Aicd(_) => {
                    if !completion.is_valid() {
                        debug!(label = %completion.label(), "Invalid device left out of WELSEGS");
                        continue;
                    }
                    if completion.segments().is_empty() {
                        continue;
                    }
                    self.completion_comment_header(completion.completion_type());
                    let label = completion.label().to_string();
                    let branch_number = completion.branch_number();
                    let first = self.write_device_segments(
                        &label,
                        completion.segments_mut(),
                        branch_number,
                        host.output.number,
                        trajectory,
                    );
                    if let (Some(first), Some(sub)) = (first, completion.segments().first()) {
                        outlet = Outlet::of(sub, first);
                    }
                }
                Completion::Fishbones(_) | Completion::Fracture(_) => {
                    self.write_completion_segments(completion, outlet, trajectory);
                }
            }
        }
    }

    /// Rows for a device's first sub-segment, every piece hanging off `host`.
    ///
    /// The sub-segment keeps the number of its first piece and its own midpoint.
    fn write_device_segments(
        &mut self,
        label: &str,
        segments: &mut [Segment],
        branch_number: u32,
        host: u32,
        trajectory: &Trajectory,
    ) -> Option<SegmentOutput> {
        let sub = segments.first_mut()?;
        self.sink.optional_comment(label);

        let md = sub.midpoint_md();
        let output = SegmentOutput {
            number: self.next_number,
            md,
            tvd: tvd_from_measured_depth(trajectory, md),
        };
        sub.set_output(output);

        for (start_md, end_md) in split_interval(sub.start_md, sub.end_md, self.settings.max_segment_length) {
            let number = self.take_number();
            let (length, depth) = self.piece_length_and_depth(trajectory, start_md, end_md);
            self.write_row(
                number,
                branch_number,
                host,
                length,
                depth,
                self.settings.liner_diameter,
                self.settings.roughness_factor,
            );
        }
        Some(output)
    }

    /// Fishbone laterals and fractures: pieces chained one after another,
    /// starting from the outlet and using its diameter and roughness.
    fn write_completion_segments(&mut self, completion: &mut Completion, outlet: Outlet, trajectory: &Trajectory) {
        if completion.segments().is_empty() {
            return;
        }

        let completion_type = completion.completion_type();
        self.completion_comment_header(completion_type);
        match completion_type {
            CompletionType::Fishbones => {
                let comment = match outlet.sub_index {
                    Some(sub_index) => format!("Sub index {} - {}", sub_index, completion.label()),
                    None => completion.label().to_string(),
                };
                self.sink.optional_comment(&comment);
            }
            CompletionType::Fracture => {
                self.sink.optional_comment(&format!(
                    "{} connected to segment {}",
                    completion.label(),
                    outlet.output.number
                ));
            }
            _ => {}
        }

        let branch_number = completion.branch_number();
        let mut outlet_number = outlet.output.number;

        for sub in completion.segments_mut() {
            let first_number = self.next_number;
            for (start_md, end_md) in split_interval(sub.start_md, sub.end_md, self.settings.max_segment_length) {
                let number = self.take_number();
                let (length, depth) = self.piece_length_and_depth(trajectory, start_md, end_md);
                self.write_row(number, branch_number, outlet_number, length, depth, outlet.diameter, outlet.roughness);
                outlet_number = number;
            }
            let md = sub.midpoint_md();
            sub.set_output(SegmentOutput { number: first_number, md, tvd: tvd_from_measured_depth(trajectory, md) });
        }
    }

    fn completion_comment_header(&mut self, completion_type: CompletionType) {
        let lines: &[&str] = match completion_type {
            CompletionType::Fishbones | CompletionType::FishbonesIcd => &[
                "Fishbone Laterals",
                "Diam: MSW - Tubing Radius",
                "Rough: MSW - Open Hole Roughness Factor",
            ],
            t if t.is_perforation_valve() => &[
                "Perforation Valve Segments",
                "Diam: MSW - Tubing Radius",
                "Rough: MSW - Open Hole Roughness Factor",
            ],
            CompletionType::Fracture => &[
                "Fracture Segments",
                "Diam: MSW - Default Dummy",
                "Rough: MSW - Default Dummy",
            ],
            _ => &[],
        };
        for line in lines {
            self.sink.optional_comment(line);
        }
    }
}

/// Branch fields a segment row needs, copied out so segments can be
/// borrowed mutably while the branch is walked.
#[derive(Debug, Clone, Copy)]
struct BranchStart {
    number: u32,
    start_md: f64,
    start_tvd: f64,
}

impl From<&Branch> for BranchStart {
    fn from(branch: &Branch) -> Self {
        Self { number: branch.branch_number, start_md: branch.start_md, start_tvd: branch.start_tvd }
    }
}
