//! Synthetic MSW model generator
//!
//! Builds a random but well-formed multi-segment well model (main bore,
//! laterals, perforations, fishbones, fractures, ICDs and AICDs) and writes
//! it as JSON for `msw-export`.
//!
//! # Usage
//! ```bash
//! ./synthetic-well --seed 7 --laterals 2 > well.json
//! ./msw-export --model well.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use tracing::info;

use msw_export::types::{Point3, TrajectoryPoint};
use msw_export::{
    Aicd, AicdParameters, Branch, CellIntersection, Completion, CompletionBody, MswExportInfo, Segment,
    TieInValve, Trajectory, Valve, ValveKind, WellPathGeometry,
};

// ============================================================================
// Well Geometry Constants
// ============================================================================

/// Kick-off point MD (m)
const KICK_OFF_MD: f64 = 1500.0;
/// Length of the build section (m)
const BUILD_LENGTH: f64 = 500.0;
/// Trajectory sample spacing (m)
const SAMPLE_SPACING: f64 = 25.0;
/// Grid cell size along the well (m)
const CELL_SIZE: f64 = 25.0;
/// Open-hole diameter (m)
const HOLE_DIAMETER: f64 = 0.2159;
/// Open-hole roughness (m)
const HOLE_ROUGHNESS: f64 = 1.0e-4;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "synthetic-well")]
#[command(about = "Generate a synthetic multi-segment well model for msw-export")]
#[command(version)]
struct Args {
    /// Well name
    #[arg(short, long, default_value = "SYN-1")]
    name: String,

    /// Number of main-bore segments in the reservoir section
    #[arg(short, long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=500))]
    segments: u32,

    /// Number of laterals tied in to the main bore
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(0..=8))]
    laterals: u32,

    /// Put an ICV on the first lateral's tie-in
    #[arg(long)]
    tie_in_valve: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ============================================================================
// Geometry
// ============================================================================

/// Vertical down to the kick-off point, a linear build to horizontal,
/// then a horizontal section out to `total_md`.
fn build_trajectory(origin: Point3, azimuth: f64, kick_off_md: f64, total_md: f64) -> Trajectory {
    let (dx, dy) = (azimuth.cos(), azimuth.sin());
    let mut points = Vec::new();
    let mut position = origin;
    let mut md = 0.0;
    points.push(TrajectoryPoint { md, point: position });

    while md < total_md {
        let step = SAMPLE_SPACING.min(total_md - md);
        let mid = md + 0.5 * step;
        let inclination = ((mid - kick_off_md) / BUILD_LENGTH).clamp(0.0, 1.0) * std::f64::consts::FRAC_PI_2;
        let horizontal = step * inclination.sin();
        position = Point3::new(
            position.x + horizontal * dx,
            position.y + horizontal * dy,
            position.z - step * inclination.cos(),
        );
        md += step;
        points.push(TrajectoryPoint { md, point: position });
    }
    Trajectory::new(points)
}

fn cell_at(md: f64, layer: usize) -> CellIntersection {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = (md / CELL_SIZE).max(0.0) as usize;
    CellIntersection::main_grid(i % 100, 20, layer)
}

// ============================================================================
// Generator
// ============================================================================

struct WellGenerator {
    rng: StdRng,
    segment_length: Normal<f64>,
    next_branch_number: u32,
}

impl WellGenerator {
    fn new(seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            segment_length: Normal::new(24.0, 6.0).context("Invalid segment length distribution")?,
            next_branch_number: 2,
        })
    }

    /// Consecutive segments of normally distributed length from `start_md`.
    fn segments(&mut self, prefix: &str, start_md: f64, count: u32) -> Vec<Segment> {
        let mut md = start_md;
        (0..count)
            .map(|n| {
                let length = self.segment_length.sample(&mut self.rng).clamp(5.0, 60.0);
                let segment = Segment::new(format!("{prefix} {}", n + 1), md, md + length)
                    .with_hydraulics(HOLE_DIAMETER, HOLE_ROUGHNESS);
                md += length;
                segment
            })
            .collect()
    }

    fn perforation(segment: &Segment, branch_number: u32, layer: usize) -> Completion {
        let sub = Segment::new("Perforation", segment.start_md, segment.end_md)
            .with_intersection(cell_at(segment.midpoint_md(), layer));
        Completion::Perforation(CompletionBody::new("Perforation", branch_number).with_segment(sub))
    }

    fn icd(&mut self, segment: &Segment, branch_number: u32) -> Completion {
        let md = segment.midpoint_md();
        let cv = self.rng.gen_range(0.5..1.2);
        let area = self.rng.gen_range(5.0e-5..5.0e-4);
        Valve::new(
            CompletionBody::new(format!("ICD at {md:.1}"), branch_number)
                .with_segment(Segment::new("ICD", md, md + 0.1)),
            ValveKind::Icd,
            cv,
            area,
        )
        .into()
    }

    fn aicd(&mut self, segment: &Segment, branch_number: u32) -> Completion {
        let md = segment.midpoint_md();
        let parameters = AicdParameters {
            strength: Some(self.rng.gen_range(1.0e-4..5.0e-4)),
            density_calibration_fluid: Some(1000.25),
            viscosity_calibration_fluid: Some(1.45),
            volume_flow_rate_exponent: Some(self.rng.gen_range(2.5..3.5)),
            viscosity_function_exponent: Some(self.rng.gen_range(0.4..1.2)),
            max_flow_rate: self.rng.gen_bool(0.5).then_some(200.0),
            ..AicdParameters::default()
        };
        Aicd::new(
            CompletionBody::new(format!("AICD at {md:.1}"), branch_number)
                .with_segment(Segment::new("AICD", md, md + 0.1)),
            parameters,
        )
        .into()
    }

    fn fishbones(&mut self, segment: &Segment, branch_number: u32) -> Completion {
        let start = segment.midpoint_md();
        let length = self.rng.gen_range(8.0..15.0);
        let sub = Segment::new("Lateral", start, start + length)
            .with_sub_index(0)
            .with_intersection(cell_at(start, 1));
        Completion::Fishbones(CompletionBody::new("Fishbones", branch_number).with_segment(sub))
    }

    fn fracture(segment: &Segment, branch_number: u32) -> Completion {
        let md = segment.midpoint_md();
        let sub = Segment::new("Fracture", md, md + 1.0).with_intersection(cell_at(md, 2));
        Completion::Fracture(CompletionBody::new(format!("Fracture at {md:.1}"), branch_number).with_segment(sub))
    }

    /// Attach one completion per segment, picked at random.
    fn complete(&mut self, segments: &mut [Segment], branch_number: u32) {
        for segment in segments.iter_mut() {
            let completion = match self.rng.gen_range(0..10) {
                0..=3 => Self::perforation(segment, branch_number, 0),
                4 | 5 => self.icd(segment, branch_number),
                6 => self.aicd(segment, branch_number),
                7 | 8 => self.fishbones(segment, branch_number),
                _ => Self::fracture(segment, branch_number),
            };
            segment.completions.push(completion);
        }
    }

    fn well(&mut self, name: &str, segment_count: u32, laterals: u32, tie_in_valve: bool) -> MswExportInfo {
        let origin = Point3::new(self.rng.gen_range(0.0..5000.0), self.rng.gen_range(0.0..5000.0), 0.0);
        let azimuth = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let reservoir_start = KICK_OFF_MD + BUILD_LENGTH;
        let total_md = reservoir_start + 60.0 * f64::from(segment_count) + 100.0;

        let main_path = build_trajectory(origin, azimuth, KICK_OFF_MD, total_md);
        let mut main_segments = self.segments("Main", reservoir_start, segment_count);
        self.complete(&mut main_segments, 1);

        let start_tvd = -main_path.points.first().map_or(0.0, |p| p.point.z);
        let mut main_bore = Branch::new("Main bore", 1, name, 0.0, start_tvd);
        main_bore.segments = main_segments;

        let mut info = MswExportInfo::new(name, main_bore).with_well_path(name, main_path.clone());

        let main_end = info.main_bore.segments.last().map_or(reservoir_start, |s| s.end_md);
        for n in 0..laterals {
            let number = self.next_branch_number;
            self.next_branch_number += 1;

            let tie_in_md = self.rng.gen_range(reservoir_start..main_end);
            let lateral_name = format!("{name} Y{}", n + 1);
            let lateral_azimuth = azimuth + self.rng.gen_range(-0.6..0.6);
            let tie_in_point = main_path.point_at_measured_depth(tie_in_md);

            // The lateral shares the main bore above the tie-in, then turns away.
            let mut points: Vec<TrajectoryPoint> =
                main_path.points.iter().filter(|p| p.md < tie_in_md).copied().collect();
            let lateral_tail = build_trajectory(tie_in_point, lateral_azimuth, 0.0, 60.0 * 6.0);
            points.extend(
                lateral_tail
                    .points
                    .iter()
                    .map(|p| TrajectoryPoint { md: tie_in_md + p.md, point: p.point }),
            );
            let lateral_path = Trajectory::new(points);

            let mut segments = self.segments(&format!("Y{}", n + 1), tie_in_md, 6);
            self.complete(&mut segments, number);
            let start_tvd = -tie_in_point.z;
            let mut lateral = Branch::new(lateral_name.clone(), number, lateral_name.clone(), tie_in_md, start_tvd);
            lateral.segments = segments;

            if tie_in_valve && n == 0 {
                if let Some(first_md) = lateral.segments.first().map(|s| s.start_md) {
                    let icv = Segment::new("ICV", first_md, first_md + 0.1);
                    lateral = lateral.with_outlet_valve(TieInValve::new(
                        format!("ICV {lateral_name}"),
                        self.rng.gen_range(0.5..1.5),
                        self.rng.gen_range(1.0e-4..1.0e-3),
                        icv,
                    ));
                }
            }

            info.main_bore.branches.push(lateral);
            info.well_paths.insert(lateral_name, lateral_path);
        }
        info
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut generator = WellGenerator::new(args.seed)?;
    let info = generator.well(&args.name, args.segments, args.laterals, args.tie_in_valve);
    let json = info.to_json().context("Failed to serialize model")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), well = %args.name, "Synthetic model written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
