//! WSEGAICD: autonomous ICD coefficients
//!
//! Wide fixed layout: a numbered column overview in comments, 21 columns
//! titled `01`..`21`, right aligned and written with single spacing. Optional
//! coefficients that are not set are written as the default marker.

use tracing::{error, info};

use super::ExportError;
use crate::table::{Cell, Column, DoubleFormat, Layout, TableSink};
use crate::types::{Aicd, Completion, MswExportInfo};

/// Flow scaling factor method 1: item 5 is used as the scale factor.
const FLOW_SCALING_METHOD: i64 = 1;

const COLUMN_DESCRIPTIONS: [&str; 21] = [
    "Well Name",
    "Segment Number",
    "Segment Number",
    "Strength of AICD",
    "Flow Scaling Factor for AICD",
    "Density of Calibration Fluid",
    "Viscosity of Calibration Fluid",
    "Critical water in liquid fraction for emulsions viscosity model",
    "Emulsion viscosity transition region",
    "Max ratio of emulsion viscosity to continuous phase viscosity",
    "Flow scaling factor method",
    "Maximum flow rate for AICD device",
    "Volume flow rate exponent, x",
    "Viscosity function exponent, y",
    "Device OPEN/SHUT",
    "Exponent of the oil flowing fraction in the density mixture calculation",
    "Exponent of the water flowing fraction in the density mixture calculation",
    "Exponent of the gas flowing fraction in the density mixture calculation",
    "Exponent of the oil flowing fraction in the density viscosity calculation",
    "Exponent of the water flowing fraction in the density viscosity calculation",
    "Exponent of the gas flowing fraction in the density viscosity calculation",
];

/// Write one row per valid AICD anywhere in the tree. Invalid devices are
/// logged and skipped, as are devices on the segment a tie-in valve replaces.
///
/// The sink's layout is switched to the tight layout for this table and
/// restored afterwards. An unnumbered device fails before anything is
/// written. Returns the row count.
pub fn generate_wsegaicd_table<S: TableSink>(sink: &mut S, info: &MswExportInfo) -> Result<usize, ExportError> {
    let devices = numbered_devices(info)?;
    if devices.is_empty() {
        return Ok(0);
    }

    let saved_layout = sink.layout();
    sink.set_layout(Layout::tight());
    write_header(sink);
    for (number, aicd) in &devices {
        sink.comment(&aicd.body.label);
        write_row(sink, &info.well_name, *number, aicd);
    }
    sink.table_completed();
    sink.set_layout(saved_layout);

    info!(well = %info.well_name, devices = devices.len(), "WSEGAICD table written");
    Ok(devices.len())
}

fn numbered_devices(info: &MswExportInfo) -> Result<Vec<(u32, &Aicd)>, ExportError> {
    let mut devices = Vec::new();
    for branch in info.main_bore.iter_depth_first() {
        for segment in branch.exported_segments() {
            for completion in &segment.completions {
                let Completion::Aicd(aicd) = completion else {
                    continue;
                };
                if !aicd.is_valid() {
                    error!(
                        missing = ?aicd.parameters.missing_required(),
                        "Export AICD Valve ({}): Valve is invalid. At least one required template parameter is not set.",
                        aicd.body.label
                    );
                    continue;
                }
                let Some(first) = aicd.body.segments.first() else {
                    continue;
                };
                let number = first
                    .segment_number()
                    .ok_or_else(|| ExportError::UnnumberedSegment { label: first.label.clone() })?;
                devices.push((number, aicd));
            }
        }
    }
    Ok(devices)
}

fn write_header<S: TableSink>(sink: &mut S) {
    sink.keyword("WSEGAICD");
    sink.comment("Column Overview:");
    for (i, description) in COLUMN_DESCRIPTIONS.iter().enumerate() {
        sink.comment(&format!("{:02}: {}", i + 1, description));
    }
    let header = (1..=COLUMN_DESCRIPTIONS.len())
        .map(|i| Column::new(format!("{i:02}")).with_format(DoubleFormat::Concise).right_aligned())
        .collect();
    sink.header(header);
}

fn write_row<S: TableSink>(sink: &mut S, well_name: &str, number: u32, aicd: &Aicd) {
    let p = &aicd.parameters;
    sink.add(Cell::from(well_name));
    sink.add(Cell::from(number));
    sink.add(Cell::from(number));
    sink.add(Cell::value_or_default(p.strength));
    sink.add(Cell::Float(aicd.flow_scaling_factor));
    sink.add(Cell::value_or_default(p.density_calibration_fluid));
    sink.add(Cell::value_or_default(p.viscosity_calibration_fluid));
    sink.add(Cell::value_or_default(p.critical_water_in_liquid_fraction));
    sink.add(Cell::value_or_default(p.emulsion_viscosity_transition_region));
    sink.add(Cell::value_or_default(p.max_ratio_emulsion_viscosity));
    sink.add(Cell::Int(FLOW_SCALING_METHOD));
    sink.add(Cell::value_or_default(p.max_flow_rate));
    sink.add(Cell::value_or_default(p.volume_flow_rate_exponent));
    sink.add(Cell::value_or_default(p.viscosity_function_exponent));
    sink.add(Cell::from(if aicd.open { "OPEN" } else { "SHUT" }));
    sink.add(Cell::value_or_default(p.oil_fraction_density_exponent));
    sink.add(Cell::value_or_default(p.water_fraction_density_exponent));
    sink.add(Cell::value_or_default(p.gas_fraction_density_exponent));
    sink.add(Cell::value_or_default(p.oil_fraction_viscosity_exponent));
    sink.add(Cell::value_or_default(p.water_fraction_viscosity_exponent));
    sink.add(Cell::value_or_default(p.gas_fraction_viscosity_exponent));
    sink.row_completed();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TextTableFormatter;
    use crate::types::{AicdParameters, Branch, CompletionBody, Segment, SegmentOutput};

    fn valid_parameters() -> AicdParameters {
        AicdParameters {
            strength: Some(2.1e-4),
            density_calibration_fluid: Some(1000.25),
            viscosity_calibration_fluid: Some(1.45),
            volume_flow_rate_exponent: Some(3.05),
            viscosity_function_exponent: Some(0.67),
            ..AicdParameters::default()
        }
    }

    fn device(label: &str, number: Option<u32>) -> Aicd {
        let mut segment = Segment::new(label, 1.0, 1.5);
        if let Some(number) = number {
            segment.set_output(SegmentOutput { number, md: 1.25, tvd: 1.25 });
        }
        Aicd::new(CompletionBody::new(label, 1).with_segment(segment), valid_parameters())
    }

    #[test]
    fn test_unnumbered_device_keeps_layout_and_writes_nothing() {
        let main = Branch::new("Main", 1, "W", 0.0, 0.0)
            .with_segment(Segment::new("s1", 0.0, 10.0).with_completion(device("numbered", Some(2))))
            .with_segment(Segment::new("s2", 10.0, 20.0).with_completion(device("unnumbered", None)));
        let info = MswExportInfo::new("W", main);

        let layout = Layout { column_spacing: 4, row_prefix: "  ".to_string() };
        let mut formatter = TextTableFormatter::new().with_layout(layout.clone());
        let err = generate_wsegaicd_table(&mut formatter, &info).unwrap_err();
        assert!(matches!(err, ExportError::UnnumberedSegment { .. }));
        assert_eq!(formatter.layout(), layout);
        assert!(formatter.into_string().is_empty());
    }

    #[test]
    fn test_descriptions_cover_every_column() {
        assert_eq!(COLUMN_DESCRIPTIONS.len(), 21);
        assert_eq!(COLUMN_DESCRIPTIONS[10], "Flow scaling factor method");
        assert_eq!(COLUMN_DESCRIPTIONS[14], "Device OPEN/SHUT");
    }
}
