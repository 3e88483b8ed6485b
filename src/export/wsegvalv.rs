//! WSEGVALV: ICD and ICV device segments

use tracing::{info, warn};

use super::ExportError;
use crate::config::defaults;
use crate::table::number_format::format_significant;
use crate::table::{columns, Cell, TableSink};
use crate::types::{Branch, Completion, MswExportInfo, Segment, ValveKind};

/// Write one WSEGVALV row per valid valve. Tie-in valves come before the
/// valves on the same branch's segments. Devices on the segment a tie-in
/// valve replaces have no number and are left out.
///
/// Needs segment numbers from a preceding WELSEGS pass. Nothing is written
/// when a numbered device is missing. Returns the row count.
pub fn generate_wsegvalv_table<S: TableSink>(sink: &mut S, info: &MswExportInfo) -> Result<usize, ExportError> {
    let mut rows = Vec::new();
    for branch in info.main_bore.iter_depth_first() {
        collect_branch_rows(branch, &mut rows)?;
    }
    if rows.is_empty() {
        return Ok(0);
    }

    sink.keyword("WSEGVALV");
    sink.header(columns(&["Well Name", "Seg No", "Cv", "Ac"]));
    for row in &rows {
        if let Some(label) = row.label {
            sink.optional_comment(label);
        }
        sink.add(Cell::from(info.well_name.as_str()));
        sink.add(Cell::from(row.number));
        sink.add(Cell::value_or_default(row.flow_coefficient));
        sink.add(match row.area {
            Some(area) => Cell::Text(format_significant(area, defaults::VALVE_AREA_SIGNIFICANT_DIGITS)),
            None => Cell::Default,
        });
        sink.row_completed();
    }
    sink.table_completed();
    info!(well = %info.well_name, valves = rows.len(), "WSEGVALV table written");
    Ok(rows.len())
}

struct ValveRow<'a> {
    label: Option<&'a str>,
    number: u32,
    flow_coefficient: Option<f64>,
    area: Option<f64>,
}

fn collect_branch_rows<'a>(branch: &'a Branch, rows: &mut Vec<ValveRow<'a>>) -> Result<(), ExportError> {
    if let Some(valve) = &branch.outlet_valve {
        match (valve.is_valid(), valve.first_segment()) {
            (true, Some(first)) => rows.push(ValveRow {
                label: Some(valve.label.as_str()),
                number: segment_number(first)?,
                flow_coefficient: valve.flow_coefficient,
                area: valve.area,
            }),
            (false, _) => warn!(branch = %branch.label, valve = %valve.label, "Skipping invalid tie-in valve"),
            (true, None) => {}
        }
    }

    for segment in branch.exported_segments() {
        for completion in &segment.completions {
            if !completion.completion_type().is_wseg_valve() {
                continue;
            }
            let Completion::Valve(valve) = completion else {
                continue;
            };
            if !valve.is_valid() {
                warn!(
                    valve = %valve.body.label,
                    "Skipping valve: flow coefficient or area is not set"
                );
                continue;
            }
            let Some(first) = valve.body.segments.first() else {
                continue;
            };
            let label = match valve.kind {
                ValveKind::Icd | ValveKind::Icv => Some(valve.body.label.as_str()),
                ValveKind::FishbonesIcd => None,
            };
            rows.push(ValveRow {
                label,
                number: segment_number(first)?,
                flow_coefficient: valve.flow_coefficient,
                area: valve.area,
            });
        }
    }
    Ok(())
}

fn segment_number(first: &Segment) -> Result<u32, ExportError> {
    first
        .segment_number()
        .ok_or_else(|| ExportError::UnnumberedSegment { label: first.label.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableCollector;
    use crate::types::{CompletionBody, SegmentOutput, TieInValve, Valve};

    #[test]
    fn test_unnumbered_valve_is_an_error() {
        let valve = Valve::new(
            CompletionBody::new("ICD", 1).with_segment(Segment::new("icd", 1.0, 2.0)),
            ValveKind::Icd,
            0.5,
            1e-4,
        );
        let info = MswExportInfo::new(
            "W",
            Branch::new("Main", 1, "W", 0.0, 0.0).with_segment(Segment::new("s", 0.0, 10.0).with_completion(valve)),
        );
        let mut sink = TableCollector::new();
        let err = generate_wsegvalv_table(&mut sink, &info).unwrap_err();
        assert!(matches!(err, ExportError::UnnumberedSegment { .. }));
        assert!(sink.tables.is_empty(), "no partial table on error");
    }

    #[test]
    fn test_valves_on_replaced_segment_are_not_written() {
        let mut tie_in_segment = Segment::new("icv", 0.0, 0.5);
        tie_in_segment.set_output(SegmentOutput { number: 7, md: 0.25, tvd: 0.25 });
        let mut icd_segment = Segment::new("icd", 1.0, 1.5);
        icd_segment.set_output(SegmentOutput { number: 9, md: 1.25, tvd: 1.25 });

        let unnumbered = Valve::new(
            CompletionBody::new("ICD under ICV", 2).with_segment(Segment::new("lost", 2.0, 2.5)),
            ValveKind::Icd,
            0.5,
            1e-4,
        );
        let numbered = Valve::new(CompletionBody::new("ICD", 2).with_segment(icd_segment), ValveKind::Icd, 0.5, 1e-4);
        let lateral = Branch::new("Y1", 2, "W", 0.0, 0.0)
            .with_outlet_valve(TieInValve::new("ICV", 1.0, 1e-4, tie_in_segment))
            .with_segment(Segment::new("y1", 0.0, 10.0).with_completion(unnumbered))
            .with_segment(Segment::new("y2", 10.0, 20.0).with_completion(numbered));
        let info = MswExportInfo::new("W", lateral);

        let mut sink = TableCollector::new();
        assert_eq!(generate_wsegvalv_table(&mut sink, &info).expect("export"), 2);
        let numbers: Vec<i64> = sink.table("WSEGVALV").expect("WSEGVALV").rows().filter_map(|r| r.int(1)).collect();
        assert_eq!(numbers, vec![7, 9]);
    }

    #[test]
    fn test_invalid_valve_writes_nothing() {
        let mut valve = Valve::new(
            CompletionBody::new("ICD", 1).with_segment(Segment::new("icd", 1.0, 2.0)),
            ValveKind::Icd,
            0.5,
            1e-4,
        );
        valve.area = None;
        let info = MswExportInfo::new(
            "W",
            Branch::new("Main", 1, "W", 0.0, 0.0).with_segment(Segment::new("s", 0.0, 10.0).with_completion(valve)),
        );
        let mut sink = TableCollector::new();
        assert_eq!(generate_wsegvalv_table(&mut sink, &info).expect("no error"), 0);
        assert!(sink.tables.is_empty());
    }
}
