//! WSEGVALV / WSEGAICD Tests
//!
//! Device rows after a full export: ordering, validity filtering, area text,
//! default markers and the wide-table layout switch.

use msw_export::table::{Cell, Layout};
use msw_export::{
    collect_tables, export_msw_tables, generate_wsegaicd_table, generate_wsegvalv_table, Aicd,
    AicdParameters, Branch, Completion, CompletionBody, ExportSettings, MswExportInfo, Segment,
    TableCollector, TableSink, TextTableFormatter, TieInValve, Trajectory, Valve, ValveKind,
};

// ============================================================================
// Fixtures
// ============================================================================

fn valve(label: &str, kind: ValveKind, start: f64, cv: f64, area: f64) -> Completion {
    Valve::new(
        CompletionBody::new(label, 1).with_segment(Segment::new(label, start, start + 0.5)),
        kind,
        cv,
        area,
    )
    .into()
}

fn aicd(label: &str, branch_number: u32, start: f64, parameters: AicdParameters) -> Completion {
    Aicd::new(
        CompletionBody::new(label, branch_number).with_segment(Segment::new(label, start, start + 0.5)),
        parameters,
    )
    .into()
}

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

/// Segment numbers after WELSEGS:
///  2 s1, 3 ICD 1, 4 s2 (invalid ICV has no row), 5 s3, 6 FB ICD,
///  7 tie-in ICV Y1, 8 y2, 9 AICD Y2, 10 ICD Y2
fn well_with_devices() -> MswExportInfo {
    let mut bad_icv = Valve::new(
        CompletionBody::new("ICV bad", 1).with_segment(Segment::new("icv", 1030.0, 1030.5)),
        ValveKind::Icv,
        1.0,
        1.0e-4,
    );
    bad_icv.area = None;

    let main = Branch::new("Main", 1, "W", 1000.0, 1000.0)
        .with_segment(
            Segment::new("s1", 1000.0, 1020.0)
                .with_completion(valve("ICD 1", ValveKind::Icd, 1010.0, 0.7, 1.0e-4))
                .with_completion(aicd("AICD bad", 1, 1012.0, AicdParameters::default())),
        )
        .with_segment(Segment::new("s2", 1020.0, 1040.0).with_completion(bad_icv))
        .with_segment(
            Segment::new("s3", 1040.0, 1060.0)
                .with_completion(valve("FB ICD", ValveKind::FishbonesIcd, 1050.0, 0.9, 2.5e-5)),
        );

    let lateral = Branch::new("Y1", 2, "W Y1", 1045.0, 1045.0)
        .with_outlet_valve(TieInValve::new("ICV Y1", 1.1, 5.0e-4, Segment::new("icv y1", 1045.0, 1045.5)))
        .with_segment(Segment::new("y1", 1045.0, 1065.0))
        .with_segment(
            Segment::new("y2", 1065.0, 1085.0)
                .with_completion(aicd("AICD Y2", 2, 1075.0, valid_parameters()))
                .with_completion(valve("ICD Y2", ValveKind::Icd, 1080.0, 0.8, 1.5e-4)),
        );

    MswExportInfo::new("W", main.with_branch(lateral))
        .with_well_path("W", Trajectory::vertical(0.0, 0.0, 0.0, 3000.0))
        .with_well_path("W Y1", Trajectory::vertical(0.0, 0.0, 0.0, 3000.0))
}

fn settings() -> ExportSettings {
    ExportSettings { max_segment_length: 100.0, ..ExportSettings::default() }
}

// ============================================================================
// WSEGVALV
// ============================================================================

#[test]
fn wsegvalv_rows_follow_tree_order_with_tie_in_first() {
    let mut info = well_with_devices();
    let (tables, summary) = collect_tables(&mut info, &settings()).expect("export");
    assert_eq!(summary.valves, 4);

    let table = tables.table("WSEGVALV").expect("WSEGVALV");
    let numbers: Vec<i64> = table.rows().filter_map(|r| r.int(1)).collect();
    assert_eq!(numbers, vec![3, 6, 7, 10]);
    assert!(table.rows().all(|r| r.text(0) == Some("W")));
}

#[test]
fn wsegvalv_area_uses_significant_digits() {
    let mut info = well_with_devices();
    let (tables, _) = collect_tables(&mut info, &settings()).expect("export");
    let areas: Vec<&str> = tables
        .table("WSEGVALV")
        .expect("WSEGVALV")
        .rows()
        .filter_map(|r| r.text(3))
        .collect();
    assert_eq!(areas, vec!["0.0001", "2.5e-05", "0.0005", "0.00015"]);
}

#[test]
fn wsegvalv_labels_only_icd_and_icv_rows() {
    let mut info = well_with_devices();
    let (tables, _) = collect_tables(&mut info, &settings()).expect("export");
    let comments: Vec<&str> = tables.table("WSEGVALV").expect("WSEGVALV").comments().collect();
    assert_eq!(comments, vec!["ICD 1", "ICV Y1", "ICD Y2"]);
}

#[test]
fn wsegvalv_rendered_area_is_not_padded() {
    let mut info = well_with_devices();
    let mut formatter = TextTableFormatter::new().with_optional_comments(false);
    export_msw_tables(&mut formatter, &mut info, &settings()).expect("export");
    let deck = formatter.into_string();
    let section = deck.split("WSEGVALV\n").nth(1).expect("WSEGVALV section");
    let first_row = section.lines().find(|l| !l.starts_with("--")).expect("row");
    assert!(first_row.trim_end().ends_with("0.0001 /"), "row: {first_row}");
}

#[test]
fn no_valid_valves_means_no_wsegvalv() {
    let mut info = MswExportInfo::new(
        "W",
        Branch::new("Main", 1, "W", 1000.0, 1000.0).with_segment(Segment::new("s1", 1000.0, 1020.0)),
    )
    .with_well_path("W", Trajectory::vertical(0.0, 0.0, 0.0, 3000.0));
    let (tables, summary) = collect_tables(&mut info, &settings()).expect("export");
    assert_eq!(summary.valves, 0);
    assert!(tables.table("WSEGVALV").is_none());
    assert!(tables.table("WSEGAICD").is_none());
}

#[test]
fn devices_on_segment_replaced_by_tie_in_are_left_out() {
    let mut info = well_with_devices();
    let y1 = &mut info.main_bore.branches[0].segments[0];
    assert_eq!(y1.label, "y1");
    y1.completions.push(valve("ICD under ICV", ValveKind::Icd, 1050.0, 0.6, 2.0e-4));
    y1.completions.push(aicd("AICD under ICV", 2, 1055.0, valid_parameters()));

    let (tables, summary) = collect_tables(&mut info, &settings()).expect("export");
    assert_eq!((summary.valves, summary.aicds), (4, 1));

    let valves = tables.table("WSEGVALV").expect("WSEGVALV");
    let numbers: Vec<i64> = valves.rows().filter_map(|r| r.int(1)).collect();
    assert_eq!(numbers, vec![3, 6, 7, 10]);
    assert!(!valves.comments().any(|c| c == "ICD under ICV"));

    let aicds = tables.table("WSEGAICD").expect("WSEGAICD");
    assert_eq!(aicds.rows().count(), 1);
    assert_eq!(aicds.comments().last(), Some("AICD Y2"));
}

#[test]
fn wsegvalv_before_welsegs_is_an_error() {
    let info = well_with_devices();
    let mut sink = TableCollector::new();
    assert!(generate_wsegvalv_table(&mut sink, &info).is_err());
}

// ============================================================================
// WSEGAICD
// ============================================================================

#[test]
fn wsegaicd_writes_valid_devices_anywhere_in_tree() {
    let mut info = well_with_devices();
    let (tables, summary) = collect_tables(&mut info, &settings()).expect("export");
    assert_eq!(summary.aicds, 1, "invalid main-bore AICD skipped, lateral AICD kept");

    let table = tables.table("WSEGAICD").expect("WSEGAICD");
    let rows: Vec<_> = table.rows().collect();
    assert_eq!(rows.len(), 1);
    let row = rows[0];
    assert_eq!(row.cells.len(), 21);
    assert_eq!(row.text(0), Some("W"));
    assert_eq!((row.int(1), row.int(2)), (Some(9), Some(9)));
    assert_eq!(row.float(3), Some(2.1e-4));
    assert_eq!(row.float(4), Some(1.0));
    assert_eq!(row.cells[7], Cell::Default);
    assert_eq!(row.int(10), Some(1), "flow scaling method is fixed");
    assert_eq!(row.cells[11], Cell::Default);
    assert_eq!(row.float(12), Some(3.05));
    assert_eq!(row.text(14), Some("OPEN"));
    assert!(row.cells[15..].iter().all(|c| *c == Cell::Default));
}

#[test]
fn wsegaicd_header_lists_column_overview() {
    let mut info = well_with_devices();
    let (tables, _) = collect_tables(&mut info, &settings()).expect("export");
    let table = tables.table("WSEGAICD").expect("WSEGAICD");

    let comments: Vec<&str> = table.comments().collect();
    assert_eq!(comments[0], "Column Overview:");
    assert_eq!(comments[1], "01: Well Name");
    assert_eq!(comments[15], "15: Device OPEN/SHUT");
    assert_eq!(comments.last().copied(), Some("AICD Y2"));

    let header = table.headers()[0];
    assert_eq!(header.len(), 21);
    assert_eq!(header[0].title, "01");
    assert_eq!(header[20].title, "21");
}

#[test]
fn shut_device_is_written_shut() {
    let mut info = well_with_devices();
    if let Completion::Aicd(device) = &mut info.main_bore.branches[0].segments[1].completions[0] {
        device.open = false;
    }
    let (tables, _) = collect_tables(&mut info, &settings()).expect("export");
    let row = tables.table("WSEGAICD").expect("WSEGAICD").rows().next().cloned().expect("row");
    assert_eq!(row.text(14), Some("SHUT"));
}

#[test]
fn wsegaicd_restores_layout() {
    let mut info = well_with_devices();
    let layout = Layout { column_spacing: 4, row_prefix: "  ".to_string() };
    let mut formatter = TextTableFormatter::new().with_layout(layout.clone());
    export_msw_tables(&mut formatter, &mut info, &settings()).expect("export");
    assert_eq!(formatter.layout(), layout);

    let deck = formatter.into_string();
    let section = deck.split("WSEGAICD\n").nth(1).expect("WSEGAICD section");
    let row = section.lines().find(|l| !l.starts_with("--")).expect("row");
    // Right aligned under two-character titles, single spaced
    assert!(row.starts_with("    W  9  9 "), "tight layout row: {row}");
    assert!(row.contains(" OPEN "));
}

#[test]
fn wsegaicd_alone_needs_numbers() {
    let info = well_with_devices();
    let mut sink = TableCollector::new();
    assert!(generate_wsegaicd_table(&mut sink, &info).is_err());
}
