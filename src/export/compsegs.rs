//! COMPSEGS / COMPSEGL: grid cells connected to completion sub-segments
//!
//! Categories are visited in a fixed order (perforations, fishbones,
//! fractures), each with a main-grid pass and, when the model has local grid
//! refinements, a sub-grid pass. One set of written cell indices is shared by
//! every pass and keyed on IJK alone, so a cell belongs to the first
//! completion that reached it whichever grid it was reported on.
//! Main-grid rows go to COMPSEGS, sub-grid rows to COMPSEGL.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::table::{columns, Cell, TableSink};
use crate::types::{CellIntersection, CompletionType, MswExportInfo};

const CATEGORIES: [&[CompletionType]; 3] =
    [CompletionType::PERFORATIONS, CompletionType::FISHBONES, CompletionType::FRACTURES];

const COMMON_COLUMNS: [&str; 9] = [
    "I",
    "J",
    "K",
    "Branch no",
    "Start Length",
    "End Length",
    "Dir Pen",
    "End Range",
    "Connection Depth",
];

/// Row counts of the two connection tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompsegsSummary {
    pub main_grid_rows: usize,
    pub sub_grid_rows: usize,
}

struct CompsegRow {
    cell: CellIntersection,
    branch_number: u32,
    start_length: f64,
    end_length: f64,
}

#[derive(Default)]
struct PendingTable {
    first_type: Option<CompletionType>,
    rows: Vec<CompsegRow>,
}

/// Write COMPSEGS and COMPSEGL. A table with no rows is not written at all.
pub fn generate_compsegs_tables<S: TableSink>(sink: &mut S, info: &MswExportInfo) -> CompsegsSummary {
    let sub_grid_pass = info.has_sub_grid_intersections();

    let mut written: HashSet<[usize; 3]> = HashSet::new();
    let mut main = PendingTable::default();
    let mut sub = PendingTable::default();

    for types in CATEGORIES {
        collect_rows(info, types, false, &mut written, &mut main);
        if sub_grid_pass {
            collect_rows(info, types, true, &mut written, &mut sub);
        }
    }

    write_table(sink, "COMPSEGS", &info.well_name, &main, false);
    write_table(sink, "COMPSEGL", &info.well_name, &sub, true);

    let summary = CompsegsSummary { main_grid_rows: main.rows.len(), sub_grid_rows: sub.rows.len() };
    info!(
        well = %info.well_name,
        compsegs = summary.main_grid_rows,
        compsegl = summary.sub_grid_rows,
        "Completion connection tables written"
    );
    summary
}

fn collect_rows(
    info: &MswExportInfo,
    types: &[CompletionType],
    sub_grid: bool,
    written: &mut HashSet<[usize; 3]>,
    table: &mut PendingTable,
) {
    for branch in info.main_bore.iter_depth_first() {
        for segment in &branch.segments {
            for completion in &segment.completions {
                let completion_type = completion.completion_type();
                if completion.segments().is_empty() || !types.contains(&completion_type) {
                    continue;
                }

                for sub in completion.segments() {
                    // Valve sub-segments model the device; the flow length is the host's.
                    let (start_length, end_length) = if completion_type.is_perforation_valve() {
                        (segment.start_md, segment.end_md)
                    } else {
                        (sub.start_md, sub.end_md)
                    };

                    for intersection in &sub.intersections {
                        if intersection.is_sub_grid() != sub_grid || !written.insert(intersection.ijk) {
                            continue;
                        }
                        table.first_type.get_or_insert(completion_type);
                        table.rows.push(CompsegRow {
                            cell: intersection.clone(),
                            branch_number: completion.branch_number(),
                            start_length,
                            end_length,
                        });
                    }
                }
            }
        }
    }
}

fn write_table<S: TableSink>(sink: &mut S, keyword: &str, well_name: &str, table: &PendingTable, sub_grid: bool) {
    if table.rows.is_empty() {
        return;
    }

    sink.keyword(keyword);
    match table.first_type {
        Some(CompletionType::Fishbones | CompletionType::FishbonesIcd) => sink.comment("Fishbones"),
        Some(CompletionType::Fracture) => sink.comment("Fractures"),
        _ => {}
    }

    sink.header(columns(&["Name"]));
    sink.add(Cell::from(well_name));
    sink.row_completed();

    let mut header = Vec::with_capacity(COMMON_COLUMNS.len() + 1);
    if sub_grid {
        header.push("Grid");
    }
    header.extend(COMMON_COLUMNS);
    sink.header(columns(&header));

    for row in &table.rows {
        if sub_grid {
            sink.add(Cell::from(row.cell.grid_name.as_str()));
        }
        let [i, j, k] = row.cell.ijk;
        sink.add(Cell::one_based(i));
        sink.add(Cell::one_based(j));
        sink.add(Cell::one_based(k));
        sink.add(Cell::from(row.branch_number));
        sink.add(Cell::Float(row.start_length));
        sink.add(Cell::Float(row.end_length));
        sink.row_completed();
    }
    sink.table_completed();
}
