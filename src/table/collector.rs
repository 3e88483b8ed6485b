//! In-memory table sink
//!
//! Keeps every table as structured data: keyword, comments, header blocks and
//! rows in write order. Serialises to JSON for machine consumers.

use serde::Serialize;

use super::{Cell, Column, TableSink};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedRow {
    pub cells: Vec<Cell>,
}

impl CollectedRow {
    pub fn int(&self, index: usize) -> Option<i64> {
        match self.cells.get(index) {
            Some(Cell::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, index: usize) -> Option<f64> {
        match self.cells.get(index) {
            Some(Cell::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.cells.get(index) {
            Some(Cell::Text(v)) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableEntry {
    Comment { text: String },
    Header { columns: Vec<Column> },
    Row(CollectedRow),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedTable {
    pub keyword: String,
    pub entries: Vec<TableEntry>,
    pub completed: bool,
}

impl CollectedTable {
    pub fn rows(&self) -> impl Iterator<Item = &CollectedRow> {
        self.entries.iter().filter_map(|e| match e {
            TableEntry::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Rows written after the `n`-th header block (zero-based).
    pub fn rows_in_block(&self, n: usize) -> Vec<&CollectedRow> {
        let mut block = None;
        let mut rows = Vec::new();
        for entry in &self.entries {
            match entry {
                TableEntry::Header { .. } => block = Some(block.map_or(0, |b| b + 1)),
                TableEntry::Row(row) if block == Some(n) => rows.push(row),
                _ => {}
            }
        }
        rows
    }

    pub fn headers(&self) -> Vec<&[Column]> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                TableEntry::Header { columns } => Some(columns.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            TableEntry::Comment { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Sink that records tables instead of rendering them.
#[derive(Debug, Default, Serialize)]
pub struct TableCollector {
    pub tables: Vec<CollectedTable>,
    #[serde(skip)]
    row: Vec<Cell>,
    #[serde(skip)]
    skip_optional_comments: bool,
}

impl TableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_optional_comments(mut self) -> Self {
        self.skip_optional_comments = true;
        self
    }

    pub fn table(&self, keyword: &str) -> Option<&CollectedTable> {
        self.tables.iter().find(|t| t.keyword == keyword)
    }

    pub fn keywords(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.keyword.as_str()).collect()
    }

    fn current(&mut self) -> &mut CollectedTable {
        if self.tables.last().map_or(true, |t| t.completed) {
            // Content before any keyword lands in an anonymous table.
            self.tables.push(CollectedTable { keyword: String::new(), entries: Vec::new(), completed: false });
        }
        let last = self.tables.len() - 1;
        &mut self.tables[last]
    }
}

impl TableSink for TableCollector {
    fn keyword(&mut self, name: &str) {
        self.tables.push(CollectedTable { keyword: name.to_string(), entries: Vec::new(), completed: false });
    }

    fn comment(&mut self, text: &str) {
        self.current().entries.push(TableEntry::Comment { text: text.to_string() });
    }

    fn optional_comment(&mut self, text: &str) {
        if !self.skip_optional_comments {
            self.comment(text);
        }
    }

    fn header(&mut self, columns: Vec<Column>) {
        self.current().entries.push(TableEntry::Header { columns });
    }

    fn add(&mut self, cell: Cell) {
        self.row.push(cell);
    }

    fn row_completed(&mut self) {
        let cells = std::mem::take(&mut self.row);
        self.current().entries.push(TableEntry::Row(CollectedRow { cells }));
    }

    fn table_completed(&mut self) {
        self.current().completed = true;
    }
}
