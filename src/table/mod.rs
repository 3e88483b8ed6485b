//! Keyword-table sink
//!
//! Table generators write through `TableSink`: a keyword, optional comments,
//! one or more header blocks, data rows, and a table-complete marker. Two
//! sinks ship with the crate:
//!
//! - `TextTableFormatter` renders simulator deck text with aligned columns
//! - `TableCollector` keeps the tables as data (tests, JSON output)

mod collector;
pub mod number_format;
mod text_formatter;

pub use collector::{CollectedRow, CollectedTable, TableCollector, TableEntry};
pub use text_formatter::TextTableFormatter;

use serde::{Deserialize, Serialize};

/// Text written in place of a value to request the simulator default.
pub const DEFAULT_MARKER: &str = "1*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Right,
}

/// How floating-point cells in a column are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoubleFormat {
    /// Fixed point with this many decimals.
    Float(usize),
    /// Shortest `%g`-style text with six significant digits.
    Concise,
}

impl DoubleFormat {
    pub const DEFAULT: Self = Self::Float(3);

    pub fn render(self, value: f64) -> String {
        match self {
            Self::Float(decimals) => number_format::format_fixed(value, decimals),
            Self::Concise => number_format::format_significant(value, 6),
        }
    }
}

/// A named column with its numeric format and alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    pub format: DoubleFormat,
    pub alignment: Alignment,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), format: DoubleFormat::DEFAULT, alignment: Alignment::Left }
    }

    pub fn with_format(mut self, format: DoubleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn right_aligned(mut self) -> Self {
        self.alignment = Alignment::Right;
        self
    }
}

/// Build a header from plain titles.
pub fn columns(titles: &[&str]) -> Vec<Column> {
    titles.iter().map(|t| Column::new(*t)).collect()
}

/// One value in a data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    /// Use-simulator-default sentinel.
    Default,
}

impl Cell {
    /// `Some` becomes the value, `None` the default marker. Never omitted.
    pub fn value_or_default(value: Option<f64>) -> Self {
        value.map_or(Self::Default, Self::Float)
    }

    /// Zero-based grid index written one-based.
    pub fn one_based(index: usize) -> Self {
        Self::Int(i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1)))
    }

    /// Render with the owning column's numeric format.
    pub fn render(&self, format: DoubleFormat) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format.render(*v),
            Self::Text(s) => s.clone(),
            Self::Default => DEFAULT_MARKER.to_string(),
        }
    }
}

impl From<u32> for Cell {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Spacing between columns and text placed before every data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub column_spacing: usize,
    pub row_prefix: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self { column_spacing: 2, row_prefix: "   ".to_string() }
    }
}

impl Layout {
    /// Single-space layout used by wide tables.
    pub fn tight() -> Self {
        Self { column_spacing: 1, row_prefix: "   ".to_string() }
    }
}

/// Receiver of keyword tables.
pub trait TableSink {
    /// Start a table under `name`.
    fn keyword(&mut self, name: &str);

    /// Comment line that is always written.
    fn comment(&mut self, text: &str);

    /// Comment line the sink may drop when optional comments are disabled.
    fn optional_comment(&mut self, text: &str);

    /// Start a header block; following rows are laid out under these columns.
    fn header(&mut self, columns: Vec<Column>);

    /// Append one value to the current row.
    fn add(&mut self, cell: Cell);

    fn row_completed(&mut self);

    fn table_completed(&mut self);

    /// Current layout. Sinks without a text layout report the default.
    fn layout(&self) -> Layout {
        Layout::default()
    }

    /// Change the layout for the tables that follow.
    fn set_layout(&mut self, _layout: Layout) {}

    fn add_all<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
        Self: Sized,
    {
        for cell in cells {
            self.add(cell.into());
        }
    }
}
