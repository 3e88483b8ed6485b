//! Deck-text rendering of keyword tables
//!
//! Rows are buffered per header block so every column can be padded to the
//! widest value in the block. Output shape:
//!
//! ```text
//! WELSEGS
//! -- First Seg  Last Seg  Branch Num
//!    2          2         1           /
//! /
//! ```

use std::fmt::Write as _;

use super::{Alignment, Cell, Column, DoubleFormat, Layout, TableSink};

enum BlockLine {
    Comment(String),
    Row(Vec<Cell>),
}

struct Block {
    columns: Vec<Column>,
    lines: Vec<BlockLine>,
}

/// Renders tables as simulator input text.
pub struct TextTableFormatter {
    out: String,
    layout: Layout,
    optional_comments: bool,
    block: Option<Block>,
    row: Vec<Cell>,
}

impl Default for TextTableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTableFormatter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            layout: Layout::default(),
            optional_comments: true,
            block: None,
            row: Vec::new(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_optional_comments(mut self, enabled: bool) -> Self {
        self.optional_comments = enabled;
        self
    }

    /// Text written so far. Rows of an unfinished table are not included.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(mut self) -> String {
        self.flush_block();
        self.out
    }

    fn write_comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "-- {text}");
    }

    fn flush_block(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };

        let rendered: Vec<Option<Vec<String>>> = block
            .lines
            .iter()
            .map(|line| match line {
                BlockLine::Comment(_) => None,
                BlockLine::Row(cells) => Some(
                    cells
                        .iter()
                        .enumerate()
                        .map(|(i, cell)| {
                            let format = block.columns.get(i).map_or(DoubleFormat::DEFAULT, |c| c.format);
                            cell.render(format)
                        })
                        .collect(),
                ),
            })
            .collect();

        let column_count = rendered
            .iter()
            .flatten()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(block.columns.len());
        let mut widths = vec![0usize; column_count];
        for (i, column) in block.columns.iter().enumerate() {
            widths[i] = column.title.chars().count();
        }
        for cells in rendered.iter().flatten() {
            for (i, text) in cells.iter().enumerate() {
                widths[i] = widths[i].max(text.chars().count());
            }
        }

        let spacing = " ".repeat(self.layout.column_spacing);
        let alignment = |i: usize| block.columns.get(i).map_or(Alignment::Left, |c| c.alignment);

        let titles: Vec<String> = block
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| pad(&c.title, widths[i], alignment(i)))
            .collect();
        let header_line = titles.join(&spacing);
        let _ = writeln!(self.out, "-- {}", header_line.trim_end());

        for (line, cells) in block.lines.iter().zip(&rendered) {
            match (line, cells) {
                (BlockLine::Comment(text), _) => self.write_comment(text),
                (BlockLine::Row(_), Some(cells)) => {
                    let padded: Vec<String> = cells
                        .iter()
                        .enumerate()
                        .map(|(i, text)| pad(text, widths[i], alignment(i)))
                        .collect();
                    let row = padded.join(&spacing);
                    let _ = writeln!(self.out, "{}{} /", self.layout.row_prefix, row.trim_end());
                }
                (BlockLine::Row(_), None) => {}
            }
        }
    }
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    match alignment {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

impl TableSink for TextTableFormatter {
    fn keyword(&mut self, name: &str) {
        self.flush_block();
        let _ = writeln!(self.out, "{name}");
    }

    fn comment(&mut self, text: &str) {
        match &mut self.block {
            Some(block) => block.lines.push(BlockLine::Comment(text.to_string())),
            None => self.write_comment(text),
        }
    }

    fn optional_comment(&mut self, text: &str) {
        if self.optional_comments {
            self.comment(text);
        }
    }

    fn header(&mut self, columns: Vec<Column>) {
        self.flush_block();
        self.block = Some(Block { columns, lines: Vec::new() });
    }

    fn add(&mut self, cell: Cell) {
        self.row.push(cell);
    }

    fn row_completed(&mut self) {
        let cells = std::mem::take(&mut self.row);
        match &mut self.block {
            Some(block) => block.lines.push(BlockLine::Row(cells)),
            None => {
                let texts: Vec<String> = cells.iter().map(|c| c.render(DoubleFormat::DEFAULT)).collect();
                let spacing = " ".repeat(self.layout.column_spacing);
                let _ = writeln!(self.out, "{}{} /", self.layout.row_prefix, texts.join(&spacing));
            }
        }
    }

    fn table_completed(&mut self) {
        self.flush_block();
        self.out.push_str("/\n\n");
    }

    fn layout(&self) -> Layout {
        self.layout.clone()
    }

    fn set_layout(&mut self, layout: Layout) {
        self.flush_block();
        self.layout = layout;
    }
}
