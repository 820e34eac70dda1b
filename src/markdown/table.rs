//! Pipe-table sub-parser.

/// A pipe table: one header row plus body rows.
///
/// The separator row (`|---|---|`) is never stored. Body rows may be
/// shorter or longer than the header; consumers pad or truncate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Table {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl Table {
    /// Number of grid columns, taken from the header.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Number of grid rows, header included.
    pub fn row_count(&self) -> usize {
        1 + self.body.len()
    }

    pub(crate) fn to_markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        lines.push(join_row(&self.header));
        lines.push(format!("|{}", "---|".repeat(self.column_count())));
        lines.extend(self.body.iter().map(|row| join_row(row)));
        lines.join("\n")
    }
}

fn join_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Split one `|`-delimited line into trimmed cells.
///
/// Leading and trailing pipes are removed before splitting, so
/// `| a | b |` yields `["a", "b"]`.
pub fn split_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Interpret a run of `|` lines as a table.
///
/// Returns `None` when fewer than two lines are given; the caller then
/// emits the raw lines as paragraphs. With exactly two lines the second is
/// dropped as a separator and the table has no body.
pub fn parse_table(lines: &[&str]) -> Option<Table> {
    if lines.len() < 2 {
        return None;
    }

    let mut rows = lines.iter().map(|line| split_row(line));
    let header = rows.next()?;
    let body = rows.skip(1).collect();

    Some(Table { header, body })
}
