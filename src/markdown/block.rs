//! Typed blocks produced by the parser.

use super::table::Table;

/// Marker style of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum ListKind {
    /// `- item`
    Bullet,
    /// `1. item` (only the literal `1. ` marker is recognized)
    Numbered,
}

/// One line-level unit of a markdown document.
///
/// Blocks are produced in source order and never reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", rename_all = "snake_case"))]
pub enum Block {
    /// `#`, `##` or `###` heading, marker stripped.
    Heading { level: u8, text: String },
    /// A literal line of text, untrimmed.
    Paragraph { text: String },
    ListItem { kind: ListKind, text: String },
    /// A verbatim line between code fences.
    CodeLine { text: String },
    Table(Table),
    /// An image reference. `line` is the trimmed source line, kept as the
    /// fallback text when the image cannot be embedded.
    Image { path: String, line: String },
    Blank,
}

impl Block {
    /// Serialise this block back to a single markdown line (or lines, for tables).
    ///
    /// Code lines are returned bare; use [`blocks_to_markdown`] to get them
    /// wrapped in fences.
    pub fn to_markdown(&self) -> String {
        match self {
            Block::Heading { level, text } => {
                format!("{} {}", "#".repeat(*level as usize), text)
            }
            Block::Paragraph { text } => text.clone(),
            Block::ListItem {
                kind: ListKind::Bullet,
                text,
            } => format!("- {text}"),
            Block::ListItem {
                kind: ListKind::Numbered,
                text,
            } => format!("1. {text}"),
            Block::CodeLine { text } => text.clone(),
            Block::Table(table) => table.to_markdown(),
            Block::Image { line, .. } => line.clone(),
            Block::Blank => String::new(),
        }
    }
}

/// Serialise a block sequence back to markdown.
///
/// Runs of consecutive code lines share one fence pair. Re-parsing the
/// output yields the same blocks.
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut in_code = false;

    for block in blocks {
        let is_code = matches!(block, Block::CodeLine { .. });
        if is_code != in_code {
            out.push_str("```\n");
            in_code = is_code;
        }
        out.push_str(&block.to_markdown());
        out.push('\n');
    }
    if in_code {
        out.push_str("```\n");
    }

    out
}
