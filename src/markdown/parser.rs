//! Line classification and the block iterator.

use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Lines;

use tracing::debug;

use super::block::{Block, ListKind};
use super::table::parse_table;

/// Classification of a single source line, before any multi-line grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A code fence (trimmed line starts with three backticks).
    Fence,
    Blank,
    /// `![alt](path)` and nothing else; carries `path`.
    Image(&'a str),
    /// Starts with `|`; grouped with its neighbours into a table.
    TableRow,
    Heading(u8, &'a str),
    Bullet(&'a str),
    Numbered(&'a str),
    /// Anything else; carries the full untrimmed line.
    Paragraph(&'a str),
}

type Matcher = for<'a> fn(&'a str) -> Option<LineKind<'a>>;

/// Matchers in priority order. Each receives the trimmed line.
const MATCHERS: &[Matcher] = &[
    match_fence,
    match_blank,
    match_image,
    match_table_row,
    match_heading,
    match_bullet,
    match_numbered,
];

fn match_fence(line: &str) -> Option<LineKind<'_>> {
    line.starts_with("```").then_some(LineKind::Fence)
}

fn match_blank(line: &str) -> Option<LineKind<'_>> {
    line.is_empty().then_some(LineKind::Blank)
}

fn match_image(line: &str) -> Option<LineKind<'_>> {
    if !line.starts_with("![") || !line.ends_with(')') {
        return None;
    }
    let (_, target) = line.split_once("](")?;
    Some(LineKind::Image(&target[..target.len() - 1]))
}

fn match_table_row(line: &str) -> Option<LineKind<'_>> {
    line.starts_with('|').then_some(LineKind::TableRow)
}

fn match_heading(line: &str) -> Option<LineKind<'_>> {
    // Longest marker first so `### x` is never read as level 1 or 2.
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(marker, level)| {
            line.strip_prefix(marker)
                .map(|text| LineKind::Heading(level, text.trim()))
        })
}

fn match_bullet(line: &str) -> Option<LineKind<'_>> {
    line.strip_prefix("- ")
        .map(|text| LineKind::Bullet(text.trim()))
}

fn match_numbered(line: &str) -> Option<LineKind<'_>> {
    // Only the literal `1. ` marker; `2. x` stays a paragraph.
    line.strip_prefix("1. ")
        .map(|text| LineKind::Numbered(text.trim()))
}

/// Classify one source line.
///
/// Matchers see the line with surrounding whitespace removed; the
/// paragraph fallback keeps the line untouched.
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(trimmed))
        .unwrap_or(LineKind::Paragraph(line))
}

/// Lazy iterator over the blocks of a markdown source.
///
/// Cloning the parser before it is advanced restarts the sequence.
///
/// # Example
///
/// ```
/// use mdocx::markdown::{Block, BlockParser};
///
/// let blocks: Vec<Block> = BlockParser::new("# Title\n\ntext").collect();
/// assert_eq!(blocks.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct BlockParser<'a> {
    lines: Peekable<Lines<'a>>,
    in_code: bool,
    pending: VecDeque<Block>,
}

impl<'a> BlockParser<'a> {
    /// Create a parser over normalized source text (see [`crate::normalize_source`]).
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().peekable(),
            in_code: false,
            pending: VecDeque::new(),
        }
    }

    /// Collect a run of table lines starting with `first`.
    fn take_table(&mut self, first: &'a str) -> Block {
        let mut rows = vec![first];
        while let Some(line) = self
            .lines
            .next_if(|line| matches!(classify(line), LineKind::TableRow))
        {
            rows.push(line);
        }

        if let Some(table) = parse_table(&rows) {
            return Block::Table(table);
        }

        debug!(line = first, "single pipe line, emitting as paragraph");
        self.pending.extend(rows[1..].iter().map(|line| Block::Paragraph {
            text: line.to_string(),
        }));
        Block::Paragraph {
            text: first.to_string(),
        }
    }
}

impl Iterator for BlockParser<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if let Some(block) = self.pending.pop_front() {
            return Some(block);
        }

        loop {
            let line = self.lines.next()?;
            let block = match classify(line) {
                LineKind::Fence => {
                    self.in_code = !self.in_code;
                    continue;
                }
                _ if self.in_code => Block::CodeLine {
                    text: line.to_string(),
                },
                LineKind::Blank => Block::Blank,
                LineKind::Image(path) => Block::Image {
                    path: path.to_string(),
                    line: line.trim().to_string(),
                },
                LineKind::TableRow => self.take_table(line),
                LineKind::Heading(level, text) => Block::Heading {
                    level,
                    text: text.to_string(),
                },
                LineKind::Bullet(text) => Block::ListItem {
                    kind: ListKind::Bullet,
                    text: text.to_string(),
                },
                LineKind::Numbered(text) => Block::ListItem {
                    kind: ListKind::Numbered,
                    text: text.to_string(),
                },
                LineKind::Paragraph(text) => Block::Paragraph {
                    text: text.to_string(),
                },
            };
            return Some(block);
        }
    }
}

/// Parse a whole source into blocks.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    BlockParser::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{Table, blocks_to_markdown};
    use proptest::prelude::*;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_heading_longest_prefix_first() {
        assert_eq!(classify("### Title"), LineKind::Heading(3, "Title"));
        assert_eq!(classify("## Title"), LineKind::Heading(2, "Title"));
        assert_eq!(classify("# Title"), LineKind::Heading(1, "Title"));
        assert_eq!(classify("#### Title"), LineKind::Paragraph("#### Title"));
        assert_eq!(classify("#Title"), LineKind::Paragraph("#Title"));
    }

    #[test]
    fn test_numbered_marker_is_literal_one() {
        assert_eq!(classify("1. First"), LineKind::Numbered("First"));
        assert_eq!(classify("2. Foo"), LineKind::Paragraph("2. Foo"));
        assert_eq!(classify("10. Foo"), LineKind::Paragraph("10. Foo"));
    }

    #[test]
    fn test_bullet() {
        assert_eq!(classify("  - item  "), LineKind::Bullet("item"));
        assert_eq!(classify("-item"), LineKind::Paragraph("-item"));
    }

    #[test]
    fn test_image_requires_whole_line() {
        assert_eq!(classify("![Arch](assets/a.svg)"), LineKind::Image("assets/a.svg"));
        assert_eq!(
            classify("![Arch](assets/a.svg) trailing"),
            LineKind::Paragraph("![Arch](assets/a.svg) trailing")
        );
        assert_eq!(classify("see ![x](y)"), LineKind::Paragraph("see ![x](y)"));
    }

    #[test]
    fn test_paragraph_keeps_untrimmed_line() {
        let blocks = parse_blocks("  indented text  ");
        assert_eq!(blocks, vec![paragraph("  indented text  ")]);
    }

    #[test]
    fn test_fence_lines_are_not_emitted() {
        let blocks = parse_blocks("```rust\nfn main() {}\n\n# not a heading\n```\nafter");
        assert_eq!(
            blocks,
            vec![
                Block::CodeLine {
                    text: "fn main() {}".to_string()
                },
                Block::CodeLine {
                    text: String::new()
                },
                Block::CodeLine {
                    text: "# not a heading".to_string()
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn test_fenced_lines_are_not_sub_parsed() {
        let inner = ["| a | b |", "|---|---|", "- x", "1. y", "![i](p.png)", "## h"];
        let source = format!("```\n{}\n```", inner.join("\n"));
        let expected: Vec<Block> = inner
            .iter()
            .map(|line| Block::CodeLine {
                text: line.to_string(),
            })
            .collect();
        assert_eq!(parse_blocks(&source), expected);
    }

    #[test]
    fn test_table_run_is_one_block() {
        let blocks = parse_blocks("| A | B |\n|---|---|\n| 1 | 2 |\ntext");
        assert_eq!(
            blocks,
            vec![
                Block::Table(Table {
                    header: vec!["A".to_string(), "B".to_string()],
                    body: vec![vec!["1".to_string(), "2".to_string()]],
                }),
                paragraph("text"),
            ]
        );
    }

    #[test]
    fn test_two_line_table_has_no_body() {
        let blocks = parse_blocks("|A|B|\n|1|2|");
        let [Block::Table(table)] = blocks.as_slice() else {
            panic!("expected one table, got {blocks:?}");
        };
        assert_eq!(table.header, vec!["A", "B"]);
        assert!(table.body.is_empty());
    }

    #[test]
    fn test_single_pipe_line_degrades_to_paragraph() {
        let blocks = parse_blocks(" | just a pipe\n# After");
        assert_eq!(
            blocks,
            vec![
                paragraph(" | just a pipe"),
                Block::Heading {
                    level: 1,
                    text: "After".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_blank_lines() {
        let blocks = parse_blocks("a\n   \nb");
        assert_eq!(blocks, vec![paragraph("a"), Block::Blank, paragraph("b")]);
    }

    #[test]
    fn test_clone_restarts_parser() {
        let parser = BlockParser::new("# A\nb");
        let first: Vec<Block> = parser.clone().collect();
        let second: Vec<Block> = parser.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parsers_are_independent() {
        let mut a = BlockParser::new("```\ncode");
        let mut b = BlockParser::new("plain");
        assert!(matches!(a.next(), Some(Block::CodeLine { .. })));
        assert_eq!(b.next(), Some(paragraph("plain")));
    }

    fn line_strategy() -> impl Strategy<Value = String> {
        let word = prop::sample::select(vec!["alpha", "beta", "한글", "x", "1.", "#", "|", "-"]);
        let prefix = prop::sample::select(vec![
            "", "# ", "## ", "### ", "#### ", "- ", "1. ", "2. ", "| ", "  ", "```", "![d](",
        ]);
        let suffix = prop::sample::select(vec!["", " |", ")", "  "]);
        (prefix, prop::collection::vec(word, 0..4), suffix)
            .prop_map(|(p, words, s)| format!("{p}{}{s}", words.join(" ")))
    }

    proptest! {
        #[test]
        fn prop_reparse_is_idempotent(lines in prop::collection::vec(line_strategy(), 0..24)) {
            let source = lines.join("\n");
            let blocks = parse_blocks(&source);
            let reparsed = parse_blocks(&blocks_to_markdown(&blocks));
            prop_assert_eq!(blocks, reparsed);
        }

        #[test]
        fn prop_level_three_is_never_lower(text in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,19}") {
            let line = format!("### {text}");
            let is_level_three = matches!(classify(&line), LineKind::Heading(3, _));
            prop_assert!(is_level_three);
        }

        #[test]
        fn prop_only_literal_one_is_numbered(n in 2u32..1000, text in "[a-z]{1,10}") {
            let line = format!("{n}. {text}");
            let is_paragraph = matches!(classify(&line), LineKind::Paragraph(_));
            prop_assert!(is_paragraph);
        }
    }
}
