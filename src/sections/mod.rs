//! Splitting a long report by its `## ` headings and recomposing the parts.
//!
//! [`SectionMap`] holds the front matter and one block per level-2 heading.
//! [`compose`] joins pieces into a derivative document, and
//! [`profiles::PROFILES`] is the fixed set of documents built from a report.

mod compose;
pub mod profiles;

pub use compose::{Piece, compose};
pub use profiles::{DEFAULT_REPORT, PROFILES, Profile, split_report};

use crate::error::{Error, Result};
use crate::util::normalize_source;

const SECTION_MARKER: &str = "## ";

/// Front matter plus the report's level-2 sections, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    front_matter: String,
    /// (heading line, block) pairs; each block starts with its heading line.
    sections: Vec<(String, String)>,
}

impl SectionMap {
    /// Split `text` at every line starting with `## `.
    ///
    /// Blocks and front matter are trimmed and end with a single newline.
    /// A heading line seen twice keeps its first position but takes the
    /// later block.
    pub fn extract(text: &str) -> Self {
        let text = normalize_source(text);
        let mut map = SectionMap::default();
        let mut front = Vec::new();
        let mut current: Option<(&str, Vec<&str>)> = None;

        for line in text.split('\n') {
            if line.starts_with(SECTION_MARKER) {
                if let Some((heading, lines)) = current.take() {
                    map.insert(heading, &lines);
                }
                current = Some((line, vec![line]));
                continue;
            }
            match current.as_mut() {
                Some((_, lines)) => lines.push(line),
                None => front.push(line),
            }
        }
        if let Some((heading, lines)) = current {
            map.insert(heading, &lines);
        }

        map.front_matter = trimmed_block(&front);
        map
    }

    fn insert(&mut self, heading: &str, lines: &[&str]) {
        let block = trimmed_block(lines);
        match self.sections.iter_mut().find(|(h, _)| h == heading) {
            Some((_, existing)) => *existing = block,
            None => self.sections.push((heading.to_string(), block)),
        }
    }

    /// Everything before the first section; empty if there is none.
    pub fn front_matter(&self) -> &str {
        &self.front_matter
    }

    /// Non-empty front matter lines.
    pub fn front_lines(&self) -> impl Iterator<Item = &str> {
        self.front_matter
            .lines()
            .filter(|line| !line.trim().is_empty())
    }

    /// Heading lines in source order.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(heading, _)| heading.as_str())
    }

    /// Look up a section by its numeric prefix.
    ///
    /// `"4."` matches `## 4. Intro` but not `## 4.5 Detail`: the identifier
    /// must be followed by whitespace or the end of the heading.
    ///
    /// # Example
    ///
    /// ```
    /// use mdocx::SectionMap;
    ///
    /// let map = SectionMap::extract("# Report\n## 4. Intro\nA\n## 4.5 Detail\nB\n");
    /// assert_eq!(map.get("4.").unwrap(), "## 4. Intro\nA\n");
    /// assert!(map.get("4.6").is_err());
    /// ```
    pub fn get(&self, number: &str) -> Result<&str> {
        self.sections
            .iter()
            .find(|(heading, _)| heading_matches(heading, number))
            .map(|(_, block)| block.as_str())
            .ok_or_else(|| Error::MissingSection(number.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn heading_matches(heading: &str, number: &str) -> bool {
    heading
        .strip_prefix(SECTION_MARKER)
        .and_then(|rest| rest.strip_prefix(number))
        .is_some_and(|rest| rest.chars().next().is_none_or(char::is_whitespace))
}

fn trimmed_block(lines: &[&str]) -> String {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
