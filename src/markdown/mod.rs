//! Block parsing for the constrained markdown dialect.
//!
//! The dialect is deliberately small and line-oriented:
//!
//! - [`parser`]: the ordered line matchers and the [`BlockParser`] iterator
//! - [`block`]: the [`Block`] values the parser produces, and their
//!   serialisation back to markdown
//! - [`table`]: the pipe-table sub-parser
//!
//! ## Design Notes
//!
//! Classification is one pass with no backtracking. The only state is the
//! code-fence flag, owned by each [`BlockParser`] value, so parsing is
//! reentrant. Tables need lookahead: a run of consecutive `|` lines is
//! handed to the table sub-parser as a unit.
//!
//! Inline styling (emphasis, links, inline code) is not parsed. A paragraph
//! is one literal run of text.

mod block;
mod parser;
mod table;

pub use block::{Block, ListKind, blocks_to_markdown};
pub use parser::{BlockParser, LineKind, classify, parse_blocks};
pub use table::{Table, parse_table, split_row};
