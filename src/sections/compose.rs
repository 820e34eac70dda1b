use std::borrow::Cow;

use super::SectionMap;
use crate::error::Result;

/// One entry of an output profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    /// Static text injected as-is.
    Literal(&'static str),
    /// The section whose heading starts with this identifier.
    Section(&'static str),
    /// The whole front matter.
    FrontMatter,
    /// The n-th non-empty front matter line (0-based); empty if absent.
    FrontLine(usize),
    /// The first n non-empty front matter lines, one per line.
    FrontLines(usize),
}

impl Piece {
    /// Resolve against a section map. Only [`Piece::Section`] can fail.
    pub fn resolve<'a>(&self, map: &'a SectionMap) -> Result<Cow<'a, str>> {
        Ok(match *self {
            Piece::Literal(text) => Cow::Borrowed(text),
            Piece::Section(number) => Cow::Borrowed(map.get(number)?),
            Piece::FrontMatter => Cow::Borrowed(map.front_matter()),
            Piece::FrontLine(n) => Cow::Borrowed(map.front_lines().nth(n).unwrap_or_default()),
            Piece::FrontLines(n) => Cow::Owned(map.front_lines().take(n).collect::<Vec<_>>().join("\n")),
        })
    }
}

/// Join pieces with one blank line between them.
///
/// Surrounding newlines of each piece are trimmed and empty or
/// whitespace-only pieces are dropped. The result ends with exactly one
/// newline.
///
/// ```
/// use mdocx::compose;
///
/// assert_eq!(compose(&["", "  \n", "## A\ntext\n"]), "## A\ntext\n");
/// assert_eq!(compose(&["a\n\n", "\nb"]), "a\n\nb\n");
/// ```
pub fn compose<S: AsRef<str>>(pieces: &[S]) -> String {
    let joined = pieces
        .iter()
        .map(AsRef::as_ref)
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| piece.trim_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n", joined.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn map() -> SectionMap {
        SectionMap::extract("# Title\n\nDate: today\nOwner: net\n\n## 1. One\nbody\n")
    }

    #[test]
    fn test_compose_single_blank_line_between_pieces() {
        let text = compose(&["# T\n", "\n\n## 1. One\nbody\n\n", "![x](x.svg)"]);
        assert_eq!(text, "# T\n\n## 1. One\nbody\n\n![x](x.svg)\n");
    }

    #[test]
    fn test_compose_keeps_inner_blank_lines() {
        let text = compose(&["# Reports\n\n## Packages\n\n- a\n"]);
        assert_eq!(text, "# Reports\n\n## Packages\n\n- a\n");
    }

    #[test]
    fn test_compose_nothing() {
        assert_eq!(compose::<&str>(&[]), "\n");
        assert_eq!(compose(&["", " "]), "\n");
    }

    #[test]
    fn test_resolve_front_pieces() {
        let map = map();
        assert_eq!(Piece::FrontLine(0).resolve(&map).unwrap(), "# Title");
        assert_eq!(Piece::FrontLine(2).resolve(&map).unwrap(), "Owner: net");
        assert_eq!(Piece::FrontLine(9).resolve(&map).unwrap(), "");
        assert_eq!(
            Piece::FrontLines(2).resolve(&map).unwrap(),
            "# Title\nDate: today"
        );
        assert_eq!(
            Piece::FrontMatter.resolve(&map).unwrap(),
            "# Title\n\nDate: today\nOwner: net\n"
        );
    }

    #[test]
    fn test_resolve_section() {
        let map = map();
        assert_eq!(Piece::Section("1.").resolve(&map).unwrap(), "## 1. One\nbody\n");
        let err = Piece::Section("2.").resolve(&map).unwrap_err();
        assert!(matches!(&err, Error::MissingSection(n) if n == "2."));
        assert_eq!(err.to_string(), "missing section: 2.");
    }
}
