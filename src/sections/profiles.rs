//! The derivative documents built from the network/async-DB report.
//!
//! Each [`Profile`] is an output path plus an ordered list of pieces. The
//! table is fixed: changing a package means editing [`PROFILES`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Piece::{FrontLine, FrontLines, FrontMatter, Literal, Section};
use super::{Piece, SectionMap, compose};
use crate::error::Result;
use crate::util::decode_source;

/// Report file name looked up when none is given.
pub const DEFAULT_REPORT: &str = "Network_Async_DB_Report_2026-02-26.md";

/// One derivative document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    /// Output path relative to the output root.
    pub path: &'static str,
    pub pieces: &'static [Piece],
}

impl Profile {
    /// Resolve every piece and compose the document.
    ///
    /// Fails with the first missing section.
    pub fn render(&self, map: &SectionMap) -> Result<String> {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| piece.resolve(map))
            .collect::<Result<Vec<_>>>()?;
        Ok(compose(&pieces))
    }
}

/// Find a profile by name.
pub fn profile(name: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|profile| profile.name == name)
}

/// Split `report` into every profile under `out_root`.
///
/// All documents are rendered before anything is written, so a missing
/// section leaves the output tree untouched. Returns the written paths in
/// [`PROFILES`] order.
pub fn split_report(report: &Path, out_root: &Path) -> Result<Vec<PathBuf>> {
    let source = decode_source(&fs::read(report)?);
    let map = SectionMap::extract(&source);
    debug!(
        report = %report.display(),
        sections = map.len(),
        "extracted sections"
    );

    let rendered = PROFILES
        .iter()
        .map(|profile| -> Result<(PathBuf, String)> {
            Ok((out_root.join(profile.path), profile.render(&map)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, text) in rendered {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        info!(path = %path.display(), "wrote");
        written.push(path);
    }
    Ok(written)
}

// ============================================================================
// Shared pieces
// ============================================================================

const ARCHITECTURE: &str = "![Architecture Overview](assets/01-architecture-overview.svg)";
const SESSION_UML: &str = "![Session UML](assets/02-session-uml.svg)";
const CLIENT_LIFECYCLE: &str =
    "![Client Lifecycle Sequence](assets/03-client-lifecycle-sequence.svg)";
const ASYNC_DB_FLOW: &str = "![Async DB Flow Sequence](assets/04-async-db-flow-sequence.svg)";
const GRACEFUL_SHUTDOWN: &str =
    "![Graceful Shutdown Sequence](assets/05-graceful-shutdown-sequence.svg)";
const DB_RECONNECT: &str = "![DB Reconnect Sequence](assets/06-db-reconnect-sequence.svg)";

const DIAGRAM_TABLE: &str = "| Diagram | File |
|---|---|
| Architecture Overview | `assets/01-architecture-overview.svg` |
| Session UML | `assets/02-session-uml.svg` |
| Client Lifecycle Sequence | `assets/03-client-lifecycle-sequence.svg` |
| Async DB Flow Sequence | `assets/04-async-db-flow-sequence.svg` |
| Graceful Shutdown Sequence | `assets/05-graceful-shutdown-sequence.svg` |
| DB Reconnect Sequence | `assets/06-db-reconnect-sequence.svg` |";

const TOP_README: &str = "# Reports

## Packages

- [TeamShare](TeamShare/README.md): technical package with detailed code-path notes and inline diagrams.
- [ExecutiveSummary](ExecutiveSummary/README.md): concise package for leads, PMs, and reporting.
- [WikiPackage](WikiPackage/Home.md): split pages ready to adapt into a wiki or internal docs.

## Assets

- Each package includes `README/Home + diagrams + assets + DOCX`.
- Mermaid source files are stored in each package `diagrams/` directory.
- Render and DOCX build helpers are under `Doc/Reports/_scripts/`.";

const SIDEBAR: &str = "* [Home](Home.md)
* [Overall Architecture](01-Overall-Architecture.md)
* [Network and Session Flow](02-Network-and-Session-Flow.md)
* [Async DB Flow](03-Async-DB-Flow.md)
* [Graceful Shutdown and Reconnect](04-Graceful-Shutdown-and-Reconnect.md)
* [Operational Notes](05-Operational-Notes.md)";

// ============================================================================
// Profiles
// ============================================================================

/// Full technical package with inline diagrams.
pub const TEAM_SHARE: &[Piece] = &[
    FrontMatter,
    Literal("## Diagram Map"),
    Literal(DIAGRAM_TABLE),
    Section("1."),
    Section("2."),
    Literal(ARCHITECTURE),
    Section("3.1"),
    Section("3.2"),
    Literal(SESSION_UML),
    Section("3.3"),
    Literal(CLIENT_LIFECYCLE),
    Section("3.4"),
    Section("3.5"),
    Section("3.6"),
    Section("4.1"),
    Literal(ASYNC_DB_FLOW),
    Section("4.2"),
    Section("4.3"),
    Section("4.4"),
    Literal(DB_RECONNECT),
    Section("4.5"),
    Section("5.1"),
    Section("5.2"),
    Section("5.3"),
    Section("5.4"),
    Section("6.1"),
    Section("6.2"),
    Literal(GRACEFUL_SHUTDOWN),
    Section("7.1"),
    Section("7.2"),
    Section("8.1"),
    Section("8.2"),
    Section("9."),
    Section("10."),
];

/// Title, four metadata lines, key diagrams and the conclusions.
pub const EXECUTIVE_SUMMARY: &[Piece] = &[
    FrontLine(0),
    FrontLine(1),
    FrontLine(2),
    FrontLine(3),
    FrontLine(4),
    Literal("## Key Diagrams"),
    Literal(ARCHITECTURE),
    Literal(ASYNC_DB_FLOW),
    Literal(GRACEFUL_SHUTDOWN),
    Section("1."),
    Section("6.2"),
    Section("7.1"),
    Section("7.2"),
    Section("8.1"),
    Section("8.2"),
    Section("9."),
];

pub const WIKI_HOME: &[Piece] = &[
    FrontLines(5),
    Literal("## Pages"),
    Literal("1. [01-Overall-Architecture.md](01-Overall-Architecture.md)"),
    Literal("2. [02-Network-and-Session-Flow.md](02-Network-and-Session-Flow.md)"),
    Literal("3. [03-Async-DB-Flow.md](03-Async-DB-Flow.md)"),
    Literal("4. [04-Graceful-Shutdown-and-Reconnect.md](04-Graceful-Shutdown-and-Reconnect.md)"),
    Literal("5. [05-Operational-Notes.md](05-Operational-Notes.md)"),
    Literal("## Diagrams"),
    Literal("- `assets/01-architecture-overview.svg`"),
    Literal("- `assets/02-session-uml.svg`"),
    Literal("- `assets/03-client-lifecycle-sequence.svg`"),
    Literal("- `assets/04-async-db-flow-sequence.svg`"),
    Literal("- `assets/05-graceful-shutdown-sequence.svg`"),
    Literal("- `assets/06-db-reconnect-sequence.svg`"),
];

/// Every derivative document, in write order.
pub static PROFILES: &[Profile] = &[
    Profile {
        name: "readme",
        path: "README.md",
        pieces: &[Literal(TOP_README)],
    },
    Profile {
        name: "team-share",
        path: "TeamShare/README.md",
        pieces: TEAM_SHARE,
    },
    Profile {
        name: "executive-summary",
        path: "ExecutiveSummary/README.md",
        pieces: EXECUTIVE_SUMMARY,
    },
    Profile {
        name: "wiki-home",
        path: "WikiPackage/Home.md",
        pieces: WIKI_HOME,
    },
    Profile {
        name: "wiki-architecture",
        path: "WikiPackage/01-Overall-Architecture.md",
        pieces: &[
            Literal(ARCHITECTURE),
            Section("1."),
            Section("2."),
            Section("3.1"),
            Section("3.2"),
        ],
    },
    Profile {
        name: "wiki-network",
        path: "WikiPackage/02-Network-and-Session-Flow.md",
        pieces: &[
            Literal(SESSION_UML),
            Literal(CLIENT_LIFECYCLE),
            Section("3.3"),
            Section("3.4"),
            Section("3.5"),
            Section("3.6"),
        ],
    },
    Profile {
        name: "wiki-async-db",
        path: "WikiPackage/03-Async-DB-Flow.md",
        pieces: &[
            Literal(ASYNC_DB_FLOW),
            Section("4.1"),
            Section("4.2"),
            Section("4.3"),
            Section("4.4"),
            Section("5.1"),
            Section("5.2"),
            Section("5.3"),
        ],
    },
    Profile {
        name: "wiki-shutdown",
        path: "WikiPackage/04-Graceful-Shutdown-and-Reconnect.md",
        pieces: &[
            Literal(DB_RECONNECT),
            Literal(GRACEFUL_SHUTDOWN),
            Section("4.5"),
            Section("6.2"),
            Section("7.1"),
            Section("7.2"),
        ],
    },
    Profile {
        name: "wiki-operations",
        path: "WikiPackage/05-Operational-Notes.md",
        pieces: &[
            Section("8.1"),
            Section("8.2"),
            Section("9."),
            Section("10."),
        ],
    },
    Profile {
        name: "wiki-sidebar",
        path: "WikiPackage/_Sidebar.md",
        pieces: &[Literal(SIDEBAR)],
    },
];
