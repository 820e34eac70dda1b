//! # mdocx
//!
//! Convert report-style markdown into Word (DOCX) documents, and split one
//! long report into a fixed set of derivative markdown packages.
//!
//! ## Features
//!
//! - Line-oriented markdown dialect: headings, bullets, `1.` items, fenced
//!   code, pipe tables and whole-line images
//! - SVG references embed their PNG sibling when one exists
//! - CJK-capable fonts on every run (Latin and East-Asian slots alike)
//! - Multi-file bundles with an optional title and page breaks
//! - Section extraction by numeric heading prefix (`## 4.2 ...`) and
//!   recomposition into team, summary and wiki packages
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdocx::{build_bundle, build_single, split_report};
//! use std::path::Path;
//!
//! build_single("README.md", "README.docx")?;
//! build_bundle(["a.md", "b.md"], "all.docx", Some("Reports"))?;
//! split_report(Path::new("report.md"), Path::new("."))?;
//! # Ok::<(), mdocx::Error>(())
//! ```
//!
//! ## Rendering Blocks
//!
//! ```
//! use mdocx::{Block, Document, Renderer, parse_blocks};
//! use std::path::Path;
//!
//! let blocks = parse_blocks("## Setup\n- install\n2. not a list item");
//! assert!(matches!(blocks[2], Block::Paragraph { .. }));
//!
//! let mut doc = Document::new();
//! let report = Renderer::new().render(&mut doc, blocks, Path::new("."));
//! assert_eq!(report.blocks, 3);
//! ```

pub mod bundle;
pub mod docx;
pub mod error;
pub mod image;
pub mod markdown;
pub mod render;
pub mod sections;
pub(crate) mod util;

pub use bundle::{Bundle, BundleConfig, build_bundle, build_single};
pub use docx::{DocxConfig, Document};
pub use error::{Error, Result};
pub use image::{ImageResolver, resolve_image};
pub use markdown::{Block, BlockParser, ListKind, Table, parse_blocks};
pub use render::{RenderConfig, RenderReport, Renderer};
pub use sections::{Piece, Profile, SectionMap, compose, split_report};
pub use util::{decode_source, normalize_source};
