//! Block → DOCX rendering.
//!
//! Walks a block sequence in order and appends styled content to a
//! [`Document`]. Nothing is reordered or dropped: an image that cannot be
//! embedded is replaced by its literal markdown line.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::docx::{DEFAULT_FONT, Document, Emu, Pt, Run, StyleId, StyleSheet};
use crate::error::Result;
use crate::image::ImageResolver;
use crate::markdown::{Block, BlockParser, ListKind, Table};
use crate::util::decode_source;

/// Configuration for rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Font for every non-code run and every named style.
    pub body_font: String,
    /// Explicit size of table cell runs.
    pub body_size: Pt,
    pub code_font: String,
    pub code_size: Pt,
    /// Width of embedded pictures (6.3in fits a Letter page with 1in margins).
    pub image_width: Emu,
    pub resolver: ImageResolver,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            body_font: DEFAULT_FONT.to_string(),
            body_size: Pt(10.5),
            code_font: "Consolas".to_string(),
            code_size: Pt(9.0),
            image_width: Emu::from_inches(6.3),
            resolver: ImageResolver::default(),
        }
    }
}

/// What happened during a render, including non-fatal degradations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub blocks: usize,
    pub images: usize,
    pub tables: usize,
    /// Image references rendered as literal text instead.
    pub unresolved_images: Vec<String>,
}

impl RenderReport {
    pub fn merge(&mut self, other: RenderReport) {
        self.blocks += other.blocks;
        self.images += other.images;
        self.tables += other.tables;
        self.unresolved_images.extend(other.unresolved_images);
    }
}

/// Renders blocks into a document.
///
/// # Example
///
/// ```
/// use mdocx::{Document, Renderer, parse_blocks};
/// use std::path::Path;
///
/// let mut doc = Document::new();
/// let renderer = Renderer::new();
/// renderer.configure(&mut doc);
/// let report = renderer.render(&mut doc, parse_blocks("# Hi\n- item"), Path::new("."));
/// assert_eq!(report.blocks, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Apply the body font to every named style, keeping the standard sizes.
    pub fn configure(&self, doc: &mut Document) {
        let defaults = StyleSheet::default();
        for style in defaults.iter() {
            doc.configure_style(style.id, &self.config.body_font, Some(style.size));
        }
    }

    /// Read, decode and render one markdown file.
    ///
    /// Image references resolve against the file's directory.
    pub fn render_file(&self, doc: &mut Document, path: &Path) -> Result<RenderReport> {
        let source = decode_source(&fs::read(path)?);
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        debug!(path = %path.display(), "rendering markdown");
        Ok(self.render(doc, BlockParser::new(&source), base_dir))
    }

    /// Render a block sequence.
    pub fn render<I>(&self, doc: &mut Document, blocks: I, base_dir: &Path) -> RenderReport
    where
        I: IntoIterator<Item = Block>,
    {
        let mut report = RenderReport::default();
        for block in blocks {
            report.blocks += 1;
            self.render_block(doc, block, base_dir, &mut report);
        }
        report
    }

    fn render_block(
        &self,
        doc: &mut Document,
        block: Block,
        base_dir: &Path,
        report: &mut RenderReport,
    ) {
        let body_font = self.config.body_font.as_str();
        match block {
            Block::Heading { level, text } => {
                doc.add_heading(&text, level).font(body_font);
            }
            Block::Paragraph { text } => self.add_text(doc, StyleId::Normal, text),
            Block::ListItem {
                kind: ListKind::Bullet,
                text,
            } => self.add_text(doc, StyleId::ListBullet, text),
            Block::ListItem {
                kind: ListKind::Numbered,
                text,
            } => self.add_text(doc, StyleId::ListNumber, text),
            Block::CodeLine { text } => {
                doc.add_paragraph(StyleId::Normal)
                    .add_run(text)
                    .font(&self.config.code_font)
                    .size(self.config.code_size);
            }
            Block::Blank => {
                doc.add_paragraph(StyleId::Normal);
            }
            Block::Table(table) => {
                self.add_table(doc, &table);
                report.tables += 1;
            }
            Block::Image { path, line } => {
                if self.add_image(doc, &path, base_dir) {
                    report.images += 1;
                } else {
                    self.add_text(doc, StyleId::Normal, line);
                    report.unresolved_images.push(path);
                }
            }
        }
    }

    fn add_text(&self, doc: &mut Document, style: StyleId, text: String) {
        doc.add_paragraph(style)
            .add_run(text)
            .font(&self.config.body_font);
    }

    /// Header row plus body rows; extra body cells are dropped, missing ones stay empty.
    fn add_table(&self, doc: &mut Document, table: &Table) {
        let grid = doc.add_table(table.row_count(), table.column_count());
        let rows = std::iter::once(&table.header).chain(&table.body);
        for (r, row) in rows.enumerate() {
            for (c, value) in row.iter().enumerate() {
                let mut run = Run::new(value.as_str());
                run.font(&self.config.body_font).size(self.config.body_size);
                grid.set_cell(r, c, run);
            }
        }
    }

    /// Try to embed an image; `false` means the caller should fall back to text.
    fn add_image(&self, doc: &mut Document, rel: &str, base_dir: &Path) -> bool {
        let Some(resolved) = self.config.resolver.resolve(base_dir, rel) else {
            warn!(image = rel, "image not found, keeping literal line");
            return false;
        };

        match doc.add_picture(&resolved, self.config.image_width) {
            Ok(()) => true,
            Err(e) => {
                warn!(image = rel, error = %e, "image not embeddable, keeping literal line");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{BodyElement, Paragraph};
    use crate::markdown::parse_blocks;
    use crate::util::png_header;
    use tempfile::TempDir;

    fn render(source: &str, base_dir: &Path) -> (Document, RenderReport) {
        let mut doc = Document::new();
        let renderer = Renderer::new();
        renderer.configure(&mut doc);
        let report = renderer.render(&mut doc, parse_blocks(source), base_dir);
        (doc, report)
    }

    fn paragraph(element: &BodyElement) -> &Paragraph {
        match element {
            BodyElement::Paragraph(paragraph) => paragraph,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_styles_per_block_kind() {
        let (doc, report) = render("# H1\n## H2\n### H3\n- bullet\n1. numbered\ntext", Path::new("."));
        assert_eq!(report.blocks, 6);
        let styles: Vec<StyleId> = doc.body().iter().map(|e| paragraph(e).style).collect();
        assert_eq!(
            styles,
            vec![
                StyleId::Heading1,
                StyleId::Heading2,
                StyleId::Heading3,
                StyleId::ListBullet,
                StyleId::ListNumber,
                StyleId::Normal,
            ]
        );
    }

    #[test]
    fn test_every_run_has_a_font() {
        let (doc, _) = render("# 제목\n본문\n- 항목\n```\ncode\n```", Path::new("."));
        for element in doc.body() {
            for run in &paragraph(element).runs {
                assert!(run.font.is_some(), "run without font: {run:?}");
            }
        }
    }

    #[test]
    fn test_code_line_font_and_size() {
        let (doc, _) = render("```\n  let x = 1;\n```", Path::new("."));
        let run = &paragraph(&doc.body()[0]).runs[0];
        assert_eq!(run.text, "  let x = 1;");
        assert_eq!(run.font.as_deref(), Some("Consolas"));
        assert_eq!(run.size, Some(Pt(9.0)));
    }

    #[test]
    fn test_blank_line_is_empty_paragraph() {
        let (doc, _) = render("a\n\nb", Path::new("."));
        assert_eq!(doc.body().len(), 3);
        assert!(paragraph(&doc.body()[1]).runs.is_empty());
    }

    #[test]
    fn test_configure_sets_style_fonts() {
        let (doc, _) = render("", Path::new("."));
        let heading = doc.styles().get(StyleId::Heading3).unwrap();
        assert_eq!(heading.font, DEFAULT_FONT);
        assert_eq!(heading.size, Pt(11.5));
    }

    #[test]
    fn test_table_mismatch_pads_and_truncates() {
        let source = "| A | B |\n|---|---|\n| 1 | 2 | 3 |\n| only |";
        let (doc, report) = render(source, Path::new("."));
        assert_eq!(report.tables, 1);

        let BodyElement::Table(grid) = &doc.body()[0] else {
            panic!("expected table");
        };
        assert_eq!((grid.rows(), grid.cols()), (3, 2));
        assert_eq!(grid.cell(0, 1).map(|r| r.text.as_str()), Some("B"));
        assert_eq!(grid.cell(1, 1).map(|r| r.text.as_str()), Some("2"));
        assert_eq!(grid.cell(2, 0).map(|r| r.text.as_str()), Some("only"));
        assert_eq!(grid.cell(2, 1), None);
        assert_eq!(grid.cell(0, 0).and_then(|r| r.size), Some(Pt(10.5)));
    }

    #[test]
    fn test_missing_image_falls_back_to_literal_line() {
        let dir = TempDir::new().unwrap();
        let (doc, report) = render("  ![Arch](assets/missing.svg)  ", dir.path());
        assert_eq!(report.images, 0);
        assert_eq!(report.unresolved_images, vec!["assets/missing.svg"]);
        assert_eq!(paragraph(&doc.body()[0]).text(), "![Arch](assets/missing.svg)");
    }

    #[test]
    fn test_svg_with_png_sibling_is_embedded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/d.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("assets/d.png"), png_header(630, 315)).unwrap();

        let (doc, report) = render("![D](assets/d.svg)", dir.path());
        assert_eq!(report.images, 1);
        assert!(report.unresolved_images.is_empty());
        let BodyElement::Picture(picture) = &doc.body()[0] else {
            panic!("expected picture");
        };
        assert_eq!(picture.width, Emu::from_inches(6.3));
        assert_eq!(picture.height, Emu(5_760_720 / 2));
        assert!(picture.name.ends_with(".png"));
    }

    #[test]
    fn test_bare_svg_degrades_to_text() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.svg"), "<svg/>").unwrap();

        let (doc, report) = render("![O](only.svg)", dir.path());
        assert_eq!(report.unresolved_images, vec!["only.svg"]);
        assert_eq!(paragraph(&doc.body()[0]).text(), "![O](only.svg)");
    }

    #[test]
    fn test_render_file_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, b"\xEF\xBB\xBF# Title\r\nbody\r\n").unwrap();

        let mut doc = Document::new();
        let report = Renderer::new().render_file(&mut doc, &path).unwrap();
        assert_eq!(report.blocks, 2);
        assert_eq!(paragraph(&doc.body()[0]).style, StyleId::Heading1);
        assert_eq!(paragraph(&doc.body()[0]).text(), "Title");
    }

    #[test]
    fn test_report_merge() {
        let mut total = RenderReport {
            blocks: 1,
            ..RenderReport::default()
        };
        total.merge(RenderReport {
            blocks: 2,
            images: 1,
            tables: 0,
            unresolved_images: vec!["x.png".to_string()],
        });
        assert_eq!(total.blocks, 3);
        assert_eq!(total.images, 1);
        assert_eq!(total.unresolved_images, vec!["x.png"]);
    }
}
