//! Minimal WordprocessingML (DOCX) writer.
//!
//! Provides just the document-construction surface the renderer needs:
//! named styles, headings, paragraphs of runs, grid tables, inline
//! pictures and page breaks. The package is a ZIP of XML parts, written the
//! same way the EPUB container is: deflated parts through [`ZipWriter`].
//!
//! # Example
//!
//! ```no_run
//! use mdocx::docx::{Document, StyleId};
//!
//! let mut doc = Document::new();
//! doc.add_heading("Report", 1);
//! doc.add_paragraph(StyleId::Normal).add_run("Hello").font("Malgun Gothic");
//! doc.save("report.docx")?;
//! # Ok::<(), mdocx::Error>(())
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::util::{MediaFormat, detect_media_format, extract_image_dimensions};

mod styles;
mod xml;

pub use styles::{DEFAULT_FONT, Emu, Pt, StyleDef, StyleId, StyleSheet};

/// Page geometry in twentieths of a point (twips).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for PageSetup {
    /// US Letter with one-inch margins (6.5in usable width).
    fn default() -> Self {
        Self {
            width: 12_240,
            height: 15_840,
            margin: 1_440,
        }
    }
}

impl PageSetup {
    /// Width between the left and right margins, in twips.
    pub fn usable_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.margin)
    }
}

/// Configuration for DOCX packaging.
#[derive(Debug, Clone, Default)]
pub struct DocxConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    pub page: PageSetup,
}

/// A run of text with uniform formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    /// Applied to the ASCII, high-ANSI, East-Asian and complex-script slots alike.
    pub font: Option<String>,
    pub size: Option<Pt>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            size: None,
        }
    }

    pub fn font(&mut self, name: &str) -> &mut Self {
        self.font = Some(name.to_string());
        self
    }

    pub fn size(&mut self, size: Pt) -> &mut Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: StyleId,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run::new(text));
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A fixed-size grid table. Cells start empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Run>>,
}

impl TableGrid {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Set a cell's run. Returns `false` (and ignores the run) when the
    /// position lies outside the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, run: Run) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = Some(run);
        true
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Run> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col].as_ref()
    }
}

/// An inline picture referencing an embedded media part.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub rel_id: String,
    pub name: String,
    pub width: Emu,
    pub height: Emu,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(TableGrid),
    Picture(Picture),
    PageBreak,
}

/// An embedded image stored under `word/media/`.
#[derive(Debug, Clone)]
struct Media {
    rel_id: String,
    file_name: String,
    format: MediaFormat,
    data: Vec<u8>,
    dimensions: (u32, u32),
}

/// A word-processing document under construction.
#[derive(Debug, Clone, Default)]
pub struct Document {
    config: DocxConfig,
    styles: StyleSheet,
    title: Option<String>,
    body: Vec<BodyElement>,
    media: Vec<Media>,
    media_by_path: HashMap<PathBuf, usize>,
}

impl Document {
    /// Create an empty document with the default style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure packaging and page setup.
    pub fn with_config(mut self, config: DocxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Set the font (and optionally size) of a named style.
    pub fn configure_style(&mut self, id: StyleId, font: &str, size: Option<Pt>) {
        self.styles.configure(id, font, size);
    }

    /// Set the core-properties title.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn body(&self) -> &[BodyElement] {
        &self.body
    }

    /// Append an empty paragraph in the given style.
    pub fn add_paragraph(&mut self, style: StyleId) -> &mut Paragraph {
        self.body.push(BodyElement::Paragraph(Paragraph {
            style,
            runs: Vec::new(),
        }));
        match self.body.last_mut() {
            Some(BodyElement::Paragraph(paragraph)) => paragraph,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    /// Append a heading paragraph holding one run of `text`.
    pub fn add_heading(&mut self, text: &str, level: u8) -> &mut Run {
        self.add_paragraph(StyleId::heading(level)).add_run(text)
    }

    /// Append a `rows` × `cols` table in the grid style.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut TableGrid {
        self.body.push(BodyElement::Table(TableGrid::new(rows, cols)));
        match self.body.last_mut() {
            Some(BodyElement::Table(table)) => table,
            _ => unreachable!("a table was just pushed"),
        }
    }

    pub fn add_page_break(&mut self) {
        self.body.push(BodyElement::PageBreak);
    }

    /// Embed a raster image at `width`, keeping its aspect ratio.
    ///
    /// The same file embedded twice shares one media part. Fails with
    /// [`Error::UnsupportedImage`] when the pixel size cannot be read.
    pub fn add_picture(&mut self, path: &Path, width: Emu) -> Result<()> {
        let index = match self.media_by_path.get(path) {
            Some(&index) => index,
            None => {
                let index = self.load_media(path)?;
                self.media_by_path.insert(path.to_path_buf(), index);
                index
            }
        };

        let media = &self.media[index];
        let (width_px, height_px) = media.dimensions;
        let height = width
            .scaled(width_px, height_px)
            .ok_or_else(|| Error::UnsupportedImage(path.to_path_buf()))?;

        self.body.push(BodyElement::Picture(Picture {
            rel_id: media.rel_id.clone(),
            name: media.file_name.clone(),
            width,
            height,
        }));
        Ok(())
    }

    fn load_media(&mut self, path: &Path) -> Result<usize> {
        let data = fs::read(path)?;
        let format = detect_media_format(&path.to_string_lossy(), &data);
        let dimensions = extract_image_dimensions(&data)
            .filter(|&(w, h)| format.is_raster() && w > 0 && h > 0)
            .ok_or_else(|| Error::UnsupportedImage(path.to_path_buf()))?;

        let number = self.media.len() + 1;
        self.media.push(Media {
            rel_id: format!("rIdImage{number}"),
            file_name: format!("image{number}.{}", format.extension()),
            format,
            data,
            dimensions,
        });
        Ok(self.media.len() - 1)
    }

    /// Number of embedded media parts.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Write the package to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the package to any `Write + Seek` destination.
    pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let compression_level = self.config.compression_level.unwrap_or(6);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        // 1. Package-level parts
        let extensions: Vec<(&str, &str)> = self
            .media
            .iter()
            .map(|media| (media.format.extension(), media.format.mime_type()))
            .collect();
        zip.start_file("[Content_Types].xml", deflated)?;
        zip.write_all(&xml::content_types(&extensions)?)?;

        zip.start_file("_rels/.rels", deflated)?;
        zip.write_all(xml::PACKAGE_RELS)?;

        zip.start_file("docProps/core.xml", deflated)?;
        zip.write_all(&xml::core_properties(self.title.as_deref())?)?;

        // 2. Document part and its relationships
        let images: Vec<(&str, &str)> = self
            .media
            .iter()
            .map(|media| (media.rel_id.as_str(), media.file_name.as_str()))
            .collect();
        zip.start_file("word/_rels/document.xml.rels", deflated)?;
        zip.write_all(&xml::document_rels(&images)?)?;

        zip.start_file("word/document.xml", deflated)?;
        zip.write_all(&xml::document(&self.body, &self.config.page)?)?;

        zip.start_file("word/styles.xml", deflated)?;
        zip.write_all(&xml::styles(&self.styles)?)?;

        zip.start_file("word/numbering.xml", deflated)?;
        zip.write_all(&xml::numbering()?)?;

        // 3. Media (already compressed formats are stored)
        for media in &self.media {
            let zip_path = format!("word/media/{}", media.file_name);
            zip.start_file(&zip_path, stored)?;
            zip.write_all(&media.data)?;
        }

        zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::png_header;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    fn package(doc: &Document) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        doc.write_to(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_package_has_required_parts() {
        let doc = Document::new();
        let bytes = package(&doc);
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.contains(&required), "missing {required}");
        }
    }

    #[test]
    fn test_runs_set_east_asian_font() {
        let mut doc = Document::new();
        doc.add_paragraph(StyleId::Normal)
            .add_run("본문 text")
            .font("Malgun Gothic")
            .size(Pt(10.5));
        let xml = part(&package(&doc), "word/document.xml");
        assert!(xml.contains(r#"w:eastAsia="Malgun Gothic""#));
        assert!(xml.contains(r#"w:ascii="Malgun Gothic""#));
        assert!(xml.contains(r#"<w:sz w:val="21"/>"#));
        assert!(xml.contains("본문 text"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new();
        doc.add_paragraph(StyleId::Normal).add_run("a < b & c");
        let xml = part(&package(&doc), "word/document.xml");
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_table_out_of_range_cells_are_ignored() {
        let mut doc = Document::new();
        let table = doc.add_table(2, 2);
        assert!(table.set_cell(1, 1, Run::new("x")));
        assert!(!table.set_cell(1, 2, Run::new("extra")));
        assert!(!table.set_cell(2, 0, Run::new("extra")));
        assert_eq!(table.cell(1, 1).map(|run| run.text.as_str()), Some("x"));
        assert_eq!(table.cell(0, 0), None);

        let xml = part(&package(&doc), "word/document.xml");
        assert_eq!(xml.matches("<w:tc>").count(), 4);
        assert!(!xml.contains("extra"));
    }

    #[test]
    fn test_picture_keeps_aspect_ratio_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        fs::write(&path, png_header(400, 100)).unwrap();

        let mut doc = Document::new();
        doc.add_picture(&path, Emu(4000)).unwrap();
        doc.add_picture(&path, Emu(4000)).unwrap();
        assert_eq!(doc.media_count(), 1);

        let BodyElement::Picture(picture) = &doc.body()[0] else {
            panic!("expected a picture");
        };
        assert_eq!(picture.height, Emu(1000));

        let bytes = package(&doc);
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="media/image1.png""#));
        let types = part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"Extension="png""#));
    }

    #[test]
    fn test_svg_picture_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.svg");
        fs::write(&path, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        let mut doc = Document::new();
        let err = doc.add_picture(&path, Emu(4000)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedImage(_)));
        assert!(doc.body().is_empty());
        assert_eq!(doc.media_count(), 0);
    }

    #[test]
    fn test_page_break_and_title() {
        let mut doc = Document::new();
        doc.set_title("Bundle");
        doc.add_page_break();
        let bytes = package(&doc);
        assert!(part(&bytes, "word/document.xml").contains(r#"<w:br w:type="page"/>"#));
        assert!(part(&bytes, "docProps/core.xml").contains("<dc:title>Bundle</dc:title>"));
    }

    #[test]
    fn test_styles_part_reflects_configuration() {
        let mut doc = Document::new();
        doc.configure_style(StyleId::Heading1, "Batang", Some(Pt(18.0)));
        let xml = part(&package(&doc), "word/styles.xml");
        assert!(xml.contains(r#"w:styleId="Heading1""#));
        assert!(xml.contains(r#"w:eastAsia="Batang""#));
        assert!(xml.contains(r#"<w:sz w:val="36"/>"#));
        assert!(xml.contains(r#"w:styleId="TableGrid""#));
    }
}
