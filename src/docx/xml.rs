//! XML part generation for the DOCX package.

use std::borrow::Cow;
use std::collections::BTreeMap;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::styles::{StyleDef, StyleId, StyleSheet};
use super::{BodyElement, PageSetup, Paragraph, Picture, Run, TableGrid};
use crate::error::Result;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Package relationships: the main document and core properties.
pub(super) const PACKAGE_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>
"#;

/// Thin event-level wrapper over [`quick_xml::Writer`].
struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name attrs>text</name>`
    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Drop characters XML 1.0 cannot carry: control characters other than
/// tab and newline, and the noncharacters U+FFFE and U+FFFF.
fn xml_safe(text: &str) -> Cow<'_, str> {
    let invalid = |c: char| {
        (c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
            || matches!(c, '\u{FFFE}' | '\u{FFFF}')
    };
    if !text.contains(invalid) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|&c| !invalid(c)).collect())
}

// ============================================================================
// Package parts
// ============================================================================

/// `[Content_Types].xml` with one default per media extension.
pub(super) fn content_types(media: &[(&str, &str)]) -> Result<Vec<u8>> {
    const MAIN: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";
    let overrides = [
        ("/word/document.xml", format!("{MAIN}.document.main+xml")),
        ("/word/styles.xml", format!("{MAIN}.styles+xml")),
        ("/word/numbering.xml", format!("{MAIN}.numbering+xml")),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
    ];
    let defaults: BTreeMap<&str, &str> = media.iter().copied().collect();

    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (extension, mime) in defaults {
        xml.empty(
            "Default",
            &[("Extension", extension), ("ContentType", mime)],
        )?;
    }
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", *part), ("ContentType", content_type.as_str())],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

/// `docProps/core.xml`.
pub(super) fn core_properties(title: Option<&str>) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
        ],
    )?;
    if let Some(title) = title {
        xml.leaf("dc:title", &[], &xml_safe(title))?;
    }
    xml.leaf("dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// `word/_rels/document.xml.rels`: styles, numbering and one entry per image.
pub(super) fn document_rels(images: &[(&str, &str)]) -> Result<Vec<u8>> {
    let styles_type = format!("{REL_TYPE}/styles");
    let numbering_type = format!("{REL_TYPE}/numbering");
    let image_type = format!("{REL_TYPE}/image");

    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_RELS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rIdStyles"),
            ("Type", styles_type.as_str()),
            ("Target", "styles.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rIdNumbering"),
            ("Type", numbering_type.as_str()),
            ("Target", "numbering.xml"),
        ],
    )?;
    for &(rel_id, file_name) in images {
        let target = format!("media/{file_name}");
        xml.empty(
            "Relationship",
            &[("Id", rel_id), ("Type", image_type.as_str()), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

// ============================================================================
// word/document.xml
// ============================================================================

pub(super) fn document(body: &[BodyElement], page: &PageSetup) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "w:document",
        &[
            ("xmlns:w", NS_W),
            ("xmlns:r", NS_R),
            ("xmlns:wp", NS_WP),
            ("xmlns:a", NS_A),
            ("xmlns:pic", NS_PIC),
        ],
    )?;
    xml.start("w:body", &[])?;

    let mut drawing_id = 0;
    for element in body {
        match element {
            BodyElement::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph)?,
            BodyElement::Table(table) => write_table(&mut xml, table, page)?,
            BodyElement::Picture(picture) => {
                drawing_id += 1;
                write_picture(&mut xml, picture, drawing_id)?;
            }
            BodyElement::PageBreak => {
                xml.start("w:p", &[])?;
                xml.start("w:r", &[])?;
                xml.empty("w:br", &[("w:type", "page")])?;
                xml.end("w:r")?;
                xml.end("w:p")?;
            }
        }
    }

    let width = page.width.to_string();
    let height = page.height.to_string();
    let margin = page.margin.to_string();
    xml.start("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", margin.as_str()),
            ("w:right", margin.as_str()),
            ("w:bottom", margin.as_str()),
            ("w:left", margin.as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn write_paragraph(xml: &mut XmlBuilder, paragraph: &Paragraph) -> Result<()> {
    xml.start("w:p", &[])?;
    if paragraph.style != StyleId::Normal {
        xml.start("w:pPr", &[])?;
        xml.empty("w:pStyle", &[("w:val", paragraph.style.id())])?;
        xml.end("w:pPr")?;
    }
    for run in &paragraph.runs {
        write_run(xml, run)?;
    }
    xml.end("w:p")
}

fn write_run(xml: &mut XmlBuilder, run: &Run) -> Result<()> {
    xml.start("w:r", &[])?;
    if run.font.is_some() || run.size.is_some() {
        xml.start("w:rPr", &[])?;
        if let Some(font) = &run.font {
            write_fonts(xml, font)?;
        }
        if let Some(size) = run.size {
            write_size(xml, size.half_points())?;
        }
        xml.end("w:rPr")?;
    }

    // Tabs need their own element; a literal tab in w:t renders as a space.
    let text = xml_safe(&run.text);
    for (i, segment) in text.split('\t').enumerate() {
        if i > 0 {
            xml.empty("w:tab", &[])?;
        }
        if !segment.is_empty() {
            xml.leaf("w:t", &[("xml:space", "preserve")], segment)?;
        }
    }
    xml.end("w:r")
}

/// The same font in every script slot, so mixed Latin/Hangul text picks one face.
fn write_fonts(xml: &mut XmlBuilder, font: &str) -> Result<()> {
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:eastAsia", font),
            ("w:cs", font),
        ],
    )
}

fn write_size(xml: &mut XmlBuilder, half_points: u32) -> Result<()> {
    let value = half_points.to_string();
    xml.empty("w:sz", &[("w:val", value.as_str())])?;
    xml.empty("w:szCs", &[("w:val", value.as_str())])
}

fn write_table(xml: &mut XmlBuilder, table: &TableGrid, page: &PageSetup) -> Result<()> {
    let column_width = (page.usable_width() / table.cols().max(1) as u32).to_string();

    xml.start("w:tbl", &[])?;
    xml.start("w:tblPr", &[])?;
    xml.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
    xml.empty("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    xml.empty("w:tblLook", &[("w:val", "04A0")])?;
    xml.end("w:tblPr")?;

    xml.start("w:tblGrid", &[])?;
    for _ in 0..table.cols() {
        xml.empty("w:gridCol", &[("w:w", column_width.as_str())])?;
    }
    xml.end("w:tblGrid")?;

    for row in 0..table.rows() {
        xml.start("w:tr", &[])?;
        for col in 0..table.cols() {
            xml.start("w:tc", &[])?;
            xml.start("w:tcPr", &[])?;
            xml.empty("w:tcW", &[("w:w", column_width.as_str()), ("w:type", "dxa")])?;
            xml.end("w:tcPr")?;
            // Every cell needs at least one paragraph, even when empty.
            xml.start("w:p", &[])?;
            if let Some(run) = table.cell(row, col) {
                write_run(xml, run)?;
            }
            xml.end("w:p")?;
            xml.end("w:tc")?;
        }
        xml.end("w:tr")?;
    }
    xml.end("w:tbl")
}

fn write_picture(xml: &mut XmlBuilder, picture: &Picture, drawing_id: usize) -> Result<()> {
    let cx = picture.width.0.to_string();
    let cy = picture.height.0.to_string();
    let id = drawing_id.to_string();
    let doc_name = format!("Picture {drawing_id}");

    xml.start("w:p", &[])?;
    xml.start("w:r", &[])?;
    xml.start("w:drawing", &[])?;
    xml.start(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.empty("wp:docPr", &[("id", id.as_str()), ("name", doc_name.as_str())])?;
    xml.start("wp:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.end("wp:cNvGraphicFramePr")?;

    xml.start("a:graphic", &[])?;
    xml.start("a:graphicData", &[("uri", NS_PIC)])?;
    xml.start("pic:pic", &[])?;

    xml.start("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &[("id", "0"), ("name", picture.name.as_str())])?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.end("pic:nvPicPr")?;

    xml.start("pic:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", picture.rel_id.as_str())])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("pic:blipFill")?;

    xml.start("pic:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.end("pic:spPr")?;

    xml.end("pic:pic")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;
    xml.end("wp:inline")?;
    xml.end("w:drawing")?;
    xml.end("w:r")?;
    xml.end("w:p")
}

// ============================================================================
// word/styles.xml and word/numbering.xml
// ============================================================================

pub(super) fn styles(sheet: &StyleSheet) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_W)])?;

    if let Some(normal) = sheet.get(StyleId::Normal) {
        xml.start("w:docDefaults", &[])?;
        xml.start("w:rPrDefault", &[])?;
        xml.start("w:rPr", &[])?;
        write_fonts(&mut xml, &normal.font)?;
        write_size(&mut xml, normal.size.half_points())?;
        xml.empty(
            "w:lang",
            &[("w:val", "en-US"), ("w:eastAsia", "ko-KR"), ("w:bidi", "ar-SA")],
        )?;
        xml.end("w:rPr")?;
        xml.end("w:rPrDefault")?;
        xml.end("w:docDefaults")?;
    }

    for style in sheet.iter() {
        write_style(&mut xml, style)?;
    }

    xml.start(
        "w:style",
        &[("w:type", "table"), ("w:styleId", "TableGrid")],
    )?;
    xml.empty("w:name", &[("w:val", "Table Grid")])?;
    xml.start("w:tblPr", &[])?;
    xml.start("w:tblBorders", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            edge,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "auto"),
            ],
        )?;
    }
    xml.end("w:tblBorders")?;
    xml.start("w:tblCellMar", &[])?;
    xml.empty("w:left", &[("w:w", "108"), ("w:type", "dxa")])?;
    xml.empty("w:right", &[("w:w", "108"), ("w:type", "dxa")])?;
    xml.end("w:tblCellMar")?;
    xml.end("w:tblPr")?;
    xml.end("w:style")?;

    xml.end("w:styles")?;
    Ok(xml.finish())
}

fn write_style(xml: &mut XmlBuilder, style: &StyleDef) -> Result<()> {
    let id = style.id;
    let mut attrs = vec![("w:type", "paragraph"), ("w:styleId", id.id())];
    if id == StyleId::Normal {
        attrs.push(("w:default", "1"));
    }
    xml.start("w:style", &attrs)?;
    xml.empty("w:name", &[("w:val", id.name())])?;
    if id != StyleId::Normal {
        xml.empty("w:basedOn", &[("w:val", "Normal")])?;
        xml.empty("w:next", &[("w:val", "Normal")])?;
    }
    xml.empty("w:qFormat", &[])?;

    let outline = id.outline_level().map(|level| level.to_string());
    let numbering = id.numbering_id().map(|num| num.to_string());
    if outline.is_some() || numbering.is_some() || id == StyleId::Title {
        xml.start("w:pPr", &[])?;
        if let Some(num_id) = &numbering {
            xml.start("w:numPr", &[])?;
            xml.empty("w:ilvl", &[("w:val", "0")])?;
            xml.empty("w:numId", &[("w:val", num_id.as_str())])?;
            xml.end("w:numPr")?;
        }
        if let Some(level) = &outline {
            xml.empty("w:keepNext", &[])?;
            xml.empty("w:spacing", &[("w:before", "240"), ("w:after", "60")])?;
            xml.empty("w:outlineLvl", &[("w:val", level.as_str())])?;
        }
        if id == StyleId::Title {
            xml.empty("w:spacing", &[("w:after", "300")])?;
        }
        xml.end("w:pPr")?;
    }

    xml.start("w:rPr", &[])?;
    write_fonts(xml, &style.font)?;
    if id.is_bold() {
        xml.empty("w:b", &[])?;
    }
    write_size(xml, style.size.half_points())?;
    xml.end("w:rPr")?;
    xml.end("w:style")
}

/// One bullet and one decimal single-level list definition.
pub(super) fn numbering() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:numbering", &[("xmlns:w", NS_W)])?;

    for (abstract_id, format, text) in [("0", "bullet", "\u{2022}"), ("1", "decimal", "%1.")] {
        xml.start("w:abstractNum", &[("w:abstractNumId", abstract_id)])?;
        xml.empty("w:multiLevelType", &[("w:val", "singleLevel")])?;
        xml.start("w:lvl", &[("w:ilvl", "0")])?;
        xml.empty("w:start", &[("w:val", "1")])?;
        xml.empty("w:numFmt", &[("w:val", format)])?;
        xml.empty("w:lvlText", &[("w:val", text)])?;
        xml.empty("w:lvlJc", &[("w:val", "left")])?;
        xml.start("w:pPr", &[])?;
        xml.empty("w:ind", &[("w:left", "360"), ("w:hanging", "360")])?;
        xml.end("w:pPr")?;
        xml.end("w:lvl")?;
        xml.end("w:abstractNum")?;
    }

    for (num_id, abstract_id) in [("1", "0"), ("2", "1")] {
        xml.start("w:num", &[("w:numId", num_id)])?;
        xml.empty("w:abstractNumId", &[("w:val", abstract_id)])?;
        xml.end("w:num")?;
    }

    xml.end("w:numbering")?;
    Ok(xml.finish())
}
