//! Single-file and multi-file DOCX builds.
//!
//! A bundle concatenates several markdown sources into one document: an
//! optional title heading first, then each source in order, separated by
//! page breaks. Every source resolves its images against its own directory.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::docx::{DocxConfig, Document};
use crate::error::{Error, Result};
use crate::render::{RenderConfig, RenderReport, Renderer};

/// Configuration shared by single and bundle builds.
#[derive(Debug, Clone, Default)]
pub struct BundleConfig {
    pub render: RenderConfig,
    pub docx: DocxConfig,
}

/// Builder for a multi-source document.
///
/// # Example
///
/// ```no_run
/// use mdocx::Bundle;
///
/// let report = Bundle::new()
///     .with_title("Network Reports")
///     .source("TeamShare/README.md")
///     .source("ExecutiveSummary/README.md")
///     .build("reports.docx")?;
/// println!("{} images embedded", report.images);
/// # Ok::<(), mdocx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    title: Option<String>,
    sources: Vec<PathBuf>,
    config: BundleConfig,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `title` as a level-1 heading before the first source.
    ///
    /// The title is also stored as the document's core title property. A
    /// blank title is ignored.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_config(mut self, config: BundleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    pub fn sources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Render every source into an in-memory document.
    ///
    /// Fails with [`Error::Usage`] when no source was given, and with
    /// [`Error::Io`] on the first unreadable source.
    pub fn build_document(&self) -> Result<(Document, RenderReport)> {
        if self.sources.is_empty() {
            return Err(Error::Usage("at least one input file is required".into()));
        }

        let renderer = Renderer::new().with_config(self.config.render.clone());
        let mut doc = Document::new().with_config(self.config.docx.clone());
        renderer.configure(&mut doc);

        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            doc.set_title(title);
            doc.add_heading(title, 1).font(&renderer.config().body_font);
        }

        let mut report = RenderReport::default();
        for (index, source) in self.sources.iter().enumerate() {
            if index > 0 {
                doc.add_page_break();
            }
            report.merge(renderer.render_file(&mut doc, source)?);
        }

        Ok((doc, report))
    }

    /// Render and save to `output`. Nothing is written if any source fails.
    pub fn build(&self, output: impl AsRef<Path>) -> Result<RenderReport> {
        let output = output.as_ref();
        let (doc, report) = self.build_document()?;
        doc.save(output)?;
        log_report(output, &report);
        Ok(report)
    }
}

/// Convert one markdown file to DOCX.
pub fn build_single(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RenderReport> {
    Bundle::new().source(input.as_ref()).build(output)
}

/// Concatenate several markdown files into one DOCX.
pub fn build_bundle<I, P>(inputs: I, output: impl AsRef<Path>, title: Option<&str>) -> Result<RenderReport>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut bundle = Bundle::new().sources(inputs);
    if let Some(title) = title {
        bundle = bundle.with_title(title);
    }
    bundle.build(output)
}

fn log_report(output: &Path, report: &RenderReport) {
    info!(
        output = %output.display(),
        blocks = report.blocks,
        images = report.images,
        tables = report.tables,
        "wrote docx"
    );
    if !report.unresolved_images.is_empty() {
        warn!(
            count = report.unresolved_images.len(),
            "some images were kept as literal text"
        );
    }
}
