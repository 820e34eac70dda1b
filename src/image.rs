//! Image reference resolution.
//!
//! Markdown reports usually reference SVG diagrams, which Word cannot embed
//! at a measured size. When a raster sibling (`diagram.png` next to
//! `diagram.svg`) exists, the resolver substitutes it.

use std::path::{Path, PathBuf};

/// Resolves image references relative to the referencing document.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    /// Extensions treated as vector formats (compared case-insensitively).
    pub vector_extensions: Vec<String>,
    /// Raster extensions tried, in order, as siblings of a vector image.
    pub raster_fallbacks: Vec<String>,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self {
            vector_extensions: vec!["svg".to_string()],
            raster_fallbacks: vec!["png".to_string()],
        }
    }
}

impl ImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `rel` against `base_dir`.
    ///
    /// Returns the raster sibling of a vector image when one exists, else the
    /// candidate itself if it exists, else `None`.
    pub fn resolve(&self, base_dir: &Path, rel: &str) -> Option<PathBuf> {
        let joined = base_dir.join(rel);
        let candidate = std::path::absolute(&joined).unwrap_or(joined);

        if self.is_vector(&candidate) {
            let sibling = self
                .raster_fallbacks
                .iter()
                .map(|ext| candidate.with_extension(ext))
                .find(|path| path.exists());
            if sibling.is_some() {
                return sibling;
            }
        }

        candidate.exists().then_some(candidate)
    }

    fn is_vector(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.vector_extensions
            .iter()
            .any(|vector| vector.eq_ignore_ascii_case(ext))
    }
}

/// Resolve with the default SVG → PNG policy.
pub fn resolve_image(base_dir: &Path, rel: &str) -> Option<PathBuf> {
    ImageResolver::default().resolve(base_dir, rel)
}
