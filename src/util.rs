//! Source decoding and media sniffing helpers.

use std::borrow::Cow;

// ============================================================================
// Source Decoding
// ============================================================================

/// Decode markdown bytes into normalized text.
///
/// This function:
/// 1. Decodes as UTF-8, stripping a byte-order mark (via encoding_rs)
/// 2. Replaces malformed sequences with U+FFFD instead of failing
/// 3. Normalizes `\r\n` and lone `\r` line endings to `\n`
///
/// # Examples
///
/// ```
/// use mdocx::decode_source;
///
/// assert_eq!(decode_source(b"\xEF\xBB\xBF# Title\r\nbody"), "# Title\nbody");
/// ```
pub fn decode_source(bytes: &[u8]) -> String {
    let (text, _encoding, _malformed) = encoding_rs::UTF_8.decode(bytes);
    normalize_source(&text).into_owned()
}

/// Normalize already-decoded text: strip a leading BOM and unify line endings.
///
/// Uses `Cow<str>` to avoid allocation when the input is already normalized.
pub fn normalize_source(text: &str) -> Cow<'_, str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

// ============================================================================
// Image Dimensions
// ============================================================================

/// Extract pixel dimensions from raster image data.
///
/// Supports PNG (IHDR chunk), JPEG (SOF markers) and GIF (logical screen
/// descriptor). Returns `None` for anything else, including SVG.
pub fn extract_image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 10 {
        return None;
    }

    // PNG: width/height at bytes 16-23 in IHDR chunk
    if data.len() >= 24 && data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((width, height));
    }

    if data[0] == 0xFF && data[1] == 0xD8 {
        return extract_jpeg_dimensions(data);
    }

    // GIF: width/height at bytes 6-9 (little-endian)
    if data.starts_with(b"GIF") {
        let width = u16::from_le_bytes([data[6], data[7]]) as u32;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((width, height));
    }

    None
}

/// Extract dimensions from JPEG data by parsing SOF markers.
fn extract_jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // SOF0-SOF15, excluding DHT (C4), JPG (C8) and DAC (CC)
        if matches!(
            marker,
            0xC0 | 0xC1
                | 0xC2
                | 0xC3
                | 0xC5
                | 0xC6
                | 0xC7
                | 0xC9
                | 0xCA
                | 0xCB
                | 0xCD
                | 0xCE
                | 0xCF
        ) && i + 9 < data.len()
        {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length;
    }
    None
}

// ============================================================================
// Media Format Detection
// ============================================================================

/// Image formats that can appear in markdown image references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Jpeg,
    Png,
    Gif,
    /// Vector image; Word cannot measure it, see [`crate::ImageResolver`].
    Svg,
    WebP,
    Binary,
}

impl MediaFormat {
    /// MIME type used in `[Content_Types].xml`.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Png => "image/png",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Svg => "image/svg+xml",
            MediaFormat::WebP => "image/webp",
            MediaFormat::Binary => "application/octet-stream",
        }
    }

    /// Canonical file extension for parts stored under `word/media/`.
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Png => "png",
            MediaFormat::Gif => "gif",
            MediaFormat::Svg => "svg",
            MediaFormat::WebP => "webp",
            MediaFormat::Binary => "bin",
        }
    }

    /// Whether the format is a raster format Word can embed directly.
    pub fn is_raster(self) -> bool {
        matches!(
            self,
            MediaFormat::Jpeg | MediaFormat::Png | MediaFormat::Gif
        )
    }
}

/// Detect image format from file path and/or raw bytes.
///
/// Tries extension-based detection first, then falls back to magic bytes.
pub fn detect_media_format(path: &str, data: &[u8]) -> MediaFormat {
    let path_lower = path.to_lowercase();

    if path_lower.ends_with(".jpg") || path_lower.ends_with(".jpeg") {
        return MediaFormat::Jpeg;
    }
    if path_lower.ends_with(".png") {
        return MediaFormat::Png;
    }
    if path_lower.ends_with(".gif") {
        return MediaFormat::Gif;
    }
    if path_lower.ends_with(".svg") {
        return MediaFormat::Svg;
    }
    if path_lower.ends_with(".webp") {
        return MediaFormat::WebP;
    }

    if data.len() >= 4 {
        if data[0] == 0xFF && data[1] == 0xD8 {
            return MediaFormat::Jpeg;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return MediaFormat::Png;
        }
        if data.starts_with(b"GIF") {
            return MediaFormat::Gif;
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return MediaFormat::WebP;
        }
    }

    MediaFormat::Binary
}

#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data
}

// ============================================================================
// Tests
// ============================================================================
