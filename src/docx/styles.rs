//! Units and the named paragraph styles of a generated document.

/// A font size in points. Serialized as half-points (`w:sz`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pt(pub f32);

impl Pt {
    pub fn half_points(self) -> u32 {
        (self.0 * 2.0).round() as u32
    }
}

/// English Metric Units, the DrawingML length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Emu(pub u64);

impl Emu {
    pub const PER_INCH: u64 = 914_400;

    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * Self::PER_INCH as f64).round() as u64)
    }

    /// Scale to a height that keeps a `width_px` × `height_px` aspect ratio.
    pub fn scaled(self, width_px: u32, height_px: u32) -> Option<Emu> {
        if width_px == 0 || height_px == 0 {
            return None;
        }
        Some(Emu(self.0 * height_px as u64 / width_px as u64))
    }
}

/// Paragraph styles the renderer can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    Normal,
    Title,
    Heading1,
    Heading2,
    Heading3,
    ListBullet,
    ListNumber,
}

impl StyleId {
    pub const ALL: [StyleId; 7] = [
        StyleId::Normal,
        StyleId::Title,
        StyleId::Heading1,
        StyleId::Heading2,
        StyleId::Heading3,
        StyleId::ListBullet,
        StyleId::ListNumber,
    ];

    /// Heading style for a level; level 0 is the title. Deeper levels clamp to 3.
    pub fn heading(level: u8) -> StyleId {
        match level {
            0 => StyleId::Title,
            1 => StyleId::Heading1,
            2 => StyleId::Heading2,
            _ => StyleId::Heading3,
        }
    }

    /// The `w:styleId` attribute.
    pub fn id(self) -> &'static str {
        match self {
            StyleId::Normal => "Normal",
            StyleId::Title => "Title",
            StyleId::Heading1 => "Heading1",
            StyleId::Heading2 => "Heading2",
            StyleId::Heading3 => "Heading3",
            StyleId::ListBullet => "ListBullet",
            StyleId::ListNumber => "ListNumber",
        }
    }

    /// The display name Word shows (built-in names are lowercase for headings).
    pub fn name(self) -> &'static str {
        match self {
            StyleId::Normal => "Normal",
            StyleId::Title => "Title",
            StyleId::Heading1 => "heading 1",
            StyleId::Heading2 => "heading 2",
            StyleId::Heading3 => "heading 3",
            StyleId::ListBullet => "List Bullet",
            StyleId::ListNumber => "List Number",
        }
    }

    pub(crate) fn outline_level(self) -> Option<u8> {
        match self {
            StyleId::Heading1 => Some(0),
            StyleId::Heading2 => Some(1),
            StyleId::Heading3 => Some(2),
            _ => None,
        }
    }

    /// `w:numId` from numbering.xml for list styles.
    pub(crate) fn numbering_id(self) -> Option<u32> {
        match self {
            StyleId::ListBullet => Some(1),
            StyleId::ListNumber => Some(2),
            _ => None,
        }
    }

    pub(crate) fn is_bold(self) -> bool {
        matches!(
            self,
            StyleId::Title | StyleId::Heading1 | StyleId::Heading2 | StyleId::Heading3
        )
    }
}

/// Font and size of one named style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDef {
    pub id: StyleId,
    pub font: String,
    pub size: Pt,
}

/// The set of named styles written to `word/styles.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    styles: Vec<StyleDef>,
}

/// Body font able to render Hangul and Latin glyphs.
pub const DEFAULT_FONT: &str = "Malgun Gothic";

impl Default for StyleSheet {
    fn default() -> Self {
        let sizes = [
            (StyleId::Normal, 10.5),
            (StyleId::Title, 20.0),
            (StyleId::Heading1, 16.0),
            (StyleId::Heading2, 13.0),
            (StyleId::Heading3, 11.5),
            (StyleId::ListBullet, 10.5),
            (StyleId::ListNumber, 10.5),
        ];
        Self {
            styles: sizes
                .into_iter()
                .map(|(id, size)| StyleDef {
                    id,
                    font: DEFAULT_FONT.to_string(),
                    size: Pt(size),
                })
                .collect(),
        }
    }
}

impl StyleSheet {
    pub fn get(&self, id: StyleId) -> Option<&StyleDef> {
        self.styles.iter().find(|style| style.id == id)
    }

    /// Set font and (optionally) size of a named style.
    pub fn configure(&mut self, id: StyleId, font: &str, size: Option<Pt>) {
        match self.styles.iter_mut().find(|style| style.id == id) {
            Some(style) => {
                style.font = font.to_string();
                if let Some(size) = size {
                    style.size = size;
                }
            }
            None => self.styles.push(StyleDef {
                id,
                font: font.to_string(),
                size: size.unwrap_or(Pt(10.5)),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDef> {
        self.styles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let sheet = StyleSheet::default();
        let size = |id| sheet.get(id).unwrap().size.half_points();
        assert_eq!(size(StyleId::Normal), 21);
        assert_eq!(size(StyleId::Title), 40);
        assert_eq!(size(StyleId::Heading1), 32);
        assert_eq!(size(StyleId::Heading2), 26);
        assert_eq!(size(StyleId::Heading3), 23);
        assert_eq!(size(StyleId::ListBullet), 21);
        assert_eq!(size(StyleId::ListNumber), 21);
        assert!(sheet.iter().all(|style| style.font == DEFAULT_FONT));
    }

    #[test]
    fn test_configure_keeps_size_when_omitted() {
        let mut sheet = StyleSheet::default();
        sheet.configure(StyleId::Heading2, "Noto Sans KR", None);
        let style = sheet.get(StyleId::Heading2).unwrap();
        assert_eq!(style.font, "Noto Sans KR");
        assert_eq!(style.size, Pt(13.0));
    }

    #[test]
    fn test_emu() {
        assert_eq!(Emu::from_inches(6.3), Emu(5_760_720));
        assert_eq!(Emu(1000).scaled(200, 100), Some(Emu(500)));
        assert_eq!(Emu(1000).scaled(0, 100), None);
    }

    #[test]
    fn test_heading_styles() {
        assert_eq!(StyleId::heading(0), StyleId::Title);
        assert_eq!(StyleId::heading(3), StyleId::Heading3);
        assert_eq!(StyleId::heading(7), StyleId::Heading3);
        assert_eq!(StyleId::Heading1.name(), "heading 1");
    }
}
