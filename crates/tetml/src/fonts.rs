//! Font table and style resolution.

use std::collections::HashMap;

/// Weight assumed when a font declares none or an unreadable one.
pub const DEFAULT_WEIGHT: i64 = 400;

/// Minimum weight rendered as bold.
const BOLD_WEIGHT: i64 = 700;

/// Italic angles at or below this magnitude count as upright.
const ITALIC_ANGLE_EPSILON: f64 = 0.01;

/// Font properties relevant for styling.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRecord {
    /// Font family/PostScript name.
    pub name: String,
    pub weight: i64,
    pub italic_angle: f64,
}

impl Default for FontRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: DEFAULT_WEIGHT,
            italic_angle: 0.0,
        }
    }
}

impl FontRecord {
    /// Build a record from raw attribute values, falling back to defaults for
    /// missing or unparseable numbers.
    pub fn from_attributes(name: Option<&str>, weight: Option<&str>, italic_angle: Option<&str>) -> Self {
        let weight = weight
            .and_then(|w| w.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_WEIGHT);
        let italic_angle = italic_angle
            .and_then(|a| a.trim().parse::<f64>().ok())
            .unwrap_or(0.0);

        Self {
            name: name.unwrap_or("").to_string(),
            weight,
            italic_angle,
        }
    }

    /// Bold by weight or by name.
    pub fn is_bold(&self) -> bool {
        self.weight >= BOLD_WEIGHT || self.name.to_lowercase().contains("bold")
    }

    /// Italic by slant or by name.
    pub fn is_italic(&self) -> bool {
        self.italic_angle.abs() > ITALIC_ANGLE_EPSILON || self.name.to_lowercase().contains("italic")
    }
}

/// Inline style of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    /// Wrap `text` in Markdown emphasis markers.
    pub fn wrap(&self, text: &str) -> String {
        match (self.bold, self.italic) {
            (true, true) => format!("***{}***", text),
            (true, false) => format!("**{}**", text),
            (false, true) => format!("*{}*", text),
            (false, false) => text.to_string(),
        }
    }
}

/// Fonts of one document, read-only once parsing is done.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: HashMap<String, FontRecord>,
}

impl FontTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font; a later record with the same id replaces the earlier one.
    pub fn insert(&mut self, id: impl Into<String>, record: FontRecord) {
        self.fonts.insert(id.into(), record);
    }

    /// Look up a font by exact id.
    pub fn get(&self, id: &str) -> Option<&FontRecord> {
        self.fonts.get(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolve a font id to a style. Unknown ids are plain.
    pub fn style(&self, id: &str, allow_bold: bool) -> TextStyle {
        let record = self.get(id).cloned().unwrap_or_default();
        TextStyle {
            bold: allow_bold && record.is_bold(),
            italic: record.is_italic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_fallbacks() {
        let font = FontRecord::from_attributes(Some("Arial"), Some("bold"), Some("n/a"));
        assert_eq!(font.weight, DEFAULT_WEIGHT);
        assert_eq!(font.italic_angle, 0.0);

        let font = FontRecord::from_attributes(None, None, None);
        assert_eq!(font, FontRecord::default());

        let font = FontRecord::from_attributes(Some("X"), Some(" 700 "), Some("-12.5"));
        assert_eq!(font.weight, 700);
        assert_eq!(font.italic_angle, -12.5);
    }

    #[test]
    fn test_bold_detection() {
        assert!(FontRecord::from_attributes(Some("Arial"), Some("700"), None).is_bold());
        assert!(FontRecord::from_attributes(Some("Arial-BoldMT"), Some("400"), None).is_bold());
        assert!(!FontRecord::from_attributes(Some("Arial"), Some("600"), None).is_bold());
    }

    #[test]
    fn test_italic_detection() {
        assert!(FontRecord::from_attributes(Some("Arial"), None, Some("-0.02")).is_italic());
        assert!(!FontRecord::from_attributes(Some("Arial"), None, Some("0.01")).is_italic());
        assert!(FontRecord::from_attributes(Some("Times-Italic"), None, None).is_italic());
    }

    #[test]
    fn test_style_resolution() {
        let mut table = FontTable::new();
        table.insert("F0", FontRecord::from_attributes(Some("Arial-BoldItalicMT"), Some("700"), Some("-12")));
        assert_eq!(table.style("F0", true), TextStyle { bold: true, italic: true });
        assert_eq!(table.style("F0", false), TextStyle { bold: false, italic: true });
        assert_eq!(table.style("F9", true), TextStyle::default());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(TextStyle { bold: true, italic: true }.wrap("w"), "***w***");
        assert_eq!(TextStyle { bold: true, italic: false }.wrap("w"), "**w**");
        assert_eq!(TextStyle { bold: false, italic: true }.wrap("w"), "*w*");
        assert_eq!(TextStyle::default().wrap("w"), "w");
    }
}
