//! Text layer state
//!
//! The watch face is a single text layer: one label, an alignment, and an
//! optional text-flow inset for round screens. Rendering happens elsewhere;
//! this only tracks what should be shown and whether it changed.

use heapless::String;

/// Maximum label length in bytes
pub const MAX_TEXT_LEN: usize = 64;

/// Horizontal alignment of each wrapped line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone)]
pub struct TextLayer {
    text: String<MAX_TEXT_LEN>,
    alignment: TextAlignment,
    /// Pixel inset applied on every edge when text flow is enabled
    flow_inset: Option<u8>,
    dirty: bool,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayer {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            alignment: TextAlignment::Center,
            flow_inset: None,
            dirty: true,
        }
    }

    /// Replace the label, truncating at a character boundary if too long
    pub fn set_text(&mut self, text: &str) {
        let mut end = text.len().min(MAX_TEXT_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.clear();
        let _ = self.text.push_str(&text[..end]);
        self.dirty = true;
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
        self.dirty = true;
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Keep text clear of the bezel on round screens
    pub fn enable_text_flow(&mut self, inset: u8) {
        self.flow_inset = Some(inset);
        self.dirty = true;
    }

    /// Inset in pixels, zero unless text flow is enabled
    pub fn inset(&self) -> u32 {
        self.flow_inset.map_or(0, u32::from)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark as rendered
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TextLayer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "TextLayer[{}]", self.text.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_marks_dirty() {
        let mut layer = TextLayer::new();
        layer.mark_clean();
        layer.set_text("Select");
        assert_eq!(layer.text(), "Select");
        assert!(layer.is_dirty());
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let mut layer = TextLayer::new();
        // 63 ASCII bytes then a 2-byte character straddling the limit
        let mut long = "a".repeat(63);
        long.push('é');
        layer.set_text(&long);
        assert_eq!(layer.text().len(), 63);
    }

    #[test]
    fn test_text_flow_inset() {
        let mut layer = TextLayer::new();
        assert_eq!(layer.inset(), 0);
        layer.enable_text_flow(5);
        assert_eq!(layer.inset(), 5);
    }
}
