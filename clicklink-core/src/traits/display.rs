//! Label display

/// The single text label shown on the watch face
pub trait TextDisplay {
    /// Replace the label text
    ///
    /// Layout (wrapping, alignment, round-screen text flow) is the
    /// implementation's concern.
    fn set_text(&mut self, text: &str);
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn set_text(&mut self, text: &str) {
        (**self).set_text(text)
    }
}
