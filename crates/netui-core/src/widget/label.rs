//! Static text.

use super::{Widget, columns};
use crate::{
    attribute::Attribute,
    buffer::{Canvas, Rect},
};

/// Fixed text at a position. Not focusable.
///
/// With `max > 0` the label always occupies exactly `max` columns: longer
/// text is clipped and shorter text is padded with spaces in the label's
/// attribute, so a shrinking name leaves no stale characters behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Left column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Attribute of text and padding.
    pub attr: Attribute,
    /// Displayed text.
    pub text: String,
    /// Fixed width in columns, `0` for "as wide as the text".
    pub max: u16,
}

impl Label {
    /// Label as wide as its text.
    pub fn new(x: u16, y: u16, attr: Attribute, text: impl Into<String>) -> Self {
        Self { x, y, attr, text: text.into(), max: 0 }
    }

    /// Same label with a fixed width.
    #[must_use]
    pub fn with_max(mut self, max: u16) -> Self {
        self.max = max;
        self
    }
}

impl Widget for Label {
    fn area(&self) -> Rect {
        let width = if self.max > 0 { self.max } else { columns(&self.text) };
        Rect::new(self.x, self.y, width, 1)
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        let written = canvas.print(self.x, self.y, &self.text, self.attr);
        if self.max > written {
            canvas.fill(self.x.saturating_add(written), self.y, self.max - written, ' ', self.attr);
        }
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn set_text(&mut self, text: &str) -> bool {
        text.clone_into(&mut self.text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attribute::Color, buffer::FrameBuffer};

    fn draw(label: &Label) -> FrameBuffer {
        let mut buf = FrameBuffer::blank(12, 1, Color::Black);
        label.draw(&mut buf.canvas(label.area()));
        buf
    }

    #[test]
    fn writes_text_at_position() {
        let attr = Attribute::new(Color::Green, Color::Black);
        let buf = draw(&Label::new(2, 0, attr, "hi"));
        assert_eq!(buf.row_text(0), "  hi        ");
        assert_eq!(buf.get(3, 0).map(|c| c.attr), Some(attr));
        let padding = Attribute::new(Color::Default, Color::Black);
        assert_eq!(buf.get(4, 0).map(|c| c.attr), Some(padding));
    }

    #[test]
    fn pads_to_max_with_own_attribute() {
        let attr = Attribute::new(Color::Green, Color::Blue);
        let buf = draw(&Label::new(0, 0, attr, "ab").with_max(5));
        assert_eq!(buf.row_text(0), "ab          ");
        for x in 0..5 {
            assert_eq!(buf.get(x, 0).map(|c| c.attr), Some(attr));
        }
        assert_ne!(buf.get(5, 0).map(|c| c.attr), Some(attr));
    }

    #[test]
    fn clips_to_max() {
        let buf = draw(&Label::new(0, 0, Attribute::default(), "abcdefgh").with_max(3));
        assert_eq!(buf.row_text(0), "abc         ");
    }

    #[test]
    fn not_focusable() {
        let mut label = Label::new(0, 0, Attribute::default(), "x");
        assert!(!label.is_focusable());
        assert!(label.focusable_mut().is_none());
    }
}
