//! Single-line text input.

use super::{Focusable, Widget, WidgetEvent, columns, keys};
use crate::{
    attribute::Attribute,
    buffer::{Canvas, Rect},
};

/// Bounded, editable text field.
///
/// Draws its text left-justified and padded to `max` columns and parks the
/// cursor right after the last character. Input bytes are decoded as
/// Latin-1, so every byte is one character and one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Left column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Attribute of text, padding and cursor.
    pub attr: Attribute,
    /// Current text. Never longer than `max` characters when edited through
    /// keypresses.
    pub text: String,
    /// Maximum length in characters, also the drawn width.
    pub max: u16,
    /// Whether the entry has been focused. Cosmetic only.
    pub focused: bool,
}

impl Entry {
    /// Empty entry.
    pub fn new(x: u16, y: u16, attr: Attribute, max: u16) -> Self {
        Self { x, y, attr, text: String::new(), max, focused: false }
    }

    /// Same entry with initial text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn len(&self) -> u16 {
        columns(&self.text)
    }
}

impl Widget for Entry {
    fn area(&self) -> Rect {
        Rect::new(self.x, self.y, self.max, 1)
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        let written = canvas.print(self.x, self.y, &self.text, self.attr);
        if self.max > written {
            canvas.fill(self.x.saturating_add(written), self.y, self.max - written, ' ', self.attr);
        }
        canvas.set_cursor(self.x.saturating_add(written), self.y, self.attr);
    }

    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn set_text(&mut self, text: &str) -> bool {
        text.clone_into(&mut self.text);
        true
    }
}

impl Focusable for Entry {
    fn focus(&mut self, gained: bool) {
        if gained {
            self.focused = true;
        }
    }

    fn keypress(&mut self, key: u8) -> Option<WidgetEvent> {
        match key {
            keys::BACKSPACE | keys::DELETE => {
                self.text.pop();
                Some(WidgetEvent::TextChanged(self.text.clone()))
            },
            keys::NEWLINE => Some(WidgetEvent::Submitted(self.text.clone())),
            _ => {
                let ch = char::from(key);
                if !printable(ch) || self.len() >= self.max {
                    return None;
                }
                self.text.push(ch);
                Some(WidgetEvent::TextChanged(self.text.clone()))
            },
        }
    }
}

/// Whether `ch` is accepted as typed text.
///
/// Controls, whitespace other than the plain space and the soft hyphen (the
/// one format character in Latin-1) are rejected.
fn printable(ch: char) -> bool {
    !ch.is_control() && (ch == ' ' || !ch.is_whitespace()) && ch != '\u{ad}'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attribute::Color, buffer::FrameBuffer};

    fn type_str(entry: &mut Entry, input: &str) -> Vec<WidgetEvent> {
        input.bytes().filter_map(|b| entry.keypress(b)).collect()
    }

    #[test]
    fn typing_stops_at_max() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 4);
        let events = type_str(&mut entry, "abcde");

        assert_eq!(entry.text, "abcd");
        assert_eq!(events.len(), 4);
        assert_eq!(events.last(), Some(&WidgetEvent::TextChanged("abcd".into())));

        assert_eq!(entry.keypress(keys::BACKSPACE), Some(WidgetEvent::TextChanged("abc".into())));
        assert_eq!(entry.text, "abc");
    }

    #[test]
    fn backspace_on_empty_still_reports() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 4);
        assert_eq!(entry.keypress(keys::DELETE), Some(WidgetEvent::TextChanged(String::new())));
        assert_eq!(entry.text, "");
    }

    #[test]
    fn newline_submits() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 8).with_text("bob");
        assert_eq!(entry.keypress(keys::NEWLINE), Some(WidgetEvent::Submitted("bob".into())));
        assert_eq!(entry.text, "bob");
    }

    #[test]
    fn control_bytes_are_ignored() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 8);
        assert_eq!(entry.keypress(b'\r'), None);
        assert_eq!(entry.keypress(0x01), None);
        assert_eq!(entry.keypress(0x9B), None);
        assert_eq!(entry.text, "");
    }

    #[test]
    fn invisible_latin1_is_ignored() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 8);
        assert_eq!(entry.keypress(0xA0), None);
        assert_eq!(entry.keypress(0xAD), None);
        assert_eq!(entry.keypress(b'\t'), None);
        assert_eq!(entry.text, "");

        assert_eq!(entry.keypress(b' '), Some(WidgetEvent::TextChanged(" ".into())));
        assert_eq!(entry.keypress(0xA1), Some(WidgetEvent::TextChanged(" ¡".into())));
    }

    #[test]
    fn high_bytes_decode_as_latin1() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 8);
        assert_eq!(entry.keypress(0xE9), Some(WidgetEvent::TextChanged("é".into())));
        assert_eq!(entry.len(), 1);
    }

    #[test]
    fn focus_is_cosmetic() {
        let mut entry = Entry::new(0, 0, Attribute::default(), 8);
        entry.focus(true);
        assert!(entry.focused);
        entry.focus(false);
        assert!(entry.focused);
    }

    #[test]
    fn draws_padded_with_cursor_after_text() {
        let attr = Attribute::new(Color::LightRed, Color::Black).bold();
        let entry = Entry::new(1, 0, attr, 5).with_text("ab");
        let mut buf = FrameBuffer::blank(8, 1, Color::Black);
        entry.draw(&mut buf.canvas(entry.area()));

        assert_eq!(buf.row_text(0), " ab     ");
        assert_eq!(buf.get(5, 0).map(|c| c.attr), Some(attr));
        let padding = Attribute::new(Color::Default, Color::Black);
        assert_eq!(buf.get(6, 0).map(|c| c.attr), Some(padding));
        let cursor = buf.cursor();
        assert_eq!((cursor.x, cursor.y, cursor.attr), (3, 0, attr));
    }
}
