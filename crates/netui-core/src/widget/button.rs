//! Clickable button.

use super::{Focusable, Widget, WidgetEvent, columns, keys};
use crate::{
    attribute::Attribute,
    buffer::{Canvas, Rect},
};

/// Columns of padding on each side of the label.
const PADDING: u16 = 2;

/// A 3-row box with a centered label. Enter while focused clicks it.
///
/// ```text
/// row y:     [        ]
/// row y + 1: [  label ]
/// row y + 2: [        ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Attribute of the whole box.
    pub attr: Attribute,
    /// Label text.
    pub label: String,
}

impl Button {
    /// Create a button.
    pub fn new(x: u16, y: u16, attr: Attribute, label: impl Into<String>) -> Self {
        Self { x, y, attr, label: label.into() }
    }

    fn width(&self) -> u16 {
        columns(&self.label).saturating_add(2 * PADDING)
    }
}

impl Widget for Button {
    fn area(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), 3)
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        let width = self.width();
        for row in 0..3 {
            canvas.fill(self.x, self.y.saturating_add(row), width, ' ', self.attr);
        }
        let (left, middle) = (self.x.saturating_add(PADDING), self.y.saturating_add(1));
        let written = canvas.print(left, middle, &self.label, self.attr);
        canvas.set_cursor(left.saturating_add(written), middle, self.attr);
    }

    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn text(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn set_text(&mut self, text: &str) -> bool {
        text.clone_into(&mut self.label);
        true
    }
}

impl Focusable for Button {
    fn focus(&mut self, _gained: bool) {}

    fn keypress(&mut self, key: u8) -> Option<WidgetEvent> {
        (key == keys::NEWLINE).then_some(WidgetEvent::Clicked)
    }
}
