//! Widget capability set.
//!
//! Every widget is drawable ([`Widget`]). Some are also focusable
//! ([`Focusable`]): they receive a notification when they gain focus and get
//! keypresses while focused. Keypresses never call back into application
//! code; a focusable widget reports what happened as a [`WidgetEvent`] and the
//! screen's owner decides what to do with it.

mod button;
mod entry;
mod label;

use std::fmt;

pub use button::Button;
pub use entry::Entry;
pub use label::Label;

use crate::buffer::{Canvas, Rect};

/// Raw input bytes with a fixed meaning.
pub mod keys {
    /// Backspace (BS).
    pub const BACKSPACE: u8 = 0x08;
    /// Focus advance.
    pub const TAB: u8 = 0x09;
    /// Submit / click.
    pub const NEWLINE: u8 = 0x0A;
    /// Escape. Reserved, currently ignored.
    pub const ESC: u8 = 0x1B;
    /// Delete (DEL), treated as backspace.
    pub const DELETE: u8 = 0x7F;
}

/// Something a focused widget reports in response to a keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Editable text changed. Carries the text after the change.
    TextChanged(String),
    /// Enter pressed in an editable field. Carries the current text.
    Submitted(String),
    /// Enter pressed on a button.
    Clicked,
}

/// A drawable element of a screen.
pub trait Widget: fmt::Debug + Send + Sync {
    /// Region of the grid this widget draws into. The canvas passed to
    /// [`Widget::draw`] rejects writes outside it.
    fn area(&self) -> Rect;

    /// Draw into `canvas`. Focusable widgets also place the cursor.
    fn draw(&self, canvas: &mut Canvas<'_>);

    /// The focusable capability, if this widget has it.
    ///
    /// This is what [`Screen`](crate::Screen) consults when it moves focus
    /// or routes keys.
    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    /// Whether this widget can take focus. Must agree with
    /// [`Widget::focusable_mut`]; it exists for callers that only hold a
    /// shared reference.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Displayed text, for widgets that show one.
    fn text(&self) -> Option<&str> {
        None
    }

    /// Replace the displayed text. Returns `false` if this widget has no
    /// text.
    fn set_text(&mut self, _text: &str) -> bool {
        false
    }
}

/// A widget that can hold focus and receive keypresses.
pub trait Focusable {
    /// Notification that focus changed. Only gaining focus is signalled.
    fn focus(&mut self, gained: bool);

    /// Handle one input byte while focused.
    fn keypress(&mut self, key: u8) -> Option<WidgetEvent>;
}

/// Column count of `text` (one column per character).
pub(crate) fn columns(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}
