//! Rendering core for netui.
//!
//! Pure data structures and algorithms, no I/O and no async runtime. The
//! server crate drives these from per-connection tasks.
//!
//! # Components
//!
//! - [`Attribute`]: colors and styles of a cell, and their SGR encoding
//! - [`FrameBuffer`]: fixed-size character/attribute grid with one cursor
//! - [`diff`]: encodes only the cells that changed between two frames
//! - [`Widget`]: drawable, optionally [`Focusable`] elements; [`Label`],
//!   [`Entry`] and [`Button`] are the reference set
//! - [`Screen`]: ordered widgets with focus, shared through [`ScreenLock`]
//!
//! # Example
//!
//! ```
//! use netui_core::{Attribute, Color, Entry, FrameBuffer, Label, Screen, keys};
//!
//! let mut screen = Screen::new();
//! let attr = Attribute::new(Color::White, Color::Black);
//! screen.push(Label::new(0, 0, attr, "Name:"));
//! screen.push(Entry::new(6, 0, attr, 8));
//! screen.dispatch_key(keys::TAB);
//! screen.dispatch_key(b'x');
//!
//! let baseline = FrameBuffer::blank(20, 2, Color::Default);
//! let frame = screen.render(&baseline, Color::Black);
//! assert_eq!(frame.buffer.row_text(0), "Name: x             ");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod attribute;
pub mod buffer;
pub mod diff;
pub mod escape;
pub mod screen;
pub mod widget;

pub use attribute::{Attribute, Color};
pub use buffer::{Canvas, Cell, Cursor, FrameBuffer, Rect};
pub use diff::{RenderStats, RenderedFrame};
pub use screen::{Screen, ScreenEvent, ScreenLock, SharedScreen};
pub use widget::{Button, Entry, Focusable, Label, Widget, WidgetEvent, keys};
