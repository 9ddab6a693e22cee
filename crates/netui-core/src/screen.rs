//! Screens: the widget tree and focus state of one client.
//!
//! A [`Screen`] is plain data. Sharing happens through [`ScreenLock`], a
//! reader/writer lock around it: rendering takes the read side, key dispatch
//! and every external mutation take the write side. Holding the write side
//! means no render of that screen can interleave with the mutation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    attribute::Color,
    buffer::FrameBuffer,
    diff::{self, RenderedFrame},
    widget::{Widget, WidgetEvent, keys},
};

/// A widget event together with the index of the widget that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenEvent {
    /// Index of the emitting widget in [`Screen::widgets`].
    pub widget: usize,
    /// What happened.
    pub event: WidgetEvent,
}

/// Ordered widgets plus the index of the focused one.
///
/// # Invariants
///
/// - When `focus` is `Some(i)`, widget `i` was focusable when focus was set.
///   Replacing widgets behind the focus index can break this; dispatch then
///   logs a warning and drops the key instead of misrouting it.
#[derive(Debug, Default)]
pub struct Screen {
    widgets: Vec<Box<dyn Widget>>,
    focus: Option<usize>,
}

impl Screen {
    /// Empty screen without focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen with the given widgets and no focus.
    pub fn with_widgets(widgets: Vec<Box<dyn Widget>>) -> Self {
        Self { widgets, focus: None }
    }

    /// Append a widget and return its index.
    pub fn push(&mut self, widget: impl Widget + 'static) -> usize {
        self.widgets.push(Box::new(widget));
        self.widgets.len() - 1
    }

    /// All widgets in draw order.
    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    /// Widget at `index`.
    pub fn widget(&self, index: usize) -> Option<&dyn Widget> {
        self.widgets.get(index).map(|w| &**w)
    }

    /// Mutable widget at `index`.
    pub fn widget_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(index).map(|w| &mut **w)
    }

    /// Replace the widget at `index`, returning the old one.
    ///
    /// If the focused widget is replaced by one that cannot take focus, focus
    /// is cleared.
    pub fn replace(&mut self, index: usize, widget: Box<dyn Widget>) -> Option<Box<dyn Widget>> {
        let slot = self.widgets.get_mut(index)?;
        let old = std::mem::replace(slot, widget);
        if self.focus == Some(index) && slot.focusable_mut().is_none() {
            self.focus = None;
        }
        Some(old)
    }

    /// Number of widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the screen has no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Index of the focused widget.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Move focus to `index` (or clear it with `None`) and signal the widget
    /// that it gained focus.
    ///
    /// Returns `false`, leaving focus untouched, if `index` is out of range
    /// or the widget is not focusable.
    pub fn set_focus(&mut self, index: Option<usize>) -> bool {
        let Some(index) = index else {
            self.focus = None;
            return true;
        };
        let Some(target) = self.widgets.get_mut(index).and_then(|w| w.focusable_mut()) else {
            return false;
        };
        target.focus(true);
        self.focus = Some(index);
        true
    }

    /// Draw every widget into `buffer`, the focused one last so its cursor
    /// placement wins.
    pub fn draw(&self, buffer: &mut FrameBuffer) {
        for (index, widget) in self.widgets.iter().enumerate() {
            if Some(index) != self.focus {
                widget.draw(&mut buffer.canvas(widget.area()));
            }
        }
        if let Some(widget) = self.focus.and_then(|i| self.widgets.get(i)) {
            widget.draw(&mut buffer.canvas(widget.area()));
        }
    }

    /// Draw into a blank buffer the size of `previous` and diff against it.
    pub fn render(&self, previous: &FrameBuffer, background: Color) -> RenderedFrame {
        let mut next = FrameBuffer::blank(previous.width(), previous.height(), background);
        self.draw(&mut next);
        diff::render_frame(previous, next)
    }

    /// Handle one input byte.
    ///
    /// - TAB moves focus to the next focusable widget, cycling once through
    ///   the list starting after the current focus.
    /// - ESC is reserved and ignored.
    /// - Anything else goes to the focused widget, if any.
    pub fn dispatch_key(&mut self, key: u8) -> Option<ScreenEvent> {
        match key {
            keys::TAB => {
                self.advance_focus();
                None
            },
            keys::ESC => None,
            _ => {
                let index = self.focus?;
                let Some(widget) = self.widgets.get_mut(index).and_then(|w| w.focusable_mut())
                else {
                    tracing::warn!(focus = index, "focus set to a non-focusable widget");
                    return None;
                };
                widget.keypress(key).map(|event| ScreenEvent { widget: index, event })
            },
        }
    }

    /// Move focus to the next focusable widget. Returns the new focus, or
    /// `None` (focus unchanged) if no widget is focusable.
    pub fn advance_focus(&mut self) -> Option<usize> {
        let len = self.widgets.len();
        if len == 0 {
            return None;
        }
        let start = self.focus.map_or(0, |f| (f + 1) % len);
        for step in 0..len {
            let index = (start + step) % len;
            if let Some(widget) = self.widgets[index].focusable_mut() {
                widget.focus(true);
                self.focus = Some(index);
                return Some(index);
            }
        }
        None
    }
}

/// Shared handle to a locked screen.
pub type SharedScreen = Arc<ScreenLock>;

/// Reader/writer lock around a [`Screen`].
///
/// Guards never outlive a synchronous section; they must not be held across
/// an `.await`. A poisoned lock is recovered: screen state is plain widget
/// data, and one panicked writer must not take the client down with it.
#[derive(Debug, Default)]
pub struct ScreenLock {
    inner: RwLock<Screen>,
}

impl ScreenLock {
    /// Wrap a screen.
    pub fn new(screen: Screen) -> Self {
        Self { inner: RwLock::new(screen) }
    }

    /// Wrap a screen in a shareable handle.
    pub fn shared(screen: Screen) -> SharedScreen {
        Arc::new(Self::new(screen))
    }

    /// Shared access, for rendering.
    pub fn read(&self) -> RwLockReadGuard<'_, Screen> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access, for any mutation.
    pub fn write(&self) -> RwLockWriteGuard<'_, Screen> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
