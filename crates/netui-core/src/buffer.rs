//! Frame buffer: the character/attribute grid a screen is drawn into.
//!
//! One buffer represents one complete terminal state. Cells are stored
//! row-major in a flat `Vec`, so `index(x, y) = y * width + x` and the diff
//! renderer walks the grid with a linear scan.
//!
//! Widgets never touch the buffer directly. They draw through a [`Canvas`]
//! restricted to the area they declared, which is how out-of-bounds writes
//! are ruled out by construction rather than handled at runtime.

use std::fmt;

use crate::attribute::{Attribute, Color};

/// A rectangular region of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `(x, y)` lies inside this rectangle.
    #[must_use]
    pub fn contains(self, x: u16, y: u16) -> bool {
        let (x, y) = (u32::from(x), u32::from(y));
        x >= u32::from(self.x)
            && y >= u32::from(self.y)
            && x < u32::from(self.x) + u32::from(self.width)
            && y < u32::from(self.y) + u32::from(self.height)
    }
}

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character shown in the cell. Always occupies one column.
    pub ch: char,
    /// How the character is drawn.
    pub attr: Attribute,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub const fn new(ch: char, attr: Attribute) -> Self {
        Self { ch, attr }
    }

    /// A space on the given background.
    #[must_use]
    pub const fn blank(background: Color) -> Self {
        Self { ch: ' ', attr: Attribute::new(Color::Default, background) }
    }
}

/// Terminal cursor: position plus the attribute active while it rests there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Attribute emitted before the final cursor placement.
    pub attr: Attribute,
}

/// Fixed-size grid of cells plus one cursor.
///
/// # Invariants
///
/// - `cells.len() == width * height`, fixed for the buffer's lifetime.
/// - The cursor always lies inside the grid (or at the origin of an empty
///   grid).
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: Cursor,
}

impl FrameBuffer {
    /// Buffer filled with spaces on `background`, default foreground, cursor
    /// at the origin with the same attribute.
    #[must_use]
    pub fn blank(width: u16, height: u16, background: Color) -> Self {
        let cell = Cell::blank(background);
        Self {
            width,
            height,
            cells: vec![cell; usize::from(width) * usize::from(height)],
            cursor: Cursor { x: 0, y: 0, attr: cell.attr },
        }
    }

    /// Width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Full grid bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Linear index of `(x, y)`. `None` if outside the grid.
    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Coordinates of a linear index.
    pub fn position(&self, index: usize) -> Option<(u16, u16)> {
        if index >= self.cells.len() {
            return None;
        }
        let width = usize::from(self.width);
        Some((u16::try_from(index % width).ok()?, u16::try_from(index / width).ok()?))
    }

    /// Cell at `(x, y)`.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).and_then(|i| self.cells.get(i))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Overwrite the cell at `(x, y)`. Returns `false` if outside the grid.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(slot) = self.index(x, y).and_then(|i| self.cells.get_mut(i)) else {
            return false;
        };
        *slot = cell;
        true
    }

    /// Current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Place the cursor, clamped into the grid.
    pub fn set_cursor(&mut self, x: u16, y: u16, attr: Attribute) {
        self.cursor = Cursor {
            x: x.min(self.width.saturating_sub(1)),
            y: y.min(self.height.saturating_sub(1)),
            attr,
        };
    }

    /// Drawing surface restricted to `area`.
    pub fn canvas(&mut self, area: Rect) -> Canvas<'_> {
        Canvas { buffer: self, area }
    }

    /// Characters of row `y` as a string. Empty if `y` is out of range.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)].iter().map(|c| c.ch).collect()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// A view of a [`FrameBuffer`] restricted to one widget's area.
///
/// Writes outside the area are dropped. In debug builds they also trip an
/// assertion, since a widget writing outside the area it declared is a bug
/// in the widget. Cells outside the grid (a widget partially off-screen) are
/// silently clipped.
pub struct Canvas<'a> {
    buffer: &'a mut FrameBuffer,
    area: Rect,
}

impl Canvas<'_> {
    /// Area this canvas may write to.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Write one character.
    pub fn put(&mut self, x: u16, y: u16, ch: char, attr: Attribute) {
        debug_assert!(self.area.contains(x, y), "write at ({x}, {y}) outside {:?}", self.area);
        if self.area.contains(x, y) {
            self.buffer.set(x, y, Cell::new(ch, attr));
        }
    }

    /// Write `text` starting at `(x, y)`, one column per character, stopping
    /// at the right edge of the area. Returns the number of columns written.
    pub fn print(&mut self, x: u16, y: u16, text: &str, attr: Attribute) -> u16 {
        let right = u32::from(self.area.x) + u32::from(self.area.width);
        let room = right.saturating_sub(u32::from(x));
        let mut written = 0u16;
        for ch in text.chars().take(usize::try_from(room).unwrap_or(usize::MAX)) {
            let Some(column) = x.checked_add(written) else { break };
            self.put(column, y, ch, attr);
            written += 1;
        }
        written
    }

    /// Fill `width` columns starting at `(x, y)` with `ch`.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, ch: char, attr: Attribute) {
        for dx in 0..width {
            let Some(column) = x.checked_add(dx) else { break };
            self.put(column, y, ch, attr);
        }
    }

    /// Place the buffer's cursor. The cursor is not confined to the area
    /// (an entry parks it one past its text) but is clamped into the grid.
    pub fn set_cursor(&mut self, x: u16, y: u16, attr: Attribute) {
        self.buffer.set_cursor(x, y, attr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_buffer_dimensions() {
        let buf = FrameBuffer::blank(64, 48, Color::Black);
        assert_eq!(buf.len(), 64 * 48);
        assert_eq!(buf.get(0, 0), Some(&Cell::blank(Color::Black)));
        assert_eq!(buf.cursor().attr, Attribute::new(Color::Default, Color::Black));
    }

    #[test]
    fn index_is_row_major() {
        let buf = FrameBuffer::blank(10, 5, Color::Default);
        assert_eq!(buf.index(0, 0), Some(0));
        assert_eq!(buf.index(9, 0), Some(9));
        assert_eq!(buf.index(0, 1), Some(10));
        assert_eq!(buf.index(3, 4), Some(43));
        assert_eq!(buf.position(43), Some((3, 4)));
    }

    #[test]
    fn index_rejects_out_of_bounds() {
        let buf = FrameBuffer::blank(10, 5, Color::Default);
        assert_eq!(buf.index(10, 0), None);
        assert_eq!(buf.index(0, 5), None);
        assert_eq!(buf.position(50), None);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut buf = FrameBuffer::blank(10, 5, Color::Default);
        buf.set_cursor(30, 30, Attribute::default());
        assert_eq!((buf.cursor().x, buf.cursor().y), (9, 4));
    }

    #[test]
    fn canvas_print_stops_at_area_edge() {
        let mut buf = FrameBuffer::blank(20, 2, Color::Default);
        let attr = Attribute::new(Color::Red, Color::Black);
        let written = buf.canvas(Rect::new(2, 0, 4, 1)).print(2, 0, "abcdef", attr);
        assert_eq!(written, 4);
        assert_eq!(buf.row_text(0), "  abcd              ");
        assert_eq!(buf.get(2, 0).map(|c| c.attr), Some(attr));
    }

    #[test]
    fn canvas_clips_to_grid() {
        let mut buf = FrameBuffer::blank(4, 1, Color::Default);
        let written = buf.canvas(Rect::new(2, 0, 6, 1)).print(2, 0, "xyzw", Attribute::default());
        assert_eq!(written, 4);
        assert_eq!(buf.row_text(0), "  xy");
    }
}
