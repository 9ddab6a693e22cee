//! Differential rendering.
//!
//! Compares a freshly drawn [`FrameBuffer`] against the previous frame sent
//! to the same client and encodes only the cells that changed. Output size is
//! proportional to the number of changed cells, not to the terminal area.
//!
//! Per changed cell the encoder writes the cell's attribute (only when it
//! differs from the attribute most recently written in this pass, and always
//! for the first changed cell), an absolute cursor move, then the character.
//! Every frame ends with the cursor attribute and the cursor position, so the
//! client's caret tracks whatever the focused widget declared.

use bytes::{Bytes, BytesMut};

use crate::{attribute::Attribute, buffer::FrameBuffer, escape};

/// Statistics from one diff pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were encoded.
    pub cells_written: usize,
    /// Cells identical to the previous frame.
    pub cells_skipped: usize,
    /// Attribute groups emitted for cells (the trailing cursor attribute is
    /// not counted).
    pub attribute_changes: usize,
    /// Total encoded bytes, trailing cursor placement included.
    pub bytes: usize,
}

/// Result of rendering a screen: the new frame plus the bytes that bring the
/// client from the previous frame to it.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    /// Buffer to diff the next frame against.
    pub buffer: FrameBuffer,
    /// Escape sequences and characters to send.
    pub bytes: Bytes,
    /// What the diff pass did.
    pub stats: RenderStats,
}

/// Encode the difference between `previous` and `next` into `dst`.
///
/// Both buffers are expected to have the same dimensions (they belong to
/// the same connection). Cells of `next` without a counterpart in
/// `previous` are treated as changed.
pub fn encode_diff(previous: &FrameBuffer, next: &FrameBuffer, dst: &mut BytesMut) -> RenderStats {
    let start = dst.len();
    let mut stats = RenderStats::default();
    let mut last_attr: Option<Attribute> = None;

    for (index, cell) in next.cells().iter().enumerate() {
        if previous.cells().get(index) == Some(cell) {
            stats.cells_skipped += 1;
            continue;
        }

        let Some((x, y)) = next.position(index) else {
            continue;
        };

        if last_attr != Some(cell.attr) {
            cell.attr.encode(dst);
            last_attr = Some(cell.attr);
            stats.attribute_changes += 1;
        }
        escape::cursor_to(dst, x, y);
        escape::put_char(dst, cell.ch);
        stats.cells_written += 1;
    }

    let cursor = next.cursor();
    cursor.attr.encode(dst);
    escape::cursor_to(dst, cursor.x, cursor.y);

    stats.bytes = dst.len() - start;
    stats
}

/// Diff `next` against `previous` into a fresh [`RenderedFrame`].
pub fn render_frame(previous: &FrameBuffer, next: FrameBuffer) -> RenderedFrame {
    let mut out = BytesMut::with_capacity(256);
    let stats = encode_diff(previous, &next, &mut out);
    RenderedFrame { buffer: next, bytes: out.freeze(), stats }
}
