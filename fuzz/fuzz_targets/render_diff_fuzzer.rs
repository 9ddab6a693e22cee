//! Fuzz target for the diff renderer
//!
//! Diffs two arbitrary frames of the same size.
//!
//! # Invariants
//!
//! - Written plus skipped cells cover the whole grid
//! - Written cells equal the number of differing cells
//! - Output always ends with the cursor trailer
//! - Diffing a frame against itself writes nothing
//! - NEVER panic, whatever the characters or attributes

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use netui_core::{Attribute, Cell, Color, FrameBuffer, diff, escape};

#[derive(Debug, Arbitrary)]
struct CellSpec {
    x: u8,
    y: u8,
    ch: char,
    fg: u8,
    bg: u8,
    bold: bool,
    underline: bool,
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u8,
    height: u8,
    previous: Vec<CellSpec>,
    next: Vec<CellSpec>,
    cursor: (u8, u8),
}

fn color(index: u8) -> Color {
    if index % 17 == 16 { Color::Default } else { Color::cycle(usize::from(index)) }
}

fn frame(width: u16, height: u16, cells: Vec<CellSpec>) -> FrameBuffer {
    let mut buf = FrameBuffer::blank(width, height, Color::Black);
    for spec in cells.into_iter().take(512) {
        let attr = Attribute {
            fg: color(spec.fg),
            bg: color(spec.bg),
            bold: spec.bold,
            underline: spec.underline,
        };
        buf.set(spec.x.into(), spec.y.into(), Cell::new(spec.ch, attr));
    }
    buf
}

fuzz_target!(|input: Input| {
    let width = u16::from(input.width % 80) + 1;
    let height = u16::from(input.height % 40) + 1;
    let previous = frame(width, height, input.previous);
    let mut next = frame(width, height, input.next);
    next.set_cursor(input.cursor.0.into(), input.cursor.1.into(), Attribute::default());

    let differing = previous.cells().iter().zip(next.cells()).filter(|(a, b)| a != b).count();
    let rendered = diff::render_frame(&previous, next.clone());

    assert_eq!(rendered.stats.cells_written, differing);
    assert_eq!(rendered.stats.cells_written + rendered.stats.cells_skipped, previous.len());
    assert_eq!(rendered.stats.bytes, rendered.bytes.len());

    let mut trailer = Vec::new();
    let cursor = next.cursor();
    cursor.attr.encode(&mut trailer);
    escape::cursor_to(&mut trailer, cursor.x, cursor.y);
    assert!(rendered.bytes.ends_with(&trailer));

    let same = diff::render_frame(&next, next.clone());
    assert_eq!(same.stats.cells_written, 0);
    assert_eq!(same.bytes.as_ref(), trailer.as_slice());
});
