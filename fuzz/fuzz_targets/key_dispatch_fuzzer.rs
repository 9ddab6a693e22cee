//! Fuzz target for key dispatch and focus cycling
//!
//! Builds a screen from arbitrary widgets (including ones placed partly or
//! entirely off the grid) and feeds it arbitrary input bytes.
//!
//! # Invariants
//!
//! - Focus is always `None` or a focusable widget
//! - TAB never clears an existing focus
//! - Rendering an unchanged screen writes no cells
//! - NEVER panic on any input byte or layout

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use netui_core::{Attribute, Button, Color, Entry, FrameBuffer, Label, Screen, keys};

const WIDTH: u16 = 32;
const HEIGHT: u16 = 12;

#[derive(Debug, Arbitrary)]
enum WidgetSpec {
    Label { x: u8, y: u8, text: String, max: u8 },
    Entry { x: u8, y: u8, max: u8, text: String },
    Button { x: u8, y: u8, label: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    widgets: Vec<WidgetSpec>,
    initial_focus: Option<u8>,
    keys: Vec<u8>,
}

fn build(specs: Vec<WidgetSpec>) -> Screen {
    let attr = Attribute::new(Color::White, Color::Black);
    let mut screen = Screen::new();
    for spec in specs.into_iter().take(32) {
        match spec {
            WidgetSpec::Label { x, y, text, max } => {
                screen.push(Label::new(x.into(), y.into(), attr, text).with_max(max.into()));
            },
            WidgetSpec::Entry { x, y, max, text } => {
                screen.push(Entry::new(x.into(), y.into(), attr, max.into()).with_text(text));
            },
            WidgetSpec::Button { x, y, label } => {
                screen.push(Button::new(x.into(), y.into(), attr, label));
            },
        }
    }
    screen
}

fn check_focus(screen: &Screen) {
    if let Some(index) = screen.focus() {
        let focusable = screen.widget(index).is_some_and(|w| w.is_focusable());
        assert!(focusable, "focus {index} is not focusable");
    }
}

fuzz_target!(|input: Input| {
    let mut screen = build(input.widgets);
    if let Some(index) = input.initial_focus {
        screen.set_focus(Some(usize::from(index)));
    }
    check_focus(&screen);

    let baseline = FrameBuffer::blank(WIDTH, HEIGHT, Color::Default);
    let mut previous = screen.render(&baseline, Color::Black).buffer;

    for key in input.keys.into_iter().take(256) {
        let before = screen.focus();
        screen.dispatch_key(key);
        check_focus(&screen);

        if key == keys::TAB && before.is_some() {
            assert!(screen.focus().is_some(), "TAB cleared focus");
        }

        let frame = screen.render(&previous, Color::Black);
        assert_eq!(frame.stats.cells_written + frame.stats.cells_skipped, previous.len());
        previous = frame.buffer;
    }

    let again = screen.render(&previous, Color::Black);
    assert_eq!(again.stats.cells_written, 0);
});
