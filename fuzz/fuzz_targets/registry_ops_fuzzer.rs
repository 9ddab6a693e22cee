//! Fuzz target for registry operations
//!
//! Runs arbitrary sequences of connects, removals, screen replacements and
//! screen updates against a [`Registry`] and a simple model of it.
//!
//! # Invariants
//!
//! - Only live clients ever have a screen
//! - A removed client is never resurrected by a later `set_screen` or update
//! - `clients()` is sorted and matches the model
//! - Updates naming unknown widgets are skipped, not applied elsewhere
//! - NEVER panic

#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use netui_core::{Attribute, Label, Screen};
use netui_server::{ClientId, Registry, ScreenUpdate};

#[derive(Debug, Arbitrary)]
enum Op {
    Connect,
    Remove(u8),
    SetScreen(u8),
    Update { client: u8, widget: u8, text: String },
    Focus { client: u8, widget: Option<u8> },
}

fn one_label() -> Screen {
    let mut screen = Screen::new();
    screen.push(Label::new(0, 0, Attribute::default(), "x"));
    screen
}

fuzz_target!(|ops: Vec<Op>| {
    let registry = Registry::new();
    let mut live = BTreeSet::new();
    let mut issued = 0u64;

    for op in ops.into_iter().take(256) {
        match op {
            Op::Connect => {
                let client = registry.connect();
                assert_eq!(client, ClientId(issued));
                issued += 1;
                live.insert(client);
            },
            Op::Remove(id) => {
                let client = ClientId(u64::from(id));
                registry.remove(client);
                live.remove(&client);
            },
            Op::SetScreen(id) => {
                let client = ClientId(u64::from(id));
                assert_eq!(registry.set_screen(client, one_label()), live.contains(&client));
            },
            Op::Update { client, widget, text } => {
                let client = ClientId(u64::from(client));
                let widget = usize::from(widget);
                registry.apply(vec![ScreenUpdate::SetText { client, widget, text: text.clone() }]);
                let screen = if widget == 0 { registry.get_screen(client) } else { None };
                if let Some(screen) = screen {
                    let guard = screen.read();
                    assert_eq!(guard.widget(0).and_then(|w| w.text()), Some(text.as_str()));
                }
            },
            Op::Focus { client, widget } => {
                let client = ClientId(u64::from(client));
                let widget = widget.map(usize::from);
                registry.apply(vec![ScreenUpdate::SetFocus { client, widget }]);
                if let Some(screen) = registry.get_screen(client) {
                    assert_eq!(screen.read().focus(), None, "labels never take focus");
                }
            },
        }

        assert_eq!(registry.clients(), live.iter().copied().collect::<Vec<_>>());
        for id in 0..issued {
            let client = ClientId(id);
            if !live.contains(&client) {
                assert!(registry.get_screen(client).is_none());
            }
        }
    }
});
