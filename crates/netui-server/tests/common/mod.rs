//! Shared helpers for connection tests.
//!
//! [`Terminal`] replays server output into a character grid so tests can
//! assert on what a client would see rather than on raw escape bytes.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Minimal terminal emulator covering the sequences the server emits.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    height: usize,
    cells: Vec<char>,
    x: usize,
    y: usize,
    resets: usize,
}

impl Terminal {
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (usize::from(width), usize::from(height));
        Self { width, height, cells: vec![' '; width * height], x: 0, y: 0, resets: 0 }
    }

    /// Replay `bytes` from a fresh state.
    pub fn replay(width: u16, height: u16, bytes: &[u8]) -> Self {
        let mut term = Self::new(width, height);
        term.feed(bytes);
        term
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch != '\x1b' {
                self.put(ch);
                continue;
            }
            match chars.next() {
                Some('c') => {
                    self.cells.fill(' ');
                    self.x = 0;
                    self.y = 0;
                    self.resets += 1;
                },
                Some('[') => {
                    let mut params = String::new();
                    let mut command = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_alphabetic() {
                            command = Some(c);
                            break;
                        }
                        params.push(c);
                    }
                    self.csi(&params, command);
                },
                _ => {},
            }
        }
    }

    fn csi(&mut self, params: &str, command: Option<char>) {
        match command {
            Some('H') if params.is_empty() => {
                self.x = 0;
                self.y = 0;
            },
            Some('H') => {
                let mut parts = params.split(';').map(|p| p.parse::<usize>().unwrap_or(1));
                self.y = parts.next().unwrap_or(1).saturating_sub(1);
                self.x = parts.next().unwrap_or(1).saturating_sub(1);
            },
            Some('J') => self.cells.fill(' '),
            _ => {},
        }
    }

    fn put(&mut self, ch: char) {
        if self.x < self.width && self.y < self.height {
            self.cells[self.y * self.width + self.x] = ch;
        }
        self.x += 1;
    }

    pub fn row(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width].iter().collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(needle))
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

/// Read from `reader` into `output` until the replayed terminal satisfies
/// `done`. Panics after a few seconds.
pub async fn read_until<R, F>(
    reader: &mut R,
    output: &mut Vec<u8>,
    (width, height): (u16, u16),
    done: F,
) -> Terminal
where
    R: AsyncRead + Unpin,
    F: Fn(&Terminal) -> bool,
{
    let wait = async {
        let mut chunk = [0u8; 1024];
        loop {
            let term = Terminal::replay(width, height, output);
            if done(&term) {
                return term;
            }
            let n = reader.read(&mut chunk).await.unwrap();
            assert!(n > 0, "stream closed before condition was met");
            output.extend_from_slice(&chunk[..n]);
        }
    };
    let result = tokio::time::timeout(Duration::from_secs(5), wait).await;
    match result {
        Ok(term) => term,
        Err(_) => panic!("timed out; screen was:\n{:?}", Terminal::replay(width, height, output)),
    }
}
