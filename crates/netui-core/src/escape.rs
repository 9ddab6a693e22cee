//! Escape sequence encoding.
//!
//! Byte-level encoding of the handful of terminal commands the renderer
//! needs. Coordinates are 0-indexed here and converted to the 1-indexed form
//! terminals expect.

use bytes::BufMut;

/// Sequence sent once when a client connects: full reset, default
/// background, cursor home, clear screen and scrollback.
pub const RESET: &[u8] = b"\x1bc\x1b[49m\x1b[H\x1b[2J\x1b[3J";

/// Write the terminal reset sequence.
pub fn reset(dst: &mut impl BufMut) {
    dst.put_slice(RESET);
}

/// Move the cursor to `(x, y)` (CUP, `ESC [ row ; col H`).
pub fn cursor_to(dst: &mut impl BufMut, x: u16, y: u16) {
    dst.put_slice(b"\x1b[");
    put_decimal(dst, u32::from(y) + 1);
    dst.put_u8(b';');
    put_decimal(dst, u32::from(x) + 1);
    dst.put_u8(b'H');
}

/// Write a single-parameter SGR sequence (`ESC [ n m`).
pub fn sgr(dst: &mut impl BufMut, param: u16) {
    dst.put_slice(b"\x1b[");
    put_decimal(dst, u32::from(param));
    dst.put_u8(b'm');
}

/// Write a character as UTF-8.
pub fn put_char(dst: &mut impl BufMut, ch: char) {
    let mut utf8 = [0u8; 4];
    dst.put_slice(ch.encode_utf8(&mut utf8).as_bytes());
}

fn put_decimal(dst: &mut impl BufMut, mut n: u32) {
    let mut digits = [0u8; 10];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    dst.put_slice(&digits[start..]);
}
