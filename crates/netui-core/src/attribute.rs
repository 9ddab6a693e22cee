//! Cell attributes and their SGR encoding.
//!
//! An [`Attribute`] fully determines how a cell looks: foreground,
//! background, bold and underline. Encoding always emits all four SGR
//! sequences so the terminal state after an attribute change never depends on
//! what was emitted before it.

use bytes::BufMut;

use crate::escape;

/// Terminal color from the 16-color SGR palette plus the terminal default.
///
/// The discriminant is the SGR offset: foreground is `30 + code`, background
/// is `40 + code`. Light colors sit at offset 60, which lands them on the
/// 90-97 / 100-107 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    /// Black.
    Black = 0,
    /// Red.
    Red = 1,
    /// Green.
    Green = 2,
    /// Yellow.
    Yellow = 3,
    /// Blue.
    Blue = 4,
    /// Magenta.
    Magenta = 5,
    /// Cyan.
    Cyan = 6,
    /// White.
    White = 7,
    /// Terminal default color.
    #[default]
    Default = 9,
    /// Bright black (grey).
    LightBlack = 60,
    /// Bright red.
    LightRed = 61,
    /// Bright green.
    LightGreen = 62,
    /// Bright yellow.
    LightYellow = 63,
    /// Bright blue.
    LightBlue = 64,
    /// Bright magenta.
    LightMagenta = 65,
    /// Bright cyan.
    LightCyan = 66,
    /// Bright white.
    LightWhite = 67,
}

impl Color {
    /// All palette colors in SGR order, default excluded.
    pub const PALETTE: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::LightBlack,
        Self::LightRed,
        Self::LightGreen,
        Self::LightYellow,
        Self::LightBlue,
        Self::LightMagenta,
        Self::LightCyan,
        Self::LightWhite,
    ];

    /// SGR offset of this color.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// SGR foreground parameter (30-37, 39, 90-97).
    #[must_use]
    pub const fn fg_param(self) -> u16 {
        30 + self as u16
    }

    /// SGR background parameter (40-47, 49, 100-107).
    #[must_use]
    pub const fn bg_param(self) -> u16 {
        40 + self as u16
    }

    /// Palette color at `index`, wrapping around the 16 entries.
    #[must_use]
    pub const fn cycle(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    /// Parse a color name such as `black`, `light-red` or `default`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_'], "");
        let color = match normalized.as_str() {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "default" => Self::Default,
            "lightblack" | "grey" | "gray" => Self::LightBlack,
            "lightred" => Self::LightRed,
            "lightgreen" => Self::LightGreen,
            "lightyellow" => Self::LightYellow,
            "lightblue" => Self::LightBlue,
            "lightmagenta" => Self::LightMagenta,
            "lightcyan" => Self::LightCyan,
            "lightwhite" => Self::LightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Visual attributes of a single cell (or of the cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attribute {
    /// Foreground (text) color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Bold text.
    pub bold: bool,
    /// Underlined text.
    pub underline: bool,
}

impl Attribute {
    /// Plain attribute with the given colors.
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, bold: false, underline: false }
    }

    /// Same attribute with bold enabled.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Same attribute with underline enabled.
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Write the SGR sequences selecting this attribute.
    ///
    /// Emits, in order: bold on/off, underline on/off, foreground,
    /// background. Every flag is written explicitly so no reset is needed.
    pub fn encode(self, dst: &mut impl BufMut) {
        dst.put_slice(if self.bold { b"\x1b[1m" } else { b"\x1b[22m" });
        dst.put_slice(if self.underline { b"\x1b[4m" } else { b"\x1b[24m" });
        escape::sgr(dst, self.fg.fg_param());
        escape::sgr(dst, self.bg.bg_param());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(attr: Attribute) -> String {
        let mut out = Vec::new();
        attr.encode(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_attribute_resets_flags() {
        let attr = Attribute::new(Color::White, Color::Black);
        assert_eq!(encoded(attr), "\x1b[22m\x1b[24m\x1b[37m\x1b[40m");
    }

    #[test]
    fn bold_underline_light_colors() {
        let attr = Attribute::new(Color::LightRed, Color::LightWhite).bold().underline();
        assert_eq!(encoded(attr), "\x1b[1m\x1b[4m\x1b[91m\x1b[107m");
    }

    #[test]
    fn default_color_params() {
        assert_eq!(Color::Default.fg_param(), 39);
        assert_eq!(Color::Default.bg_param(), 49);
        assert_eq!(Attribute::default(), Attribute::new(Color::Default, Color::Default));
    }

    #[test]
    fn cycle_wraps_palette() {
        assert_eq!(Color::cycle(0), Color::Black);
        assert_eq!(Color::cycle(9), Color::LightRed);
        assert_eq!(Color::cycle(16), Color::Black);
    }

    #[test]
    fn color_names() {
        assert_eq!(Color::from_name("light-red"), Some(Color::LightRed));
        assert_eq!(Color::from_name("Black"), Some(Color::Black));
        assert_eq!(Color::from_name("default"), Some(Color::Default));
        assert_eq!(Color::from_name("mauve"), None);
    }
}
