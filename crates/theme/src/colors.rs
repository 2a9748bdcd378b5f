use fw_core::WatchError;
use std::str::FromStr;

/// Straight-alpha RGBA colour, each channel in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const DARK:  Self = Self { r: 0.118, g: 0.118, b: 0.180, a: 1.0 }; // #1e1e2e
    pub const WHITE: Self = Self { r: 0.804, g: 0.839, b: 0.957, a: 1.0 }; // #cdd6f4
    pub const PINK:  Self = Self { r: 0.953, g: 0.545, b: 0.659, a: 1.0 }; // #f38ba8
    pub const BLUE:  Self = Self { r: 0.0,   g: 0.0,   b: 1.0,   a: 1.0 };
    pub const RED:   Self = Self { r: 1.0,   g: 0.0,   b: 0.0,   a: 1.0 };
    pub const GREEN: Self = Self { r: 0.0,   g: 1.0,   b: 0.0,   a: 1.0 };

    fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        let unit = |c: u8| f32::from(c) / 255.0;
        Self { r: unit(r), g: unit(g), b: unit(b), a: unit(a) }
    }

    /// Same colour at `opacity`, clamped to `[0, 1]`.
    #[must_use]
    pub fn opacity(self, opacity: f32) -> Self {
        Self { a: opacity.clamp(0.0, 1.0), ..self }
    }
}

/// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`; the leading `#` is optional.
impl FromStr for Color {
    type Err = WatchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits = raw.strip_prefix('#').unwrap_or(raw);
        let value = digits
            .bytes()
            .all(|b| b.is_ascii_hexdigit())
            .then(|| u32::from_str_radix(digits, 16).ok())
            .flatten();

        let rgba = match (digits.len(), value) {
            (3, Some(v)) => {
                let nibble = |shift: u32| ((v >> shift) & 0xf) as u8 * 0x11;
                [nibble(8), nibble(4), nibble(0), 0xff]
            }
            (6, Some(v)) => {
                let [_, r, g, b] = v.to_be_bytes();
                [r, g, b, 0xff]
            }
            (8, Some(v)) => v.to_be_bytes(),
            _ => return Err(WatchError::Config(format!("invalid colour {raw:?}"))),
        };
        Ok(Self::from_rgba8(rgba))
    }
}

impl From<Color> for iced::Color {
    fn from(c: Color) -> Self {
        iced::Color::from_rgba(c.r, c.g, c.b, c.a)
    }
}
