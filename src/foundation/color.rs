use crate::foundation::math::lerp;

/// Opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict 6-digit hex color (`#rrggbb`, leading `#` optional).
    pub fn from_hex6(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Parse the CSS color forms used by scene documents and vector markup.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` (alpha ignored), `rgb(r,g,b)`, `rgba(r,g,b,a)`
    /// (alpha ignored) and a handful of named colors. Returns `None` for anything else,
    /// including `none` and `currentColor`, which callers resolve themselves.
    pub fn parse_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let mut it = hex.chars().map(|c| c.to_digit(16));
                    let r = it.next()??;
                    let g = it.next()??;
                    let b = it.next()??;
                    Some(Self::new((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
                }
                6 => Self::from_hex6(hex),
                8 => hex.get(0..6).and_then(Self::from_hex6),
                _ => None,
            };
        }

        let lower = s.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));
        if let Some(args) = args {
            let mut channels = args
                .split([',', ' ', '/'])
                .map(str::trim)
                .filter(|p| !p.is_empty());
            let mut next = || -> Option<u8> {
                let part = channels.next()?;
                let v = match part.strip_suffix('%') {
                    Some(pct) => pct.parse::<f64>().ok()? * 2.55,
                    None => part.parse::<f64>().ok()?,
                };
                Some(v.round().clamp(0.0, 255.0) as u8)
            };
            let r = next()?;
            let g = next()?;
            let b = next()?;
            return Some(Self::new(r, g, b));
        }

        named(&lower)
    }

    /// Encode as `rgb(r,g,b)`.
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Component-wise blend in integer 0-255 space, rounded.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        fn channel(a: u8, b: u8, t: f64) -> u8 {
            lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8
        }
        Self::new(
            channel(self.r, other.r, t),
            channel(self.g, other.g, t),
            channel(self.b, other.b, t),
        )
    }
}

/// Blend two 6-digit hex colors and encode the result as `rgb(r,g,b)`.
///
/// When either input is not a 6-digit hex color, `from` is returned unchanged.
pub fn interpolate_hex_colors(from: &str, to: &str, t: f64) -> String {
    match (Rgb8::from_hex6(from), Rgb8::from_hex6(to)) {
        (Some(a), Some(b)) => a.lerp(b, t).to_css(),
        _ => from.to_string(),
    }
}

fn hex_byte(pair: &str) -> Option<u8> {
    u8::from_str_radix(pair, 16).ok()
}

fn named(name: &str) -> Option<Rgb8> {
    let c = match name {
        "black" => Rgb8::BLACK,
        "white" => Rgb8::WHITE,
        "red" => Rgb8::new(255, 0, 0),
        "green" => Rgb8::new(0, 128, 0),
        "lime" => Rgb8::new(0, 255, 0),
        "blue" => Rgb8::new(0, 0, 255),
        "yellow" => Rgb8::new(255, 255, 0),
        "cyan" | "aqua" => Rgb8::new(0, 255, 255),
        "magenta" | "fuchsia" => Rgb8::new(255, 0, 255),
        "orange" => Rgb8::new(255, 165, 0),
        "purple" => Rgb8::new(128, 0, 128),
        "gray" | "grey" => Rgb8::new(128, 128, 128),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
