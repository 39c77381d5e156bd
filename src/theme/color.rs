//! Parsing CSS color literals.
//!
//! Only the two literal forms GTK themes actually use for `@define-color` are
//! recognized: hex (`#rrggbb`, `#rrggbbaa`) and functional (`rgb(r, g, b)`,
//! `rgba(r, g, b, a)`). Anything else parses as opaque black, so a malformed
//! theme can never abort resolution.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::types::Color;

static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#([0-9a-fA-F]{6})([0-9a-fA-F]{2})?").expect("hex color regex is valid")
});

static FUNCTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([\d.]+))?\s*\)")
        .expect("functional color regex is valid")
});

/// Parses a color literal, falling back to opaque black.
///
/// The first matching literal anywhere in `text` wins, with hex literals tried
/// before functional ones. Channel values are not range-checked: `rgb(300, 0, 0)`
/// yields a red channel above 1.
///
/// # Example
///
/// ```rust
/// use toaru_decor::theme::color::parse_color;
/// use toaru_decor::types::Color;
///
/// assert_eq!(parse_color("#ff000080"), Color::from_bytes(255, 0, 0, 128));
/// assert_eq!(parse_color("rgb(0, 255, 0)"), Color::new(0.0, 1.0, 0.0, 1.0));
/// assert_eq!(parse_color("mix(@a, @b, 0.5)"), Color::BLACK);
/// ```
pub fn parse_color(text: &str) -> Color {
    try_parse_color(text).unwrap_or_else(|| {
        trace!("unrecognized color literal {text:?}, using black");
        Color::BLACK
    })
}

/// Parses a color literal, returning `None` if no literal is recognized.
pub fn try_parse_color(text: &str) -> Option<Color> {
    parse_hex(text).or_else(|| parse_functional(text))
}

fn parse_hex(text: &str) -> Option<Color> {
    let caps = HEX.captures(text)?;
    let digits = caps.get(1)?.as_str();

    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let r = byte(&digits[0..2])?;
    let g = byte(&digits[2..4])?;
    let b = byte(&digits[4..6])?;
    let a = match caps.get(2) {
        Some(alpha) => byte(alpha.as_str())?,
        None => 0xff,
    };

    Some(Color::from_bytes(r, g, b, a))
}

fn parse_functional(text: &str) -> Option<Color> {
    let caps = FUNCTIONAL.captures(text)?;

    // \d+ can still overflow, in which case the literal is unrecognized
    let channel = |i: usize| -> Option<f64> {
        let value = caps.get(i)?.as_str().parse::<u32>().ok()?;
        Some(value as f64 / 255.0)
    };
    let r = channel(1)?;
    let g = channel(2)?;
    let b = channel(3)?;
    let a = match caps.get(4) {
        Some(alpha) => alpha.as_str().parse::<f64>().ok()?,
        None => 1.0,
    };

    Some(Color::new(r, g, b, a))
}
