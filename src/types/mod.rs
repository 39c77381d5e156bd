//! Basic core types used throughout this crate at a high level.

pub mod geometry;

pub use geometry::*;

use bitflags::bitflags;

/// A representation of a color, following the RGBA model.
///
/// Each channel is a proportion of full intensity, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// The red channel.
    pub r: f64,
    /// The green channel.
    pub g: f64,
    /// The blue channel.
    pub b: f64,
    /// The alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque black, what unparseable color literals turn into.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a Color from its channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a Color from 8-bit channels, as found in hex literals.
    pub fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    /// Creates the Color from a 32-bit `0xRRGGBBAA` integer.
    pub fn from_hex(hex: u32) -> Self {
        let [r, g, b, a] = u32::to_be_bytes(hex);
        Self::from_bytes(r, g, b, a)
    }

    /// Returns the (R, G, B, A) values of the Color as bytes.
    ///
    /// Channels outside `[0, 1]` saturate.
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (byte(self.r), byte(self.g), byte(self.b), byte(self.a))
    }

    /// Whether the color channels are all zero, ignoring alpha.
    ///
    /// Renderers treat such a color as "not provided by the theme".
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Returns this color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

bitflags! {
    /// The edges of a window that are tiled against something else.
    ///
    /// A window with all four edges tiled is maximized, and a window
    /// with none is floating.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TiledEdges: u32 {
        /// The top edge is tiled.
        const TOP = 1 << 0;
        /// The bottom edge is tiled.
        const BOTTOM = 1 << 1;
        /// The left edge is tiled.
        const LEFT = 1 << 2;
        /// The right edge is tiled.
        const RIGHT = 1 << 3;
    }
}
