//! Resolving the user's GTK theme into values a decoration renderer can use.
//!
//! The entry point is the [`StylesheetResolver`], which produces [`ThemeSnapshot`]s.
//! The other modules are the pieces it is built from:
//!
//! - [`color`] parses CSS color literals.
//! - [`locate`] finds stylesheets and icons on disk.
//! - [`stylesheet`] pulls color variables and fonts out of a stylesheet.
//! - [`fs`] abstracts the filesystem, so all of the above can be tested without one.

pub mod color;
pub mod fs;
pub mod locate;
pub mod resolver;
pub mod stylesheet;

#[doc(inline)]
pub use resolver::StylesheetResolver;

use crate::types::Color;

/// The icon theme used when the user hasn't chosen one.
pub const DEFAULT_ICON_THEME: &str = "hicolor";

/// Button background in its normal state.
pub const BUTTON_BG: Color = Color::new(0.4, 0.4, 0.4, 0.3);
/// Button background while hovered.
pub const BUTTON_HOVER_BG: Color = Color::new(0.5, 0.5, 0.5, 0.4);
/// Button background while pressed.
pub const BUTTON_ACTIVE_BG: Color = Color::new(0.3, 0.3, 0.3, 0.5);

/// An immutable set of resolved visual values, used for one rendering pass.
///
/// A snapshot is either the default snapshot, which never references the disk,
/// or the product of exactly one resolution pass. Each field falls back to its
/// default independently, so a resolved snapshot may well have theme colors
/// but the default font.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSnapshot {
    /// Titlebar background of a focused window.
    pub titlebar_bg_active: Color,
    /// Titlebar background of an unfocused window.
    pub titlebar_bg_inactive: Color,
    /// Titlebar foreground of a focused window.
    pub titlebar_fg_active: Color,
    /// Titlebar foreground of an unfocused window.
    pub titlebar_fg_inactive: Color,
    /// Button background in its normal state.
    pub button_bg: Color,
    /// Button background while hovered.
    pub button_hover_bg: Color,
    /// Button background while pressed.
    pub button_active_bg: Color,
    /// The font family, if the theme or settings name one.
    pub font_family: Option<String>,
    /// The font size, if the theme or settings name one. Always positive.
    pub font_size: Option<u32>,
    /// The icon theme to look up button icons in.
    pub icon_theme_name: String,
}

impl Default for ThemeSnapshot {
    fn default() -> Self {
        Self {
            titlebar_bg_active: Color::new(0.1, 0.1, 0.15, 1.0),
            titlebar_bg_inactive: Color::new(0.15, 0.15, 0.2, 1.0),
            titlebar_fg_active: Color::new(0.9, 0.9, 0.93, 1.0),
            titlebar_fg_inactive: Color::new(0.7, 0.7, 0.73, 0.7),
            button_bg: BUTTON_BG,
            button_hover_bg: BUTTON_HOVER_BG,
            button_active_bg: BUTTON_ACTIVE_BG,
            font_family: None,
            font_size: None,
            icon_theme_name: DEFAULT_ICON_THEME.into(),
        }
    }
}

impl ThemeSnapshot {
    /// The titlebar background for a focused or unfocused window.
    pub fn titlebar_bg(&self, active: bool) -> Color {
        if active { self.titlebar_bg_active } else { self.titlebar_bg_inactive }
    }

    /// The titlebar foreground for a focused or unfocused window.
    pub fn titlebar_fg(&self, active: bool) -> Color {
        if active { self.titlebar_fg_active } else { self.titlebar_fg_inactive }
    }
}

/// Whether theme resolution has run in the current epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Resolution has not run since the last invalidation.
    NotAttempted,
    /// Resolution ran during the given epoch.
    Attempted(u64),
}
