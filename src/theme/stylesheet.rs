//! Extracting decoration-relevant values from a GTK stylesheet.
//!
//! This is not a CSS engine. The only statements that are interpreted are
//! `@define-color <name> <value>;` color variables and the first
//! `font-family:` and `font-size:` declarations; selectors, cascading and
//! everything else is ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::color::parse_color;
use crate::types::Color;

static DEFINE_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@define-color\s+(\w+)\s+([^;]+);").expect("define-color regex is valid")
});

static FONT_FAMILY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"font-family:\s*([^;]+);").expect("font-family regex is valid")
});

static FONT_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"font-size:\s*(\d+)(?:px|pt)?").expect("font-size regex is valid")
});

/// Variable name for the focused titlebar background.
pub const BG_ACTIVE: &str = "theme_bg_color";
/// Variable name for the unfocused titlebar background.
pub const BG_INACTIVE: &str = "theme_unfocused_bg_color";
/// Variable name for the focused titlebar foreground.
pub const FG_ACTIVE: &str = "theme_fg_color";
/// Variable name for the unfocused titlebar foreground.
pub const FG_INACTIVE: &str = "theme_unfocused_fg_color";
/// Second choice for the unfocused titlebar foreground.
pub const FG_INACTIVE_ALT: &str = "unfocused_insensitive_color";

/// The values found in a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Every `@define-color` variable, mapped to its raw, unparsed value.
    ///
    /// When a variable is defined more than once, the last definition wins.
    pub colors: HashMap<String, String>,
    /// The first `font-family` declared, with quotes removed.
    pub font_family: Option<String>,
    /// The first `font-size` declared, in whatever unit the stylesheet used.
    pub font_size: Option<u32>,
}

/// The titlebar colors a stylesheet provides.
///
/// A role is `None` when neither its variable nor any of its fallbacks are defined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TitlebarColors {
    /// Background of a focused titlebar.
    pub bg_active: Option<Color>,
    /// Background of an unfocused titlebar.
    pub bg_inactive: Option<Color>,
    /// Foreground of a focused titlebar.
    pub fg_active: Option<Color>,
    /// Foreground of an unfocused titlebar.
    pub fg_inactive: Option<Color>,
}

impl Stylesheet {
    /// Scans stylesheet text for color variables and font declarations.
    pub fn parse(css: &str) -> Self {
        let colors = DEFINE_COLOR.captures_iter(css)
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .collect();

        let font_family = FONT_FAMILY.captures(css)
            .map(|caps| caps[1].replace(['"', '\''], "").trim().to_string())
            .filter(|family| !family.is_empty());

        let font_size = FONT_SIZE.captures(css)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .filter(|size| *size > 0);

        Self { colors, font_family, font_size }
    }

    /// Looks up a color variable and parses it.
    ///
    /// Returns `None` if the variable is not defined. A defined variable whose value
    /// can't be parsed yields black.
    pub fn color(&self, name: &str) -> Option<Color> {
        self.colors.get(name).map(|raw| parse_color(raw))
    }

    /// Maps the stylesheet's variables onto titlebar color roles.
    ///
    /// - focused background: `theme_bg_color`
    /// - unfocused background: `theme_unfocused_bg_color`, else the focused background
    /// - focused foreground: `theme_fg_color`
    /// - unfocused foreground: `theme_unfocused_fg_color`, else
    ///   `unfocused_insensitive_color`, else the focused foreground
    pub fn titlebar_colors(&self) -> TitlebarColors {
        let bg_active = self.color(BG_ACTIVE);
        let bg_inactive = self.color(BG_INACTIVE).or(bg_active);
        let fg_active = self.color(FG_ACTIVE);
        let fg_inactive = self.color(FG_INACTIVE)
            .or_else(|| self.color(FG_INACTIVE_ALT))
            .or(fg_active);

        TitlebarColors { bg_active, bg_inactive, fg_active, fg_inactive }
    }
}
