//! Types and helpers for configuring decorations.
//!
//! This module contains [`DecorationConfig`], the trait that defines a
//! configuration object usable by a [`DecorationCoordinator`][1] and by the
//! render decisions in [`render`][2]. One type that implements this is already
//! provided: [`ToaruDecorConfig`], which you can build with a
//! [`ToaruDecorConfigBuilder`].
//!
//! [1]: crate::DecorationCoordinator
//! [2]: crate::render

pub mod gtk;
pub mod rules;

use custom_debug_derive::Debug;

use crate::render::ButtonFlags;
use crate::types::Color;
use crate::{DecorError::*, Result};

use rules::WindowRule;

/// A type that can supply server-wide decoration configuration.
pub trait DecorationConfig {
    /// The height of the titlebar, not counting the border.
    fn title_height(&self) -> u32;

    /// The thickness of the border on each side.
    fn border_size(&self) -> u32;

    /// The radius of the titlebar's rounded top corners.
    fn corner_radius(&self) -> u32;

    /// The font description used when the theme provides no font.
    fn font(&self) -> &str;

    /// The title color used when the theme provides no foreground color.
    fn font_color(&self) -> Color;

    /// The titlebar color of a focused window, used when the theme provides none.
    fn active_color(&self) -> Color;

    /// The titlebar color of an unfocused window, used when the theme provides none.
    fn inactive_color(&self) -> Color;

    /// The buttons to show in the titlebar.
    fn buttons(&self) -> ButtonFlags;

    /// Windows that should never be decorated.
    fn ignore_views(&self) -> &WindowRule;

    /// Windows that should always be decorated, unless ignored.
    fn forced_views(&self) -> &WindowRule;
}

/// The central decoration configuration object.
///
/// # Construction
///
/// To build a ToaruDecorConfig, use the [`ToaruDecorConfigBuilder`] type.
///
/// # Example
///
/// ```rust
/// use toaru_decor::config::{ToaruDecorConfig, DecorationConfig, no_checks};
///
/// let config = ToaruDecorConfig::builder()
///     .title_height(24)
///     .finish(no_checks)
///     .expect("invalid config");
///
/// assert_eq!(config.title_height(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct ToaruDecorConfig {
    pub(crate) title_height: u32,
    pub(crate) border_size: u32,
    pub(crate) corner_radius: u32,
    pub(crate) font: String,
    pub(crate) font_color: Color,
    pub(crate) active_color: Color,
    pub(crate) inactive_color: Color,
    pub(crate) buttons: ButtonFlags,
    #[debug(skip)]
    pub(crate) ignore_views: WindowRule,
    #[debug(skip)]
    pub(crate) forced_views: WindowRule,
}

/// A const function that simply returns Ok. Pass this into `finish` if you have no
/// additional checks to run.
pub const fn no_checks(_: &ToaruDecorConfig) -> Result<()> {
    Ok(())
}

impl ToaruDecorConfig {
    /// Returns the default construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a [`ToaruDecorConfigBuilder`] to build your Config with the
    /// 'builder' idiom.
    pub fn builder() -> ToaruDecorConfigBuilder {
        ToaruDecorConfigBuilder::new()
    }

    /// Checks the configuration to verify that all invariants are upheld,
    /// then runs `checks` for any additional invariants of your own.
    pub fn validate<F>(&self, checks: F) -> Result<()>
    where
        F: FnOnce(&ToaruDecorConfig) -> Result<()>,
    {
        if self.title_height == 0 {
            return Err(InvalidConfig("title height is zero".into()));
        }
        // margins are signed, so the whole titlebar has to fit in an i32
        let top = self.title_height
            .checked_add(self.border_size)
            .filter(|top| i32::try_from(*top).is_ok())
            .ok_or_else(|| InvalidConfig(format!(
                "titlebar of height {} with border {} is too large",
                self.title_height, self.border_size
            )))?;
        if self.corner_radius > top {
            return Err(InvalidConfig(format!(
                "corner radius {} does not fit in a titlebar of height {top}",
                self.corner_radius,
            )));
        }
        checks(self)?;
        Ok(())
    }
}

impl Default for ToaruDecorConfig {
    fn default() -> Self {
        Self {
            title_height: 30,
            border_size: 4,
            corner_radius: 12,
            font: "sans-serif".into(),
            font_color: Color::from_hex(0xFFFFFFFF),
            active_color: Color::from_hex(0x222222AA),
            inactive_color: Color::from_hex(0x333333DD),
            buttons: ButtonFlags::default(),
            ignore_views: WindowRule::empty(),
            forced_views: WindowRule::empty(),
        }
    }
}

impl DecorationConfig for ToaruDecorConfig {
    fn title_height(&self) -> u32 {
        self.title_height
    }

    fn border_size(&self) -> u32 {
        self.border_size
    }

    fn corner_radius(&self) -> u32 {
        self.corner_radius
    }

    fn font(&self) -> &str {
        &self.font
    }

    fn font_color(&self) -> Color {
        self.font_color
    }

    fn active_color(&self) -> Color {
        self.active_color
    }

    fn inactive_color(&self) -> Color {
        self.inactive_color
    }

    fn buttons(&self) -> ButtonFlags {
        self.buttons
    }

    fn ignore_views(&self) -> &WindowRule {
        &self.ignore_views
    }

    fn forced_views(&self) -> &WindowRule {
        &self.forced_views
    }
}

/// An ergonomic way to build a [`ToaruDecorConfig`].
#[derive(Debug)]
pub struct ToaruDecorConfigBuilder {
    inner: ToaruDecorConfig,
}

impl ToaruDecorConfigBuilder {
    /// Creates a new builder, starting from the default configuration.
    pub fn new() -> Self {
        Self {
            inner: ToaruDecorConfig::default(),
        }
    }

    /// Sets the titlebar height.
    pub fn title_height(mut self, height: u32) -> Self {
        self.inner.title_height = height;
        self
    }

    /// Sets the border thickness.
    pub fn border_size(mut self, size: u32) -> Self {
        self.inner.border_size = size;
        self
    }

    /// Sets the titlebar corner radius.
    pub fn corner_radius(mut self, radius: u32) -> Self {
        self.inner.corner_radius = radius;
        self
    }

    /// Sets the fallback font description.
    pub fn font<S: Into<String>>(mut self, font: S) -> Self {
        self.inner.font = font.into();
        self
    }

    /// Sets the fallback title color.
    pub fn font_color(mut self, color: Color) -> Self {
        self.inner.font_color = color;
        self
    }

    /// Sets the fallback titlebar color of focused windows.
    pub fn active_color(mut self, color: Color) -> Self {
        self.inner.active_color = color;
        self
    }

    /// Sets the fallback titlebar color of unfocused windows.
    pub fn inactive_color(mut self, color: Color) -> Self {
        self.inner.inactive_color = color;
        self
    }

    /// Sets the titlebar buttons.
    pub fn buttons(mut self, buttons: ButtonFlags) -> Self {
        self.inner.buttons = buttons;
        self
    }

    /// Sets the rule for windows that should never be decorated.
    pub fn ignore_views(mut self, rule: WindowRule) -> Self {
        self.inner.ignore_views = rule;
        self
    }

    /// Sets the rule for windows that should always be decorated.
    pub fn forced_views(mut self, rule: WindowRule) -> Self {
        self.inner.forced_views = rule;
        self
    }

    /// Validates the configuration with `checks`, and returns it if valid.
    pub fn finish<F>(self, checks: F) -> Result<ToaruDecorConfig>
    where
        F: FnOnce(&ToaruDecorConfig) -> Result<()>,
    {
        self.inner.validate(checks)?;
        Ok(self.inner)
    }
}

impl Default for ToaruDecorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
