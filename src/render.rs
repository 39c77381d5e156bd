//! Decisions about what a decoration looks like.
//!
//! Nothing in here draws. Given a [`ThemeSnapshot`] and a [`DecorationConfig`],
//! these functions decide which colors, font, icons and rectangles a renderer
//! should use, and leave rasterization to the host.

use std::path::PathBuf;

use bitflags::bitflags;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::config::DecorationConfig;
use crate::theme::fs::Filesystem;
use crate::theme::{StylesheetResolver, ThemeSnapshot};
use crate::types::{Color, Margins, Rectangle};

/// The alpha applied to button icons that aren't hovered.
pub const ICON_ALPHA: f64 = 0.7;

/// A titlebar button.
///
/// Variants are declared in the order they appear in the titlebar, left to right.
/// Each kind converts into the name of its symbolic icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum ButtonKind {
    /// Minimizes the window.
    #[strum(serialize = "window-minimize-symbolic")]
    Minimize,
    /// Maximizes or unmaximizes the window.
    #[strum(serialize = "window-maximize-symbolic")]
    ToggleMaximize,
    /// Closes the window.
    #[strum(serialize = "window-close-symbolic")]
    Close,
}

impl ButtonKind {
    /// The name of this button's icon in an icon theme.
    pub fn icon_name(self) -> &'static str {
        self.into()
    }

    /// The flag that enables this button.
    pub fn flag(self) -> ButtonFlags {
        match self {
            ButtonKind::Minimize => ButtonFlags::MINIMIZE,
            ButtonKind::ToggleMaximize => ButtonFlags::TOGGLE_MAXIMIZE,
            ButtonKind::Close => ButtonFlags::CLOSE,
        }
    }
}

bitflags! {
    /// The set of buttons shown in a titlebar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonFlags: u8 {
        /// Show a minimize button.
        const MINIMIZE = 1 << 0;
        /// Show a maximize button.
        const TOGGLE_MAXIMIZE = 1 << 1;
        /// Show a close button.
        const CLOSE = 1 << 2;
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        ButtonFlags::all()
    }
}

impl ButtonFlags {
    /// The enabled buttons, left to right.
    pub fn kinds(self) -> impl Iterator<Item = ButtonKind> {
        ButtonKind::iter().filter(move |kind| self.contains(kind.flag()))
    }
}

/// The visual state of a button, as tracked by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonVisualState {
    /// Width of the button, in pixels.
    pub width: i32,
    /// Height of the button, in pixels.
    pub height: i32,
    /// Stroke weight of the button's outline.
    pub border_weight: f64,
    /// Hover animation progress in `[-1, 1]`.
    ///
    /// Positive values mean hovered, negative values mean pressed.
    pub hover_progress: f64,
}

impl ButtonVisualState {
    /// Creates a new state, clamping `hover_progress` into `[-1, 1]`.
    pub fn new(width: i32, height: i32, border_weight: f64, hover_progress: f64) -> Self {
        Self {
            width,
            height,
            border_weight,
            hover_progress: hover_progress.clamp(-1.0, 1.0),
        }
    }

    /// Whether the button is hovered.
    pub fn is_hovered(&self) -> bool {
        self.hover_progress > 0.0
    }

    /// Whether the button is pressed.
    pub fn is_pressed(&self) -> bool {
        self.hover_progress < 0.0
    }
}

/// Everything needed to paint one button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonStyle {
    /// The fill of the button's circle.
    pub background: Color,
    /// The color the symbolic icon is recolored with.
    pub icon_color: Color,
    /// The icon file, if one was found.
    pub icon: Option<PathBuf>,
}

/// The background of a button in the given state.
pub fn button_background(snapshot: &ThemeSnapshot, state: &ButtonVisualState) -> Color {
    if state.is_hovered() {
        snapshot.button_hover_bg
    } else if state.is_pressed() {
        snapshot.button_active_bg
    } else {
        snapshot.button_bg
    }
}

/// The color a button's icon is painted with.
pub fn icon_color<C>(snapshot: &ThemeSnapshot, config: &C, state: &ButtonVisualState) -> Color
where
    C: DecorationConfig + ?Sized,
{
    if state.is_hovered() {
        Color::WHITE
    } else {
        title_color(snapshot, config, true).with_alpha(ICON_ALPHA)
    }
}

/// Works out how to paint a button, looking up its icon through `resolver`.
///
/// The icon is looked up at the button's width.
pub fn button_style<F, C>(
    resolver: &mut StylesheetResolver<F>,
    config: &C,
    kind: ButtonKind,
    state: &ButtonVisualState,
) -> ButtonStyle
where
    F: Filesystem,
    C: DecorationConfig + ?Sized,
{
    let snapshot = resolver.get_snapshot();
    let size = u32::try_from(state.width).unwrap_or(0);

    ButtonStyle {
        background: button_background(&snapshot, state),
        icon_color: icon_color(&snapshot, config, state),
        icon: resolver.find_icon(kind.icon_name(), size),
    }
}

/// The titlebar background of a focused or unfocused window.
///
/// A theme color of pure black is taken to mean the theme didn't say, and
/// the configured color is used instead.
pub fn titlebar_background<C>(snapshot: &ThemeSnapshot, config: &C, active: bool) -> Color
where
    C: DecorationConfig + ?Sized,
{
    match snapshot.titlebar_bg(active) {
        c if c.is_black() && active => config.active_color(),
        c if c.is_black() => config.inactive_color(),
        c => c,
    }
}

/// The title text color of a focused or unfocused window.
pub fn title_color<C>(snapshot: &ThemeSnapshot, config: &C, active: bool) -> Color
where
    C: DecorationConfig + ?Sized,
{
    match snapshot.titlebar_fg(active) {
        c if c.is_black() => config.font_color(),
        c => c,
    }
}

/// The font a title should be drawn in.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleFont {
    /// A family from the theme, at a size in points.
    Themed {
        /// Font family.
        family: String,
        /// Font size.
        size: f64,
    },
    /// The configured font description, used as is.
    Configured(String),
}

/// Chooses the title font.
///
/// A themed family is drawn at 80% of the theme's size, or at half the titlebar
/// height if the theme gives no size. Without a themed family the configured
/// font is used.
pub fn title_font<C>(snapshot: &ThemeSnapshot, config: &C) -> TitleFont
where
    C: DecorationConfig + ?Sized,
{
    match &snapshot.font_family {
        Some(family) => TitleFont::Themed {
            family: family.clone(),
            size: snapshot.font_size
                .map(|size| size as f64 * 0.8)
                .unwrap_or(config.title_height() as f64 * 0.5),
        },
        None => TitleFont::Configured(config.font().to_string()),
    }
}

/// The margins a decoration of the given configuration adds around a window.
pub fn decoration_margins<C>(config: &C) -> Margins
where
    C: DecorationConfig + ?Sized,
{
    // unvalidated configs can be larger than a margin can hold
    let border = i32::try_from(config.border_size()).unwrap_or(i32::MAX);
    let top = i32::try_from(config.title_height())
        .unwrap_or(i32::MAX)
        .saturating_add(border);
    Margins::new(border, border, top, border)
}

/// The regions of a decorated window.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationLayout {
    /// The titlebar, including the top border.
    pub titlebar: Rectangle,
    /// The left border strip, below the titlebar.
    pub left: Rectangle,
    /// The right border strip, below the titlebar.
    pub right: Rectangle,
    /// The bottom border strip, spanning the whole width.
    pub bottom: Rectangle,
    /// The buttons, left to right.
    pub buttons: Vec<(ButtonKind, Rectangle)>,
    /// The radius of the titlebar's top corners.
    pub corner_radius: u32,
}

impl DecorationLayout {
    /// Lays out a decoration occupying `outer`, the window geometry including its margins.
    pub fn new<C>(outer: Rectangle, config: &C) -> Self
    where
        C: DecorationConfig + ?Sized,
    {
        let margins = decoration_margins(config);
        let border = margins.left;

        let (titlebar, rest) = outer.split_at_height(margins.top);
        let (sides, bottom) = rest.split_at_height(rest.size.height - margins.bottom);

        let left = Rectangle::new(
            sides.point.x, sides.point.y, sides.size.height, border.min(sides.size.width)
        );
        let right = Rectangle::new(
            sides.right() - border, sides.point.y, sides.size.height, border.min(sides.size.width)
        );

        // square buttons, right-aligned and centered in the area below the top border
        let side = config.title_height() as i32 * 2 / 3;
        let y = titlebar.point.y + border + (config.title_height() as i32 - side) / 2;
        let kinds: Vec<_> = config.buttons().kinds().collect();
        let count = kinds.len() as i32;
        let mut x = titlebar.right() - border - side * count - border * (count - 1);
        let buttons = kinds.into_iter()
            .map(|kind| {
                let rect = Rectangle::new(x, y, side, side);
                x += side + border;
                (kind, rect)
            })
            .collect();

        Self {
            titlebar,
            left,
            right,
            bottom,
            buttons,
            corner_radius: config.corner_radius(),
        }
    }

    /// The button under a point, if any.
    pub fn button_at(&self, x: i32, y: i32) -> Option<ButtonKind> {
        self.buttons.iter()
            .find(|(_, rect)| {
                x >= rect.point.x && x < rect.right() && y >= rect.point.y && y < rect.bottom()
            })
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{no_checks, ToaruDecorConfig};
    use crate::theme::fs::MemoryFs;
    use crate::theme::{BUTTON_ACTIVE_BG, BUTTON_HOVER_BG};

    fn config() -> ToaruDecorConfig {
        ToaruDecorConfig::new()
    }

    #[test]
    fn test_icon_names() {
        let names: Vec<_> = ButtonFlags::default().kinds().map(ButtonKind::icon_name).collect();
        assert_eq!(names, [
            "window-minimize-symbolic",
            "window-maximize-symbolic",
            "window-close-symbolic",
        ]);

        let names: Vec<_> = (ButtonFlags::CLOSE).kinds().collect();
        assert_eq!(names, [ButtonKind::Close]);
    }

    #[test]
    fn test_button_background_by_state() {
        let snapshot = ThemeSnapshot::default();

        let hovered = ButtonVisualState::new(24, 24, 1.0, 0.5);
        let pressed = ButtonVisualState::new(24, 24, 1.0, -3.0);
        let idle = ButtonVisualState::new(24, 24, 1.0, 0.0);

        assert_eq!(pressed.hover_progress, -1.0);
        assert_eq!(button_background(&snapshot, &hovered), BUTTON_HOVER_BG);
        assert_eq!(button_background(&snapshot, &pressed), BUTTON_ACTIVE_BG);
        assert_eq!(button_background(&snapshot, &idle), snapshot.button_bg);
    }

    #[test]
    fn test_icon_color() {
        let snapshot = ThemeSnapshot::default();
        let cfg = config();

        let hovered = ButtonVisualState::new(24, 24, 1.0, 1.0);
        let idle = ButtonVisualState::new(24, 24, 1.0, 0.0);

        assert_eq!(icon_color(&snapshot, &cfg, &hovered), Color::WHITE);
        assert_eq!(
            icon_color(&snapshot, &cfg, &idle),
            snapshot.titlebar_fg_active.with_alpha(ICON_ALPHA)
        );
    }

    #[test]
    fn test_black_falls_back_to_config() {
        let snapshot = ThemeSnapshot {
            titlebar_bg_active: Color::BLACK,
            titlebar_bg_inactive: Color::BLACK,
            titlebar_fg_active: Color::BLACK,
            ..ThemeSnapshot::default()
        };
        let cfg = config();

        assert_eq!(titlebar_background(&snapshot, &cfg, true), cfg.active_color());
        assert_eq!(titlebar_background(&snapshot, &cfg, false), cfg.inactive_color());
        assert_eq!(title_color(&snapshot, &cfg, true), cfg.font_color());
        assert_eq!(title_color(&snapshot, &cfg, false), snapshot.titlebar_fg_inactive);
    }

    #[test]
    fn test_title_font() {
        let cfg = config();
        let mut snapshot = ThemeSnapshot::default();

        assert_eq!(title_font(&snapshot, &cfg), TitleFont::Configured("sans-serif".into()));

        snapshot.font_family = Some("Cantarell".into());
        assert_eq!(
            title_font(&snapshot, &cfg),
            TitleFont::Themed { family: "Cantarell".into(), size: 15.0 }
        );

        snapshot.font_size = Some(10);
        assert_eq!(
            title_font(&snapshot, &cfg),
            TitleFont::Themed { family: "Cantarell".into(), size: 8.0 }
        );
    }

    #[test]
    fn test_button_style_looks_up_icon_at_width() {
        let fs = MemoryFs::new()
            .with_file("/home/user/.config/gtk-3.0/settings.ini", "gtk-icon-theme-name=Papirus\n")
            .with_file("/usr/share/icons/Papirus/16x16/actions/window-close-symbolic.svg", "");
        let mut resolver = StylesheetResolver::new(&fs, Some("/home/user".into()));

        let state = ButtonVisualState::new(16, 16, 1.0, 0.0);
        let style = button_style(&mut resolver, &config(), ButtonKind::Close, &state);

        assert_eq!(
            style.icon,
            Some(PathBuf::from("/usr/share/icons/Papirus/16x16/actions/window-close-symbolic.svg"))
        );
        assert_eq!(style.background, ThemeSnapshot::default().button_bg);

        let style = button_style(&mut resolver, &config(), ButtonKind::Minimize, &state);
        assert_eq!(style.icon, None);
    }

    #[test]
    fn test_decoration_margins() {
        assert_eq!(decoration_margins(&config()), Margins::new(4, 4, 34, 4));

        let huge = ToaruDecorConfig {
            title_height: u32::MAX,
            border_size: 8,
            ..config()
        };
        assert_eq!(decoration_margins(&huge), Margins::new(8, 8, i32::MAX, 8));

        let huge = ToaruDecorConfig {
            title_height: 30,
            border_size: u32::MAX,
            ..config()
        };
        assert_eq!(decoration_margins(&huge), Margins::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX));
    }

    #[test]
    fn test_layout() {
        let cfg = ToaruDecorConfig::builder()
            .title_height(30)
            .border_size(4)
            .finish(no_checks)
            .expect("valid config");

        // content 400x300 at (100, 100), expanded by (4, 4, 34, 4)
        let outer = Rectangle::new(96, 66, 338, 408);
        let layout = DecorationLayout::new(outer, &cfg);

        assert_eq!(layout.titlebar, Rectangle::new(96, 66, 34, 408));
        assert_eq!(layout.left, Rectangle::new(96, 100, 300, 4));
        assert_eq!(layout.right, Rectangle::new(500, 100, 300, 4));
        assert_eq!(layout.bottom, Rectangle::new(96, 400, 4, 408));
        assert_eq!(layout.corner_radius, 12);

        assert_eq!(layout.buttons.len(), 3);
        let (last, rect) = layout.buttons[2];
        assert_eq!(last, ButtonKind::Close);
        assert_eq!(rect, Rectangle::new(480, 75, 20, 20));
        assert_eq!(rect.right() + 4, layout.titlebar.right());
        assert_eq!(layout.button_at(rect.point.x + 1, rect.point.y + 1), Some(ButtonKind::Close));
        assert_eq!(layout.button_at(outer.point.x, outer.point.y), None);
    }
}
