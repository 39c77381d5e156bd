//! The lazy, epoch-based theme cache.
//!
//! See [`StylesheetResolver`] for details.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, instrument, warn};

use super::fs::{Filesystem, HostFs};
use super::locate::AssetLocator;
use super::stylesheet::Stylesheet;
use super::{ResolutionState, ThemeSnapshot};
use crate::config::gtk::{self, GtkSettings};

/// Resolves the user's GTK theme into [`ThemeSnapshot`]s, lazily and at most once per epoch.
///
/// ## States
///
/// The resolver starts out [`NotAttempted`][1], holding the default snapshot. The first
/// call to [`get_snapshot`](Self::get_snapshot) runs resolution, installs the resulting
/// snapshot and moves the resolver to [`Attempted`][2] for the current epoch. Until the
/// next [`invalidate`](Self::invalidate), further calls return the same snapshot without
/// touching the filesystem.
///
/// ## Resolution
///
/// 1. The GTK settings file is read for the icon theme and font.
/// 2. If the settings name a GTK theme, its stylesheet is located.
/// 3. The stylesheet's color variables are mapped onto titlebar roles, and its first
///    font declarations override the font from the settings.
///
/// Any step that finds nothing leaves the remaining fields at their defaults. Resolution
/// never fails; at worst it produces the default snapshot.
///
/// ## Snapshots
///
/// Snapshots are handed out as `Rc<ThemeSnapshot>`. Each resolution builds a fresh
/// snapshot and installs it in one step, so a holder never sees a half-updated theme;
/// they simply keep the old one until they ask again.
///
/// [1]: ResolutionState::NotAttempted
/// [2]: ResolutionState::Attempted
#[derive(Debug)]
pub struct StylesheetResolver<F: Filesystem = HostFs> {
    fs: F,
    locator: AssetLocator,
    settings_path: Option<PathBuf>,
    state: ResolutionState,
    epoch: u64,
    snapshot: Rc<ThemeSnapshot>,
    icons: HashMap<(String, u32), Option<PathBuf>>,
}

impl StylesheetResolver<HostFs> {
    /// Creates a resolver for the current user, reading the real filesystem.
    ///
    /// If `$HOME` is not set, only system-wide themes are considered and there
    /// are no user settings, so the snapshot will always be the default one.
    pub fn from_env() -> Self {
        let home = gtk::home_dir();
        if home.is_none() {
            warn!("$HOME is not set, theme resolution will use defaults");
        }
        Self::new(HostFs, home)
    }
}

impl<F: Filesystem> StylesheetResolver<F> {
    /// Creates a resolver over `fs`, for a user whose home directory is `home`.
    pub fn new(fs: F, home: Option<PathBuf>) -> Self {
        let settings_path = home.as_deref().map(gtk::settings_path);
        Self {
            fs,
            locator: AssetLocator::new(home),
            settings_path,
            state: ResolutionState::NotAttempted,
            epoch: 0,
            snapshot: Rc::new(ThemeSnapshot::default()),
            icons: HashMap::new(),
        }
    }

    /// The GTK settings file this resolver reads, if there is one.
    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// The resolver's current state.
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// The current epoch. Starts at 0 and increases by one on every invalidation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the snapshot for the current epoch, resolving it first if needed.
    pub fn get_snapshot(&mut self) -> Rc<ThemeSnapshot> {
        if self.state == ResolutionState::NotAttempted {
            // marked before resolving: a resolution that finds nothing still counts
            self.state = ResolutionState::Attempted(self.epoch);
            self.snapshot = Rc::new(self.resolve());
        }
        Rc::clone(&self.snapshot)
    }

    /// Returns the installed snapshot without resolving anything.
    ///
    /// Before the first resolution of an epoch this is the default snapshot.
    pub fn current(&self) -> Rc<ThemeSnapshot> {
        Rc::clone(&self.snapshot)
    }

    /// Discards the resolved theme and starts a new epoch.
    ///
    /// The default snapshot is installed immediately, and the next call to
    /// [`get_snapshot`](Self::get_snapshot) resolves the theme from scratch,
    /// even if nothing on disk changed.
    pub fn invalidate(&mut self) {
        info!("invalidating resolved theme (epoch {})", self.epoch);
        self.epoch += 1;
        self.state = ResolutionState::NotAttempted;
        self.snapshot = Rc::new(ThemeSnapshot::default());
        self.icons.clear();
    }

    /// Finds an icon in the current icon theme, for a target size in pixels.
    ///
    /// Results are remembered until the next invalidation.
    pub fn find_icon(&mut self, icon_name: &str, size: u32) -> Option<PathBuf> {
        let snapshot = self.get_snapshot();
        let key = (icon_name.to_string(), size);

        if let Some(found) = self.icons.get(&key) {
            return found.clone()
        }

        let found = self.locator.find_icon(&self.fs, &snapshot.icon_theme_name, icon_name, size);
        if found.is_none() {
            debug!("icon {icon_name} ({size}px) not found in {}", snapshot.icon_theme_name);
        }
        self.icons.insert(key, found.clone());
        found
    }

    #[instrument(level = "debug", skip(self), fields(epoch = self.epoch))]
    fn resolve(&self) -> ThemeSnapshot {
        let mut snapshot = ThemeSnapshot::default();

        let settings = self.settings_path()
            .and_then(|path| GtkSettings::load(&self.fs, path))
            .unwrap_or_default();

        if let Some(icon_theme) = &settings.icon_theme_name {
            snapshot.icon_theme_name = icon_theme.clone();
        }
        info!("using icon theme {}", snapshot.icon_theme_name);

        if let Some((family, size)) = settings.font() {
            info!("found GTK font: {family} {size:?}");
            snapshot.font_family = Some(family);
            snapshot.font_size = size;
        }

        let Some(theme_name) = settings.theme_name.as_deref() else {
            warn!("could not determine GTK theme name, using fallback colors");
            return snapshot
        };
        info!("found GTK theme: {theme_name}");

        let Some(css_path) = self.locator.find_stylesheet(&self.fs, theme_name) else {
            warn!("could not find a stylesheet for theme {theme_name}");
            return snapshot
        };

        let css = match self.fs.read_to_string(&css_path) {
            Ok(css) => css,
            Err(e) => {
                warn!("failed to read theme stylesheet {}: {e}", css_path.display());
                return snapshot
            }
        };
        info!("loading theme stylesheet from {}", css_path.display());

        let sheet = Stylesheet::parse(&css);
        let colors = sheet.titlebar_colors();

        // inactive roles fall back to whatever the active role ended up as,
        // including its default
        if let Some(bg) = colors.bg_active {
            snapshot.titlebar_bg_active = bg;
        }
        snapshot.titlebar_bg_inactive = colors.bg_inactive.unwrap_or(snapshot.titlebar_bg_active);

        if let Some(fg) = colors.fg_active {
            snapshot.titlebar_fg_active = fg;
        }
        snapshot.titlebar_fg_inactive = colors.fg_inactive.unwrap_or(snapshot.titlebar_fg_active);

        if let Some(family) = sheet.font_family {
            info!("found theme font family: {family}");
            snapshot.font_family = Some(family);
        }
        if let Some(size) = sheet.font_size {
            info!("found theme font size: {size}");
            snapshot.font_size = Some(size);
        }

        let (r, g, b, _) = snapshot.titlebar_bg_active.rgba();
        info!(
            "titlebar bg active: rgba({r}, {g}, {b}, {})",
            snapshot.titlebar_bg_active.a
        );

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    use crate::theme::fs::MemoryFs;
    use crate::theme::{BUTTON_BG, DEFAULT_ICON_THEME};
    use crate::types::Color;

    const HOME: &str = "/home/user";
    const SETTINGS: &str = "/home/user/.config/gtk-3.0/settings.ini";

    fn resolver(fs: &MemoryFs) -> StylesheetResolver<&MemoryFs> {
        StylesheetResolver::new(fs, Some(PathBuf::from(HOME)))
    }

    fn themed_fs() -> MemoryFs {
        MemoryFs::new()
            .with_file(SETTINGS, "[Settings]\ngtk-theme-name=Midnight\ngtk-icon-theme-name=Papirus\ngtk-font-name=Cantarell 11\n")
            .with_file(
                "/usr/share/themes/Midnight/gtk-3.0/gtk.css",
                "@define-color theme_bg_color #202020; @define-color theme_fg_color rgba(230,230,230,1.0);",
            )
    }

    #[test]
    fn test_resolves_theme_colors() {
        let fs = themed_fs();
        let mut resolver = resolver(&fs);
        let snapshot = resolver.get_snapshot();

        let bg = 0x20 as f64 / 255.0;
        let fg = 230.0 / 255.0;
        assert_eq!(snapshot.titlebar_bg_active, Color::new(bg, bg, bg, 1.0));
        assert_eq!(snapshot.titlebar_fg_active, Color::new(fg, fg, fg, 1.0));
        assert_eq!(snapshot.titlebar_bg_inactive, snapshot.titlebar_bg_active);
        assert_eq!(snapshot.titlebar_fg_inactive, snapshot.titlebar_fg_active);
        assert_eq!(snapshot.button_bg, BUTTON_BG);
        assert_eq!(snapshot.icon_theme_name, "Papirus");
        assert_eq!(snapshot.font_family.as_deref(), Some("Cantarell"));
        assert_eq!(snapshot.font_size, Some(11));
        assert_eq!(resolver.state(), ResolutionState::Attempted(0));
    }

    #[test]
    fn test_memoized_within_epoch() {
        let fs = themed_fs();
        let mut resolver = resolver(&fs);

        let first = resolver.get_snapshot();
        let after_first = fs.accesses();
        assert!(after_first > 0);

        let second = resolver.get_snapshot();
        assert_eq!(fs.accesses(), after_first);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_rereads_settings() {
        let fs = themed_fs();
        let mut resolver = resolver(&fs);

        resolver.get_snapshot();
        let reads = fs.reads();

        resolver.invalidate();
        assert_eq!(resolver.state(), ResolutionState::NotAttempted);
        assert_eq!(resolver.epoch(), 1);
        assert_eq!(*resolver.current(), ThemeSnapshot::default());

        let snapshot = resolver.get_snapshot();
        assert!(fs.reads() > reads);
        assert_eq!(snapshot.icon_theme_name, "Papirus");
        assert_eq!(resolver.state(), ResolutionState::Attempted(1));
    }

    #[test]
    fn test_old_snapshot_survives_invalidation() {
        let fs = themed_fs();
        let mut resolver = resolver(&fs);

        let held = resolver.get_snapshot();
        resolver.invalidate();
        let fresh = resolver.get_snapshot();

        assert_eq!(held.icon_theme_name, "Papirus");
        assert!(!Rc::ptr_eq(&held, &fresh));
        assert_eq!(*held, *fresh);
    }

    #[test]
    fn test_no_settings_file() {
        let fs = MemoryFs::new();
        let mut resolver = resolver(&fs);

        assert_eq!(*resolver.get_snapshot(), ThemeSnapshot::default());
        assert_eq!(resolver.state(), ResolutionState::Attempted(0));

        // the failed attempt is memoized too
        let accesses = fs.accesses();
        resolver.get_snapshot();
        assert_eq!(fs.accesses(), accesses);
    }

    #[test]
    fn test_no_home() {
        let fs = themed_fs();
        let mut resolver = StylesheetResolver::new(&fs, None);

        assert_eq!(resolver.settings_path(), None);
        assert_eq!(*resolver.get_snapshot(), ThemeSnapshot::default());
    }

    #[test]
    fn test_missing_theme_keeps_font_and_icons() {
        let fs = MemoryFs::new()
            .with_file(SETTINGS, "gtk-icon-theme-name=Papirus\ngtk-font-name=Inter 10\n");
        let mut resolver = resolver(&fs);
        let snapshot = resolver.get_snapshot();

        assert_eq!(snapshot.icon_theme_name, "Papirus");
        assert_eq!(snapshot.font_family.as_deref(), Some("Inter"));
        assert_eq!(snapshot.titlebar_bg_active, ThemeSnapshot::default().titlebar_bg_active);
    }

    #[test]
    fn test_missing_stylesheet_keeps_defaults() {
        let fs = MemoryFs::new().with_file(SETTINGS, "gtk-theme-name=Nowhere\n");
        let mut resolver = resolver(&fs);
        let snapshot = resolver.get_snapshot();

        assert_eq!(snapshot.icon_theme_name, DEFAULT_ICON_THEME);
        assert_eq!(*snapshot, ThemeSnapshot::default());
    }

    #[test]
    fn test_stylesheet_font_overrides_settings() {
        let fs = MemoryFs::new()
            .with_file(SETTINGS, "gtk-theme-name=Arc\ngtk-font-name=Cantarell 11\n")
            .with_file(
                "/home/user/.themes/Arc/gtk-3.0/gtk.css",
                "* { font-family: \"Fira Sans\"; font-size: 13px; }",
            );
        let snapshot = resolver(&fs).get_snapshot();

        assert_eq!(snapshot.font_family.as_deref(), Some("Fira Sans"));
        assert_eq!(snapshot.font_size, Some(13));
    }

    #[test]
    fn test_missing_active_inactive_copies_default_active() {
        let fs = MemoryFs::new()
            .with_file(SETTINGS, "gtk-theme-name=Arc\n")
            .with_file("/home/user/.themes/Arc/gtk-3.0/gtk.css", "@define-color theme_fg_color #ffffff;");
        let snapshot = resolver(&fs).get_snapshot();

        let default = ThemeSnapshot::default();
        assert_eq!(snapshot.titlebar_bg_active, default.titlebar_bg_active);
        assert_eq!(snapshot.titlebar_bg_inactive, default.titlebar_bg_active);
        assert_eq!(snapshot.titlebar_fg_active, Color::WHITE);
    }

    #[test]
    fn test_find_icon_memoized_per_epoch() {
        let fs = themed_fs()
            .with_file("/usr/share/icons/Papirus/scalable/actions/window-close-symbolic.svg", "");
        let mut resolver = resolver(&fs);

        let expected = PathBuf::from("/usr/share/icons/Papirus/scalable/actions/window-close-symbolic.svg");
        assert_eq!(resolver.find_icon("window-close-symbolic", 24), Some(expected.clone()));

        let accesses = fs.accesses();
        assert_eq!(resolver.find_icon("window-close-symbolic", 24), Some(expected));
        assert_eq!(fs.accesses(), accesses);

        assert_eq!(resolver.find_icon("window-shade-symbolic", 24), None);
    }
}
