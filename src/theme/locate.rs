//! Locating theme assets on disk.
//!
//! The [`AssetLocator`] turns a theme name into a stylesheet path, and an icon name
//! into an icon file, by probing a fixed set of directories in a fixed order. The
//! order is a best-effort emulation of how GTK looks these up, not a faithful
//! implementation of the icon theme specification.
//!
//! The search order is data: the tables in this module list the directories and
//! file name templates that are probed, and [`AssetLocator::stylesheet_candidates`]
//! and [`AssetLocator::icon_candidates`] expand them into the exact sequence of
//! paths that will be checked. The `find_*` methods return the first candidate
//! that exists on a given [`Filesystem`].

use std::path::{Path, PathBuf};

use tracing::trace;

use super::fs::Filesystem;

/// The icon theme probed as a last resort when an icon is missing from the active one.
pub const FALLBACK_ICON_THEME: &str = "Adwaita";

/// A directory that is searched for assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRoot {
    /// A directory relative to the user's home. Skipped when there is no home.
    Home(&'static str),
    /// An absolute, system-wide directory.
    System(&'static str),
}

impl SearchRoot {
    fn resolve(self, home: Option<&Path>) -> Option<PathBuf> {
        match self {
            SearchRoot::Home(rel) => home.map(|h| h.join(rel)),
            SearchRoot::System(abs) => Some(PathBuf::from(abs)),
        }
    }
}

/// Where themes live, searched in order.
pub const THEME_ROOTS: &[SearchRoot] = &[
    SearchRoot::Home(".themes"),
    SearchRoot::System("/usr/share/themes"),
    SearchRoot::System("/usr/local/share/themes"),
];

/// The stylesheets looked for inside a theme, light variant first.
pub const STYLESHEET_FILES: &[&str] = &["gtk-3.0/gtk.css", "gtk-3.0/gtk-dark.css"];

/// Where icon themes live, searched in order.
pub const ICON_ROOTS: &[SearchRoot] = &[
    SearchRoot::Home(".icons"),
    SearchRoot::Home(".local/share/icons"),
    SearchRoot::System("/usr/share/icons"),
    SearchRoot::System("/usr/local/share/icons"),
];

/// A size directory inside an icon theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDir {
    /// `symbolic/`
    Symbolic,
    /// `<target>x<target>/`, for the requested size.
    Target,
    /// `scalable/`
    Scalable,
    /// A fixed `<n>x<n>/` directory.
    Fixed(u32),
}

impl SizeDir {
    fn dir_name(self, target: u32) -> String {
        match self {
            SizeDir::Symbolic => "symbolic".into(),
            SizeDir::Target => format!("{target}x{target}"),
            SizeDir::Scalable => "scalable".into(),
            SizeDir::Fixed(n) => format!("{n}x{n}"),
        }
    }
}

/// The size directories probed inside an icon theme, in order of preference.
pub const ICON_SIZE_DIRS: &[SizeDir] = &[
    SizeDir::Symbolic,
    SizeDir::Target,
    SizeDir::Scalable,
    SizeDir::Fixed(16),
    SizeDir::Fixed(22),
    SizeDir::Fixed(24),
    SizeDir::Fixed(32),
    SizeDir::Fixed(48),
];

/// The category directories probed inside each size directory, in order.
///
/// `None` means the icon sits directly in the size directory.
pub const ICON_CATEGORIES: &[Option<&str>] = &[
    Some("actions"),
    Some("ui"),
    Some("status"),
    Some("places"),
    None,
];

/// Icon file formats, in order of preference.
pub const ICON_EXTENSIONS: &[&str] = &["svg", "png"];

/// Finds theme assets by probing a fixed set of directories.
#[derive(Debug, Clone, Default)]
pub struct AssetLocator {
    home: Option<PathBuf>,
}

impl AssetLocator {
    /// Creates a new locator that searches under `home` as well as the system directories.
    ///
    /// If `home` is `None`, only the system-wide directories are searched.
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    /// The home directory the locator searches under, if any.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Lists every path [`find_stylesheet`](Self::find_stylesheet) checks, in order.
    pub fn stylesheet_candidates(&self, theme_name: &str) -> Vec<PathBuf> {
        if theme_name.is_empty() {
            return Vec::new()
        }

        THEME_ROOTS.iter()
            .filter_map(|root| root.resolve(self.home()))
            .flat_map(|root| {
                STYLESHEET_FILES.iter().map(move |file| root.join(theme_name).join(file))
            })
            .collect()
    }

    /// Finds the stylesheet of the given GTK theme.
    ///
    /// The first candidate that exists wins; its content is not checked.
    pub fn find_stylesheet<F>(&self, fs: &F, theme_name: &str) -> Option<PathBuf>
    where
        F: Filesystem + ?Sized,
    {
        first_existing(fs, self.stylesheet_candidates(theme_name))
    }

    /// Lists every path [`find_icon`](Self::find_icon) checks, in order.
    ///
    /// This includes the final probe of the [`FALLBACK_ICON_THEME`], unless
    /// `icon_theme` already is the fallback theme.
    pub fn icon_candidates(&self, icon_theme: &str, icon_name: &str, size: u32) -> Vec<PathBuf> {
        if icon_theme.is_empty() || icon_name.is_empty() {
            return Vec::new()
        }

        let roots: Vec<PathBuf> = ICON_ROOTS.iter()
            .filter_map(|root| root.resolve(self.home()))
            .collect();

        let mut candidates = Vec::new();

        for root in &roots {
            let theme_dir = root.join(icon_theme);
            for size_dir in ICON_SIZE_DIRS {
                let size_dir = theme_dir.join(size_dir.dir_name(size));
                for category in ICON_CATEGORIES {
                    let dir = match category {
                        Some(category) => size_dir.join(category),
                        None => size_dir.clone(),
                    };
                    for ext in ICON_EXTENSIONS {
                        candidates.push(dir.join(format!("{icon_name}.{ext}")));
                    }
                }
            }
        }

        if icon_theme != FALLBACK_ICON_THEME {
            for root in &roots {
                candidates.push(
                    root.join(FALLBACK_ICON_THEME)
                        .join("symbolic/ui")
                        .join(format!("{icon_name}.svg"))
                );
            }
        }

        candidates
    }

    /// Finds an icon in the given icon theme, for a target size in pixels.
    pub fn find_icon<F>(&self, fs: &F, icon_theme: &str, icon_name: &str, size: u32) -> Option<PathBuf>
    where
        F: Filesystem + ?Sized,
    {
        first_existing(fs, self.icon_candidates(icon_theme, icon_name, size))
    }
}

fn first_existing<F, I>(fs: &F, candidates: I) -> Option<PathBuf>
where
    F: Filesystem + ?Sized,
    I: IntoIterator<Item = PathBuf>,
{
    let found = candidates.into_iter().find(|path| fs.exists(path));
    if let Some(path) = &found {
        trace!("found asset at {}", path.display());
    }
    found
}
