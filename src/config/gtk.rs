//! Reading the user's GTK settings.
//!
//! GTK stores the user's theme choices in a small `key=value` file at
//! `$HOME/.config/gtk-3.0/settings.ini`. Only three keys are of interest here:
//!
//! - `gtk-theme-name`: the theme whose stylesheet supplies colors and fonts.
//! - `gtk-icon-theme-name`: the icon theme to search for button icons.
//! - `gtk-font-name`: the UI font, as `"<family> <size>"`.
//!
//! A missing file, or a missing key, is not an error; the corresponding field is
//! simply absent.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::theme::fs::Filesystem;

/// The settings file, relative to the home directory.
pub const SETTINGS_FILE: &str = ".config/gtk-3.0/settings.ini";

/// The font size used when the settings file names a size that can't be parsed.
pub const DEFAULT_FONT_SIZE: u32 = 11;

const THEME_KEY: &str = "gtk-theme-name";
const ICON_THEME_KEY: &str = "gtk-icon-theme-name";
const FONT_KEY: &str = "gtk-font-name";

/// Returns the path of the settings file under `home`.
pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE)
}

/// The user's home directory, from `$HOME`.
///
/// Returns `None` if `$HOME` is unset or empty.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// The values read from a GTK settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtkSettings {
    /// The value of `gtk-theme-name`.
    pub theme_name: Option<String>,
    /// The value of `gtk-icon-theme-name`.
    pub icon_theme_name: Option<String>,
    /// The value of `gtk-font-name`.
    pub font_name: Option<String>,
}

impl GtkSettings {
    /// Parses the contents of a settings file.
    ///
    /// Each line is `key=value`, with no escaping. Whitespace around keys and values
    /// is ignored, and the first occurrence of a key wins. Empty values are treated
    /// as absent.
    pub fn parse(text: &str) -> Self {
        let mut settings = GtkSettings::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue
            };
            let value = value.trim();
            if value.is_empty() {
                continue
            }

            let slot = match key.trim() {
                THEME_KEY => &mut settings.theme_name,
                ICON_THEME_KEY => &mut settings.icon_theme_name,
                FONT_KEY => &mut settings.font_name,
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        settings
    }

    /// Reads and parses the settings file at `path`.
    ///
    /// Returns `None` if the file does not exist or can't be read.
    pub fn load<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Option<Self> {
        match fs.read_to_string(path) {
            Ok(text) => Some(Self::parse(&text)),
            Err(e) => {
                debug!("could not read GTK settings at {}: {e}", path.display());
                None
            }
        }
    }

    /// Splits `gtk-font-name` into a family and a size.
    ///
    /// See [`parse_font_name`].
    pub fn font(&self) -> Option<(String, Option<u32>)> {
        self.font_name.as_deref().and_then(parse_font_name)
    }
}

/// Splits a GTK font name of the form `"<family> <size>"` at its last space.
///
/// The size is the run of digits the part after the last space starts with, so
/// `"10.5"` and `"10px"` both give 10. If there are no leading digits, or they
/// come to zero, the size falls back to [`DEFAULT_FONT_SIZE`]. A name with no
/// space at all is taken to be just a family, with no size.
///
/// # Example
///
/// ```rust
/// use toaru_decor::config::gtk::parse_font_name;
///
/// assert_eq!(parse_font_name("Cantarell 11"), Some(("Cantarell".into(), Some(11))));
/// assert_eq!(parse_font_name("Cantarell 10.5"), Some(("Cantarell".into(), Some(10))));
/// assert_eq!(parse_font_name("Noto Sans Bold"), Some(("Noto Sans".into(), Some(11))));
/// assert_eq!(parse_font_name("Inter"), Some(("Inter".into(), None)));
/// ```
pub fn parse_font_name(name: &str) -> Option<(String, Option<u32>)> {
    let name = name.trim().trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() {
        return None
    }

    let Some((family, size)) = name.rsplit_once(' ') else {
        return Some((name.to_string(), None))
    };

    let digits = size.find(|c: char| !c.is_ascii_digit()).unwrap_or(size.len());
    let size = size[..digits].parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_FONT_SIZE);

    Some((family.trim_end().to_string(), Some(size)))
}
