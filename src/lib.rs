//! # Toaru Decor - client-side decorations for windows that don't draw their own
//!
//! This crate decides which windows in a compositor get a titlebar, borders and buttons
//! drawn around them, keeps the window's outer margins consistent with that decision, and
//! works out what those decorations should look like by reading the user's GTK theme.
//!
//! It does not draw anything itself. Rasterizing shapes, text and icons is left to
//! whatever renderer the host compositor uses; this crate hands it a [`ThemeSnapshot`]
//! and a set of decisions about what to draw (see the [`render`] module).
//!
//! ## Design
//!
//! Like the rest of the Toaru ecosystem, this crate is coupled to its host through traits.
//! The host compositor owns the window and transaction model, and exposes it through the
//! [`Toplevel`] and [`TransactionScheduler`] traits. The crate never holds on to a window;
//! it only keeps a [`DecorationRecord`] per decorated window, keyed by the window's ID.
//!
//! ### Decoration lifecycle
//!
//! The [`DecorationCoordinator`] receives three kinds of signals from the host: a new
//! transaction being admitted, a window's decoration preference changing, and a window's
//! tiled state changing. In response it attaches or detaches decorations and grows or
//! shrinks the window's pending geometry by the decoration margins. Fullscreen and tiled
//! windows never have their geometry touched.
//!
//! Signals are delivered through a [`SignalBus`], which holds only weak references to its
//! handlers. Connecting to a bus returns a [`Connection`] guard that disconnects on drop.
//!
//! ### Theme resolution
//!
//! The [`StylesheetResolver`] lazily reads the GTK settings file and the active theme's
//! `gtk.css`, and produces an immutable [`ThemeSnapshot`]. Resolution runs at most once per
//! epoch: calling [`invalidate`][1] starts a new epoch, and the next call to
//! [`get_snapshot`][2] resolves the theme again from scratch. Everything in between is a
//! cheap reference count bump.
//!
//! The settings file can be watched for changes with a [`SettingsWatch`], which plugs an
//! inotify descriptor into a `calloop` event loop.
//!
//! ### Threading
//!
//! Everything in this crate is single-threaded and assumes it runs on the compositor's
//! event loop. Shared state is reference counted with [`std::rc::Rc`] and uses
//! [`std::cell::RefCell`] for interior mutability.
//!
//! ## Errors
//!
//! A theming subsystem should never be the reason a window is unusable, so nearly nothing
//! in this crate can fail. Malformed colors, missing settings keys, missing stylesheets
//! and missing icons all fall back to defaults. The only operations that return a
//! [`Result`] are the ones that touch the environment, such as registering a watch.
//!
//! [1]: StylesheetResolver::invalidate
//! [2]: StylesheetResolver::get_snapshot

#![warn(
    missing_debug_implementations,
    missing_docs
)]

pub mod config;
pub mod decoration;
pub mod plugin;
pub mod render;
pub mod theme;
pub mod types;
pub mod watch;

/// Crates that Toaru Decor is tightly integrated with, re-exported for convenience.
pub mod reexports {
    pub use calloop;
}

#[doc(inline)]
pub use crate::config::{DecorationConfig, ToaruDecorConfig};
#[doc(inline)]
pub use crate::decoration::{
    Connection, DecorationCoordinator, DecorationRecord, LifecycleHandler, SignalBus, Toplevel,
    TransactionScheduler,
};
#[doc(inline)]
pub use crate::plugin::GtkDecor;
#[doc(inline)]
pub use crate::theme::{StylesheetResolver, ThemeSnapshot};
#[doc(inline)]
pub use crate::watch::SettingsWatch;

use std::io;

use thiserror::Error;

/// Everything in the environment that could stop Toaru Decor from setting itself up.
///
/// None of these are fatal: decorations keep working with process defaults.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecorError {
    /// `$HOME` is not set, so there is no per-user configuration to read or watch.
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// An I/O error while touching the configuration.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Unable to set up the inotify watch on the settings file.
    #[error("unable to watch settings file: {0}")]
    Watch(#[from] nix::Error),

    /// Unable to register a source with the event loop.
    #[error(transparent)]
    EventLoop(#[from] calloop::Error),

    /// One or more configuration invariants was not upheld.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The general result type used by Toaru Decor.
pub type Result<T> = ::core::result::Result<T, DecorError>;
