//! Everything wired together.
//!
//! [`GtkDecor`] owns a [`DecorationCoordinator`] and a [`StylesheetResolver`], connects
//! the coordinator to the host's [`SignalBus`], and reloads the theme when the GTK
//! settings file changes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use calloop::LoopHandle;
use tracing::{info, warn};

use crate::config::DecorationConfig;
use crate::decoration::{
    Connection, DecorationCoordinator, SignalBus, Toplevel, TransactionScheduler,
};
use crate::theme::fs::{Filesystem, HostFs};
use crate::theme::{StylesheetResolver, ThemeSnapshot};
use crate::watch::SettingsWatch;
use crate::{DecorError, Result};

/// GTK-themed client-side decorations for a host compositor.
///
/// # Usage
///
/// 1. Create it with [`new`](Self::new) or [`from_env`](Self::from_env).
/// 2. Call [`init`](Self::init) with the host's signal bus and existing windows.
/// 3. Optionally call [`watch_settings`](Self::watch_settings) to reload the theme
///    whenever the user changes it.
/// 4. At render time, read the theme with [`snapshot`](Self::snapshot), or go through
///    [`resolver`](Self::resolver) to look up icons.
/// 5. Call [`fini`](Self::fini) on shutdown.
pub struct GtkDecor<W, C, F = HostFs>
where
    W: Toplevel + 'static,
    C: DecorationConfig + 'static,
    F: Filesystem + 'static,
{
    coordinator: Rc<RefCell<DecorationCoordinator<W, C>>>,
    resolver: Rc<RefCell<StylesheetResolver<F>>>,
    connection: Option<Connection>,
    watch: Option<SettingsWatch>,
}

impl<W, C> GtkDecor<W, C, HostFs>
where
    W: Toplevel + 'static,
    C: DecorationConfig + 'static,
{
    /// Creates decorations themed from the current user's GTK settings.
    pub fn from_env(config: C) -> Self {
        Self::new(config, StylesheetResolver::from_env())
    }
}

impl<W, C, F> GtkDecor<W, C, F>
where
    W: Toplevel + 'static,
    C: DecorationConfig + 'static,
    F: Filesystem + 'static,
{
    /// Creates decorations using the given configuration and resolver.
    pub fn new(config: C, resolver: StylesheetResolver<F>) -> Self {
        Self {
            coordinator: Rc::new(RefCell::new(DecorationCoordinator::new(config))),
            resolver: Rc::new(RefCell::new(resolver)),
            connection: None,
            watch: None,
        }
    }

    /// The lifecycle coordinator.
    pub fn coordinator(&self) -> &Rc<RefCell<DecorationCoordinator<W, C>>> {
        &self.coordinator
    }

    /// The theme resolver.
    pub fn resolver(&self) -> &Rc<RefCell<StylesheetResolver<F>>> {
        &self.resolver
    }

    /// The theme to render with, resolving it first if needed.
    pub fn snapshot(&self) -> Rc<ThemeSnapshot> {
        self.resolver.borrow_mut().get_snapshot()
    }

    /// Whether the settings file is being watched.
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Connects to the host's signals and decorates the windows that already exist.
    pub fn init(
        &mut self,
        bus: &SignalBus<W>,
        windows: &mut [&mut W],
        sched: &mut dyn TransactionScheduler<W>,
    ) {
        self.connection = Some(bus.connect(&self.coordinator));
        self.coordinator.borrow_mut().init(windows, sched);
    }

    /// Starts reloading the theme when the GTK settings file changes.
    ///
    /// After each change the theme is invalidated, and `on_reload` is called with the
    /// IDs of every decorated window so the host can damage them.
    ///
    /// Failing to set up the watch is not fatal: decorations keep working with the
    /// theme as it was, they just won't follow changes.
    pub fn watch_settings<D, R>(&mut self, handle: &LoopHandle<'static, D>, mut on_reload: R) -> Result<()>
    where
        D: 'static,
        R: FnMut(&mut D, &[W::Id]) + 'static,
    {
        let Some(path) = self.resolver.borrow().settings_path().map(|p| p.to_path_buf()) else {
            warn!("no settings file to watch, theme changes will not be picked up");
            return Err(DecorError::NoHomeDir)
        };

        let resolver = Rc::clone(&self.resolver);
        let coordinator = Rc::clone(&self.coordinator);

        let watch = SettingsWatch::new(handle, &path, move |data| {
            info!("GTK settings changed, reloading theme");
            resolver.borrow_mut().invalidate();
            let decorated: Vec<_> = coordinator.borrow().decorated().cloned().collect();
            on_reload(data, &decorated);
        }).inspect_err(|e| warn!("unable to watch {}: {e}", path.display()))?;

        self.watch = Some(watch);
        Ok(())
    }

    /// Invalidates the theme by hand, returning the IDs of the windows to redraw.
    pub fn reload_theme(&self) -> Vec<W::Id> {
        self.resolver.borrow_mut().invalidate();
        self.coordinator.borrow().decorated().cloned().collect()
    }

    /// Stops watching, disconnects from the host, and undecorates every window.
    pub fn fini(&mut self, windows: &mut [&mut W], sched: &mut dyn TransactionScheduler<W>) {
        self.watch = None;
        if let Some(conn) = self.connection.take() {
            conn.disconnect();
        }
        self.coordinator.borrow_mut().fini(windows, sched);
    }
}

impl<W, C, F> fmt::Debug for GtkDecor<W, C, F>
where
    W: Toplevel + 'static,
    C: DecorationConfig + 'static,
    F: Filesystem + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GtkDecor")
            .field("connected", &self.connection.is_some())
            .field("watching", &self.watch.is_some())
            .field("epoch", &self.resolver.borrow().epoch())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use calloop::EventLoop;

    use crate::config::ToaruDecorConfig;
    use crate::decoration::testing::{RecordingScheduler, TestWindow};
    use crate::theme::fs::MemoryFs;
    use crate::theme::ResolutionState;

    type Decor<F> = GtkDecor<TestWindow, ToaruDecorConfig, F>;

    fn memory_decor() -> Decor<MemoryFs> {
        let fs = MemoryFs::new()
            .with_file("/home/user/.config/gtk-3.0/settings.ini", "gtk-icon-theme-name=Papirus\n");
        GtkDecor::new(
            ToaruDecorConfig::new(),
            StylesheetResolver::new(fs, Some(PathBuf::from("/home/user"))),
        )
    }

    #[test]
    fn test_init_connects_and_decorates() {
        let mut decor = memory_decor();
        let bus = SignalBus::new();
        let mut sched = RecordingScheduler::default();

        let mut existing = TestWindow::mapped(1, "foot");
        decor.init(&bus, &mut [&mut existing], &mut sched);
        assert!(decor.coordinator().borrow().is_decorated(&1));

        let mut new = TestWindow::unmapped(2, "foot");
        bus.emit_transaction(&mut [&mut new]);
        assert!(decor.coordinator().borrow().is_decorated(&2));

        decor.fini(&mut [&mut existing, &mut new], &mut sched);
        assert_eq!(decor.coordinator().borrow().decorated().count(), 0);
        assert_eq!(bus.handler_count(), 0);
        assert_eq!(sched.scheduled, [1, 1, 2]);
    }

    #[test]
    fn test_reload_theme_invalidates() {
        let mut decor = memory_decor();
        let bus = SignalBus::new();
        let mut sched = RecordingScheduler::default();
        let mut window = TestWindow::mapped(7, "foot");
        decor.init(&bus, &mut [&mut window], &mut sched);

        assert_eq!(decor.snapshot().icon_theme_name, "Papirus");
        assert_eq!(decor.resolver().borrow().state(), ResolutionState::Attempted(0));

        assert_eq!(decor.reload_theme(), [7]);
        assert_eq!(decor.resolver().borrow().state(), ResolutionState::NotAttempted);
        assert_eq!(decor.snapshot().icon_theme_name, "Papirus");
        assert_eq!(decor.resolver().borrow().epoch(), 1);
    }

    #[test]
    fn test_watch_without_home() {
        let mut decor: Decor<MemoryFs> = GtkDecor::new(
            ToaruDecorConfig::new(),
            StylesheetResolver::new(MemoryFs::new(), None),
        );
        let event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();

        let res = decor.watch_settings(&event_loop.handle(), |_, _| {});
        assert!(matches!(res, Err(DecorError::NoHomeDir)));
        assert!(!decor.is_watching());
    }

    #[test]
    fn test_settings_change_reloads_theme() {
        let home = tempfile::tempdir().unwrap();
        let settings = home.path().join(".config/gtk-3.0/settings.ini");
        fs::create_dir_all(settings.parent().unwrap()).unwrap();
        fs::write(&settings, "gtk-icon-theme-name=Papirus\n").unwrap();

        let mut decor: Decor<HostFs> = GtkDecor::new(
            ToaruDecorConfig::new(),
            StylesheetResolver::new(HostFs, Some(home.path().to_path_buf())),
        );
        let bus = SignalBus::new();
        let mut sched = RecordingScheduler::default();
        let mut window = TestWindow::mapped(3, "foot");
        decor.init(&bus, &mut [&mut window], &mut sched);

        assert_eq!(decor.snapshot().icon_theme_name, "Papirus");

        let mut event_loop: EventLoop<'static, Vec<u32>> = EventLoop::try_new().unwrap();
        decor.watch_settings(&event_loop.handle(), |damaged: &mut Vec<u32>, ids: &[u32]| {
            damaged.extend_from_slice(ids);
        }).expect("could not watch settings");
        assert!(decor.is_watching());

        fs::write(&settings, "gtk-icon-theme-name=Breeze\n").unwrap();
        let mut damaged = Vec::new();
        event_loop.dispatch(Some(Duration::from_millis(50)), &mut damaged).unwrap();

        assert_eq!(damaged, [3]);
        assert_eq!(decor.resolver().borrow().epoch(), 1);
        assert_eq!(decor.snapshot().icon_theme_name, "Breeze");

        decor.fini(&mut [&mut window], &mut sched);
        assert!(!decor.is_watching());
    }
}
