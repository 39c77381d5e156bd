//! Watching the GTK settings file for changes.
//!
//! A [`SettingsWatch`] registers an inotify descriptor with a `calloop` event loop,
//! and calls back once per readiness event whenever the watched file is modified or
//! closed after writing. How many filesystem events were read in that one go does
//! not matter; they all count as a single change.

use std::fmt;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::path::{Path, PathBuf};

use calloop::generic::Generic;
use calloop::{Interest, LoopHandle, Mode, PostAction};
use nix::sys::inotify::{AddWatchFlags, InitFlags, Inotify};
use tracing::{debug, info, trace};

use crate::Result;

/// A registered watch on a single file.
///
/// The watch stays registered with the event loop for as long as this value lives.
/// Dropping it removes the source from the loop and closes the descriptor; a
/// readiness event that was already queued is simply never dispatched.
pub struct SettingsWatch {
    path: PathBuf,
    remove: Option<Box<dyn FnOnce()>>,
}

impl SettingsWatch {
    /// Starts watching `path`, calling `on_change` on the event loop whenever it changes.
    ///
    /// The file must exist. If anything goes wrong, no source is left registered.
    pub fn new<D, P, F>(handle: &LoopHandle<'static, D>, path: P, mut on_change: F) -> Result<Self>
    where
        D: 'static,
        P: AsRef<Path>,
        F: FnMut(&mut D) + 'static,
    {
        let path = path.as_ref().to_path_buf();

        let inotify = Inotify::init(InitFlags::IN_NONBLOCK | InitFlags::IN_CLOEXEC)?;
        // SAFETY: the descriptor was just created and nothing else owns it.
        // `Inotify` is a plain copyable handle that never closes it.
        let fd = unsafe { OwnedFd::from_raw_fd(inotify.as_raw_fd()) };

        // if this fails, `fd` is dropped and closed on the way out
        inotify.add_watch(path.as_path(), AddWatchFlags::IN_MODIFY | AddWatchFlags::IN_CLOSE_WRITE)?;

        let source = Generic::new(fd, Interest::READ, Mode::Level);
        let token = handle.insert_source(source, move |_, _, data| {
            match inotify.read_events() {
                Ok(events) if !events.is_empty() => {
                    debug!("settings file changed ({} events)", events.len());
                    on_change(data);
                }
                Ok(_) => {}
                Err(e) => trace!("no inotify events to read: {e}"),
            }
            Ok(PostAction::Continue)
        }).map_err(|e| e.error)?;

        info!("watching {} for changes", path.display());

        let handle = handle.clone();
        Ok(Self {
            path,
            remove: Some(Box::new(move || handle.remove(token))),
        })
    }

    /// The file being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unregister(&mut self) {
        if let Some(remove) = self.remove.take() {
            debug!("no longer watching {}", self.path.display());
            remove();
        }
    }
}

impl Drop for SettingsWatch {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl fmt::Debug for SettingsWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsWatch")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::time::Duration;

    use calloop::EventLoop;

    use crate::DecorError;

    const SETTLE: Duration = Duration::from_millis(50);

    #[test]
    fn test_change_dispatches_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, "gtk-theme-name=Adwaita\n").unwrap();

        let mut event_loop: EventLoop<'static, u32> = EventLoop::try_new().unwrap();
        let watch = SettingsWatch::new(&event_loop.handle(), &path, |count: &mut u32| *count += 1)
            .expect("could not watch settings");
        assert_eq!(watch.path(), path);

        let mut count = 0;
        event_loop.dispatch(Some(Duration::ZERO), &mut count).unwrap();
        assert_eq!(count, 0);

        // truncate, write and close all land before the next dispatch
        fs::write(&path, "gtk-theme-name=Arc\n").unwrap();
        event_loop.dispatch(Some(SETTLE), &mut count).unwrap();
        assert_eq!(count, 1);

        drop(watch);
        fs::write(&path, "gtk-theme-name=Adwaita\n").unwrap();
        event_loop.dispatch(Some(SETTLE), &mut count).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();

        let res = SettingsWatch::new(&event_loop.handle(), dir.path().join("nope.ini"), |_| {});
        assert!(matches!(res, Err(DecorError::Watch(_))));
    }
}
