//! The decoration lifecycle.
//!
//! The host compositor owns its windows and its transaction model; this module
//! only describes the slice of them that decorating a window needs. A window is
//! exposed through the [`Toplevel`] trait, and the host reschedules transactions
//! through a [`TransactionScheduler`].
//!
//! Decisions are made by a [`DecorationCoordinator`], which the host drives by
//! emitting signals on a [`SignalBus`]. Anything that implements
//! [`LifecycleHandler`] can be connected to a bus.

pub mod coordinator;
pub mod signal;

#[doc(inline)]
pub use coordinator::DecorationCoordinator;
#[doc(inline)]
pub use signal::{Connection, SignalBus};

use std::fmt::Debug;
use std::hash::Hash;

use crate::config::rules::WindowProperties;
use crate::types::{Margins, Rectangle, TiledEdges};

/// The state of a window, either as committed or as a transaction will leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToplevelState {
    /// Whether the window is mapped.
    pub mapped: bool,
    /// Whether the window is fullscreen.
    pub fullscreen: bool,
    /// The edges tiled against something else.
    pub tiled_edges: TiledEdges,
    /// The outer geometry of the window, including its margins.
    pub geometry: Rectangle,
    /// The space reserved around the content for decorations.
    pub margins: Margins,
}

impl ToplevelState {
    /// Whether the geometry of a window in this state may be adjusted by its
    /// margins. Fullscreen and tiled windows are sized by the host alone.
    pub fn is_free(&self) -> bool {
        !self.fullscreen && self.tiled_edges.is_empty()
    }
}

/// A top-level window, as seen by the decoration lifecycle.
pub trait Toplevel {
    /// A stable identifier for the window.
    type Id: Clone + Eq + Hash + Debug;

    /// Returns the window's identifier.
    fn id(&self) -> Self::Id;

    /// The committed state of the window.
    fn current(&self) -> &ToplevelState;

    /// The state the window's pending transaction will commit.
    fn pending(&self) -> &ToplevelState;

    /// Mutable access to the pending state.
    fn pending_mut(&mut self) -> &mut ToplevelState;

    /// The window's title.
    fn title(&self) -> &str;

    /// The window's application ID.
    fn app_id(&self) -> &str;

    /// Whether the client wants the server to draw its decorations.
    fn requests_decoration(&self) -> bool;

    /// The usable area of the output the window is on, if known.
    fn workarea(&self) -> Option<Rectangle>;

    /// The properties window rules are matched against.
    fn properties(&self) -> WindowProperties<'_> {
        let pending = self.pending();
        WindowProperties {
            title: self.title(),
            app_id: self.app_id(),
            fullscreen: pending.fullscreen,
            tiled_edges: pending.tiled_edges,
        }
    }
}

/// Requests that the host schedule a transaction for a window.
pub trait TransactionScheduler<W: Toplevel> {
    /// Schedules a transaction that commits `window`'s pending state.
    fn schedule(&mut self, window: &W);
}

/// The per-window side data of a decorated window.
///
/// A window has a record exactly when it is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecorationRecord {
    /// The margins last applied to the window.
    pub margins: Margins,
}

/// Something that reacts to lifecycle signals from the host.
pub trait LifecycleHandler<W: Toplevel> {
    /// A transaction involving `windows` is about to be applied.
    fn on_transaction_admission(&mut self, windows: &mut [&mut W]);

    /// A window's own decoration preference changed.
    fn on_eligibility_changed(&mut self, window: &mut W, sched: &mut dyn TransactionScheduler<W>);

    /// A window's tiled edges changed.
    fn on_tiled_changed(&mut self, window: &mut W, sched: &mut dyn TransactionScheduler<W>);

    /// A window is being destroyed.
    fn on_destroyed(&mut self, _window: &W) {}
}

#[cfg(test)]
pub(crate) mod testing {
    //! A fake host for lifecycle tests.

    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct TestWindow {
        pub id: u32,
        pub title: String,
        pub app_id: String,
        pub requests_decoration: bool,
        pub workarea: Option<Rectangle>,
        pub current: ToplevelState,
        pub pending: ToplevelState,
    }

    impl TestWindow {
        /// A floating, mapped window at (100, 100), 400 wide and 300 high.
        pub fn mapped(id: u32, app_id: &str) -> Self {
            let state = ToplevelState {
                mapped: true,
                geometry: Rectangle::new(100, 100, 300, 400),
                ..ToplevelState::default()
            };
            Self {
                id,
                title: format!("window {id}"),
                app_id: app_id.into(),
                requests_decoration: true,
                workarea: None,
                current: state,
                pending: state,
            }
        }

        /// The same window, about to be mapped by its first transaction.
        pub fn unmapped(id: u32, app_id: &str) -> Self {
            let mut window = Self::mapped(id, app_id);
            window.current.mapped = false;
            window
        }

        /// Commits the pending state.
        pub fn commit(&mut self) {
            self.current = self.pending;
        }
    }

    impl Toplevel for TestWindow {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn current(&self) -> &ToplevelState {
            &self.current
        }

        fn pending(&self) -> &ToplevelState {
            &self.pending
        }

        fn pending_mut(&mut self) -> &mut ToplevelState {
            &mut self.pending
        }

        fn title(&self) -> &str {
            &self.title
        }

        fn app_id(&self) -> &str {
            &self.app_id
        }

        fn requests_decoration(&self) -> bool {
            self.requests_decoration
        }

        fn workarea(&self) -> Option<Rectangle> {
            self.workarea
        }
    }

    /// Records every window it was asked to schedule.
    #[derive(Debug, Default)]
    pub struct RecordingScheduler {
        pub scheduled: Vec<u32>,
    }

    impl TransactionScheduler<TestWindow> for RecordingScheduler {
        fn schedule(&mut self, window: &TestWindow) {
            self.scheduled.push(window.id);
        }
    }
}
