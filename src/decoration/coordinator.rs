//! Deciding when windows gain and lose decorations.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use super::{DecorationRecord, LifecycleHandler, Toplevel, ToplevelState, TransactionScheduler};
use crate::config::DecorationConfig;
use crate::render::decoration_margins;
use crate::types::Margins;

/// Attaches and detaches decorations in response to host lifecycle signals.
///
/// Each window is either undecorated, with no record, or decorated, with exactly
/// one [`DecorationRecord`]. Attaching and detaching are the only ways a record
/// is created or removed.
///
/// ## Geometry
///
/// Attaching a decoration grows a window's pending geometry outward by its margins,
/// then clamps it to the output's work area; detaching shrinks it back. Fullscreen
/// and tiled windows are left alone, since the host sizes those itself.
///
/// ## Idempotence
///
/// A signal that does not change whether a window should be decorated does nothing
/// at all. In particular it does not reschedule a transaction, so margin changes
/// can't feed back into another round of evaluation.
#[derive(Debug)]
pub struct DecorationCoordinator<W: Toplevel, C: DecorationConfig> {
    config: C,
    records: IndexMap<W::Id, DecorationRecord>,
}

impl<W: Toplevel, C: DecorationConfig> DecorationCoordinator<W, C> {
    /// Creates a coordinator with no decorated windows.
    pub fn new(config: C) -> Self {
        Self {
            config,
            records: IndexMap::new(),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Whether the window with this ID is decorated.
    pub fn is_decorated(&self, id: &W::Id) -> bool {
        self.records.contains_key(id)
    }

    /// The record of a decorated window.
    pub fn record(&self, id: &W::Id) -> Option<&DecorationRecord> {
        self.records.get(id)
    }

    /// The IDs of all decorated windows, in the order they were decorated.
    pub fn decorated(&self) -> impl Iterator<Item = &W::Id> {
        self.records.keys()
    }

    /// Whether `window` should be decorated.
    ///
    /// Windows matching the ignore rule never are. Otherwise, a window is decorated if
    /// it matches the forced rule or asks for server-side decorations itself.
    pub fn should_decorate(&self, window: &W) -> bool {
        let props = window.properties();

        if self.config.ignore_views().matches(&props) {
            return false
        }

        self.config.forced_views().matches(&props) || window.requests_decoration()
    }

    /// The margins a decorated window in `state` should have.
    ///
    /// Fullscreen windows get no margins.
    pub fn margins_for(&self, state: &ToplevelState) -> Margins {
        if state.fullscreen {
            Margins::zeroed()
        } else {
            decoration_margins(&self.config)
        }
    }

    /// Evaluates every existing window, decorating the ones that should be.
    ///
    /// Called once when the coordinator is first connected to a host.
    pub fn init(&mut self, windows: &mut [&mut W], sched: &mut dyn TransactionScheduler<W>) {
        for window in windows.iter_mut() {
            self.update_decoration(window, sched);
        }
        debug!("decorating {} of {} windows", self.records.len(), windows.len());
    }

    /// Removes every decoration, rescheduling the affected windows.
    ///
    /// Called when the coordinator is disconnected from a host.
    pub fn fini(&mut self, windows: &mut [&mut W], sched: &mut dyn TransactionScheduler<W>) {
        for window in windows.iter_mut() {
            if self.is_decorated(&window.id()) {
                self.detach(window);
                sched.schedule(window);
            }
        }
        // windows the host didn't hand back are gone already
        self.records.clear();
    }

    /// Drops the record of a destroyed window without touching its geometry.
    pub fn forget(&mut self, id: &W::Id) -> Option<DecorationRecord> {
        self.records.shift_remove(id)
    }

    /// Re-evaluates a window, attaching or detaching as needed.
    ///
    /// Returns whether anything changed. A transaction is only scheduled if it did.
    #[instrument(level = "trace", skip_all, fields(window = ?window.id()))]
    pub fn update_decoration(&mut self, window: &mut W, sched: &mut dyn TransactionScheduler<W>) -> bool {
        let wanted = self.should_decorate(window);
        if wanted == self.is_decorated(&window.id()) {
            trace!("decoration unchanged");
            return false
        }

        if wanted {
            self.attach(window);
        } else {
            self.detach(window);
        }
        sched.schedule(window);
        true
    }

    /// Handles a transaction that is about to be applied.
    ///
    /// Decorated windows have their margins refreshed from their pending state.
    /// Undecorated windows that the transaction maps for the first time are
    /// evaluated, and decorated if they should be. Either way the transaction
    /// already covers the window, so nothing is rescheduled.
    pub fn admit_transaction(&mut self, windows: &mut [&mut W]) {
        for window in windows.iter_mut() {
            let id = window.id();

            if self.is_decorated(&id) {
                let margins = self.margins_for(window.pending());
                window.pending_mut().margins = margins;
                if let Some(record) = self.records.get_mut(&id) {
                    record.margins = margins;
                }
            } else if !window.current().mapped
                && window.pending().mapped
                && self.should_decorate(window)
            {
                self.attach(window);
            }
        }
    }

    fn attach(&mut self, window: &mut W) {
        let id = window.id();
        let margins = self.margins_for(window.pending());
        let workarea = window.workarea();

        let pending = window.pending_mut();
        pending.margins = margins;
        if pending.is_free() {
            let mut geometry = pending.geometry.expand_by_margins(margins);
            if let Some(workarea) = workarea {
                geometry = geometry.clamp(workarea);
            }
            pending.geometry = geometry;
        }

        debug!("attaching decoration to {id:?} with margins {margins:?}");
        self.records.insert(id, DecorationRecord { margins });
    }

    fn detach(&mut self, window: &mut W) {
        let id = window.id();

        let pending = window.pending_mut();
        if pending.is_free() {
            pending.geometry = pending.geometry.shrink_by_margins(pending.margins);
        }
        pending.margins = Margins::zeroed();

        debug!("detaching decoration from {id:?}");
        self.records.shift_remove(&id);
    }
}

impl<W: Toplevel, C: DecorationConfig> LifecycleHandler<W> for DecorationCoordinator<W, C> {
    fn on_transaction_admission(&mut self, windows: &mut [&mut W]) {
        self.admit_transaction(windows);
    }

    fn on_eligibility_changed(&mut self, window: &mut W, sched: &mut dyn TransactionScheduler<W>) {
        self.update_decoration(window, sched);
    }

    fn on_tiled_changed(&mut self, window: &mut W, sched: &mut dyn TransactionScheduler<W>) {
        self.update_decoration(window, sched);
    }

    fn on_destroyed(&mut self, window: &W) {
        self.forget(&window.id());
    }
}
