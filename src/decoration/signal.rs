//! Delivering lifecycle signals to handlers.
//!
//! A [`SignalBus`] keeps only weak references to the handlers connected to it,
//! so it never keeps a handler alive. Connecting returns a [`Connection`] that
//! disconnects the handler when dropped, so a handler is released on every
//! path out of the scope that connected it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::{LifecycleHandler, Toplevel, TransactionScheduler};

type Slot<W> = (u64, Weak<RefCell<dyn LifecycleHandler<W>>>);

/// A host-side bus that lifecycle signals are emitted on.
///
/// Handlers run in the order they were connected. A handler that is connected
/// or disconnected during an emission does not affect that emission.
pub struct SignalBus<W: Toplevel + 'static> {
    slots: Rc<RefCell<Vec<Slot<W>>>>,
    next_id: Cell<u64>,
}

impl<W: Toplevel + 'static> SignalBus<W> {
    /// Creates a bus with no handlers.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Connects a handler, returning the guard that keeps it connected.
    #[must_use = "the handler is disconnected as soon as the Connection is dropped"]
    pub fn connect<H>(&self, handler: &Rc<RefCell<H>>) -> Connection
    where
        H: LifecycleHandler<W> + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let weak = Rc::downgrade(handler);
        let weak: Weak<RefCell<dyn LifecycleHandler<W>>> = weak;
        self.slots.borrow_mut().push((id, weak));
        trace!("connected lifecycle handler {id}");

        let slots = Rc::downgrade(&self.slots);
        Connection {
            release: Some(Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    slots.borrow_mut().retain(|(slot, _)| *slot != id);
                    trace!("disconnected lifecycle handler {id}");
                }
            })),
        }
    }

    /// The number of live handlers.
    pub fn handler_count(&self) -> usize {
        self.slots.borrow().iter().filter(|(_, h)| h.strong_count() > 0).count()
    }

    /// Emits the transaction-admission signal.
    pub fn emit_transaction(&self, windows: &mut [&mut W]) {
        for handler in self.handlers() {
            handler.borrow_mut().on_transaction_admission(windows);
        }
    }

    /// Emits the decoration-eligibility-changed signal.
    pub fn emit_eligibility_changed(&self, window: &mut W, sched: &mut dyn TransactionScheduler<W>) {
        for handler in self.handlers() {
            handler.borrow_mut().on_eligibility_changed(window, sched);
        }
    }

    /// Emits the tiled-state-changed signal.
    pub fn emit_tiled_changed(&self, window: &mut W, sched: &mut dyn TransactionScheduler<W>) {
        for handler in self.handlers() {
            handler.borrow_mut().on_tiled_changed(window, sched);
        }
    }

    /// Emits the window-destroyed signal.
    pub fn emit_destroyed(&self, window: &W) {
        for handler in self.handlers() {
            handler.borrow_mut().on_destroyed(window);
        }
    }

    // snapshot of the live handlers, so the slot list isn't borrowed while they run
    fn handlers(&self) -> Vec<Rc<RefCell<dyn LifecycleHandler<W>>>> {
        let mut slots = self.slots.borrow_mut();
        slots.retain(|(_, h)| h.strong_count() > 0);
        slots.iter().filter_map(|(_, h)| h.upgrade()).collect()
    }
}

impl<W: Toplevel + 'static> Default for SignalBus<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Toplevel + 'static> fmt::Debug for SignalBus<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// A live connection between a handler and a [`SignalBus`].
///
/// Dropping it disconnects the handler. Outliving the bus is fine.
pub struct Connection {
    release: Option<Box<dyn FnOnce()>>,
}

impl Connection {
    /// Disconnects the handler now.
    pub fn disconnect(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.release.is_some())
            .finish()
    }
}
