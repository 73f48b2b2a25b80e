use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::platform::UpdateScheduler;

/// Identifies a mounted class node inside a [`crate::Host`].
pub type NodeId = usize;

type Completion = Box<dyn FnOnce() + 'static>;

pub(crate) struct PendingUpdate {
    pub(crate) node: NodeId,
    pub(crate) completions: Vec<Completion>,
}

struct RuntimeInner {
    scheduler: Arc<dyn UpdateScheduler>,
    needs_frame: Cell<bool>,
    pending: RefCell<Vec<PendingUpdate>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn UpdateScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            pending: RefCell::new(Vec::new()),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    /// Requests for a node that is already queued coalesce into one update.
    fn request_update(&self, node: NodeId, completion: Option<Completion>) {
        let mut pending = self.pending.borrow_mut();
        if let Some(update) = pending.iter_mut().find(|update| update.node == node) {
            update.completions.extend(completion);
            return;
        }
        pending.push(PendingUpdate {
            node,
            completions: completion.into_iter().collect(),
        });
        drop(pending);
        self.schedule();
    }

    /// Puts `updates` back at the front of the queue, ahead of anything
    /// requested since they were taken.
    fn requeue(&self, updates: Vec<PendingUpdate>) {
        if updates.is_empty() {
            return;
        }
        let mut pending = self.pending.borrow_mut();
        let queued = mem::replace(&mut *pending, updates);
        for update in queued {
            match pending.iter_mut().find(|existing| existing.node == update.node) {
                Some(existing) => existing.completions.extend(update.completions),
                None => pending.push(update),
            }
        }
        drop(pending);
        self.schedule();
    }

    fn take_updates(&self) -> Vec<PendingUpdate> {
        let updates: Vec<PendingUpdate> = self.pending.borrow_mut().drain(..).collect();
        self.needs_frame.set(false);
        updates
    }

    fn has_updates(&self) -> bool {
        !self.pending.borrow().is_empty()
    }
}

#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn UpdateScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn has_updates(&self) -> bool {
        self.inner.has_updates()
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub(crate) fn take_updates(&self) -> Vec<PendingUpdate> {
        self.inner.take_updates()
    }

    pub(crate) fn requeue(&self, updates: Vec<PendingUpdate>) {
        self.inner.requeue(updates);
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(DefaultScheduler))
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("needs_frame", &self.needs_frame())
            .field("pending", &self.inner.pending.borrow().len())
            .finish()
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl UpdateScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Weak handle to a [`Runtime`]; outliving the runtime is harmless.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Builds the force-update callback handed to every fragment of the
    /// instance mounted as `node`.
    pub fn force_updater(&self, node: NodeId) -> ForceUpdater {
        let handle = self.clone();
        ForceUpdater::new(move |completion| handle.request_update(node, completion))
    }

    fn request_update(&self, node: NodeId, completion: Option<Completion>) {
        match self.0.upgrade() {
            Some(inner) => inner.request_update(node, completion),
            None => log::debug!("dropping update request for node {node}: runtime is gone"),
        }
    }
}

/// Asks the host to re-render one wrapper instance.
///
/// Every fragment of an instance receives a clone of the same updater, so a
/// request from any of them schedules a single update of the whole wrapper.
#[derive(Clone)]
pub struct ForceUpdater {
    request: Rc<dyn Fn(Option<Completion>)>,
}

impl ForceUpdater {
    pub fn new(request: impl Fn(Option<Box<dyn FnOnce() + 'static>>) + 'static) -> Self {
        Self {
            request: Rc::new(request),
        }
    }

    /// An updater that ignores every request, for instances built outside a host.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn request(&self) {
        (self.request)(None);
    }

    /// Requests an update and runs `done` once it has been applied.
    pub fn request_then(&self, done: impl FnOnce() + 'static) {
        (self.request)(Some(Box::new(done)));
    }

    pub fn ptr_eq(&self, other: &ForceUpdater) -> bool {
        Rc::ptr_eq(&self.request, &other.request)
    }
}

impl fmt::Debug for ForceUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ForceUpdater")
    }
}
