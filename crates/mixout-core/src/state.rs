//! Per-fragment isolated state.
//!
//! Every flattened fragment gets one [`StateSlot`] per wrapper instance. Only
//! the hooks of the owning fragment are ever handed that slot, so fragments
//! cannot observe each other's state; they talk through props and context.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::decompose::FragmentId;
use crate::value::Value;

/// Mutable, string-keyed storage owned by one fragment on one instance.
///
/// Cloning yields another handle to the same slot, which lets callbacks
/// created in an initial-state contribution write back to it later.
#[derive(Clone, Default)]
pub struct StateSlot {
    inner: Rc<RefCell<HashMap<String, Value>>>,
}

impl StateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.borrow_mut().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.borrow_mut().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Returns true when both handles address the same slot.
    pub fn ptr_eq(&self, other: &StateSlot) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.borrow().iter()).finish()
    }
}

/// The slots of a single wrapper instance, one per fragment identity.
pub(crate) struct FragmentStates {
    slots: Vec<StateSlot>,
}

impl FragmentStates {
    /// Identities are positional (1..=n), so slot `id` lives at `id - 1`.
    pub(crate) fn allocate(ids: &[FragmentId]) -> Self {
        Self {
            slots: ids.iter().map(|_| StateSlot::new()).collect(),
        }
    }

    pub(crate) fn slot(&self, id: FragmentId) -> &StateSlot {
        &self.slots[id.index()]
    }

    pub(crate) fn get(&self, id: FragmentId) -> Option<&StateSlot> {
        self.slots.get(id.index())
    }
}
