//! Flattening plus per-capability partitioning of a fragment list.
//!
//! [`decompose`] walks the flattened fragments once, numbering them from 1 and
//! appending each declared capability to that kind's list. Lists keep
//! declaration order and are never re-sorted, which is what gives the
//! wrapper its ordering guarantees: for every kind, fragment `n` runs before
//! fragment `n + 1`.

use std::fmt;
use std::num::NonZeroU32;

use crate::combine::{flatten, Injectable};
use crate::fragment::{
    ChildContextTypeInjector, ContextInjector, ContextTypeInjector, DidMountHook, DidUpdateHook,
    ImperativeMethodInjector, InitialStateInjector, PropInjector, PropTypeInjector,
    ShouldUpdateHook, WillMountHook, WillReceivePropsHook, WillUnmountHook, WillUpdateHook,
};

/// Stable, positional identity of a flattened fragment. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(NonZeroU32);

impl FragmentId {
    /// `None` for 0, which never names a fragment.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The identity of the fragment at flattened position `index`.
    #[inline]
    pub(crate) fn at(index: usize) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index as u32))
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0.get()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A capability paired with the identity of the fragment that declared it.
#[derive(Clone)]
pub struct WithId<T> {
    pub id: FragmentId,
    pub callback: T,
}

impl<T> fmt::Debug for WithId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithId").field("id", &self.id).finish()
    }
}

/// Per-kind capability lists. Type declarations and votes never touch state,
/// so they carry no identity.
#[derive(Clone, Default)]
pub struct Decomposed {
    pub ids: Vec<FragmentId>,
    pub prop_type_injectors: Vec<PropTypeInjector>,
    pub context_type_injectors: Vec<ContextTypeInjector>,
    pub child_context_type_injectors: Vec<ChildContextTypeInjector>,
    pub prop_injectors: Vec<WithId<PropInjector>>,
    pub context_injectors: Vec<WithId<ContextInjector>>,
    pub initial_state_injectors: Vec<WithId<InitialStateInjector>>,
    pub imperative_method_injectors: Vec<WithId<ImperativeMethodInjector>>,
    pub will_mount_hooks: Vec<WithId<WillMountHook>>,
    pub did_mount_hooks: Vec<WithId<DidMountHook>>,
    pub will_receive_props_hooks: Vec<WithId<WillReceivePropsHook>>,
    pub should_update_hooks: Vec<ShouldUpdateHook>,
    pub will_update_hooks: Vec<WithId<WillUpdateHook>>,
    pub did_update_hooks: Vec<WithId<DidUpdateHook>>,
    pub will_unmount_hooks: Vec<WithId<WillUnmountHook>>,
}

impl Decomposed {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether any fragment declared child-context types.
    pub fn provides_context(&self) -> bool {
        !self.child_context_type_injectors.is_empty()
    }
}

impl fmt::Debug for Decomposed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decomposed")
            .field("ids", &self.ids)
            .field("prop_type_injectors", &self.prop_type_injectors.len())
            .field("context_type_injectors", &self.context_type_injectors.len())
            .field(
                "child_context_type_injectors",
                &self.child_context_type_injectors.len(),
            )
            .field("prop_injectors", &self.prop_injectors)
            .field("context_injectors", &self.context_injectors)
            .field("initial_state_injectors", &self.initial_state_injectors)
            .field("imperative_method_injectors", &self.imperative_method_injectors)
            .field("will_mount_hooks", &self.will_mount_hooks)
            .field("did_mount_hooks", &self.did_mount_hooks)
            .field("will_receive_props_hooks", &self.will_receive_props_hooks)
            .field("should_update_hooks", &self.should_update_hooks.len())
            .field("will_update_hooks", &self.will_update_hooks)
            .field("did_update_hooks", &self.did_update_hooks)
            .field("will_unmount_hooks", &self.will_unmount_hooks)
            .finish()
    }
}

fn push_with_id<T: Clone>(list: &mut Vec<WithId<T>>, id: FragmentId, callback: &Option<T>) {
    if let Some(callback) = callback {
        list.push(WithId {
            id,
            callback: callback.clone(),
        });
    }
}

fn push_bare<T: Clone>(list: &mut Vec<T>, callback: &Option<T>) {
    if let Some(callback) = callback {
        list.push(callback.clone());
    }
}

/// Flattens `injectables` and partitions every fragment's capabilities.
///
/// The input is only borrowed; fragments are never modified.
pub fn decompose(injectables: &[Injectable]) -> Decomposed {
    let fragments = flatten(injectables);
    let mut result = Decomposed::default();

    for (index, fragment) in fragments.iter().enumerate() {
        let id = FragmentId::at(index);
        result.ids.push(id);

        push_bare(&mut result.prop_type_injectors, &fragment.prop_types);
        push_bare(&mut result.context_type_injectors, &fragment.context_types);
        push_bare(
            &mut result.child_context_type_injectors,
            &fragment.child_context_types,
        );
        push_with_id(&mut result.prop_injectors, id, &fragment.props);
        push_with_id(&mut result.context_injectors, id, &fragment.child_context);
        push_with_id(&mut result.initial_state_injectors, id, &fragment.initial_state);
        push_with_id(
            &mut result.imperative_method_injectors,
            id,
            &fragment.imperative_methods,
        );
        push_with_id(&mut result.will_mount_hooks, id, &fragment.will_mount);
        push_with_id(&mut result.did_mount_hooks, id, &fragment.did_mount);
        push_with_id(
            &mut result.will_receive_props_hooks,
            id,
            &fragment.will_receive_props,
        );
        push_bare(&mut result.should_update_hooks, &fragment.should_update);
        push_with_id(&mut result.will_update_hooks, id, &fragment.will_update);
        push_with_id(&mut result.did_update_hooks, id, &fragment.did_update);
        push_with_id(&mut result.will_unmount_hooks, id, &fragment.will_unmount);
    }

    log::debug!(
        "decomposed {} fragments: {} prop injectors, {} votes, {} method injectors",
        result.ids.len(),
        result.prop_injectors.len(),
        result.should_update_hooks.len(),
        result.imperative_method_injectors.len()
    );
    result
}

#[cfg(test)]
#[path = "tests/decompose_tests.rs"]
mod tests;
