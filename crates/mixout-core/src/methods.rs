//! Imperative methods attached to a wrapper type.
//!
//! Each fragment's method injector runs once, when the wrapper type is built.
//! Every registration lands in the type's [`MethodTable`], shared by all of its
//! instances; dispatch goes through [`crate::WrapperInstance::invoke`], which
//! resolves the name and hands the implementation the owning fragment's state.

use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::component::Child;
use crate::decompose::FragmentId;
use crate::error::MixoutError;
use crate::fragment::ImperativeMethod;
use crate::state::StateSlot;
use crate::value::{Context, Props, Value};

#[derive(Clone)]
pub(crate) struct BoundMethod {
    pub(crate) owner: FragmentId,
    pub(crate) implementation: ImperativeMethod,
}

#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, BoundMethod>,
}

impl MethodTable {
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The fragment that owns `name`, if registered.
    pub fn owner(&self, name: &str) -> Option<FragmentId> {
        self.methods.get(name).map(|method| method.owner)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&BoundMethod> {
        self.methods.get(name)
    }

    fn insert(&mut self, name: String, method: BoundMethod) {
        if let Some(previous) = self.methods.insert(name.clone(), method) {
            log::debug!(
                "imperative method `{name}` of fragment {} replaced",
                previous.owner
            );
        }
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Hands method registrations from one fragment to the wrapper type.
pub struct MethodRegistrar<'a> {
    owner: FragmentId,
    table: &'a mut MethodTable,
}

impl<'a> MethodRegistrar<'a> {
    pub(crate) fn new(owner: FragmentId, table: &'a mut MethodTable) -> Self {
        Self { owner, table }
    }

    /// Attaches `name` to the wrapper type. A later registration under the
    /// same name, from any fragment, replaces this one.
    pub fn set<F>(&mut self, name: &str, implementation: F)
    where
        F: Fn(&[Value], &Props, &Context, &StateSlot, Option<&Child>) -> Result<Value, MixoutError>
            + 'static,
    {
        self.table.insert(
            name.to_owned(),
            BoundMethod {
                owner: self.owner,
                implementation: Rc::new(implementation),
            },
        );
    }
}
