//! Fragments: independent bags of optional capabilities.
//!
//! A [`Fragment`] declares any subset of the capability kinds listed in
//! [`Capability`]. The wrapper never inspects what a fragment does; it only
//! asks which capabilities are present and replays them at the matching
//! lifecycle point, in declaration order.

use std::fmt;
use std::rc::Rc;

use crate::component::Child;
use crate::error::{HookResult, IntoHookResult, MixoutError};
use crate::methods::MethodRegistrar;
use crate::runtime::ForceUpdater;
use crate::state::StateSlot;
use crate::types::{ContextTypeRegistrar, PropTypeRegistrar, Setter};
use crate::value::{Context, Props, Value};

pub type PropTypeInjector = Rc<dyn Fn(&mut PropTypeRegistrar<'_>)>;
pub type ContextTypeInjector = Rc<dyn Fn(&mut ContextTypeRegistrar<'_>)>;
pub type ChildContextTypeInjector = Rc<dyn Fn(&mut ContextTypeRegistrar<'_>)>;
pub type PropInjector = Rc<dyn Fn(&mut Setter<'_>, &Props, &Context, &StateSlot) -> HookResult>;
pub type ContextInjector = Rc<dyn Fn(&mut Setter<'_>, &Props, &Context, &StateSlot) -> HookResult>;
pub type InitialStateInjector =
    Rc<dyn Fn(&Props, &Context, &StateSlot, &ForceUpdater) -> HookResult>;
pub type ImperativeMethodInjector = Rc<dyn Fn(&mut MethodRegistrar<'_>)>;
pub type WillMountHook = Rc<dyn Fn(&Props, &Context, &StateSlot) -> HookResult>;
pub type DidMountHook = Rc<dyn Fn(&Props, &Context, &StateSlot, Option<&Child>) -> HookResult>;
/// `(next_props, next_context, own_props, own_context, state, child)`.
pub type WillReceivePropsHook =
    Rc<dyn Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> HookResult>;
/// `(next_props, next_context, own_props, own_context)`.
pub type ShouldUpdateHook = Rc<dyn Fn(&Props, &Context, &Props, &Context) -> Vote>;
/// `(next_props, next_context, own_props, own_context, state, child)`.
pub type WillUpdateHook =
    Rc<dyn Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> HookResult>;
/// `(prev_props, prev_context, own_props, own_context, state, child)`.
pub type DidUpdateHook =
    Rc<dyn Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> HookResult>;
pub type WillUnmountHook = Rc<dyn Fn(&Props, &Context, &StateSlot) -> HookResult>;

/// Implementation behind an imperative method:
/// `(args, own_props, own_context, state, child)`.
pub type ImperativeMethod = Rc<
    dyn Fn(&[Value], &Props, &Context, &StateSlot, Option<&Child>) -> Result<Value, MixoutError>,
>;

/// A should-update vote.
///
/// `Abstain` is not a "no": it forces the update regardless of the other
/// votes. An update is skipped only when every vote is `Cast(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Cast(bool),
    Abstain,
}

impl From<bool> for Vote {
    fn from(value: bool) -> Self {
        Vote::Cast(value)
    }
}

impl From<Option<bool>> for Vote {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Vote::Abstain, Vote::Cast)
    }
}

impl From<Value> for Vote {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(value) => Vote::Cast(value),
            _ => Vote::Abstain,
        }
    }
}

/// The recognised capability kinds, in decomposition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PropTypes,
    ContextTypes,
    ChildContextTypes,
    Props,
    ChildContext,
    InitialState,
    ImperativeMethods,
    WillMount,
    DidMount,
    WillReceiveProps,
    ShouldUpdate,
    WillUpdate,
    DidUpdate,
    WillUnmount,
}

#[derive(Clone, Default)]
pub struct Fragment {
    pub(crate) prop_types: Option<PropTypeInjector>,
    pub(crate) context_types: Option<ContextTypeInjector>,
    pub(crate) child_context_types: Option<ChildContextTypeInjector>,
    pub(crate) props: Option<PropInjector>,
    pub(crate) child_context: Option<ContextInjector>,
    pub(crate) initial_state: Option<InitialStateInjector>,
    pub(crate) imperative_methods: Option<ImperativeMethodInjector>,
    pub(crate) will_mount: Option<WillMountHook>,
    pub(crate) did_mount: Option<DidMountHook>,
    pub(crate) will_receive_props: Option<WillReceivePropsHook>,
    pub(crate) should_update: Option<ShouldUpdateHook>,
    pub(crate) will_update: Option<WillUpdateHook>,
    pub(crate) did_update: Option<DidUpdateHook>,
    pub(crate) will_unmount: Option<WillUnmountHook>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prop_types(mut self, injector: impl Fn(&mut PropTypeRegistrar<'_>) + 'static) -> Self {
        self.prop_types = Some(Rc::new(injector));
        self
    }

    pub fn context_types(
        mut self,
        injector: impl Fn(&mut ContextTypeRegistrar<'_>) + 'static,
    ) -> Self {
        self.context_types = Some(Rc::new(injector));
        self
    }

    /// Declaring child-context types turns the wrapper into a context provider.
    pub fn child_context_types(
        mut self,
        injector: impl Fn(&mut ContextTypeRegistrar<'_>) + 'static,
    ) -> Self {
        self.child_context_types = Some(Rc::new(injector));
        self
    }

    pub fn props<F, R>(mut self, injector: F) -> Self
    where
        F: Fn(&mut Setter<'_>, &Props, &Context, &StateSlot) -> R + 'static,
        R: IntoHookResult,
    {
        self.props = Some(Rc::new(
            move |setter: &mut Setter<'_>, props: &Props, context: &Context, state: &StateSlot| {
                injector(setter, props, context, state).into_hook_result()
            },
        ));
        self
    }

    pub fn child_context<F, R>(mut self, injector: F) -> Self
    where
        F: Fn(&mut Setter<'_>, &Props, &Context, &StateSlot) -> R + 'static,
        R: IntoHookResult,
    {
        self.child_context = Some(Rc::new(
            move |setter: &mut Setter<'_>, props: &Props, context: &Context, state: &StateSlot| {
                injector(setter, props, context, state).into_hook_result()
            },
        ));
        self
    }

    pub fn initial_state<F, R>(mut self, injector: F) -> Self
    where
        F: Fn(&Props, &Context, &StateSlot, &ForceUpdater) -> R + 'static,
        R: IntoHookResult,
    {
        self.initial_state = Some(Rc::new(
            move |props: &Props, context: &Context, state: &StateSlot, updater: &ForceUpdater| {
                injector(props, context, state, updater).into_hook_result()
            },
        ));
        self
    }

    pub fn imperative_methods(
        mut self,
        injector: impl Fn(&mut MethodRegistrar<'_>) + 'static,
    ) -> Self {
        self.imperative_methods = Some(Rc::new(injector));
        self
    }

    pub fn will_mount<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &StateSlot) -> R + 'static,
        R: IntoHookResult,
    {
        self.will_mount = Some(Rc::new(move |props: &Props, context: &Context, state: &StateSlot| {
            hook(props, context, state).into_hook_result()
        }));
        self
    }

    pub fn did_mount<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &StateSlot, Option<&Child>) -> R + 'static,
        R: IntoHookResult,
    {
        self.did_mount = Some(Rc::new(
            move |props: &Props, context: &Context, state: &StateSlot, child: Option<&Child>| {
                hook(props, context, state, child).into_hook_result()
            },
        ));
        self
    }

    pub fn will_receive_props<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> R + 'static,
        R: IntoHookResult,
    {
        self.will_receive_props = Some(Rc::new(
            move |next_props: &Props,
                  next_context: &Context,
                  props: &Props,
                  context: &Context,
                  state: &StateSlot,
                  child: Option<&Child>| {
                hook(next_props, next_context, props, context, state, child).into_hook_result()
            },
        ));
        self
    }

    pub fn should_update<F, V>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &Props, &Context) -> V + 'static,
        V: Into<Vote>,
    {
        self.should_update = Some(Rc::new(
            move |next_props: &Props, next_context: &Context, props: &Props, context: &Context| {
                hook(next_props, next_context, props, context).into()
            },
        ));
        self
    }

    pub fn will_update<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> R + 'static,
        R: IntoHookResult,
    {
        self.will_update = Some(Rc::new(
            move |next_props: &Props,
                  next_context: &Context,
                  props: &Props,
                  context: &Context,
                  state: &StateSlot,
                  child: Option<&Child>| {
                hook(next_props, next_context, props, context, state, child).into_hook_result()
            },
        ));
        self
    }

    pub fn did_update<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &Props, &Context, &StateSlot, Option<&Child>) -> R + 'static,
        R: IntoHookResult,
    {
        self.did_update = Some(Rc::new(
            move |prev_props: &Props,
                  prev_context: &Context,
                  props: &Props,
                  context: &Context,
                  state: &StateSlot,
                  child: Option<&Child>| {
                hook(prev_props, prev_context, props, context, state, child).into_hook_result()
            },
        ));
        self
    }

    pub fn will_unmount<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&Props, &Context, &StateSlot) -> R + 'static,
        R: IntoHookResult,
    {
        self.will_unmount = Some(Rc::new(
            move |props: &Props, context: &Context, state: &StateSlot| {
                hook(props, context, state).into_hook_result()
            },
        ));
        self
    }

    /// The capabilities this fragment declares, in decomposition order.
    pub fn capabilities(&self) -> Vec<Capability> {
        let declared = [
            (self.prop_types.is_some(), Capability::PropTypes),
            (self.context_types.is_some(), Capability::ContextTypes),
            (self.child_context_types.is_some(), Capability::ChildContextTypes),
            (self.props.is_some(), Capability::Props),
            (self.child_context.is_some(), Capability::ChildContext),
            (self.initial_state.is_some(), Capability::InitialState),
            (self.imperative_methods.is_some(), Capability::ImperativeMethods),
            (self.will_mount.is_some(), Capability::WillMount),
            (self.did_mount.is_some(), Capability::DidMount),
            (self.will_receive_props.is_some(), Capability::WillReceiveProps),
            (self.should_update.is_some(), Capability::ShouldUpdate),
            (self.will_update.is_some(), Capability::WillUpdate),
            (self.did_update.is_some(), Capability::DidUpdate),
            (self.will_unmount.is_some(), Capability::WillUnmount),
        ];
        declared
            .into_iter()
            .filter_map(|(present, capability)| present.then_some(capability))
            .collect()
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities().is_empty()
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fragment").field(&self.capabilities()).finish()
    }
}
