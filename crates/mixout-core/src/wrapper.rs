//! Live instances of a [`crate::WrapperType`].
//!
//! Every entry point replays the matching capability list in fragment order,
//! handing each callback the state slot of the fragment that declared it.
//! A failing callback aborts the rest of its pass and the error propagates
//! to the host unchanged.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::component::{Child, Component, ComponentInstance, Element, RefCapture, Rendered};
use crate::decompose::FragmentId;
use crate::error::{HookResult, MixoutError, Phase};
use crate::fragment::Vote;
use crate::mixout::WrapperDef;
use crate::runtime::ForceUpdater;
use crate::state::{FragmentStates, StateSlot};
use crate::types::Setter;
use crate::value::{Context, Props, Value};

pub struct WrapperInstance {
    def: Rc<WrapperDef>,
    props: RefCell<Props>,
    context: RefCell<Context>,
    states: FragmentStates,
    child: Rc<RefCell<Option<Child>>>,
    ref_capture: Option<RefCapture>,
    updater: ForceUpdater,
    phase: Cell<Phase>,
}

impl WrapperInstance {
    /// Allocates one state slot per fragment, then runs every initial-state
    /// contribution with the instance's shared [`ForceUpdater`].
    pub(crate) fn new(
        def: Rc<WrapperDef>,
        props: Props,
        context: Context,
        updater: ForceUpdater,
    ) -> Result<Rc<Self>, MixoutError> {
        let states = FragmentStates::allocate(&def.lists.ids);
        let child: Rc<RefCell<Option<Child>>> = Rc::new(RefCell::new(None));
        let ref_capture = def.instantiable.then(|| {
            let cell = Rc::clone(&child);
            RefCapture::new(move |instance| *cell.borrow_mut() = instance)
        });

        for injector in &def.lists.initial_state_injectors {
            (injector.callback)(&props, &context, states.slot(injector.id), &updater)?;
        }

        log::trace!(
            "{}: constructed with {} state slots",
            def.display_name,
            def.lists.ids.len()
        );

        Ok(Rc::new(Self {
            def,
            props: RefCell::new(props),
            context: RefCell::new(context),
            states,
            child,
            ref_capture,
            updater,
            phase: Cell::new(Phase::Constructed),
        }))
    }

    pub fn display_name(&self) -> &str {
        &self.def.display_name
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn props(&self) -> Props {
        self.props.borrow().clone()
    }

    pub fn context(&self) -> Context {
        self.context.borrow().clone()
    }

    /// The live base instance, when the base is instantiable and mounted.
    pub fn child(&self) -> Option<Child> {
        self.child.borrow().clone()
    }

    /// The state slot of fragment `id`.
    pub fn state(&self, id: FragmentId) -> Option<&StateSlot> {
        self.states.get(id)
    }

    pub fn force_updater(&self) -> &ForceUpdater {
        &self.updater
    }

    fn expect_phase(&self, allowed: &[Phase], operation: &'static str) -> HookResult {
        let phase = self.phase.get();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(MixoutError::Lifecycle { phase, operation })
        }
    }

    fn trace_pass(&self, pass: &str, hooks: usize) {
        log::trace!("{}: {pass} ({hooks} hooks)", self.def.display_name);
    }

    /// Assembles the props handed down to the base: a copy of the own props,
    /// then every prop contribution in order.
    fn pass_down_props(&self) -> Result<Props, MixoutError> {
        let props = self.props.borrow();
        let context = self.context.borrow();
        let mut values = props.clone();
        for injector in &self.def.lists.prop_injectors {
            (injector.callback)(
                &mut Setter {
                    values: &mut values,
                },
                &props,
                &context,
                self.states.slot(injector.id),
            )?;
        }
        Ok(values)
    }
}

impl ComponentInstance for WrapperInstance {
    fn render(&self) -> Result<Rendered, MixoutError> {
        self.expect_phase(
            &[Phase::Constructed, Phase::Mounted, Phase::Updating],
            "render",
        )?;
        let props = self.pass_down_props()?;
        let rendered = match &self.def.base {
            Component::Remix(remix) => remix.render(&props),
            base => {
                let element = Element::new(base, props);
                let element = match &self.ref_capture {
                    Some(capture) => element.with_ref(capture.clone()),
                    None => element,
                };
                Rendered::Element(element)
            }
        };
        Ok(rendered)
    }

    fn commit(&self, props: Props, context: Context) {
        *self.props.borrow_mut() = props;
        *self.context.borrow_mut() = context;
    }

    fn will_mount(&self) -> HookResult {
        self.expect_phase(&[Phase::Constructed], "mount")?;
        let hooks = &self.def.lists.will_mount_hooks;
        self.trace_pass("will_mount", hooks.len());
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            (hook.callback)(&props, &context, self.states.slot(hook.id))?;
        }
        Ok(())
    }

    fn did_mount(&self) -> HookResult {
        self.expect_phase(&[Phase::Constructed], "finish mounting")?;
        self.phase.set(Phase::Mounted);
        let hooks = &self.def.lists.did_mount_hooks;
        self.trace_pass("did_mount", hooks.len());
        let child = self.child();
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            (hook.callback)(&props, &context, self.states.slot(hook.id), child.as_ref())?;
        }
        Ok(())
    }

    fn will_receive_props(&self, next_props: &Props, next_context: &Context) -> HookResult {
        self.expect_phase(&[Phase::Mounted], "receive props")?;
        let hooks = &self.def.lists.will_receive_props_hooks;
        self.trace_pass("will_receive_props", hooks.len());
        let child = self.child();
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            (hook.callback)(
                next_props,
                next_context,
                &props,
                &context,
                self.states.slot(hook.id),
                child.as_ref(),
            )?;
        }
        Ok(())
    }

    /// Every vote hook is called. The update is skipped only when each one
    /// casts `false`; an abstention forces it.
    fn should_update(&self, next_props: &Props, next_context: &Context) -> bool {
        if self.phase.get() != Phase::Mounted {
            return false;
        }
        let hooks = &self.def.lists.should_update_hooks;
        if hooks.is_empty() {
            return true;
        }
        let props = self.props.borrow();
        let context = self.context.borrow();
        let mut update = false;
        let mut forced = false;
        for hook in hooks {
            match hook(next_props, next_context, &props, &context) {
                Vote::Cast(vote) => update |= vote,
                Vote::Abstain => forced = true,
            }
        }
        log::trace!(
            "{}: should_update voted {update}, forced {forced}",
            self.def.display_name
        );
        update || forced
    }

    fn will_update(&self, next_props: &Props, next_context: &Context) -> HookResult {
        self.expect_phase(&[Phase::Mounted], "update")?;
        self.phase.set(Phase::Updating);
        let hooks = &self.def.lists.will_update_hooks;
        self.trace_pass("will_update", hooks.len());
        let child = self.child();
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            let result = (hook.callback)(
                next_props,
                next_context,
                &props,
                &context,
                self.states.slot(hook.id),
                child.as_ref(),
            );
            if result.is_err() {
                self.abort_update();
                return result;
            }
        }
        Ok(())
    }

    fn did_update(&self, prev_props: &Props, prev_context: &Context) -> HookResult {
        self.expect_phase(&[Phase::Updating], "finish updating")?;
        self.phase.set(Phase::Mounted);
        let hooks = &self.def.lists.did_update_hooks;
        self.trace_pass("did_update", hooks.len());
        let child = self.child();
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            (hook.callback)(
                prev_props,
                prev_context,
                &props,
                &context,
                self.states.slot(hook.id),
                child.as_ref(),
            )?;
        }
        Ok(())
    }

    /// A failed pass leaves the instance mounted with whatever props were
    /// committed, so later updates and the unmount still run.
    fn abort_update(&self) {
        if self.phase.get() == Phase::Updating {
            log::debug!("{}: update aborted", self.def.display_name);
            self.phase.set(Phase::Mounted);
        }
    }

    fn will_unmount(&self) -> HookResult {
        self.expect_phase(
            &[Phase::Constructed, Phase::Mounted, Phase::Updating],
            "unmount",
        )?;
        self.phase.set(Phase::Unmounted);
        let hooks = &self.def.lists.will_unmount_hooks;
        self.trace_pass("will_unmount", hooks.len());
        let props = self.props.borrow();
        let context = self.context.borrow();
        for hook in hooks {
            (hook.callback)(&props, &context, self.states.slot(hook.id))?;
        }
        Ok(())
    }

    fn child_context(&self) -> Result<Option<Context>, MixoutError> {
        if self.def.tables.child_context_types.is_none() {
            return Ok(None);
        }
        self.expect_phase(
            &[Phase::Constructed, Phase::Mounted, Phase::Updating],
            "provide context",
        )?;
        let props = self.props.borrow();
        let context = self.context.borrow();
        let mut values = Context::new();
        for injector in &self.def.lists.context_injectors {
            (injector.callback)(
                &mut Setter {
                    values: &mut values,
                },
                &props,
                &context,
                self.states.slot(injector.id),
            )?;
        }
        Ok(Some(values))
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, MixoutError> {
        self.expect_phase(
            &[Phase::Constructed, Phase::Mounted, Phase::Updating],
            "invoke an imperative method",
        )?;
        let bound = self
            .def
            .methods
            .get(method)
            .ok_or_else(|| MixoutError::UnknownMethod {
                component: self.def.display_name.clone(),
                name: method.to_owned(),
            })?;
        let child = self.child();
        let props = self.props.borrow();
        let context = self.context.borrow();
        (bound.implementation)(
            args,
            &props,
            &context,
            self.states.slot(bound.owner),
            child.as_ref(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for WrapperInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperInstance")
            .field("display_name", &self.def.display_name)
            .field("phase", &self.phase.get())
            .field("props", &self.props.borrow())
            .field("has_child", &self.child.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/wrapper_tests.rs"]
mod tests;
