//! Component descriptors understood by the host.
//!
//! A base component is either instantiable (a [`ClassComponent`], which the
//! host turns into a live [`ComponentInstance`] that a parent may hold a
//! reference to), a plain render function, or a [`Remix`] renderer inlined
//! into the wrapper. Wrapper types are class components themselves.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{HookResult, MixoutError};
use crate::remix::Remix;
use crate::runtime::ForceUpdater;
use crate::types::TypeTable;
use crate::value::{Context, Props, Value};

/// Live reference to a mounted instance.
pub type Child = Rc<dyn ComponentInstance>;

/// A live, host-driven component instance.
///
/// The host calls these in the order documented on [`crate::Host`]. Instances
/// own their current props and context; the host hands over new ones with
/// [`ComponentInstance::commit`].
pub trait ComponentInstance: Any {
    fn render(&self) -> Result<Rendered, MixoutError>;

    /// Replaces the instance's props and context.
    fn commit(&self, props: Props, context: Context);

    fn will_mount(&self) -> HookResult {
        Ok(())
    }

    fn did_mount(&self) -> HookResult {
        Ok(())
    }

    fn will_receive_props(&self, _next_props: &Props, _next_context: &Context) -> HookResult {
        Ok(())
    }

    fn should_update(&self, _next_props: &Props, _next_context: &Context) -> bool {
        true
    }

    fn will_update(&self, _next_props: &Props, _next_context: &Context) -> HookResult {
        Ok(())
    }

    fn did_update(&self, _prev_props: &Props, _prev_context: &Context) -> HookResult {
        Ok(())
    }

    /// Called when an update pass fails after `will_update` was entered.
    fn abort_update(&self) {}

    fn will_unmount(&self) -> HookResult {
        Ok(())
    }

    /// Context entries this instance provides to its descendants.
    fn child_context(&self) -> Result<Option<Context>, MixoutError> {
        Ok(None)
    }

    /// Calls a named instance method.
    fn invoke(&self, method: &str, _args: &[Value]) -> Result<Value, MixoutError> {
        Err(MixoutError::missing_member(method))
    }

    fn as_any(&self) -> &dyn Any;
}

/// An instantiable component type.
pub trait ClassComponent: 'static {
    fn name(&self) -> &str;

    fn instantiate(
        self: Rc<Self>,
        props: &Props,
        context: &Context,
        updater: ForceUpdater,
    ) -> Result<Child, MixoutError>;

    /// Defaults the host fills in for absent props.
    fn default_props(&self) -> Option<&Props> {
        None
    }

    /// When declared, the host only passes these context keys to the instance.
    fn context_types(&self) -> Option<&TypeTable> {
        None
    }

    /// Called by the host with every resolved prop set before it is used.
    fn validate(&self, _props: &Props) {}
}

type RenderFn = dyn Fn(&Props, &Context) -> Rendered;

/// A plain render function. Never receives a reference from its parent.
#[derive(Clone)]
pub struct FunctionComponent {
    name: Rc<str>,
    render: Rc<RenderFn>,
}

impl FunctionComponent {
    pub fn new(
        name: impl Into<Rc<str>>,
        render: impl Fn(&Props, &Context) -> Rendered + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, props: &Props, context: &Context) -> Rendered {
        (self.render)(props, context)
    }

    fn ptr_eq(&self, other: &FunctionComponent) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

#[derive(Clone)]
pub enum Component {
    Class(Rc<dyn ClassComponent>),
    Function(FunctionComponent),
    Remix(Remix),
}

impl Component {
    pub fn class<C: ClassComponent>(component: C) -> Self {
        Component::Class(Rc::new(component))
    }

    pub fn function(
        name: impl Into<Rc<str>>,
        render: impl Fn(&Props, &Context) -> Rendered + 'static,
    ) -> Self {
        Component::Function(FunctionComponent::new(name, render))
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Class(class) => class.name(),
            Component::Function(function) => function.name(),
            Component::Remix(remix) => remix.display_name().unwrap_or("Remix"),
        }
    }

    /// Whether the host can hand a parent a live reference to this component.
    pub fn is_instantiable(&self) -> bool {
        matches!(self, Component::Class(_))
    }

    /// Identity comparison used by the host to decide between update and remount.
    pub fn same_type(&self, other: &Component) -> bool {
        match (self, other) {
            (Component::Class(a), Component::Class(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            (Component::Function(a), Component::Function(b)) => a.ptr_eq(b),
            (Component::Remix(a), Component::Remix(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Component::Class(_) => "Class",
            Component::Function(_) => "Function",
            Component::Remix(_) => "Remix",
        };
        f.debug_tuple(kind).field(&self.name()).finish()
    }
}

impl From<FunctionComponent> for Component {
    fn from(function: FunctionComponent) -> Self {
        Component::Function(function)
    }
}

impl From<Remix> for Component {
    fn from(remix: Remix) -> Self {
        Component::Remix(remix)
    }
}

impl From<&Component> for Component {
    fn from(component: &Component) -> Self {
        component.clone()
    }
}

/// Receives the live instance when its element mounts, and `None` when it
/// unmounts.
#[derive(Clone)]
pub struct RefCapture {
    inner: Rc<dyn Fn(Option<Child>)>,
}

impl RefCapture {
    pub fn new(capture: impl Fn(Option<Child>) + 'static) -> Self {
        Self {
            inner: Rc::new(capture),
        }
    }

    pub fn attach(&self, instance: Option<Child>) {
        (self.inner)(instance)
    }

    pub fn ptr_eq(&self, other: &RefCapture) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RefCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefCapture")
    }
}

/// A request to render `component` with `props`.
#[derive(Clone, Debug)]
pub struct Element {
    pub component: Component,
    pub props: Props,
    pub ref_capture: Option<RefCapture>,
}

impl Element {
    pub fn new(component: impl Into<Component>, props: Props) -> Self {
        Self {
            component: component.into(),
            props,
            ref_capture: None,
        }
    }

    pub fn with_ref(mut self, capture: RefCapture) -> Self {
        self.ref_capture = Some(capture);
        self
    }
}

/// Output of a render call.
#[derive(Clone, Debug, Default)]
pub enum Rendered {
    #[default]
    Empty,
    Text(String),
    Element(Element),
}

impl From<Element> for Rendered {
    fn from(element: Element) -> Self {
        Rendered::Element(element)
    }
}
