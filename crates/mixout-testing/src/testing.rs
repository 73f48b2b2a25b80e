//! Recording components and schedulers for exercising wrappers under a host.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mixout_core::{
    Child, ClassComponent, Component, ComponentInstance, Context, ForceUpdater, HookResult,
    MixoutError, Props, Rendered, TypeTable, UpdateScheduler, Value,
};

/// Shared, ordered record of `component.event` entries.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Returns the recorded entries and clears the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}

type Method = Rc<dyn Fn(&[Value]) -> Value>;

/// A class component that records every lifecycle call it receives.
pub struct RecordingClass {
    name: String,
    log: EventLog,
    methods: Vec<(String, Method)>,
    context_types: Option<TypeTable>,
}

impl RecordingClass {
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            methods: Vec::new(),
            context_types: None,
        }
    }

    /// Exposes `name` on every instance; calls are logged with their arguments.
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&[Value]) -> Value + 'static,
    ) -> Self {
        self.methods.push((name.into(), Rc::new(method)));
        self
    }

    pub fn with_context_types(mut self, types: TypeTable) -> Self {
        self.context_types = Some(types);
        self
    }

    pub fn component(self) -> Component {
        Component::class(self)
    }
}

impl ClassComponent for RecordingClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn instantiate(
        self: Rc<Self>,
        props: &Props,
        context: &Context,
        _updater: ForceUpdater,
    ) -> Result<Child, MixoutError> {
        self.log.push(format!("{}.construct", self.name));
        Ok(Rc::new(RecordingInstance {
            class: self,
            props: RefCell::new(props.clone()),
            context: RefCell::new(context.clone()),
            renders: Cell::new(0),
        }))
    }

    fn context_types(&self) -> Option<&TypeTable> {
        self.context_types.as_ref()
    }
}

pub struct RecordingInstance {
    class: Rc<RecordingClass>,
    props: RefCell<Props>,
    context: RefCell<Context>,
    renders: Cell<usize>,
}

impl RecordingInstance {
    pub fn props(&self) -> Props {
        self.props.borrow().clone()
    }

    pub fn context(&self) -> Context {
        self.context.borrow().clone()
    }

    pub fn renders(&self) -> usize {
        self.renders.get()
    }

    fn record(&self, event: &str) -> HookResult {
        self.class.log.push(format!("{}.{event}", self.class.name));
        Ok(())
    }
}

impl ComponentInstance for RecordingInstance {
    fn render(&self) -> Result<Rendered, MixoutError> {
        self.renders.set(self.renders.get() + 1);
        self.record("render")?;
        Ok(Rendered::Empty)
    }

    fn commit(&self, props: Props, context: Context) {
        *self.props.borrow_mut() = props;
        *self.context.borrow_mut() = context;
    }

    fn will_mount(&self) -> HookResult {
        self.record("will_mount")
    }

    fn did_mount(&self) -> HookResult {
        self.record("did_mount")
    }

    fn will_receive_props(&self, _next_props: &Props, _next_context: &Context) -> HookResult {
        self.record("will_receive_props")
    }

    fn will_update(&self, _next_props: &Props, _next_context: &Context) -> HookResult {
        self.record("will_update")
    }

    fn did_update(&self, _prev_props: &Props, _prev_context: &Context) -> HookResult {
        self.record("did_update")
    }

    fn will_unmount(&self) -> HookResult {
        self.record("will_unmount")
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, MixoutError> {
        let (_, implementation) = self
            .class
            .methods
            .iter()
            .find(|(name, _)| name == method)
            .ok_or_else(|| MixoutError::missing_member(method))?;
        self.class
            .log
            .push(format!("{}.{method}({args:?})", self.class.name));
        Ok(implementation(args))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A function component that logs `name.render` and renders nothing.
pub fn recording_function(name: &str, log: &EventLog) -> Component {
    let log = log.clone();
    let entry = format!("{name}.render");
    Component::function(name, move |_, _| {
        log.push(entry.clone());
        Rendered::Empty
    })
}

/// A function component that renders one prop as text, or nothing when absent.
pub fn text_of(prop: &'static str) -> Component {
    Component::function("Text", move |props, _| match props.get(prop) {
        Some(Value::Str(text)) => Rendered::Text(text.clone()),
        Some(value) => Rendered::Text(format!("{value:?}")),
        None => Rendered::Empty,
    })
}

/// Downcasts a child reference to a [`RecordingInstance`].
pub fn as_recording(child: &Child) -> Option<&RecordingInstance> {
    child.as_any().downcast_ref::<RecordingInstance>()
}

/// Counts how many frames the runtime asked for.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    frames: AtomicUsize,
}

impl CountingScheduler {
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl UpdateScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}
