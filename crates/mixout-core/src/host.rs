//! A minimal in-memory host that drives component lifecycles.
//!
//! The host owns a single rendered tree. Mounting a class element resolves
//! its default props, masks the context to the declared context types,
//! instantiates it and then runs, in order: `will_mount`, `render`, the
//! child's mount, `did_mount` and finally the parent's reference capture.
//! Updates coming from the parent run `will_receive_props`, the vote, then
//! either `will_update`, `commit`, `render`, the child's reconciliation and
//! `did_update`, or a plain `commit`. Forced updates skip the vote.
//! Unmounting runs `will_unmount` on the parent before its children and
//! detaches the reference last.

use std::mem;
use std::rc::Rc;

use crate::component::{Child, ClassComponent, Component, Element, RefCapture, Rendered};
use crate::error::{HookResult, MixoutError};
use crate::runtime::{NodeId, Runtime};
use crate::value::{Context, Props, Value};

struct ClassNode {
    id: NodeId,
    class: Rc<dyn ClassComponent>,
    instance: Child,
    /// Resolved props and masked context last committed to the instance.
    props: Props,
    context: Context,
    /// Unmasked context handed down by the parent.
    parent_context: Context,
    ref_capture: Option<RefCapture>,
    child: Box<Node>,
}

struct RenderNode {
    component: Component,
    props: Props,
    child: Box<Node>,
}

enum Node {
    Class(ClassNode),
    Render(RenderNode),
    Text(String),
    Empty,
}

/// One mounted node, as reported by [`Host::snapshot`].
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    pub depth: usize,
    pub name: String,
    pub props: Props,
}

fn resolve_props(class: &dyn ClassComponent, props: &Props) -> Props {
    let mut resolved = props.clone();
    if let Some(defaults) = class.default_props() {
        for (name, value) in defaults {
            if !resolved.contains_key(name) {
                resolved.insert(name.clone(), value.clone());
            }
        }
    }
    resolved
}

fn mask_context(class: &dyn ClassComponent, context: &Context) -> Context {
    match class.context_types() {
        Some(types) => types
            .names()
            .filter_map(|name| context.get(name).map(|value| (name.to_owned(), value.clone())))
            .collect(),
        None => context.clone(),
    }
}

fn provided_context(instance: &Child, context: &Context) -> Result<Context, MixoutError> {
    let mut merged = context.clone();
    if let Some(provided) = instance.child_context()? {
        merged.extend(provided);
    }
    Ok(merged)
}

fn same_kind(node: &Node, rendered: &Rendered) -> bool {
    match (node, rendered) {
        (Node::Class(node), Rendered::Element(element)) => match &element.component {
            Component::Class(class) => {
                Rc::as_ptr(&node.class) as *const () == Rc::as_ptr(class) as *const ()
            }
            _ => false,
        },
        (Node::Render(node), Rendered::Element(element)) => {
            node.component.same_type(&element.component)
        }
        (Node::Text(_), Rendered::Text(_)) | (Node::Empty, Rendered::Empty) => true,
        _ => false,
    }
}

fn find_class(node: &mut Node, id: NodeId) -> Option<&mut ClassNode> {
    match node {
        Node::Class(class) => {
            if class.id == id {
                Some(class)
            } else {
                find_class(&mut class.child, id)
            }
        }
        Node::Render(render) => find_class(&mut render.child, id),
        Node::Text(_) | Node::Empty => None,
    }
}

/// Builds, updates and tears down nodes.
struct Reconciler {
    runtime: Runtime,
    next_id: NodeId,
}

impl Reconciler {
    fn mount(&mut self, rendered: Rendered, context: &Context) -> Result<Node, MixoutError> {
        match rendered {
            Rendered::Empty => Ok(Node::Empty),
            Rendered::Text(text) => Ok(Node::Text(text)),
            Rendered::Element(element) => match element.component.clone() {
                Component::Class(class) => self.mount_class(class, element, context),
                component => {
                    let output = match &component {
                        Component::Function(function) => function.render(&element.props, context),
                        Component::Remix(remix) => remix.render(&element.props),
                        Component::Class(_) => Rendered::Empty,
                    };
                    let child = self.mount(output, context)?;
                    Ok(Node::Render(RenderNode {
                        component,
                        props: element.props,
                        child: Box::new(child),
                    }))
                }
            },
        }
    }

    fn mount_class(
        &mut self,
        class: Rc<dyn ClassComponent>,
        element: Element,
        context: &Context,
    ) -> Result<Node, MixoutError> {
        let props = resolve_props(class.as_ref(), &element.props);
        class.validate(&props);
        let masked = mask_context(class.as_ref(), context);

        self.next_id += 1;
        let id = self.next_id;
        let updater = self.runtime.handle().force_updater(id);
        log::trace!("mounting {} as node {id}", class.name());

        let instance = Rc::clone(&class).instantiate(&props, &masked, updater)?;
        instance.will_mount()?;
        let rendered = instance.render()?;
        let child_context = provided_context(&instance, context)?;
        let child = self.mount(rendered, &child_context)?;
        instance.did_mount()?;
        if let Some(capture) = &element.ref_capture {
            capture.attach(Some(Rc::clone(&instance)));
        }

        Ok(Node::Class(ClassNode {
            id,
            class,
            instance,
            props,
            context: masked,
            parent_context: context.clone(),
            ref_capture: element.ref_capture,
            child: Box::new(child),
        }))
    }

    fn reconcile(
        &mut self,
        node: &mut Node,
        rendered: Rendered,
        context: &Context,
    ) -> HookResult {
        if !same_kind(node, &rendered) {
            let previous = mem::replace(node, Node::Empty);
            self.unmount(previous)?;
            *node = self.mount(rendered, context)?;
            return Ok(());
        }
        match (node, rendered) {
            (Node::Class(node), Rendered::Element(element)) => {
                self.update_class(node, element, context)
            }
            (Node::Render(node), Rendered::Element(element)) => {
                node.props = element.props;
                let output = match &node.component {
                    Component::Function(function) => function.render(&node.props, context),
                    Component::Remix(remix) => remix.render(&node.props),
                    Component::Class(_) => Rendered::Empty,
                };
                self.reconcile(&mut node.child, output, context)
            }
            (Node::Text(text), Rendered::Text(next)) => {
                *text = next;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn update_class(
        &mut self,
        node: &mut ClassNode,
        element: Element,
        context: &Context,
    ) -> HookResult {
        let props = resolve_props(node.class.as_ref(), &element.props);
        node.class.validate(&props);
        let masked = mask_context(node.class.as_ref(), context);
        node.parent_context = context.clone();
        let instance = Rc::clone(&node.instance);

        instance.will_receive_props(&props, &masked)?;
        if instance.should_update(&props, &masked) {
            self.update_pass(node, Some((props, masked)))?;
        } else {
            log::trace!("node {} skipped its update", node.id);
            node.props = props.clone();
            node.context = masked.clone();
            instance.commit(props, masked);
        }

        let unchanged = match (&node.ref_capture, &element.ref_capture) {
            (Some(previous), Some(next)) => previous.ptr_eq(next),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            if let Some(previous) = &node.ref_capture {
                previous.attach(None);
            }
            if let Some(next) = &element.ref_capture {
                next.attach(Some(Rc::clone(&instance)));
            }
            node.ref_capture = element.ref_capture;
        }
        Ok(())
    }

    fn force_update(&mut self, node: &mut ClassNode) -> HookResult {
        self.update_pass(node, None)
    }

    /// Runs `will_update` through `did_update`, committing `next` first when
    /// given. A failure anywhere in the pass aborts the instance's update.
    fn update_pass(&mut self, node: &mut ClassNode, next: Option<(Props, Context)>) -> HookResult {
        let instance = Rc::clone(&node.instance);
        let result = self.apply_update(node, &instance, next);
        if result.is_err() {
            instance.abort_update();
        }
        result
    }

    fn apply_update(
        &mut self,
        node: &mut ClassNode,
        instance: &Child,
        next: Option<(Props, Context)>,
    ) -> HookResult {
        let (prev_props, prev_context) = match next {
            Some((props, masked)) => {
                instance.will_update(&props, &masked)?;
                let prev_props = mem::replace(&mut node.props, props.clone());
                let prev_context = mem::replace(&mut node.context, masked.clone());
                instance.commit(props, masked);
                (prev_props, prev_context)
            }
            None => {
                instance.will_update(&node.props, &node.context)?;
                (node.props.clone(), node.context.clone())
            }
        };
        let rendered = instance.render()?;
        let child_context = provided_context(instance, &node.parent_context)?;
        self.reconcile(&mut node.child, rendered, &child_context)?;
        instance.did_update(&prev_props, &prev_context)
    }

    /// Tears the whole subtree down even when a hook fails; the first error
    /// is returned once every node has been visited.
    fn unmount(&mut self, node: Node) -> HookResult {
        match node {
            Node::Class(node) => {
                log::trace!("unmounting node {}", node.id);
                let result = node.instance.will_unmount();
                let children = self.unmount(*node.child);
                if let Some(capture) = &node.ref_capture {
                    capture.attach(None);
                }
                result.and(children)
            }
            Node::Render(node) => self.unmount(*node.child),
            Node::Text(_) | Node::Empty => Ok(()),
        }
    }
}

struct Root {
    element: Element,
    context: Context,
    node: Node,
}

/// Owns one mounted tree and its runtime.
pub struct Host {
    reconciler: Reconciler,
    root: Option<Root>,
}

impl Host {
    pub fn new() -> Self {
        Self::with_runtime(Runtime::default())
    }

    pub fn with_runtime(runtime: Runtime) -> Self {
        Self {
            reconciler: Reconciler {
                runtime,
                next_id: 0,
            },
            root: None,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.reconciler.runtime
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    /// Renders `component` at the root. A root of the same type is updated in
    /// place; any other root is replaced.
    pub fn mount(
        &mut self,
        component: impl Into<Component>,
        props: Props,
        context: Context,
    ) -> HookResult {
        self.render(Element::new(component, props), context)
    }

    fn render(&mut self, element: Element, context: Context) -> HookResult {
        match self.root.as_mut() {
            Some(root) => {
                self.reconciler.reconcile(
                    &mut root.node,
                    Rendered::Element(element.clone()),
                    &context,
                )?;
                root.element = element;
                root.context = context;
            }
            None => {
                let node = self
                    .reconciler
                    .mount(Rendered::Element(element.clone()), &context)?;
                self.root = Some(Root {
                    element,
                    context,
                    node,
                });
            }
        }
        Ok(())
    }

    pub fn set_props(&mut self, props: Props) -> HookResult {
        let root = self.root.as_ref().ok_or(MixoutError::NotMounted)?;
        let context = root.context.clone();
        self.update(props, context)
    }

    pub fn set_context(&mut self, context: Context) -> HookResult {
        let root = self.root.as_ref().ok_or(MixoutError::NotMounted)?;
        let props = root.element.props.clone();
        self.update(props, context)
    }

    pub fn update(&mut self, props: Props, context: Context) -> HookResult {
        let root = self.root.as_ref().ok_or(MixoutError::NotMounted)?;
        let mut element = root.element.clone();
        element.props = props;
        self.render(element, context)
    }

    pub fn unmount(&mut self) -> HookResult {
        let root = self.root.take().ok_or(MixoutError::NotMounted)?;
        self.reconciler.unmount(root.node)
    }

    /// Applies every pending forced update once. Returns how many were applied.
    ///
    /// When an update fails its completions are dropped, the updates queued
    /// behind it go back to the runtime and the error is returned.
    pub fn process_updates(&mut self) -> Result<usize, MixoutError> {
        let mut updates = self.reconciler.runtime.take_updates().into_iter();
        let mut applied = 0;
        while let Some(update) = updates.next() {
            let node = self
                .root
                .as_mut()
                .and_then(|root| find_class(&mut root.node, update.node));
            let Some(node) = node else {
                log::debug!("dropping update for unmounted node {}", update.node);
                continue;
            };
            if let Err(err) = self.reconciler.force_update(node) {
                let remaining: Vec<_> = updates.collect();
                log::debug!(
                    "update of node {} failed, requeueing {} updates",
                    update.node,
                    remaining.len()
                );
                self.reconciler.runtime.requeue(remaining);
                return Err(err);
            }
            applied += 1;
            for completion in update.completions {
                completion();
            }
        }
        Ok(applied)
    }

    /// The instance mounted at the root, when the root is a class component.
    pub fn root_instance(&self) -> Option<Child> {
        match &self.root.as_ref()?.node {
            Node::Class(node) => Some(Rc::clone(&node.instance)),
            _ => None,
        }
    }

    pub fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, MixoutError> {
        self.root_instance()
            .ok_or(MixoutError::NotMounted)?
            .invoke(method, args)
    }

    /// The mounted tree in depth-first order. Text nodes are reported as
    /// `#text` with their content under `text`.
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        let mut nodes = Vec::new();
        if let Some(root) = &self.root {
            collect(&root.node, 0, &mut nodes);
        }
        nodes
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(node: &Node, depth: usize, nodes: &mut Vec<NodeSnapshot>) {
    match node {
        Node::Class(node) => {
            nodes.push(NodeSnapshot {
                depth,
                name: node.class.name().to_owned(),
                props: node.props.clone(),
            });
            collect(&node.child, depth + 1, nodes);
        }
        Node::Render(node) => {
            nodes.push(NodeSnapshot {
                depth,
                name: node.component.name().to_owned(),
                props: node.props.clone(),
            });
            collect(&node.child, depth + 1, nodes);
        }
        Node::Text(text) => {
            let mut props = Props::new();
            props.insert("text".to_owned(), Value::from(text.as_str()));
            nodes.push(NodeSnapshot {
                depth,
                name: "#text".to_owned(),
                props,
            });
        }
        Node::Empty => {}
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
