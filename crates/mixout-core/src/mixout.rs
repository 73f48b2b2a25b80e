//! The two-stage wrapper factory.
//!
//! [`mixout`] decomposes a fragment list once and aggregates its type
//! declarations; [`Mixout::wrap`] then builds a [`WrapperType`] around a base
//! component, binding imperative methods once for every instance of that type.

use std::fmt;
use std::rc::Rc;

use crate::combine::Injectable;
use crate::component::{Child, ClassComponent, Component};
use crate::decompose::{decompose, Decomposed};
use crate::error::MixoutError;
use crate::methods::{MethodRegistrar, MethodTable};
use crate::runtime::ForceUpdater;
use crate::types::{ContextTypeRegistrar, PropTypeRegistrar, TypeTable};
use crate::value::{Context, Props};
use crate::wrapper::WrapperInstance;

const DEFAULT_DISPLAY_NAME: &str = "Mixout";

/// Aggregated declarations of one fragment list.
#[derive(Clone, Debug, Default)]
pub(crate) struct TypeTables {
    pub(crate) prop_types: TypeTable,
    pub(crate) default_props: Props,
    pub(crate) context_types: TypeTable,
    pub(crate) child_context_types: Option<TypeTable>,
}

impl TypeTables {
    fn build(lists: &Decomposed) -> Self {
        let mut tables = TypeTables::default();

        for injector in &lists.prop_type_injectors {
            injector(&mut PropTypeRegistrar {
                types: &mut tables.prop_types,
                defaults: &mut tables.default_props,
            });
        }

        for injector in &lists.context_type_injectors {
            injector(&mut ContextTypeRegistrar {
                types: &mut tables.context_types,
            });
        }

        if lists.provides_context() {
            let mut child_context_types = TypeTable::new();
            for injector in &lists.child_context_type_injectors {
                injector(&mut ContextTypeRegistrar {
                    types: &mut child_context_types,
                });
            }
            tables.child_context_types = Some(child_context_types);
        }

        tables
    }
}

/// Options applied when wrapping a base component.
#[derive(Clone, Debug)]
pub struct WrapOptions {
    /// Overrides the wrapper's display name.
    pub display_name: Option<String>,
    /// Check incoming props against the declared prop types and log failures.
    pub validate_props: bool,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            display_name: None,
            validate_props: cfg!(debug_assertions),
        }
    }
}

/// First stage: one decomposed fragment set, ready to wrap base components.
#[derive(Clone)]
pub struct Mixout {
    lists: Rc<Decomposed>,
    tables: Rc<TypeTables>,
}

/// Decomposes `fragments` and aggregates their type declarations.
pub fn mixout<I, T>(fragments: I) -> Mixout
where
    I: IntoIterator<Item = T>,
    T: Into<Injectable>,
{
    let injectables: Vec<Injectable> = fragments.into_iter().map(Into::into).collect();
    let lists = decompose(&injectables);
    let tables = TypeTables::build(&lists);
    Mixout {
        lists: Rc::new(lists),
        tables: Rc::new(tables),
    }
}

/// Variadic [`mixout`] over heterogeneous fragments and groups.
#[macro_export]
macro_rules! mixout {
    ($($fragment:expr),* $(,)?) => {
        $crate::mixout(::std::vec![$($crate::Injectable::from($fragment)),*])
    };
}

impl Mixout {
    pub fn decomposed(&self) -> &Decomposed {
        &self.lists
    }

    pub fn wrap(&self, base: impl Into<Component>) -> WrapperType {
        self.wrap_with(base, WrapOptions::default())
    }

    pub fn wrap_with(&self, base: impl Into<Component>, options: WrapOptions) -> WrapperType {
        let base = base.into();
        let display_name = options
            .display_name
            .or_else(|| match &base {
                Component::Remix(remix) => remix.display_name().map(str::to_owned),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_owned());

        let mut methods = MethodTable::default();
        for injector in &self.lists.imperative_method_injectors {
            (injector.callback)(&mut MethodRegistrar::new(injector.id, &mut methods));
        }

        log::debug!(
            "wrapping {:?} as {display_name} with {} fragments",
            base,
            self.lists.len()
        );

        WrapperType {
            def: Rc::new(WrapperDef {
                display_name,
                instantiable: base.is_instantiable(),
                base,
                lists: Rc::clone(&self.lists),
                tables: Rc::clone(&self.tables),
                methods,
                validate_props: options.validate_props,
            }),
        }
    }
}

impl fmt::Debug for Mixout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixout")
            .field("fragments", &self.lists.len())
            .finish()
    }
}

pub(crate) struct WrapperDef {
    pub(crate) display_name: String,
    pub(crate) base: Component,
    pub(crate) instantiable: bool,
    pub(crate) lists: Rc<Decomposed>,
    pub(crate) tables: Rc<TypeTables>,
    pub(crate) methods: MethodTable,
    validate_props: bool,
}

impl ClassComponent for WrapperDef {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn instantiate(
        self: Rc<Self>,
        props: &Props,
        context: &Context,
        updater: ForceUpdater,
    ) -> Result<Child, MixoutError> {
        let instance: Child = WrapperInstance::new(self, props.clone(), context.clone(), updater)?;
        Ok(instance)
    }

    fn default_props(&self) -> Option<&Props> {
        Some(&self.tables.default_props)
    }

    fn context_types(&self) -> Option<&TypeTable> {
        Some(&self.tables.context_types)
    }

    fn validate(&self, props: &Props) {
        if !self.validate_props {
            return;
        }
        for failure in self.tables.prop_types.validate(props) {
            log::warn!("{}: {failure}", self.display_name);
        }
    }
}

/// A generated wrapper component type, shared by all of its instances.
#[derive(Clone)]
pub struct WrapperType {
    def: Rc<WrapperDef>,
}

impl WrapperType {
    pub fn display_name(&self) -> &str {
        &self.def.display_name
    }

    pub fn base(&self) -> &Component {
        &self.def.base
    }

    pub fn prop_types(&self) -> &TypeTable {
        &self.def.tables.prop_types
    }

    pub fn default_props(&self) -> &Props {
        &self.def.tables.default_props
    }

    pub fn context_types(&self) -> &TypeTable {
        &self.def.tables.context_types
    }

    pub fn child_context_types(&self) -> Option<&TypeTable> {
        self.def.tables.child_context_types.as_ref()
    }

    pub fn is_context_provider(&self) -> bool {
        self.def.tables.child_context_types.is_some()
    }

    pub fn methods(&self) -> &MethodTable {
        &self.def.methods
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.def.methods.contains(name)
    }

    /// The component descriptor a host (or an enclosing wrapper) renders.
    pub fn component(&self) -> Component {
        Component::Class(Rc::clone(&self.def) as Rc<dyn ClassComponent>)
    }

    /// Builds an instance directly, without a host.
    pub fn instantiate(
        &self,
        props: Props,
        context: Context,
        updater: ForceUpdater,
    ) -> Result<Rc<WrapperInstance>, MixoutError> {
        WrapperInstance::new(Rc::clone(&self.def), props, context, updater)
    }
}

impl From<&WrapperType> for Component {
    fn from(wrapper: &WrapperType) -> Self {
        wrapper.component()
    }
}

impl From<WrapperType> for Component {
    fn from(wrapper: WrapperType) -> Self {
        wrapper.component()
    }
}

impl fmt::Debug for WrapperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperType")
            .field("display_name", &self.def.display_name)
            .field("base", &self.def.base)
            .field("methods", &self.def.methods)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/mixout_tests.rs"]
mod tests;
