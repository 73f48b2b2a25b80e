//! Prop and context type declarations.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::{Props, Value};

type Check = dyn Fn(Option<&Value>) -> Result<(), String>;

/// A named check applied to one prop or context entry.
///
/// Declarations compare by identity: two `Validator::any()` calls produce
/// distinct validators, a clone of one is the same validator.
#[derive(Clone)]
pub struct Validator {
    name: Rc<str>,
    check: Rc<Check>,
}

impl Validator {
    pub fn new(
        name: impl Into<Rc<str>>,
        check: impl Fn(Option<&Value>) -> Result<(), String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Rc::new(check),
        }
    }

    pub fn any() -> Self {
        Self::new("any", |_| Ok(()))
    }

    pub fn bool() -> Self {
        Self::kind("bool", |value| matches!(value, Value::Bool(_)))
    }

    pub fn number() -> Self {
        Self::kind("number", |value| {
            matches!(value, Value::Int(_) | Value::Float(_))
        })
    }

    pub fn string() -> Self {
        Self::kind("string", |value| matches!(value, Value::Str(_)))
    }

    pub fn func() -> Self {
        Self::kind("func", |value| matches!(value, Value::Callback(_)))
    }

    fn kind(name: &'static str, accepts: fn(&Value) -> bool) -> Self {
        Self::new(name, move |value| match value {
            None | Some(Value::Null) => Ok(()),
            Some(value) if accepts(value) => Ok(()),
            Some(value) => Err(format!("expected {name}, found {}", value.kind())),
        })
    }

    /// Wraps the check so that an absent or null value is rejected.
    pub fn is_required(self) -> Self {
        let inner = Rc::clone(&self.check);
        Self {
            name: format!("{}.isRequired", self.name).into(),
            check: Rc::new(move |value| match value {
                None | Some(Value::Null) => Err("value is required".to_owned()),
                other => inner(other),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        (self.check)(value)
    }

    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Rc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// Ordered name → validator table. Later declarations replace earlier ones.
#[derive(Clone, Default, Debug)]
pub struct TypeTable {
    entries: IndexMap<String, Validator>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, validator: Validator) {
        self.entries.insert(name.into(), validator);
    }

    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Validator)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }

    /// Runs every validator against `values`, collecting one message per failure.
    pub fn validate(&self, values: &Props) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(name, validator)| {
                validator
                    .check(values.get(name))
                    .err()
                    .map(|reason| format!("invalid `{name}` ({}): {reason}", validator.name()))
            })
            .collect()
    }
}

/// Hands prop-type declarations to a fragment.
pub struct PropTypeRegistrar<'a> {
    pub(crate) types: &'a mut TypeTable,
    pub(crate) defaults: &'a mut Props,
}

impl PropTypeRegistrar<'_> {
    /// Declares `name` without a default, dropping any default an earlier
    /// declaration supplied.
    pub fn set(&mut self, name: &str, validator: Validator) {
        self.types.insert(name, validator);
        self.defaults.shift_remove(name);
    }

    pub fn set_with_default(
        &mut self,
        name: &str,
        validator: Validator,
        default: impl Into<Value>,
    ) {
        self.types.insert(name, validator);
        self.defaults.insert(name.to_owned(), default.into());
    }
}

/// Hands context-type (or child-context-type) declarations to a fragment.
pub struct ContextTypeRegistrar<'a> {
    pub(crate) types: &'a mut TypeTable,
}

impl ContextTypeRegistrar<'_> {
    pub fn set(&mut self, name: &str, validator: Validator) {
        self.types.insert(name, validator);
    }
}

/// Lets a contribution add or overwrite entries of the map being assembled.
pub struct Setter<'a> {
    pub(crate) values: &'a mut Props,
}

impl Setter<'_> {
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_owned(), value.into());
    }
}
