//! Dynamic values carried through props, context and fragment state.
//!
//! Props and context are open-ended maps: fragments add keys the base
//! component was never told about, so values are modelled as a small dynamic
//! enum rather than per-component structs. A missing key is the only notion
//! of "undefined"; [`Value::Null`] is an explicit, present value.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Insertion-ordered string-keyed map of values.
pub type ValueMap = IndexMap<String, Value>;

/// Props handed to (or assembled for) a component.
pub type Props = ValueMap;

/// Context visible to a component.
pub type Context = ValueMap;

/// A value-level function, e.g. an `onChange` handler passed down as a prop.
#[derive(Clone)]
pub struct Callback {
    inner: Rc<dyn Fn(&[Value]) -> Value>,
}

impl Callback {
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.inner)(args)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.inner) as *const ())
    }
}

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(ValueMap),
    Callback(Callback),
    /// Arbitrary host data. Compared by pointer identity.
    Opaque(Rc<dyn Any>),
}

impl Value {
    pub fn opaque<T: Any>(value: T) -> Self {
        Value::Opaque(Rc::new(value))
    }

    pub fn callback(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Value::Callback(Callback::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(callback) => Some(callback),
            _ => None,
        }
    }

    /// Borrows the payload of an [`Value::Opaque`] if it holds a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short type name used by validators and debug output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Callback(_) => "callback",
            Value::Opaque(_) => "opaque",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Callback(a), Value::Callback(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Callback(callback) => callback.fmt(f),
            Value::Opaque(any) => write!(f, "Opaque({:p})", Rc::as_ptr(any) as *const ()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Callback> for Value {
    fn from(callback: Callback) -> Self {
        Value::Callback(callback)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds a [`ValueMap`] literal.
///
/// ```
/// use mixout_core::{props, Value};
///
/// let props = props! { "a" => 1, "label" => "hello" };
/// assert_eq!(props["a"], Value::Int(1));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::ValueMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_compare_by_identity() {
        let callback = Callback::new(|_| Value::Null);
        let same = Value::Callback(callback.clone());
        let other = Value::callback(|_| Value::Null);
        assert_eq!(Value::Callback(callback), same);
        assert_ne!(same, other);
    }

    #[test]
    fn opaque_values_downcast_to_their_payload() {
        let value = Value::opaque(41u8);
        assert_eq!(value.downcast_ref::<u8>(), Some(&41));
        assert!(value.downcast_ref::<u16>().is_none());
        assert_eq!(value.clone(), value);
        assert_ne!(value, Value::opaque(41u8));
    }

    #[test]
    fn map_equality_ignores_insertion_order() {
        let left = props! { "a" => 9, "b" => 2, "c" => 3 };
        let right = props! { "c" => 3, "a" => 9, "b" => 2 };
        assert_eq!(left, right);
    }

    #[test]
    fn missing_options_become_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Str("x".into()));
    }
}
