#![doc = r"Fragment-based composition of component props, context, state, lifecycle and methods."]

extern crate self as mixout_core;

mod collections;
mod combine;
pub mod component;
pub mod decompose;
pub mod error;
pub mod fragment;
pub mod host;
pub mod methods;
mod mixout;
pub mod platform;
pub mod remix;
pub mod runtime;
pub mod state;
pub mod types;
pub mod value;
pub mod wrapper;

pub use combine::{combine, flatten, Group, Injectable};
pub use component::{
    Child, ClassComponent, Component, ComponentInstance, Element, FunctionComponent, RefCapture,
    Rendered,
};
pub use decompose::{decompose, Decomposed, FragmentId, WithId};
pub use error::{HookResult, IntoHookResult, MixoutError, Phase};
pub use fragment::{Capability, Fragment, Vote};
pub use host::{Host, NodeSnapshot};
pub use methods::{MethodRegistrar, MethodTable};
pub use mixout::{mixout, Mixout, WrapOptions, WrapperType};
pub use platform::UpdateScheduler;
pub use remix::{remix, remix_named, Remix};
pub use runtime::{DefaultScheduler, ForceUpdater, NodeId, Runtime, RuntimeHandle};
pub use state::StateSlot;
pub use types::{ContextTypeRegistrar, PropTypeRegistrar, Setter, TypeTable, Validator};
pub use value::{Callback, Context, Props, Value, ValueMap};
pub use wrapper::WrapperInstance;
