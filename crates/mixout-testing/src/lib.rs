//! Testing utilities for mixout wrappers

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
