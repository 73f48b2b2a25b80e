//! Grouping of fragments into reusable bundles.

use crate::fragment::Fragment;

/// One entry of a fragment list: a fragment, a nested group, or a hole.
#[derive(Clone, Debug, Default)]
pub enum Injectable {
    Fragment(Fragment),
    Group(Group),
    /// Placeholder that flattening drops, e.g. a conditionally disabled fragment.
    #[default]
    Empty,
}

/// An ordered bundle of injectables with no capabilities of its own.
#[derive(Clone, Debug, Default)]
pub struct Group {
    members: Vec<Injectable>,
}

impl Group {
    pub fn members(&self) -> &[Injectable] {
        &self.members
    }

    pub fn flatten(&self) -> Vec<Fragment> {
        flatten(&self.members)
    }
}

impl From<Fragment> for Injectable {
    fn from(fragment: Fragment) -> Self {
        Injectable::Fragment(fragment)
    }
}

impl From<Group> for Injectable {
    fn from(group: Group) -> Self {
        Injectable::Group(group)
    }
}

impl<T: Into<Injectable>> From<Option<T>> for Injectable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Injectable::Empty, Into::into)
    }
}

/// Bundles `members`, untouched, into a [`Group`].
pub fn combine<I, T>(members: I) -> Group
where
    I: IntoIterator<Item = T>,
    T: Into<Injectable>,
{
    Group {
        members: members.into_iter().map(Into::into).collect(),
    }
}

/// Depth-first, left-to-right expansion of groups; holes are dropped.
pub fn flatten(injectables: &[Injectable]) -> Vec<Fragment> {
    let mut flat = Vec::with_capacity(injectables.len());
    flatten_into(injectables, &mut flat);
    flat
}

fn flatten_into(injectables: &[Injectable], flat: &mut Vec<Fragment>) {
    for injectable in injectables {
        match injectable {
            Injectable::Fragment(fragment) => flat.push(fragment.clone()),
            Injectable::Group(group) => flatten_into(&group.members, flat),
            Injectable::Empty => {}
        }
    }
}

/// Variadic [`combine`] over heterogeneous members.
///
/// ```
/// use mixout_core::{combine, Fragment, Injectable};
///
/// let bundle = combine![Fragment::new(), Injectable::Empty, combine![Fragment::new()]];
/// assert_eq!(bundle.flatten().len(), 2);
/// ```
#[macro_export]
macro_rules! combine {
    ($($member:expr),* $(,)?) => {
        $crate::combine([$($crate::Injectable::from($member)),*])
    };
}

#[cfg(test)]
#[path = "tests/combine_tests.rs"]
mod tests;
