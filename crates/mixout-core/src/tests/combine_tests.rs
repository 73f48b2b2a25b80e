use super::*;
use crate::types::Setter;
use crate::value::{Context, Props};
use crate::StateSlot;
use std::rc::Rc;

fn marked(label: &'static str) -> Fragment {
    Fragment::new().props(move |setter: &mut Setter<'_>, _: &Props, _: &Context, _: &StateSlot| {
        setter.set("label", label)
    })
}

fn same_fragments(left: &[Fragment], right: &[Fragment]) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|(a, b)| match (&a.props, &b.props) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        })
}

#[test]
fn flat_input_is_returned_unchanged() {
    let f1 = marked("f1");
    let f2 = marked("f2");
    let flat = flatten(&[f1.clone().into(), f2.clone().into()]);
    assert!(same_fragments(&flat, &[f1, f2]));
}

#[test]
fn nested_groups_flatten_depth_first() {
    let fragments: Vec<Fragment> = ["f1", "f2", "f3", "f4", "f5", "f6"]
        .into_iter()
        .map(marked)
        .collect();
    let [f1, f2, f3, f4, f5, f6] = <[Fragment; 6]>::try_from(fragments.clone())
        .unwrap_or_else(|_| panic!("six fragments"));

    let tree = combine![
        f1,
        Injectable::Empty,
        combine![
            f2,
            None::<Fragment>,
            f3,
            combine![f4, combine![f5]],
            f6,
        ],
    ];

    let flat = flatten(&[tree.into()]);
    assert!(same_fragments(&flat, &fragments));
}

#[test]
fn empty_input_flattens_to_nothing() {
    assert!(flatten(&[]).is_empty());
    let nothing = combine(Vec::<Injectable>::new());
    assert!(flatten(&[Injectable::Empty, nothing.into()]).is_empty());
}

#[test]
fn groups_keep_members_untouched() {
    let group = combine([Some(marked("a")), None, Some(marked("b"))]);
    assert_eq!(group.members().len(), 3);
    assert!(matches!(group.members()[1], Injectable::Empty));
    assert_eq!(group.flatten().len(), 2);
}
