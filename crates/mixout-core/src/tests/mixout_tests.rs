use super::*;
use crate::component::{ComponentInstance, Rendered};
use crate::fragment::Fragment;
use crate::remix::remix_named;
use crate::types::{ContextTypeRegistrar, Validator};
use crate::value::Value;
use std::cell::Cell;

fn base() -> Component {
    Component::function("Base", |_, _| Rendered::Empty)
}

#[test]
fn later_prop_types_overwrite_earlier_ones() {
    let number = Validator::number();
    let string = Validator::string();
    let first = {
        let number = number.clone();
        Fragment::new().prop_types(move |types: &mut PropTypeRegistrar<'_>| {
            types.set_with_default("size", number.clone(), 1);
            types.set_with_default("label", Validator::string(), "first");
        })
    };
    let second = {
        let string = string.clone();
        Fragment::new().prop_types(move |types: &mut PropTypeRegistrar<'_>| {
            types.set_with_default("size", string.clone(), "large");
        })
    };

    let wrapper = mixout([first, second]).wrap(base());

    assert!(wrapper.prop_types().get("size").unwrap().ptr_eq(&string));
    assert_eq!(wrapper.default_props()["size"], Value::from("large"));
    assert_eq!(wrapper.default_props()["label"], Value::from("first"));
}

#[test]
fn redeclaring_without_a_default_removes_it() {
    let first = Fragment::new().prop_types(|types: &mut PropTypeRegistrar<'_>| {
        types.set_with_default("value", Validator::any(), 5);
    });
    let second = Fragment::new().prop_types(|types: &mut PropTypeRegistrar<'_>| {
        types.set("value", Validator::any());
    });

    let wrapper = mixout([first, second]).wrap(base());

    assert!(wrapper.prop_types().contains("value"));
    assert!(!wrapper.default_props().contains_key("value"));
}

#[test]
fn context_types_merge_and_child_context_marks_a_provider() {
    let plain = mixout([Fragment::new().context_types(
        |types: &mut ContextTypeRegistrar<'_>| types.set("color", Validator::string()),
    )])
    .wrap(base());
    assert!(plain.context_types().contains("color"));
    assert!(!plain.is_context_provider());
    assert!(plain.child_context_types().is_none());

    let provider = mixout([Fragment::new().child_context_types(
        |types: &mut ContextTypeRegistrar<'_>| types.set("theme", Validator::any()),
    )])
    .wrap(base());
    assert!(provider.is_context_provider());
    assert!(provider.child_context_types().unwrap().contains("theme"));
}

#[test]
fn display_name_prefers_options_then_remix_name() {
    let factory = mixout(Vec::<Fragment>::new());
    assert_eq!(factory.wrap(base()).display_name(), "Mixout");

    let named = remix_named("Label", |_| Rendered::Empty);
    assert_eq!(factory.wrap(named.clone()).display_name(), "Label");

    let options = WrapOptions {
        display_name: Some("Custom".into()),
        ..WrapOptions::default()
    };
    assert_eq!(factory.wrap_with(named, options).display_name(), "Custom");
}

#[test]
fn method_injectors_run_once_per_wrapper_type() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let factory = mixout([Fragment::new().imperative_methods(
        move |methods: &mut MethodRegistrar<'_>| {
            counter.set(counter.get() + 1);
            methods.set("focus", |_, _, _, _, _| Ok(Value::from("focused")));
        },
    )]);

    let wrapper = factory.wrap(base());
    assert_eq!(calls.get(), 1);

    for _ in 0..3 {
        wrapper
            .instantiate(Props::new(), Context::new(), ForceUpdater::noop())
            .unwrap();
    }
    assert_eq!(calls.get(), 1);
    assert!(wrapper.has_method("focus"));

    factory.wrap(base());
    assert_eq!(calls.get(), 2);
}

#[test]
fn last_method_registration_wins() {
    let register = |result: &'static str| {
        Fragment::new().imperative_methods(move |methods: &mut MethodRegistrar<'_>| {
            methods.set("value", move |_, _, _, _, _| Ok(Value::from(result)));
        })
    };
    let wrapper = mixout([register("first"), register("second")]).wrap(base());

    assert_eq!(wrapper.methods().len(), 1);
    assert_eq!(wrapper.methods().owner("value"), crate::FragmentId::new(2));
    let instance = wrapper
        .instantiate(Props::new(), Context::new(), ForceUpdater::noop())
        .unwrap();
    assert_eq!(instance.invoke("value", &[]).unwrap(), Value::from("second"));
}

#[test]
fn wrapper_types_are_class_components() {
    let wrapper = mixout(Vec::<Fragment>::new()).wrap(base());
    let component = wrapper.component();
    assert!(component.is_instantiable());
    assert!(component.same_type(&wrapper.component()));
    assert_eq!(component.name(), "Mixout");
}

#[test]
fn mixout_macro_accepts_groups_and_holes() {
    let factory = crate::mixout![
        Fragment::new(),
        None::<Fragment>,
        crate::combine![Fragment::new(), Fragment::new()],
    ];
    assert_eq!(factory.decomposed().len(), 3);
}
