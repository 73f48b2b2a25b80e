use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use mixout_core::{
    combine, mixout, props, remix_named, Context, ContextTypeRegistrar, ForceUpdater, Fragment,
    Host, Props, PropTypeRegistrar, Rendered, Runtime, Setter, StateSlot, TypeTable, Validator,
    Value, Vote, WrapOptions, WrapperInstance,
};
use mixout_testing::{as_recording, CountingScheduler, EventLog, RecordingClass};

fn setting(values: Props) -> Fragment {
    Fragment::new().props(
        move |setter: &mut Setter<'_>, _: &Props, _: &Context, _: &StateSlot| {
            for (name, value) in &values {
                setter.set(name, value.clone());
            }
        },
    )
}

fn base_props(host: &Host) -> Props {
    let root = host.root_instance().expect("mounted root");
    let wrapper = root
        .as_any()
        .downcast_ref::<WrapperInstance>()
        .expect("root is a wrapper");
    let child = wrapper.child().expect("class base is mounted");
    as_recording(&child).expect("recording base").props()
}

#[test]
fn grouped_contributions_merge_in_flattened_order() {
    let log = EventLog::new();
    let bundle = combine![
        setting(props! { "a" => 1, "b" => 2 }),
        None::<Fragment>,
        combine![setting(props! { "c" => 3, "a" => 9 })],
    ];
    let wrapper = mixout![bundle].wrap(RecordingClass::new("Base", &log).component());
    let mut host = Host::new();
    host.mount(&wrapper, Props::new(), Context::new()).unwrap();

    assert_eq!(base_props(&host), props! { "a" => 9, "b" => 2, "c" => 3 });
}

#[test]
fn state_slots_are_isolated_per_fragment_and_instance() {
    let slots: Rc<RefCell<Vec<StateSlot>>> = Rc::default();
    let capture = || {
        let slots = Rc::clone(&slots);
        Fragment::new().initial_state(
            move |_: &Props, _: &Context, state: &StateSlot, _: &ForceUpdater| {
                slots.borrow_mut().push(state.clone());
            },
        )
    };
    let log = EventLog::new();
    let wrapper = mixout![capture(), capture(), capture()]
        .wrap(RecordingClass::new("Base", &log).component());

    let mut first = Host::new();
    first.mount(&wrapper, Props::new(), Context::new()).unwrap();
    let mut second = Host::new();
    second.mount(&wrapper, Props::new(), Context::new()).unwrap();

    let slots = slots.borrow();
    assert_eq!(slots.len(), 6);
    for (i, left) in slots.iter().enumerate() {
        for right in &slots[i + 1..] {
            assert!(!left.ptr_eq(right));
        }
    }
}

#[test]
fn votes_decide_whether_the_base_rerenders() {
    let cases: [(&[Vote], usize); 4] = [
        (&[Vote::Cast(false), Vote::Cast(false), Vote::Cast(false)], 1),
        (&[Vote::Cast(false), Vote::Cast(true), Vote::Cast(false)], 2),
        (&[Vote::Cast(false), Vote::Abstain, Vote::Cast(false)], 2),
        (&[], 2),
    ];

    for (votes, renders) in cases {
        let log = EventLog::new();
        let fragments: Vec<Fragment> = votes
            .iter()
            .map(|&vote| {
                Fragment::new()
                    .should_update(move |_: &Props, _: &Context, _: &Props, _: &Context| vote)
            })
            .collect();
        let wrapper = mixout(fragments).wrap(RecordingClass::new("Base", &log).component());
        let mut host = Host::new();
        host.mount(&wrapper, props! { "a" => 1 }, Context::new())
            .unwrap();
        host.set_props(props! { "a" => 2 }).unwrap();

        let rendered = log
            .entries()
            .iter()
            .filter(|entry| entry.as_str() == "Base.render")
            .count();
        assert_eq!(rendered, renders, "votes {votes:?}");
    }
}

#[test]
fn force_updates_go_through_the_scheduler() {
    let scheduler = Arc::new(CountingScheduler::default());
    let runtime = Runtime::new(scheduler.clone());
    let captured: Rc<RefCell<Vec<ForceUpdater>>> = Rc::default();
    let capture = || {
        let captured = Rc::clone(&captured);
        Fragment::new().initial_state(
            move |_: &Props, _: &Context, _: &StateSlot, updater: &ForceUpdater| {
                captured.borrow_mut().push(updater.clone());
            },
        )
    };
    let log = EventLog::new();
    let wrapper = mixout![capture(), capture()].wrap(RecordingClass::new("Base", &log).component());
    let mut host = Host::with_runtime(runtime);
    host.mount(&wrapper, Props::new(), Context::new()).unwrap();
    log.clear();

    let updaters = captured.borrow().clone();
    assert!(updaters[0].ptr_eq(&updaters[1]));
    updaters[0].request();
    updaters[1].request();
    assert_eq!(scheduler.frames(), 1);

    assert_eq!(host.process_updates().unwrap(), 1);
    assert_eq!(
        log.entries(),
        [
            "Base.will_receive_props",
            "Base.will_update",
            "Base.render",
            "Base.did_update",
        ]
    );
}

#[test]
fn declared_types_and_defaults_are_exposed_on_the_wrapper_type() {
    let wrapper = mixout![
        Fragment::new().prop_types(|types: &mut PropTypeRegistrar<'_>| {
            types.set_with_default("size", Validator::number(), 1);
            types.set_with_default("label", Validator::string(), "a");
        }),
        Fragment::new().prop_types(|types: &mut PropTypeRegistrar<'_>| {
            types.set_with_default("size", Validator::number(), 2);
            types.set("label", Validator::string().is_required());
        }),
        Fragment::new().context_types(|types: &mut ContextTypeRegistrar<'_>| {
            types.set("color", Validator::string())
        }),
    ]
    .wrap(remix_named("Sized", |_| Rendered::Empty));

    assert_eq!(wrapper.display_name(), "Sized");
    assert_eq!(wrapper.default_props(), &props! { "size" => 2 });
    assert_eq!(
        wrapper.prop_types().get("label").map(Validator::name),
        Some("string.isRequired")
    );
    assert_eq!(wrapper.context_types().names().collect::<Vec<_>>(), ["color"]);
}

#[test]
fn invalid_props_are_reported_but_still_rendered() {
    let log = EventLog::new();
    let options = WrapOptions {
        validate_props: true,
        ..WrapOptions::default()
    };
    let wrapper = mixout![Fragment::new().prop_types(|types: &mut PropTypeRegistrar<'_>| {
        types.set("size", Validator::number().is_required());
    })]
    .wrap_with(RecordingClass::new("Base", &log).component(), options);
    let mut host = Host::new();

    host.mount(&wrapper, props! { "size" => "big" }, Context::new())
        .unwrap();
    assert_eq!(base_props(&host), props! { "size" => "big" });
}

#[test]
fn providers_feed_context_to_class_descendants() {
    let log = EventLog::new();
    let mut declared = TypeTable::new();
    declared.insert("theme", Validator::string());
    let base = RecordingClass::new("Themed", &log)
        .with_context_types(declared)
        .component();
    let provider = mixout![Fragment::new()
        .child_context_types(|types: &mut ContextTypeRegistrar<'_>| {
            types.set("theme", Validator::string())
        })
        .child_context(|setter: &mut Setter<'_>, props: &Props, _: &Context, _: &StateSlot| {
            setter.set("theme", props.get("theme").cloned().unwrap_or(Value::from("light")))
        })]
    .wrap(base);
    let mut host = Host::new();

    host.mount(&provider, Props::new(), props! { "unrelated" => 1 })
        .unwrap();
    let root = host.root_instance().unwrap();
    let wrapper = root.as_any().downcast_ref::<WrapperInstance>().unwrap();
    let child = wrapper.child().unwrap();
    assert_eq!(
        as_recording(&child).unwrap().context(),
        props! { "theme" => "light" }
    );

    host.set_props(props! { "theme" => "dark" }).unwrap();
    assert_eq!(
        as_recording(&child).unwrap().context(),
        props! { "theme" => "dark" }
    );
}
