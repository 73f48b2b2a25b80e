use std::cell::RefCell;
use std::rc::Rc;

use mixout_core::{
    mixout, props, Child, Component, Context, Fragment, Host, MethodRegistrar, MixoutError,
    Phase, Props, StateSlot, Value, WrapperInstance,
};
use mixout_testing::{as_recording, recording_function, EventLog, RecordingClass};

fn logging(log: &EventLog, name: &'static str) -> Fragment {
    let push = |event: &'static str| {
        let log = log.clone();
        move || log.push(format!("{name}.{event}"))
    };
    let will_mount = push("will_mount");
    let did_mount = push("did_mount");
    let will_receive_props = push("will_receive_props");
    let will_update = push("will_update");
    let did_update = push("did_update");
    let will_unmount = push("will_unmount");
    Fragment::new()
        .will_mount(move |_, _, _| will_mount())
        .did_mount(move |_, _, _, _| did_mount())
        .will_receive_props(move |_, _, _, _, _, _| will_receive_props())
        .will_update(move |_, _, _, _, _, _| will_update())
        .did_update(move |_, _, _, _, _, _| did_update())
        .will_unmount(move |_, _, _| will_unmount())
}

#[test]
fn wrapper_and_base_lifecycles_interleave() {
    let log = EventLog::new();
    let base = RecordingClass::new("Base", &log).component();
    let wrapper = mixout![logging(&log, "outer")].wrap(base);
    let mut host = Host::new();

    host.mount(&wrapper, props! { "a" => 1 }, Context::new())
        .unwrap();
    assert_eq!(
        log.take(),
        [
            "outer.will_mount",
            "Base.construct",
            "Base.will_mount",
            "Base.render",
            "Base.did_mount",
            "outer.did_mount",
        ]
    );

    host.set_props(props! { "a" => 2 }).unwrap();
    assert_eq!(
        log.take(),
        [
            "outer.will_receive_props",
            "outer.will_update",
            "Base.will_receive_props",
            "Base.will_update",
            "Base.render",
            "Base.did_update",
            "outer.did_update",
        ]
    );

    host.unmount().unwrap();
    assert_eq!(log.take(), ["outer.will_unmount", "Base.will_unmount"]);
}

#[test]
fn base_receives_the_assembled_props() {
    let log = EventLog::new();
    let wrapper = mixout![Fragment::new().props(
        |setter: &mut mixout_core::Setter<'_>, props: &Props, _: &Context, _: &StateSlot| {
            let doubled = props.get("n").and_then(Value::as_int).unwrap_or(0) * 2;
            setter.set("doubled", doubled);
        }
    )]
    .wrap(RecordingClass::new("Base", &log).component());
    let mut host = Host::new();
    host.mount(&wrapper, props! { "n" => 4 }, Context::new())
        .unwrap();

    let root = host.root_instance().unwrap();
    let wrapper_instance = root.as_any().downcast_ref::<WrapperInstance>().unwrap();
    let child = wrapper_instance.child().unwrap();
    let base = as_recording(&child).unwrap();
    assert_eq!(base.props(), props! { "n" => 4, "doubled" => 8 });
    assert_eq!(base.renders(), 1);
}

#[test]
fn hooks_see_the_base_instance_only_for_class_bases() {
    let seen: Rc<RefCell<Vec<(&'static str, bool)>>> = Rc::default();
    let watch = |seen: &Rc<RefCell<Vec<(&'static str, bool)>>>| {
        let on_mount = Rc::clone(seen);
        let on_will_update = Rc::clone(seen);
        let on_did_update = Rc::clone(seen);
        Fragment::new()
            .did_mount(move |_: &Props, _: &Context, _: &StateSlot, child: Option<&Child>| {
                on_mount.borrow_mut().push(("did_mount", child.is_some()));
            })
            .will_update(
                move |_: &Props,
                      _: &Context,
                      _: &Props,
                      _: &Context,
                      _: &StateSlot,
                      child: Option<&Child>| {
                    on_will_update
                        .borrow_mut()
                        .push(("will_update", child.is_some()));
                },
            )
            .did_update(
                move |_: &Props,
                      _: &Context,
                      _: &Props,
                      _: &Context,
                      _: &StateSlot,
                      child: Option<&Child>| {
                    on_did_update
                        .borrow_mut()
                        .push(("did_update", child.is_some()));
                },
            )
    };

    let log = EventLog::new();
    let bases = [
        RecordingClass::new("Base", &log).component(),
        recording_function("Plain", &log),
    ];
    for base in bases {
        let mut host = Host::new();
        host.mount(&mixout![watch(&seen)].wrap(base), Props::new(), Context::new())
            .unwrap();
        host.set_props(props! { "a" => 1 }).unwrap();
    }

    assert_eq!(
        *seen.borrow(),
        [
            ("did_mount", true),
            ("will_update", true),
            ("did_update", true),
            ("did_mount", false),
            ("will_update", false),
            ("did_update", false),
        ]
    );
}

fn forward_method(name: &'static str) -> Fragment {
    Fragment::new().imperative_methods(move |methods: &mut MethodRegistrar<'_>| {
        methods.set(name, move |args, _, _, _, child| {
            let child = child.ok_or_else(|| MixoutError::target_unavailable(name))?;
            child.invoke(name, args)
        });
    })
}

#[test]
fn forwarded_methods_reach_the_base_instance() {
    let log = EventLog::new();
    let base = RecordingClass::new("Input", &log)
        .with_method("focus", |_| Value::from("focused"))
        .component();
    let wrapper = mixout![forward_method("focus"), forward_method("select")].wrap(base);
    let mut host = Host::new();
    host.mount(&wrapper, Props::new(), Context::new()).unwrap();
    log.clear();

    let args = [Value::from(1), Value::Null, Value::from("hello")];
    assert_eq!(host.invoke("focus", &args).unwrap(), Value::from("focused"));
    assert_eq!(log.entries(), [r#"Input.focus([1, Null, "hello"])"#]);
    assert_eq!(
        host.invoke("select", &[]),
        Err(MixoutError::missing_member("select"))
    );
}

#[test]
fn forwarded_methods_fail_without_a_mounted_target() {
    let log = EventLog::new();
    let wrapper =
        mixout![forward_method("focus")].wrap(recording_function("Plain", &log));
    let mut host = Host::new();
    host.mount(&wrapper, Props::new(), Context::new()).unwrap();

    assert_eq!(
        host.invoke("focus", &[]),
        Err(MixoutError::target_unavailable("focus"))
    );
}

#[test]
fn unmounting_detaches_the_base_and_ends_the_lifecycle() {
    let log = EventLog::new();
    let wrapper = mixout![forward_method("focus")].wrap(
        RecordingClass::new("Input", &log)
            .with_method("focus", |_| Value::Null)
            .component(),
    );
    let mut host = Host::new();
    host.mount(&wrapper, Props::new(), Context::new()).unwrap();
    let root = host.root_instance().unwrap();

    host.unmount().unwrap();

    let instance = root.as_any().downcast_ref::<WrapperInstance>().unwrap();
    assert_eq!(instance.phase(), Phase::Unmounted);
    assert!(instance.child().is_none());
    assert!(matches!(
        root.invoke("focus", &[]),
        Err(MixoutError::Lifecycle {
            phase: Phase::Unmounted,
            ..
        })
    ));
}

#[test]
fn nested_wrappers_run_outer_fragments_first() {
    let log = EventLog::new();
    let inner = mixout![logging(&log, "inner")].wrap(Component::function("Leaf", |_, _| {
        mixout_core::Rendered::Empty
    }));
    let outer = mixout![logging(&log, "outer")].wrap(&inner);
    let mut host = Host::new();

    host.mount(&outer, Props::new(), Context::new()).unwrap();
    host.unmount().unwrap();

    assert_eq!(
        log.entries(),
        [
            "outer.will_mount",
            "inner.will_mount",
            "inner.did_mount",
            "outer.did_mount",
            "outer.will_unmount",
            "inner.will_unmount",
        ]
    );
}
