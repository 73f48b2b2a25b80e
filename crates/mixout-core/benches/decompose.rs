use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mixout_core::{
    combine, decompose, mixout, props, Component, Context, ForceUpdater, Fragment, Host,
    Injectable, Props, Rendered, Setter, StateSlot,
};

const FRAGMENT_COUNT_SAMPLES: &[usize] = &[4, 16, 64, 256];

fn fragment(index: usize) -> Fragment {
    let name = format!("p{index}");
    Fragment::new()
        .initial_state(|_: &Props, _: &Context, state: &StateSlot, _: &ForceUpdater| {
            state.set("renders", 0)
        })
        .props(
            move |setter: &mut Setter<'_>, _: &Props, _: &Context, state: &StateSlot| {
                setter.set(&name, state.get("renders"))
            },
        )
}

/// Groups of four, nested one level deep.
fn fragment_tree(count: usize) -> Vec<Injectable> {
    (0..count)
        .step_by(4)
        .map(|start| {
            let end = (start + 4).min(count);
            combine((start..end).map(fragment)).into()
        })
        .collect()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    for &count in FRAGMENT_COUNT_SAMPLES {
        let tree = fragment_tree(count);
        group.bench_with_input(BenchmarkId::new("fragments", count), &tree, |b, tree| {
            b.iter(|| black_box(decompose(tree)));
        });
    }
    group.finish();
}

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_pass");
    for &count in FRAGMENT_COUNT_SAMPLES {
        let wrapper = mixout(fragment_tree(count))
            .wrap(Component::function("Leaf", |_, _| Rendered::Empty));
        group.bench_with_input(BenchmarkId::new("fragments", count), &wrapper, |b, wrapper| {
            let mut host = Host::new();
            host.mount(wrapper, props! { "tick" => 0 }, Context::new())
                .expect("mount");
            let mut tick = 0;
            b.iter(|| {
                tick += 1;
                host.set_props(props! { "tick" => tick }).expect("update");
                black_box(host.snapshot().len());
            });
        });
    }
    group.finish();
}

criterion_group!(mixout_benches, bench_decompose, bench_update_pass);
criterion_main!(mixout_benches);
