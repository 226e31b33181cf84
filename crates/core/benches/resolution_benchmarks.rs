//! Resolution benchmarks
//!
//! Measures cold resolution of dependency chains and memoized lookups.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ioc_core::container::{ClassRef, Dependencies, Injectable, InjectableDescriptor};
use ioc_core::{CoreError, DescriptorRegistry, IocContainer};

macro_rules! node {
    ($name:ident) => {
        struct $name;

        impl Injectable for $name {
            fn descriptor() -> InjectableDescriptor {
                InjectableDescriptor::leaf(stringify!($name))
            }

            fn construct(_: Dependencies) -> Result<Self, CoreError> {
                Ok($name)
            }
        }
    };
    ($name:ident => $dep:ident) => {
        struct $name {
            _dependency: Arc<$dep>,
        }

        impl Injectable for $name {
            fn descriptor() -> InjectableDescriptor {
                InjectableDescriptor::builder(stringify!($name))
                    .depends_on::<$dep>()
                    .build()
            }

            fn construct(mut dependencies: Dependencies) -> Result<Self, CoreError> {
                Ok($name {
                    _dependency: dependencies.next()?,
                })
            }
        }
    };
}

// N7 -> N6 -> ... -> N0
node!(N0);
node!(N1 => N0);
node!(N2 => N1);
node!(N3 => N2);
node!(N4 => N3);
node!(N5 => N4);
node!(N6 => N5);
node!(N7 => N6);

fn registry() -> Arc<DescriptorRegistry> {
    let mut registry = DescriptorRegistry::new();
    registry
        .declare::<N0>()
        .declare::<N1>()
        .declare::<N2>()
        .declare::<N3>()
        .declare::<N4>()
        .declare::<N5>()
        .declare::<N6>()
        .declare::<N7>();
    Arc::new(registry)
}

fn container(registry: &Arc<DescriptorRegistry>) -> IocContainer {
    let mut container = IocContainer::with_registry(Arc::clone(registry));
    for class in registry.classes().collect::<Vec<_>>() {
        container.register(class).expect("declared class registers");
    }
    container
}

/// Benchmark building a chain of eight classes from an empty cache
fn benchmark_cold_resolution(c: &mut Criterion) {
    let registry = registry();

    c.bench_function("cold_chain_resolution", |b| {
        b.iter_batched(
            || container(&registry),
            |container| black_box(container.resolve::<N7>().expect("chain resolves")),
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark memoized lookups by type, class name and alias
fn benchmark_cached_lookup(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("cached_lookup");

    let mut container = IocContainer::with_registry(Arc::clone(&registry));
    for class in [ClassRef::of::<N0>(), ClassRef::of::<N1>(), ClassRef::of::<N2>()] {
        container.register(class).expect("declared class registers");
    }
    container.register_aliased(ClassRef::of::<N3>(), "tail").expect("alias registers");
    container.warm_up().expect("warm up succeeds");

    group.bench_with_input(BenchmarkId::new("by_type", "N2"), &container, |b, container| {
        b.iter(|| black_box(container.resolve::<N2>().expect("cached")))
    });
    group.bench_with_input(BenchmarkId::new("by_name", "N2"), &container, |b, container| {
        b.iter(|| black_box(container.resolve_named::<N2>("N2").expect("cached")))
    });
    group.bench_with_input(BenchmarkId::new("by_alias", "tail"), &container, |b, container| {
        b.iter(|| black_box(container.resolve_named::<N3>("tail").expect("cached")))
    });

    group.finish();
}

criterion_group!(benches, benchmark_cold_resolution, benchmark_cached_lookup);
criterion_main!(benches);
