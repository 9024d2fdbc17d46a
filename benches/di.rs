use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ferrous_wire::*;

fn leaf(lifetime: Lifetime) -> Definition {
    Definition::new(|_| Ok(42u64)).with_lifetime(lifetime)
}

/// Chain of `len` tokens where each one depends on the next.
fn chain(len: usize, lifetime: Lifetime) -> (Container, Token) {
    let tokens: Vec<Token> = (0..len).map(|_| Token::symbol("link")).collect();
    let mut container = Container::new();
    for window in tokens.windows(2) {
        container.register(
            window[0],
            Definition::new(|args| Ok(args.len())).depends_on_token(window[1]),
            lifetime,
            false,
        );
    }
    container.register_definition(tokens[len - 1], leaf(lifetime), false);
    (container, tokens[0])
}

/// Root with `width` transient children that all share one scoped grandchild.
fn fan_out(width: usize) -> (Container, Token) {
    let root = Token::symbol("root");
    let shared = Token::symbol("shared");
    let mut container = Container::new();
    container.register(shared, Definition::new(|_| Ok(0u64)), Lifetime::Scoped, false);

    let mut definition = Definition::new(|args| Ok(args.len()));
    for _ in 0..width {
        let child = Token::symbol("child");
        container.register(
            child,
            Definition::new(|_| Ok(1u64)).depends_on_token(shared),
            Lifetime::Transient,
            false,
        );
        definition = definition.depends_on_token(child);
    }
    container.register(root, definition, Lifetime::Transient, false);
    (container, root)
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let token = Token::symbol("singleton");
    let mut container = Container::new();
    container.register_definition(token, leaf(Lifetime::Singleton), false);

    // Prime the singleton
    let _ = container.resolve(token).unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.resolve_as::<u64>(token).unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let mut container = Container::new();
                container.register(
                    Token::of::<ExpensiveToCreate>(),
                    Definition::new(|_| Ok(ExpensiveToCreate { data: (0..1000).collect() })),
                    Lifetime::Singleton,
                    false,
                );
                container
            },
            |mut container| {
                let v = container.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lifetimes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifetime_leaf");
    for lifetime in [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient] {
        let token = Token::symbol("leaf");
        let mut container = Container::new();
        container.register_definition(token, leaf(lifetime), false);

        group.bench_with_input(BenchmarkId::from_parameter(lifetime), &token, |b, token| {
            b.iter(|| black_box(container.resolve(*token).unwrap()))
        });
    }
    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("transient_chain");
    for len in [4usize, 16, 64, 256] {
        let (mut container, root) = chain(len, Lifetime::Transient);
        group.bench_with_input(BenchmarkId::from_parameter(len), &root, |b, root| {
            b.iter(|| black_box(container.resolve(*root).unwrap()))
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    for width in [8usize, 32, 128] {
        let (mut container, root) = fan_out(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &root, |b, root| {
            b.iter(|| black_box(container.resolve(*root).unwrap()))
        });
    }
    group.finish();
}

fn bench_shared_container(c: &mut Criterion) {
    let (container, root) = fan_out(16);
    let shared = SharedContainer::new(container);

    c.bench_function("shared_container_fan_out_16", |b| {
        b.iter(|| black_box(shared.resolve(root).unwrap()))
    });
}

fn bench_planning(c: &mut Criterion) {
    let (container, root) = fan_out(64);
    c.bench_function("plan_fan_out_64", |b| {
        b.iter(|| {
            let plan = container.plan(root).unwrap();
            black_box(plan.construction_count());
        })
    });

    let (container, _) = chain(256, Lifetime::Scoped);
    c.bench_function("validate_chain_256", |b| {
        b.iter(|| black_box(container.validate().is_valid()))
    });
}

criterion_group!(micro_benches, bench_singleton_hit, bench_singleton_cold, bench_lifetimes);

criterion_group!(
    macro_benches,
    bench_chain_depth,
    bench_fan_out,
    bench_shared_container,
    bench_planning
);

criterion_main!(micro_benches, macro_benches);
