use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

use bloq::{
    init_function, init_method, new_field_function, Arg, BatchExecutor, FunctionContext,
    MessageBatch, Part,
};

fn batch(size: usize) -> Arc<MessageBatch> {
    Arc::new(
        (0..size)
            .map(|i| {
                Part::new(format!(r#"{{"id":{},"user":{{"name":"user {}"}}}}"#, i, i))
                    .with_metadata("topic", "orders")
            })
            .collect(),
    )
}

fn benchmark_builtins(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtins");
    let batch = batch(1);
    let ctx = FunctionContext::new(Arc::clone(&batch));

    let meta = init_function("meta", vec![Arg::from("topic")]).unwrap();
    group.bench_function("meta", |b| b.iter(|| std::hint::black_box(meta.exec(&ctx))));

    let json = init_function("json", vec![Arg::from("user.name")]).unwrap();
    group.bench_function("json_path", |b| {
        b.iter(|| std::hint::black_box(json.exec(&ctx)))
    });

    let caught = init_method(
        "catch",
        init_function("throw", vec![Arg::from("boom")]).unwrap(),
        vec![Arg::from("fallback")],
    )
    .unwrap();
    group.bench_function("throw_catch", |b| {
        b.iter(|| std::hint::black_box(caught.exec(&ctx)))
    });

    group.finish();
}

fn benchmark_random_int(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_int");
    let ctx = FunctionContext::default();

    let unseeded = init_function("random_int", vec![]).unwrap();
    group.bench_function("entropy", |b| {
        b.iter(|| std::hint::black_box(unseeded.exec(&ctx)))
    });

    let dynamic = init_function("random_int", vec![Arg::from(new_field_function(""))]).unwrap();
    let bound = ctx.with_value("seed");
    group.bench_function("dynamic_seed", |b| {
        b.iter(|| std::hint::black_box(dynamic.exec(&bound)))
    });

    group.finish();
}

fn benchmark_batch_executor(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_executor");
    let query = init_method(
        "uppercase",
        init_function("json", vec![Arg::from("user.name")]).unwrap(),
        vec![],
    )
    .unwrap();
    let executor = BatchExecutor::new();

    for size in [100, 10_000] {
        let batch = batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("json_uppercase_{}", size), |b| {
            b.iter(|| {
                std::hint::black_box(
                    executor
                        .execute_batch(query.as_ref(), Arc::clone(&batch))
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_builtins,
    benchmark_random_int,
    benchmark_batch_executor
);
criterion_main!(benches);
