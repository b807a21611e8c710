use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use unfold::prelude::*;

fn make_steps(n: usize) -> Vec<LogicalStep> {
    let cycle = [StepKind::Filter, StepKind::Expand, StepKind::Dedup, StepKind::Project];
    (0..n)
        .map(|i| LogicalStep::with_args(cycle[i % cycle.len()].clone(), json!({ "i": i })))
        .collect()
}

fn bench_compile(c: &mut Criterion) {
    let steps = make_steps(256);
    let pipeline = StrategyPipeline::default()
        .with(UnfoldStrategy::new(vec![StepKind::Expand, StepKind::Dedup], StepKind::Expand).unwrap())
        .with(UnfoldStrategy::single(StepKind::Filter))
        .with(
            ResolveStrategy::new()
                .with_rule(StepKind::Expand, ResolutionRule::new("expand_dedup"))
                .with_rule(StepKind::Filter, ResolutionRule::new("filter_eval")),
        );

    c.bench_function("compile_256_steps", |b| {
        b.iter(|| compile(black_box(steps.clone()), &pipeline).unwrap())
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
