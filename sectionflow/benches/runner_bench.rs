//! Benchmarks for section tree execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sectionflow::prelude::*;
use std::sync::Arc;

fn flat_tree(n: usize) -> Vec<SectionNode> {
    (0..n)
        .map(|i| {
            SectionNode::new(
                format!("section-{i}"),
                Arc::new(FnStep::new(|_section: &Section| anyhow::Ok(()))),
            )
        })
        .collect()
}

fn runner_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("run_100_sections", |b| {
        b.iter(|| {
            let tree = flat_tree(100);
            let mut report = ReportBuilder::new(PipelineKind::Convert);
            let runner = SectionRunner::new("bench", RunOptions::default());
            rt.block_on(runner.run(&tree, &mut report)).unwrap();
            black_box(report.len())
        });
    });
}

criterion_group!(benches, runner_benchmark);
criterion_main!(benches);
