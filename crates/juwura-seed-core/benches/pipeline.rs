//! Benchmarks for the generation pipeline and the script writers.
//!
//! Scales `tasks_per_project`, which drives the three largest tables
//! (tasks, field values, connections). Writers use a black-hole sink so only
//! formatting cost is measured.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;

use juwura_seed_core::config::GeneratorConfig;
use juwura_seed_core::generate::engine::generate;
use juwura_seed_core::output::{json::write_json, sql::write_script};

struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn config_with_tasks(tasks: usize) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.counts.tasks_per_project = tasks;
    config
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for tasks in [10, 100, 1000] {
        let config = config_with_tasks(tasks);
        let rows = generate(&config, 42).unwrap().total_rows();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("tasks", tasks), &config, |b, config| {
            b.iter(|| generate(config, 42).unwrap());
        });
    }
    group.finish();
}

fn bench_sql_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_output");
    for tasks in [10, 1000] {
        let script = generate(&config_with_tasks(tasks), 42).unwrap();
        group.throughput(Throughput::Elements(script.total_rows() as u64));
        group.bench_with_input(BenchmarkId::new("tasks", tasks), &script, |b, script| {
            b.iter(|| {
                let mut w = NullWriter;
                write_script(&mut w, script).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_json_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_output");
    for tasks in [10, 1000] {
        let script = generate(&config_with_tasks(tasks), 42).unwrap();
        group.throughput(Throughput::Elements(script.total_rows() as u64));
        group.bench_with_input(BenchmarkId::new("tasks", tasks), &script, |b, script| {
            b.iter(|| {
                let mut w = NullWriter;
                write_json(&mut w, script).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_sql_output, bench_json_output);
criterion_main!(benches);
