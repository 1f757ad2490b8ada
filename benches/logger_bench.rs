use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use tempfile::TempDir;
use vpnlog::{init_logger, LogCategory, LoggerConfig};

fn bench_log_custom(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let config = LoggerConfig::new(dir.path().join("logs"), dir.path().join("cache"));
    let handles = init_logger(&config, Box::new(Vec::new));

    c.bench_function("log_custom", |b| {
        b.iter(|| {
            handles
                .logger
                .log_custom(LogCategory::App, "Benchmark log message");
        })
    });

    handles
        .file_writer
        .wait_for_flush_timeout(Duration::from_secs(5));
}

criterion_group! {
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10 * 1000); // 10 thousand logs
    targets = bench_log_custom
}
criterion_main!(benches);
