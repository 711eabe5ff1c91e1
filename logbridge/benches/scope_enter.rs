use criterion::{
    black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId,
    Criterion,
};
use logbridge::{
    BridgeLogger, EventId, HostLevel, HostLogger, Level, Log, LogRecord, NativeLoggerProvider,
    ProviderSettings, ScopeContext, State,
};
use std::sync::Arc;

// Run this benchmark with:
// cargo bench --bench scope_enter

#[derive(Debug)]
struct NoopLog {
    minimum: Level,
}

impl Log for NoopLog {
    fn log(&self, record: &LogRecord) {
        black_box(record);
    }

    fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.minimum
    }

    fn for_context(self: Arc<Self>, _context: &str) -> Arc<dyn Log> {
        self
    }
}

fn logger(settings: ProviderSettings) -> BridgeLogger {
    NativeLoggerProvider::builder()
        .with_log(Arc::new(NoopLog {
            minimum: Level::Info,
        }))
        .with_settings(settings)
        .build()
        .map(|provider| provider.create_logger("bench"))
        .unwrap_or_else(|err| panic!("failed to build provider: {err}"))
}

fn criterion_benchmark(c: &mut Criterion) {
    let logger = logger(ProviderSettings::default().with_ignored_scope_prefixes(["Ignored."]));
    let scopes = vec![
        ("value_scope", State::value("request")),
        (
            "properties_scope",
            State::properties([("request_id", 17), ("tenant", 3)]),
        ),
        (
            "suppressed_scope",
            State::properties([("x", 1)]).with_shape("Ignored.Diagnostics"),
        ),
    ];
    for (name, state) in &scopes {
        begin_scope(&mut group(c), name, &logger, state);
    }
    log_calls(&mut group(c), &logger);
    attach_detach(&mut group(c));
}

fn begin_scope(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: &str,
    logger: &BridgeLogger,
    state: &State,
) {
    group.bench_function(BenchmarkId::new("begin_scope", name), |b| {
        b.iter(|| {
            let _guard = black_box(logger.begin_scope(state));
        });
    });
}

fn log_calls(group: &mut BenchmarkGroup<'_, WallTime>, logger: &BridgeLogger) {
    let state = State::template("order {id} shipped", [("id", 42)]);
    let event_id = EventId::NONE;

    group.bench_function("log_disabled", |b| {
        b.iter(|| {
            let _ = black_box(logger.log(HostLevel::Debug, &event_id, &state, None, None));
        });
    });
    group.bench_function("log_enabled_no_scope", |b| {
        b.iter(|| {
            let _ = black_box(logger.log(HostLevel::Information, &event_id, &state, None, None));
        });
    });
    let _scope = logger.begin_scope(&State::properties([("request_id", 17)]));
    group.bench_function("log_enabled_in_scope", |b| {
        b.iter(|| {
            let _ = black_box(logger.log(HostLevel::Information, &event_id, &state, None, None));
        });
    });
}

fn attach_detach(group: &mut BenchmarkGroup<'_, WallTime>) {
    let cx = ScopeContext::new().with_scope("outer", [("k", 1)].into_iter().collect());
    group.bench_function("attach_detach", |b| {
        b.iter_batched(
            || cx.clone(),
            |cx| {
                let _guard = black_box(cx.attach());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn group(c: &mut Criterion) -> BenchmarkGroup<'_, WallTime> {
    c.benchmark_group("scope_enter")
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
