#![cfg(feature = "internal-logs")]

use logbridge::testing::MemoryLog;
use logbridge::{HostLogger, NativeLoggerProvider, ProviderSettings, ScopeContext, State};
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Default)]
struct EventNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: Subscriber> Layer<S> for EventNames {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(event.metadata().name());
    }
}

fn capture(f: impl FnOnce()) -> Vec<&'static str> {
    let names = EventNames::default();
    let subscriber = tracing_subscriber::registry().with(names.clone());
    tracing::subscriber::with_default(subscriber, f);
    let captured = names.0.lock().unwrap().clone();
    captured
}

#[test]
fn out_of_order_release_is_reported() {
    let names = capture(|| {
        let a = ScopeContext::new().with_scope("a", Default::default()).attach();
        let b = ScopeContext::current().with_scope("b", Default::default()).attach();
        drop(a);
        drop(b);
    });
    assert_eq!(names, vec!["Scope.OutOfOrderRelease"]);
    assert!(ScopeContext::current().scope().is_none());
}

#[test]
fn logger_creation_and_suppression_are_reported() {
    let names = capture(|| {
        let provider = NativeLoggerProvider::builder()
            .with_log(Arc::new(MemoryLog::new()))
            .with_settings(ProviderSettings::default().with_ignored_scopes(["HealthCheck"]))
            .build()
            .unwrap();
        let logger = provider.create_logger("");
        let guard = logger.begin_scope(&State::value("ping").with_shape("HealthCheck"));
        assert!(guard.is_noop());
    });
    assert_eq!(
        names,
        vec![
            "LoggerProvider.CategoryEmpty",
            "LoggerProvider.NewLoggerReturned",
            "Scope.Suppressed"
        ]
    );
}
