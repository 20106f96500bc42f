use tracing_subscriber::{
    fmt::Layer, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Stdout carries the report, so log lines go to stderr.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            Layer::default()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::from_default_env())
        .init();
}
