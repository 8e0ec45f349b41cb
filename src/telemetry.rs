//! 日志与追踪系统
//! 初始化结构化日志和指标收集

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志与追踪系统
pub fn init_telemetry(config: &AppConfig) {
    // 从环境变量构建过滤器
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .boxed(),
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        "Telemetry initialized"
    );
}

/// Registers descriptions for the counters emitted by the auth core.
/// metrics 0.24 creates the series lazily on first use.
pub fn init_metrics() {
    metrics::describe_counter!(
        "auth_failures_total",
        "Rejected authentication attempts, labelled by error code"
    );
    metrics::describe_counter!("auth_success_total", "Successfully resolved identities");
    metrics::describe_counter!(
        "auth_dependency_errors_total",
        "Identity resolutions aborted by a directory or internal failure"
    );
    metrics::describe_counter!("http_requests_total", "Completed HTTP requests");
    metrics::describe_histogram!("http_request_duration_seconds", "HTTP request latency");
    tracing::debug!("Metrics initialized");
}
