//! rental-telemetry - 可观测性库

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    Tracing(String),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(String),
}

/// 构造日志过滤器，`RUST_LOG` 优先于配置中的级别
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| TelemetryError::Tracing(e.to_string()))
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| TelemetryError::Tracing(e.to_string()))
}

/// 按配置选择日志格式
pub fn init(log_level: &str, json: bool) -> Result<(), TelemetryError> {
    if json {
        init_tracing_json(log_level)
    } else {
        init_tracing(log_level)
    }
}

/// 初始化 Prometheus metrics
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::Metrics(e.to_string()))
}

/// 已渲染指标中以 `prefix` 开头的序列行（不含注释）
pub fn rendered_series(handle: &PrometheusHandle, prefix: &str) -> Vec<String> {
    handle
        .render()
        .lines()
        .filter(|line| !line.starts_with('#') && line.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_series_filters_by_prefix() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("rental_orders_created_total").increment(2);
            metrics::counter!("other_requests_total").increment(1);
        });

        let series = rendered_series(&handle, "rental_");
        assert_eq!(series, vec!["rental_orders_created_total 2".to_string()]);
    }

    #[test]
    fn test_second_init_reports_error() {
        // 全局 subscriber 只能安装一次
        let first = init_tracing("debug");
        let second = init_tracing("debug");
        assert!(first.is_ok());
        assert!(matches!(second, Err(TelemetryError::Tracing(_))));
    }
}
