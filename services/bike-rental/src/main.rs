//! Bike Rental - 订单服务入口
//!
//! 加载配置、初始化日志与指标、建立连接池并执行 schema 迁移，
//! 最后输出订单概况。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bike_rental::application::OrderQueryService;
use bike_rental::domain::OrderSortColumn;
use bike_rental::infrastructure::persistence::{
    schema, PostgresBicycleRepository, PostgresOrderRepository, PostgresUserRepository,
};
use rental_adapter_postgres::{
    check_connection, create_pool, MigrationManager, PoolStatus, PostgresConfig,
};
use rental_common::{is_transient_error, RetryPolicy};
use rental_config::AppConfig;
use rental_errors::AppError;
use secrecy::ExposeSecret;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_dir = std::env::var("RENTAL_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir).context("Failed to load configuration")?;

    rental_telemetry::init(&config.telemetry.log_level, config.telemetry.json)?;
    let metrics_handle = rental_telemetry::init_metrics()?;

    info!(
        app = %config.app_name,
        env = %config.app_env,
        page_size = config.pagination.page_size,
        "Starting bike rental service"
    );

    let pg_config = PostgresConfig::new(config.database.url.expose_secret().clone())
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .with_idle_timeout(Duration::from_secs(config.database.idle_timeout_secs));

    let pool = RetryPolicy::default()
        .run(
            "PostgreSQL connection",
            || create_pool(&pg_config),
            |e: &AppError| is_transient_error(&e.to_string()),
        )
        .await?;
    check_connection(&pool).await?;

    let status = PoolStatus::of(&pool);
    info!(
        size = status.size,
        idle = status.idle,
        in_use = status.in_use(),
        "PostgreSQL pool ready"
    );

    let report = MigrationManager::new(pool.clone())
        .migrate(&schema::migrations())
        .await?;
    info!(
        applied = report.applied_count(),
        skipped = report.skipped.len(),
        "Schema up to date"
    );

    let orders = Arc::new(
        PostgresOrderRepository::new(pool.clone()).with_page_size(config.pagination.page_size),
    );
    let service = OrderQueryService::new(
        orders,
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresBicycleRepository::new(pool.clone())),
    );

    match service.orders_page(OrderSortColumn::default(), 1).await {
        Ok(first_page) => info!(
            total = first_page.total,
            pages = first_page.total_pages(),
            first_page = first_page.items.len(),
            "Order summary"
        ),
        Err(e) => warn!(error = %e, "Failed to load order summary"),
    }

    for series in rental_telemetry::rendered_series(&metrics_handle, "rental_") {
        info!(%series, "Metric");
    }

    pool.close().await;
    info!("Bike rental service stopped");
    Ok(())
}
