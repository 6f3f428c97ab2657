//! PostgreSQL 订单 Repository 实现

use async_trait::async_trait;
use chrono::NaiveDate;
use rental_common::{Pagination, DEFAULT_PAGE_SIZE};
use rental_errors::{AppError, AppResult};
use rental_ports::{ensure_valid_pagination, PageableRepository, Repository};
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::domain::{
    BicycleId, NewOrder, Order, OrderId, OrderRepository, OrderSortColumn, OrderStatus, UserId,
};
use crate::error::RentalError;

use super::{storage_error, write_error};

const SELECT_COLUMNS: &str = "SELECT id, user_id, bicycle_id, hours, status, rental_date FROM orders";

pub struct PostgresOrderRepository {
    pool: PgPool,
    page_size: u32,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// 设置默认每页行数
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// 分页参数转换为 SQL 的 LIMIT/OFFSET，超出 BIGINT 范围时拒绝
fn limit_offset(pagination: &Pagination) -> AppResult<(i64, i64)> {
    let limit = i64::try_from(pagination.limit())
        .map_err(|_| AppError::validation("page size is out of range"))?;
    let offset = i64::try_from(pagination.offset())
        .map_err(|_| AppError::validation("page number is out of range"))?;
    Ok((limit, offset))
}

#[async_trait]
impl Repository<Order, OrderId> for PostgresOrderRepository {
    async fn find_all(&self) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list orders", e))?;

        debug!(count = rows.len(), "Loaded all orders");
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find order", e))?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn exists(&self, id: &OrderId) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to check order existence", e))?;

        Ok(result.0)
    }
}

#[async_trait]
impl PageableRepository<Order, OrderId, OrderSortColumn> for PostgresOrderRepository {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn count(&self) -> AppResult<u64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count orders", e))?;

        Ok(u64::try_from(result.0).unwrap_or(0))
    }

    async fn find_page(
        &self,
        sort: OrderSortColumn,
        pagination: &Pagination,
    ) -> AppResult<Vec<Order>> {
        ensure_valid_pagination(pagination)?;
        let (limit, offset) = limit_offset(pagination)?;

        // 排序列来自白名单，分页参数走绑定
        let sql = format!(
            "{} ORDER BY {} ASC, id ASC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS,
            sort.as_column()
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to load order page", e))?;

        debug!(
            page = pagination.page,
            page_size = pagination.page_size,
            sort = sort.as_column(),
            count = rows.len(),
            "Loaded order page"
        );
        rows.into_iter().map(OrderRow::into_order).collect()
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &NewOrder) -> AppResult<Order> {
        order.validate()?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, bicycle_id, hours, status, rental_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(order.user_id.0)
        .bind(order.bicycle_id.0)
        .bind(order.hours)
        .bind(order.status.as_str())
        .bind(order.rental_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create order", e))?;

        metrics::counter!("rental_orders_created_total").increment(1);
        info!(order_id = id, user_id = %order.user_id, bicycle_id = %order.bicycle_id, "Order created");

        Ok(order.clone().into_order(OrderId(id)))
    }

    async fn change_status(&self, id: &OrderId, status: OrderStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.0)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to change order status", e))?;

        if result.rows_affected() == 0 {
            warn!(order_id = %id, status = %status, "Status change for unknown order");
            return Err(RentalError::OrderNotFound(*id).into());
        }

        metrics::counter!("rental_order_status_changes_total", "status" => status.as_str().to_string())
            .increment(1);
        info!(order_id = %id, status = %status, "Order status changed");
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{} WHERE user_id = $1 ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to find orders by user", e))?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    bicycle_id: i64,
    hours: i32,
    status: String,
    rental_date: NaiveDate,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            AppError::database(format!("Order {} has corrupt status: {}", self.id, e))
        })?;

        Ok(Order {
            id: OrderId(self.id),
            user_id: UserId(self.user_id),
            bicycle_id: BicycleId(self.bicycle_id),
            hours: self.hours,
            status,
            rental_date: self.rental_date,
        })
    }
}
