//! PostgreSQL 自行车 Repository 实现

use async_trait::async_trait;
use rental_errors::AppResult;
use rental_ports::Repository;
use sqlx::PgPool;

use crate::domain::{Bicycle, BicycleId};
use super::storage_error;

pub struct PostgresBicycleRepository {
    pool: PgPool,
}

impl PostgresBicycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Bicycle, BicycleId> for PostgresBicycleRepository {
    async fn find_all(&self) -> AppResult<Vec<Bicycle>> {
        let rows =
            sqlx::query_as::<_, BicycleRow>("SELECT id, model FROM bicycles ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list bicycles", e))?;

        Ok(rows.into_iter().map(Bicycle::from).collect())
    }

    async fn find_by_id(&self, id: &BicycleId) -> AppResult<Option<Bicycle>> {
        let row = sqlx::query_as::<_, BicycleRow>("SELECT id, model FROM bicycles WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find bicycle", e))?;

        Ok(row.map(Bicycle::from))
    }
}

#[derive(sqlx::FromRow)]
struct BicycleRow {
    id: i64,
    model: String,
}

impl From<BicycleRow> for Bicycle {
    fn from(row: BicycleRow) -> Self {
        Bicycle::new(row.id, row.model)
    }
}
