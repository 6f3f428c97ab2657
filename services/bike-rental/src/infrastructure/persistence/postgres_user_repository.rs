//! PostgreSQL 用户 Repository 实现

use async_trait::async_trait;
use rental_errors::AppResult;
use rental_ports::Repository;
use sqlx::PgPool;

use crate::domain::{User, UserId, UserRepository};
use super::storage_error;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User, UserId> for PostgresUserRepository {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, login FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, login FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find user", e))?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, login FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find user", e))?;

        Ok(row.map(User::from))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    login: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(row.id, row.login)
    }
}
