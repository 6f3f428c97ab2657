//! PostgreSQL 迁移管理模块
//!
//! 每个迁移只包含一条 DDL 语句，在独立事务中执行并记录版本与校验和。

use rental_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{debug, info};

/// 迁移记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub down_sql: Option<String>,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let checksum = checksum(&up_sql);
        Self {
            version,
            name: name.into(),
            up_sql,
            down_sql: None,
            checksum,
        }
    }

    /// 设置降级 SQL
    pub fn with_down(mut self, down_sql: impl Into<String>) -> Self {
        self.down_sql = Some(down_sql.into());
        self
    }
}

/// FNV-1a 64 位校验和，跨编译器版本稳定
fn checksum(sql: &str) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = sql
        .trim()
        .bytes()
        .fold(OFFSET, |acc, b| (acc ^ u64::from(b)).wrapping_mul(PRIME));
    format!("{:016x}", hash)
}

/// 迁移执行报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
    table_name: String,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: "_migrations".to_string(),
        }
    }

    /// 设置迁移表名
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// 初始化迁移表
    pub async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

        debug!(table = %self.table_name, "Migration table ready");
        Ok(())
    }

    /// 获取已应用的迁移
    pub async fn applied(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {} ORDER BY version ASC",
            self.table_name
        );

        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get migrations: {}", e)))
    }

    /// 应用单个迁移
    async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {}: {}",
                    migration.version, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            self.table_name
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = %migration.name,
            "Migration applied"
        );
        Ok(())
    }

    /// 按版本顺序应用所有待处理迁移
    ///
    /// 已应用迁移的校验和不一致时立即失败。
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationReport> {
        self.init().await?;
        let applied = self.applied().await?;

        let mut ordered: Vec<&Migration> = migrations.iter().collect();
        ordered.sort_by_key(|m| m.version);

        let mut report = MigrationReport::default();
        for migration in ordered {
            match applied.iter().find(|r| r.version == migration.version) {
                Some(record) if record.checksum != migration.checksum => {
                    return Err(AppError::internal(format!(
                        "Checksum mismatch for migration {} ({}): it was modified after being applied",
                        migration.version, migration.name
                    )));
                }
                Some(_) => report.skipped.push(migration.version),
                None => {
                    self.apply(migration).await?;
                    report.applied.push(migration.version);
                }
            }
        }

        Ok(report)
    }

    /// 回滚最近一次应用的迁移
    pub async fn rollback_last(&self, migrations: &[Migration]) -> AppResult<Option<i64>> {
        let applied = self.applied().await?;
        let Some(last) = applied.last() else {
            return Ok(None);
        };

        let migration = migrations
            .iter()
            .find(|m| m.version == last.version)
            .ok_or_else(|| {
                AppError::internal(format!("Migration {} is not known", last.version))
            })?;
        let down_sql = migration.down_sql.as_deref().ok_or_else(|| {
            AppError::internal(format!(
                "Migration {} does not have down SQL",
                migration.version
            ))
        })?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(down_sql).execute(&mut *tx).await.map_err(|e| {
            AppError::database(format!(
                "Failed to rollback migration {}: {}",
                migration.version, e
            ))
        })?;

        let delete_sql = format!("DELETE FROM {} WHERE version = $1", self.table_name);
        sqlx::query(&delete_sql)
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete migration record: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit rollback: {}", e)))?;

        info!(version = migration.version, name = %migration.name, "Migration rolled back");
        Ok(Some(migration.version))
    }
}
