//! 持久化实现

mod in_memory;
mod postgres_bicycle_repository;
mod postgres_order_repository;
mod postgres_user_repository;
pub mod schema;

pub use in_memory::*;
pub use postgres_bicycle_repository::PostgresBicycleRepository;
pub use postgres_order_repository::PostgresOrderRepository;
pub use postgres_user_repository::PostgresUserRepository;

use rental_errors::AppError;
use sqlx::error::ErrorKind;
use tracing::error;

/// 存储失败时记录日志并转换为 `AppError::Database`
pub(crate) fn storage_error(context: &str, e: sqlx::Error) -> AppError {
    error!(error = %e, "{}", context);
    AppError::database(format!("{}: {}", context, e))
}

/// 写入时的约束冲突：外键指向不存在的实体，CHECK 失败属于输入错误
pub(crate) fn constraint_error(kind: ErrorKind, message: &str) -> Option<AppError> {
    match kind {
        ErrorKind::ForeignKeyViolation => Some(AppError::not_found(format!(
            "Unknown user or bicycle: {}",
            message
        ))),
        ErrorKind::CheckViolation => Some(AppError::validation(format!(
            "Constraint violated: {}",
            message
        ))),
        _ => None,
    }
}

/// 写入失败的统一转换
pub(crate) fn write_error(context: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if let Some(err) = constraint_error(db.kind(), db.message()) {
            return err;
        }
    }
    storage_error(context, e)
}
