//! 数据库 schema 迁移

use rental_adapter_postgres::Migration;

/// 按版本排列的全部迁移
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_users",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                login VARCHAR(64) NOT NULL UNIQUE
            )
            "#,
        )
        .with_down("DROP TABLE IF EXISTS users"),
        Migration::new(
            2,
            "create_bicycles",
            r#"
            CREATE TABLE IF NOT EXISTS bicycles (
                id BIGSERIAL PRIMARY KEY,
                model VARCHAR(128) NOT NULL
            )
            "#,
        )
        .with_down("DROP TABLE IF EXISTS bicycles"),
        Migration::new(
            3,
            "create_orders",
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users (id),
                bicycle_id BIGINT NOT NULL REFERENCES bicycles (id),
                hours INTEGER NOT NULL CHECK (hours > 0),
                status VARCHAR(16) NOT NULL DEFAULT 'pending',
                rental_date DATE NOT NULL
            )
            "#,
        )
        .with_down("DROP TABLE IF EXISTS orders"),
        Migration::new(
            4,
            "index_orders_user_id",
            "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders (user_id)",
        )
        .with_down("DROP INDEX IF EXISTS idx_orders_user_id"),
    ]
}
