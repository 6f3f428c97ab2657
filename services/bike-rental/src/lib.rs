//! Bike Rental - 订单数据访问服务
//!
//! 模块化架构：
//! - `domain`: 订单、用户、自行车实体与仓储接口
//! - `application`: 跨实体查询与下单流程
//! - `infrastructure`: PostgreSQL 与内存仓储实现、数据库迁移
//! - `error`: 服务错误定义

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
