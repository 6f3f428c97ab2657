//! ports - 抽象 trait 层
//!
//! 定义存储无关的仓储接口

mod repository;

pub use repository::*;
