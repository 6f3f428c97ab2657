//! 实体基础 trait

use std::fmt::Display;

/// 实体 trait
///
/// 实体由存储分配的标识区分，标识可排序以便按主键稳定排序。
pub trait Entity {
    type Id: Clone + Ord + Display + Send + Sync;

    /// 实体类型名称，用于日志与错误信息
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
}
