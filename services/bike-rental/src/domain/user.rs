//! 用户实体（只读引用）

use derive_more::{Display, From};
use rental_domain_core::Entity;
use serde::{Deserialize, Serialize};

/// 用户 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct UserId(pub i64);

/// 用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// 登录名，同时作为显示名称
    pub login: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, login: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            login: login.into(),
        }
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> &UserId {
        &self.id
    }
}
