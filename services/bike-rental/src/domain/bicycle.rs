//! 自行车实体（只读引用）

use derive_more::{Display, From};
use rental_domain_core::Entity;
use serde::{Deserialize, Serialize};

/// 自行车 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct BicycleId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bicycle {
    pub id: BicycleId,
    pub model: String,
}

impl Bicycle {
    pub fn new(id: impl Into<BicycleId>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
        }
    }
}

impl Entity for Bicycle {
    type Id = BicycleId;
    const KIND: &'static str = "bicycle";

    fn id(&self) -> &BicycleId {
        &self.id
    }
}
