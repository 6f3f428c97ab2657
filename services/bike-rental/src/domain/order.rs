//! 租车订单实体

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::{Display, From};
use rental_domain_core::Entity;
use serde::{Deserialize, Serialize};

use super::{BicycleId, UserId};
use crate::error::RentalError;

/// 订单 ID，由存储分配
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct OrderId(pub i64);

/// 状态文本的最大长度，与 `orders.status` 列宽一致
pub const MAX_STATUS_LEN: usize = 16;

/// 订单状态
///
/// 状态集合是开放的：除三个常用值外，其他文本保存在 `Other` 中原样往返。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Canceled,
    /// 小写、去除首尾空白后的文本
    Other(String),
}

impl OrderStatus {
    /// 存储中使用的文本形式
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Canceled => "canceled",
            Self::Other(text) => text,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "" => Err(RentalError::InvalidStatus(s.to_string())),
            _ if text.chars().count() > MAX_STATUS_LEN => {
                Err(RentalError::InvalidStatus(s.to_string()))
            }
            _ => Ok(Self::Other(text)),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = RentalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 订单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub bicycle_id: BicycleId,
    /// 租用时长（小时）
    pub hours: i32,
    pub status: OrderStatus,
    pub rental_date: NaiveDate,
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &OrderId {
        &self.id
    }
}

/// 待创建的订单，ID 由存储分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub bicycle_id: BicycleId,
    pub hours: i32,
    pub status: OrderStatus,
    pub rental_date: NaiveDate,
}

impl NewOrder {
    /// 创建状态为 `Pending` 的订单
    pub fn pending(
        user_id: UserId,
        bicycle_id: BicycleId,
        hours: i32,
        rental_date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            bicycle_id,
            hours,
            status: OrderStatus::Pending,
            rental_date,
        }
    }

    pub fn validate(&self) -> Result<(), RentalError> {
        if self.hours <= 0 {
            return Err(RentalError::InvalidHours(self.hours));
        }
        Ok(())
    }

    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            bicycle_id: self.bicycle_id,
            hours: self.hours,
            status: self.status,
            rental_date: self.rental_date,
        }
    }
}

/// 允许排序的列
///
/// 分页查询只能按这些列排序，同值时按 `id` 升序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderSortColumn {
    #[default]
    Id,
    UserId,
    BicycleId,
    Hours,
    Status,
    RentalDate,
}

impl OrderSortColumn {
    /// 对应的数据库列名
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::UserId => "user_id",
            Self::BicycleId => "bicycle_id",
            Self::Hours => "hours",
            Self::Status => "status",
            Self::RentalDate => "rental_date",
        }
    }

    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        let primary = match self {
            Self::Id => Ordering::Equal,
            Self::UserId => a.user_id.cmp(&b.user_id),
            Self::BicycleId => a.bicycle_id.cmp(&b.bicycle_id),
            Self::Hours => a.hours.cmp(&b.hours),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::RentalDate => a.rental_date.cmp(&b.rental_date),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for OrderSortColumn {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "user_id" => Ok(Self::UserId),
            "bicycle_id" => Ok(Self::BicycleId),
            "hours" => Ok(Self::Hours),
            "status" => Ok(Self::Status),
            "date" | "rental_date" => Ok(Self::RentalDate),
            _ => Err(RentalError::InvalidSortColumn(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: i64, hours: i32, status: OrderStatus) -> Order {
        Order {
            id: OrderId(id),
            user_id: UserId(1),
            bicycle_id: BicycleId(1),
            hours,
            status,
            rental_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("ACCEPTED".parse::<OrderStatus>().unwrap(), OrderStatus::Accepted);
        assert_eq!("cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Canceled);
        assert_eq!(OrderStatus::Canceled.to_string(), "canceled");
    }

    #[test]
    fn test_status_set_is_open() {
        let returned = " Returned ".parse::<OrderStatus>().unwrap();
        assert_eq!(returned, OrderStatus::Other("returned".into()));
        assert_eq!(returned.as_str(), "returned");
        assert_eq!(String::from(returned), "returned");

        assert!(matches!(
            "   ".parse::<OrderStatus>(),
            Err(RentalError::InvalidStatus(_))
        ));
        assert!(matches!(
            "x".repeat(MAX_STATUS_LEN + 1).parse::<OrderStatus>(),
            Err(RentalError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_sort_column_allow_list() {
        assert_eq!("date".parse::<OrderSortColumn>().unwrap(), OrderSortColumn::RentalDate);
        assert_eq!("Hours".parse::<OrderSortColumn>().unwrap(), OrderSortColumn::Hours);
        assert_eq!(OrderSortColumn::UserId.as_column(), "user_id");
        assert!("id; DROP TABLE orders".parse::<OrderSortColumn>().is_err());
    }

    #[test]
    fn test_sort_ties_broken_by_id() {
        let a = order(2, 3, OrderStatus::Pending);
        let b = order(1, 3, OrderStatus::Pending);
        let c = order(3, 1, OrderStatus::Pending);

        assert_eq!(OrderSortColumn::Hours.compare(&a, &b), Ordering::Greater);
        assert_eq!(OrderSortColumn::Hours.compare(&c, &a), Ordering::Less);
        assert_eq!(OrderSortColumn::Id.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_new_order_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(NewOrder::pending(UserId(1), BicycleId(1), 2, date).validate().is_ok());
        assert_eq!(
            NewOrder::pending(UserId(1), BicycleId(1), 0, date).validate(),
            Err(RentalError::InvalidHours(0))
        );

        let order = NewOrder::pending(UserId(4), BicycleId(5), 2, date).into_order(OrderId(9));
        assert_eq!(order.id, OrderId(9));
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
