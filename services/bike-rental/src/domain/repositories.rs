//! Repository trait

use async_trait::async_trait;
use rental_errors::AppResult;
use rental_ports::{PageableRepository, Repository};

use super::{Bicycle, BicycleId, NewOrder, Order, OrderId, OrderSortColumn, OrderStatus, User, UserId};

/// 订单 Repository
#[async_trait]
pub trait OrderRepository: PageableRepository<Order, OrderId, OrderSortColumn> {
    /// 插入订单并返回带有存储分配 ID 的记录
    async fn create(&self, order: &NewOrder) -> AppResult<Order>;

    /// 更新单条订单的状态，订单不存在时返回 NotFound
    async fn change_status(&self, id: &OrderId, status: OrderStatus) -> AppResult<()>;

    /// 查询用户的全部订单（按 ID 排序）
    async fn find_by_user_id(&self, user_id: &UserId) -> AppResult<Vec<Order>>;
}

/// 用户 Repository
#[async_trait]
pub trait UserRepository: Repository<User, UserId> {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>>;
}

/// 自行车 Repository
pub trait BicycleRepository: Repository<Bicycle, BicycleId> {}

impl<R> BicycleRepository for R where R: Repository<Bicycle, BicycleId> {}
