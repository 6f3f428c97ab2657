//! 订单应用服务
//!
//! 组合订单、用户、自行车三个 Repository，提供跨实体查询与订单状态流转。

use std::sync::Arc;

use chrono::NaiveDate;
use rental_common::{PagedResult, Pagination};
use rental_errors::AppResult;
use rental_ports::{PageableRepository, Repository};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    BicycleId, BicycleRepository, NewOrder, Order, OrderId, OrderRepository, OrderSortColumn,
    OrderStatus, UserId, UserRepository,
};
use crate::error::RentalError;

/// 带用户名和车型的订单视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub user_name: String,
    pub bicycle_model: String,
}

pub struct OrderQueryService {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
    bicycles: Arc<dyn BicycleRepository>,
}

impl OrderQueryService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        bicycles: Arc<dyn BicycleRepository>,
    ) -> Self {
        Self {
            orders,
            users,
            bicycles,
        }
    }

    /// 用户 ID 对应的登录名
    pub async fn find_user_name(&self, user_id: &UserId) -> AppResult<String> {
        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(user.login),
            None => Err(RentalError::UnknownUser(*user_id).into()),
        }
    }

    /// 自行车 ID 对应的车型
    pub async fn find_bicycle_model(&self, bicycle_id: &BicycleId) -> AppResult<String> {
        match self.bicycles.find_by_id(bicycle_id).await? {
            Some(bicycle) => Ok(bicycle.model),
            None => Err(RentalError::UnknownBicycle(*bicycle_id).into()),
        }
    }

    /// 登录名为 `login` 的用户的全部订单，用户不存在时返回空列表
    pub async fn find_all_orders_by_user_name(&self, login: &str) -> AppResult<Vec<Order>> {
        let Some(user) = self.users.find_by_login(login).await? else {
            debug!(login, "No user with this login");
            return Ok(Vec::new());
        };
        self.orders.find_by_user_id(&user.id).await
    }

    /// 创建待处理订单
    pub async fn place_order(
        &self,
        user_id: UserId,
        bicycle_id: BicycleId,
        hours: i32,
        rental_date: NaiveDate,
    ) -> AppResult<Order> {
        if !self.users.exists(&user_id).await? {
            return Err(RentalError::UnknownUser(user_id).into());
        }
        if !self.bicycles.exists(&bicycle_id).await? {
            return Err(RentalError::UnknownBicycle(bicycle_id).into());
        }

        let order = self
            .orders
            .create(&NewOrder::pending(user_id, bicycle_id, hours, rental_date))
            .await?;
        info!(order_id = %order.id, user_id = %user_id, "Order placed");
        Ok(order)
    }

    pub async fn accept_order(&self, id: &OrderId) -> AppResult<()> {
        self.orders.change_status(id, OrderStatus::Accepted).await
    }

    pub async fn cancel_order(&self, id: &OrderId) -> AppResult<()> {
        self.orders.change_status(id, OrderStatus::Canceled).await
    }

    /// 按默认页大小查询一页订单，附带总数
    pub async fn orders_page(
        &self,
        sort: OrderSortColumn,
        page: u32,
    ) -> AppResult<PagedResult<Order>> {
        let items = self.orders.find_by_page_number(sort, page).await?;
        let total = self.orders.count().await?;
        Ok(PagedResult::new(
            items,
            total,
            &Pagination::new(page, self.orders.page_size()),
        ))
    }

    /// 按默认页大小计算的总页数
    pub async fn page_count(&self) -> AppResult<u32> {
        self.orders.count_pages(self.orders.page_size()).await
    }

    /// 解析订单的用户名和车型
    pub async fn describe(&self, order: Order) -> AppResult<OrderView> {
        let user_name = self.find_user_name(&order.user_id).await?;
        let bicycle_model = self.find_bicycle_model(&order.bicycle_id).await?;
        Ok(OrderView {
            order,
            user_name,
            bicycle_model,
        })
    }
}
