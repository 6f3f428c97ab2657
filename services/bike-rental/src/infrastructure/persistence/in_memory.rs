//! 内存 Repository 实现
//!
//! 用于测试和本地开发，不用于生产。

use std::collections::BTreeMap;

use async_trait::async_trait;
use rental_common::{Pagination, DEFAULT_PAGE_SIZE};
use rental_domain_core::Entity;
use rental_errors::AppResult;
use rental_ports::{ensure_valid_pagination, PageableRepository, Repository};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    Bicycle, NewOrder, Order, OrderId, OrderRepository, OrderSortColumn, OrderStatus, User,
    UserId, UserRepository,
};
use crate::error::RentalError;

#[derive(Debug, Default)]
struct OrderTable {
    rows: BTreeMap<OrderId, Order>,
    last_id: i64,
}

/// 内存订单 Repository
///
/// 序列和数据在同一把锁下，并发创建不会产生重复 ID。
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    table: RwLock<OrderTable>,
    page_size: u32,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OrderTable::default()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait]
impl Repository<Order, OrderId> for InMemoryOrderRepository {
    async fn find_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>> {
        Ok(self.table.read().await.rows.get(id).cloned())
    }
}

#[async_trait]
impl PageableRepository<Order, OrderId, OrderSortColumn> for InMemoryOrderRepository {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.table.read().await.rows.len() as u64)
    }

    async fn find_page(
        &self,
        sort: OrderSortColumn,
        pagination: &Pagination,
    ) -> AppResult<Vec<Order>> {
        ensure_valid_pagination(pagination)?;

        let mut orders = self.find_all().await?;
        orders.sort_by(|a, b| sort.compare(a, b));

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        Ok(orders.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &NewOrder) -> AppResult<Order> {
        order.validate()?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let stored = order.clone().into_order(OrderId(table.last_id));
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn change_status(&self, id: &OrderId, status: OrderStatus) -> AppResult<()> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(RentalError::OrderNotFound(*id).into()),
        }
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AppResult<Vec<Order>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|o| o.user_id == *user_id)
            .cloned()
            .collect())
    }
}

/// 按 ID 存取实体的通用内存 Repository
pub struct InMemoryRepository<T: Entity> {
    items: RwLock<BTreeMap<T::Id, T>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入或覆盖一个实体
    pub async fn insert(&self, item: T) {
        debug!(kind = T::KIND, id = %item.id(), "Entity stored");
        self.items.write().await.insert(item.id().clone(), item);
    }
}

#[async_trait]
impl<T> Repository<T, T::Id> for InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync + 'static,
    T::Id: 'static,
{
    async fn find_all(&self) -> AppResult<Vec<T>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &T::Id) -> AppResult<Option<T>> {
        Ok(self.items.read().await.get(id).cloned())
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryBicycleRepository = InMemoryRepository<Bicycle>;

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let users = self.items.read().await;
        Ok(users.values().find(|u| u.login == login).cloned())
    }
}
