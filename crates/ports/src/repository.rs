//! Repository trait 定义

use async_trait::async_trait;
use rental_common::Pagination;
use rental_errors::{AppError, AppResult};

/// 基础只读 Repository trait
#[async_trait]
pub trait Repository<T, ID>: Send + Sync
where
    T: Send + 'static,
    ID: Send + Sync + 'static,
{
    /// 查询全部记录（按主键排序）
    async fn find_all(&self) -> AppResult<Vec<T>>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 检查是否存在
    async fn exists(&self, id: &ID) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// 支持分页查询的 Repository
///
/// `S` 为允许排序的列集合，实现方只能按其中的列排序。
#[async_trait]
pub trait PageableRepository<T, ID, S>: Repository<T, ID>
where
    T: Send + 'static,
    ID: Send + Sync + 'static,
    S: Send + 'static,
{
    /// 默认每页行数
    fn page_size(&self) -> u32;

    /// 统计总数
    async fn count(&self) -> AppResult<u64>;

    /// 按排序列查询指定页
    async fn find_page(&self, sort: S, pagination: &Pagination) -> AppResult<Vec<T>>;

    /// 按默认页大小查询第 `page` 页（从 1 开始）
    async fn find_by_page_number(&self, sort: S, page: u32) -> AppResult<Vec<T>> {
        let pagination = Pagination::new(page, self.page_size());
        ensure_valid_pagination(&pagination)?;
        self.find_page(sort, &pagination).await
    }

    /// 总页数 = ceil(总行数 / page_size)
    async fn count_pages(&self, page_size: u32) -> AppResult<u32> {
        if page_size == 0 {
            return Err(AppError::validation("page size must be positive"));
        }
        let total = self.count().await?;
        Ok(Pagination::page_count(total, page_size))
    }
}

/// 校验分页参数
pub fn ensure_valid_pagination(pagination: &Pagination) -> AppResult<()> {
    if pagination.page == 0 {
        return Err(AppError::validation("page number starts at 1"));
    }
    if pagination.page_size == 0 {
        return Err(AppError::validation("page size must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Sort {
        Asc,
        Desc,
    }

    struct Numbers {
        values: Vec<u32>,
        offline: bool,
    }

    impl Numbers {
        fn up_to(n: u32) -> Self {
            Self {
                values: (1..=n).collect(),
                offline: false,
            }
        }
    }

    #[async_trait]
    impl Repository<u32, u32> for Numbers {
        async fn find_all(&self) -> AppResult<Vec<u32>> {
            if self.offline {
                return Err(AppError::database("offline"));
            }
            Ok(self.values.clone())
        }

        async fn find_by_id(&self, id: &u32) -> AppResult<Option<u32>> {
            Ok(self.values.iter().copied().find(|v| v == id))
        }
    }

    #[async_trait]
    impl PageableRepository<u32, u32, Sort> for Numbers {
        fn page_size(&self) -> u32 {
            3
        }

        async fn count(&self) -> AppResult<u64> {
            if self.offline {
                return Err(AppError::database("offline"));
            }
            Ok(self.values.len() as u64)
        }

        async fn find_page(&self, sort: Sort, pagination: &Pagination) -> AppResult<Vec<u32>> {
            ensure_valid_pagination(pagination)?;
            let mut values = self.find_all().await?;
            if let Sort::Desc = sort {
                values.reverse();
            }
            Ok(values
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .collect())
        }
    }

    #[tokio::test]
    async fn test_exists_default() {
        let repo = Numbers::up_to(5);
        assert!(repo.exists(&3).await.unwrap());
        assert!(!repo.exists(&9).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_pages_rounds_up() {
        let repo = Numbers::up_to(10);
        assert_eq!(repo.count_pages(3).await.unwrap(), 4);
        assert_eq!(repo.count_pages(10).await.unwrap(), 1);
        assert_eq!(repo.count_pages(11).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_pages_rejects_zero() {
        let repo = Numbers::up_to(10);
        let err = repo.count_pages(0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_count_pages_reports_storage_failure() {
        let mut repo = Numbers::up_to(10);
        repo.offline = true;
        let err = repo.count_pages(3).await.unwrap_err();
        assert!(err.is_storage_failure());
        // 调用方可以自行回退为 0
        assert_eq!(repo.count_pages(3).await.unwrap_or(0), 0);
    }

    #[tokio::test]
    async fn test_pages_are_disjoint() {
        let repo = Numbers::up_to(8);
        let first = repo.find_by_page_number(Sort::Asc, 1).await.unwrap();
        let second = repo.find_by_page_number(Sort::Asc, 2).await.unwrap();
        let third = repo.find_by_page_number(Sort::Asc, 3).await.unwrap();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![4, 5, 6]);
        assert_eq!(third, vec![7, 8]);

        let desc = repo.find_by_page_number(Sort::Desc, 1).await.unwrap();
        assert_eq!(desc, vec![8, 7, 6]);
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let repo = Numbers::up_to(8);
        let err = repo.find_by_page_number(Sort::Asc, 0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
