//! 分页类型

use serde::{Deserialize, Serialize};

/// 默认每页行数
pub const DEFAULT_PAGE_SIZE: u32 = 7;

/// 分页参数（页码从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// 第一行的偏移量
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// 向上取整计算总页数，`page_size` 为 0 时返回 0
    pub fn page_count(total: u64, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        let pages = total.div_ceil(u64::from(page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        Pagination::page_count(self.total, self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}
