//! 应用层

mod order_query_service;

pub use order_query_service::*;
