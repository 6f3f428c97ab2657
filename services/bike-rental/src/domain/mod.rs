//! 领域层

mod bicycle;
mod order;
mod repositories;
mod user;

pub use bicycle::*;
pub use order::*;
pub use repositories::*;
pub use user::*;
