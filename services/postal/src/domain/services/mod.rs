//! 领域服务

mod pricing;

pub use pricing::*;
