//! ports - 抽象 trait 层
//!
//! 定义持久化的抽象接口

mod repository;

pub use repository::*;
