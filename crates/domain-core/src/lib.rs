//! domain-core - 跨 context 的领域核心类型

mod entity;
mod money;

pub use entity::*;
pub use money::*;

// Re-export common types
pub use courier_common::AuditInfo;
