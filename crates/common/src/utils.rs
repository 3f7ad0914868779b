//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 去除首尾空白并转小写，用于地名比较
pub fn normalize_name(s: &str) -> String {
    s.trim().to_lowercase()
}
