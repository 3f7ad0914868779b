//! Repository trait 定义

use async_trait::async_trait;
use courier_errors::AppResult;

/// 基础 Repository trait
///
/// 各聚合的仓储接口在此基础上扩展专用查询。
#[async_trait]
pub trait Repository<T, ID>: Send + Sync
where
    T: Send + Sync,
    ID: Send + Sync,
{
    /// 查询全部
    async fn find_all(&self) -> AppResult<Vec<T>>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存新实体
    async fn save(&self, entity: &T) -> AppResult<()>;

    /// 覆盖已存在的实体
    ///
    /// 实体不存在时返回 `NotFound`
    async fn update(&self, entity: &T) -> AppResult<()>;

    /// 删除实体，返回是否删除了记录
    async fn delete(&self, id: &ID) -> AppResult<bool>;

    /// 检查是否存在
    async fn exists(&self, id: &ID) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
