//! 实体与聚合根

use courier_common::AuditInfo;

/// 以 ID 区分身份的领域对象
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根：一致性边界，持有审计时间
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;

    /// 聚合内部任何修改后调用
    fn mark_modified(&mut self) {
        self.audit_info_mut().touch();
    }
}
