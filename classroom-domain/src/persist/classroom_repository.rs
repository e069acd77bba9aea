use async_trait::async_trait;
use std::sync::Arc;

use crate::classroom::{ClassId, Classroom, ClassroomEvent, RequestId};
use crate::domain_event::{BusinessContext, EventEnvelope};
use crate::error::DomainResult;
use crate::identity::UserId;

/// 班级仓储端口
///
/// 实现方必须保证：
/// - `save` 原子生效：一批事件要么全部追加，要么全部不追加；
/// - `save` 做乐观并发校验：存储中的版本必须等于 `classroom` 应用这批事件之前的版本，
///   否则返回 `VersionConflict`；
/// - `load` 返回一致的快照；已删除的班级返回 `None`。
#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    /// 分配新的班级标识
    async fn next_class_id(&self) -> DomainResult<ClassId>;

    /// 分配新的申请标识
    async fn next_request_id(&self) -> DomainResult<RequestId>;

    async fn load(&self, class_id: &ClassId) -> DomainResult<Option<Classroom>>;

    /// 保存已应用 `events` 之后的聚合
    async fn save(
        &self,
        classroom: &Classroom,
        events: Vec<ClassroomEvent>,
        context: BusinessContext,
    ) -> DomainResult<Vec<EventEnvelope<Classroom>>>;

    /// 某位教师拥有的全部班级，按班级标识排序
    async fn list_by_owner(&self, owner_id: &UserId) -> DomainResult<Vec<Classroom>>;
}

#[async_trait]
impl<T> ClassroomRepository for Arc<T>
where
    T: ClassroomRepository + ?Sized,
{
    async fn next_class_id(&self) -> DomainResult<ClassId> {
        (**self).next_class_id().await
    }

    async fn next_request_id(&self) -> DomainResult<RequestId> {
        (**self).next_request_id().await
    }

    async fn load(&self, class_id: &ClassId) -> DomainResult<Option<Classroom>> {
        (**self).load(class_id).await
    }

    async fn save(
        &self,
        classroom: &Classroom,
        events: Vec<ClassroomEvent>,
        context: BusinessContext,
    ) -> DomainResult<Vec<EventEnvelope<Classroom>>> {
        (**self).save(classroom, events, context).await
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> DomainResult<Vec<Classroom>> {
        (**self).list_by_owner(owner_id).await
    }
}
