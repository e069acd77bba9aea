use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::ClassroomRepository;
use crate::classroom::{ClassId, Classroom, ClassroomEvent, RequestId};
use crate::domain_event::{BusinessContext, DomainEvent, EventEnvelope};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::identity::UserId;
use crate::value_object::Version;

/// 基于内存事件日志的班级仓储
///
/// 每个班级一条事件流；整张表由一把读写锁保护，因此：
/// - 读操作可以并发，且总是看到某个完整提交之后的状态；
/// - 写操作（含版本校验与追加）在同一个临界区内完成。
///
/// 班级被删除时整条事件流随之移除，不保留任何引用该班级的记录。
#[derive(Default)]
pub struct InMemoryClassroomRepository {
    streams: RwLock<HashMap<ClassId, Vec<EventEnvelope<Classroom>>>>,
    class_seq: AtomicU64,
    request_seq: AtomicU64,
}

impl InMemoryClassroomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的事件流数量（已删除的班级不计入）
    pub async fn stream_count(&self) -> usize {
        self.streams.read().await.len()
    }

    fn rebuild(class_id: ClassId, stream: &[EventEnvelope<Classroom>]) -> Option<Classroom> {
        let classroom = Classroom::replay(class_id, stream.iter().map(|e| &e.payload));
        classroom.exists().then_some(classroom)
    }
}

#[async_trait]
impl ClassroomRepository for InMemoryClassroomRepository {
    async fn next_class_id(&self) -> DomainResult<ClassId> {
        Ok(ClassId::new(self.class_seq.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn next_request_id(&self) -> DomainResult<RequestId> {
        Ok(RequestId::new(
            self.request_seq.fetch_add(1, Ordering::SeqCst) + 1,
        ))
    }

    async fn load(&self, class_id: &ClassId) -> DomainResult<Option<Classroom>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(class_id)
            .and_then(|stream| Self::rebuild(*class_id, stream)))
    }

    async fn save(
        &self,
        classroom: &Classroom,
        events: Vec<ClassroomEvent>,
        context: BusinessContext,
    ) -> DomainResult<Vec<EventEnvelope<Classroom>>> {
        if events.is_empty() {
            return Ok(vec![]);
        }

        let class_id = *classroom.id();
        let final_version = classroom.version().value();
        let expected = final_version.checked_sub(events.len()).ok_or_else(|| {
            DomainError::Repository {
                reason: format!(
                    "aggregate {class_id} at {} cannot carry {} new events",
                    classroom.version(),
                    events.len()
                ),
            }
        })?;

        let mut streams = self.streams.write().await;
        let actual = streams.get(&class_id).map_or(0, Vec::len);
        if actual != expected {
            return Err(DomainError::VersionConflict { expected, actual });
        }

        let envelopes: Vec<EventEnvelope<Classroom>> = events
            .into_iter()
            .enumerate()
            .map(|(offset, event)| {
                EventEnvelope::new(
                    &class_id,
                    Version::from_value(expected + offset + 1),
                    event,
                    context.clone(),
                )
            })
            .collect();

        for envelope in &envelopes {
            debug!(
                %class_id,
                event = envelope.payload.event_type(),
                version = %envelope.metadata.aggregate_version(),
                "event appended"
            );
        }

        if classroom.is_deleted() {
            streams.remove(&class_id);
            debug!(%class_id, "event stream purged");
        } else {
            streams
                .entry(class_id)
                .or_default()
                .extend(envelopes.iter().cloned());
        }

        Ok(envelopes)
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> DomainResult<Vec<Classroom>> {
        let streams = self.streams.read().await;
        let mut owned: Vec<Classroom> = streams
            .iter()
            .filter_map(|(id, stream)| Self::rebuild(*id, stream))
            .filter(|c| c.owner_id() == *owner_id)
            .collect();
        owned.sort_by_key(|c| *c.id());
        Ok(owned)
    }
}
