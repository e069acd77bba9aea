use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
pub trait DomainEvent:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件类型（形如 `classroom.created`）
    fn event_type(&self) -> &'static str;

    /// 事件载荷版本（用于版本兼容）
    fn event_version(&self) -> usize {
        1
    }
}
