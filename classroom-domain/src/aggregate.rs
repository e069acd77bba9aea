//! 聚合（Aggregate）抽象
//!
//! 约束一个聚合的核心行为：
//! - `execute` 将命令转换为事件（不改变状态）；
//! - `apply` 将事件投影到状态（改变状态并推进版本）；
//! - 通过 `Entity` 约束聚合具备标识与版本。
//!
use crate::domain_event::DomainEvent;
use crate::entity::Entity;
use serde::{Serialize, de::DeserializeOwned};
use std::error::Error;

/// 聚合根接口
pub trait Aggregate: Entity + Default + Serialize + DeserializeOwned + Send + Sync {
    const TYPE: &'static str;

    /// 该聚合支持的命令类型
    type Command;
    /// 该聚合产生的领域事件类型
    type Event: DomainEvent;
    /// 命令执行环节的错误类型
    type Error: Error + Send + Sync + 'static;

    /// 执行命令，返回产生的事件列表
    fn execute(&self, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// 应用事件，更新聚合状态
    fn apply(&mut self, event: &Self::Event);
}
