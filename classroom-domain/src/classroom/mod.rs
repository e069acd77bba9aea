//! 班级聚合
//!
//! 班级、成员关系与加入申请同属一个一致性边界：
//! 同意申请时“申请状态变为 accepted”与“新增成员”由同一个事件表达，
//! 删除班级时级联清理也由同一个事件表达，因此不存在部分生效的中间状态。
//!
mod aggregate;
mod command;
mod event;
mod join_request;

use classroom_macros::entity_id;

pub use aggregate::Classroom;
pub use command::ClassroomCommand;
pub use event::ClassroomEvent;
pub use join_request::JoinRequest;

/// 班级标识（由仓储按顺序分配，从 1 开始）
#[entity_id(copy = true)]
pub struct ClassId(u64);

/// 加入申请标识
#[entity_id(copy = true)]
pub struct RequestId(u64);
