//! 课堂成员关系领域层（classroom-domain）
//!
//! 以 DDD 方式建模“班级 / 成员 / 加入申请”：
//! - 班级聚合（`classroom`）：班级、成员与加入申请作为同一个一致性边界，
//!   每次状态变更都是一次原子的事件追加；
//! - 权限判定（`access`）：基于规约（`specification`）组合出的纯函数谓词；
//! - 仓储端口（`persist`）与内存实现；
//! - 成员关系登记处（`registry`）：按班级串行化所有写操作。
//!
//! 典型用法：
//! 1. 选择一个 `ClassroomRepository` 实现并构造 `MembershipRegistry`；
//! 2. 通过登记处创建班级、提交与处理加入申请；
//! 3. 在任何写操作之前使用 `AccessController` 判定调用方权限。
//!
pub mod access;
pub mod aggregate;
pub mod classroom;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod identity;
pub mod persist;
pub mod registry;
pub mod specification;
pub mod value_object;

// 允许在本 crate 内部通过 ::classroom_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 内也能解析。
extern crate self as classroom_domain;
