//! 持久化（persist）
//!
//! 定义班级聚合的仓储端口（`ClassroomRepository`）以及基于事件日志的内存实现
//! （`InMemoryClassroomRepository`）。具体存储后端由上层实现该端口后注入。
//!
mod classroom_repository;
mod inmemory;

pub use classroom_repository::ClassroomRepository;
pub use inmemory::InMemoryClassroomRepository;
