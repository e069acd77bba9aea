//! 课堂成员关系应用层（classroom-application）
//!
//! 以 CQRS 方式组织用例：写操作是 `Command`，读操作是 `Query`，
//! 二者分别经由进程内的命令总线与查询总线路由到处理器。
//!
//! - `lifecycle`：班级的创建、改名与删除（`ClassLifecycle`）；
//! - `membership`：加入申请的提交与处理、成员与班级视图；
//! - `resource_gate`：按成员身份过滤班级测验（`ResourceGate`）；
//! - `credentials`：教师个人密钥的保存与读取；
//! - `ports`：身份、内容与密钥三个外部协作方的端口及内存实现；
//! - `service`：装配上述组件的门面（`ClassroomService`）。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod commands;
pub mod config;
pub mod context;
pub mod credentials;
pub mod dto;
pub mod error;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod lifecycle;
pub mod membership;
pub mod ports;
pub mod queries;
pub mod query;
pub mod query_bus;
pub mod query_handler;
pub mod resource_gate;
pub mod service;
pub mod telemetry;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;
pub use service::ClassroomService;
