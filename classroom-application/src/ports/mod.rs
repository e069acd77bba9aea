//! 外部协作方端口
//!
//! 身份签发、测验内容与教师密钥都不属于成员关系核心，这里只定义消费它们所需的最小接口，
//! 并各自提供一个内存实现供装配与测试使用。

pub mod content;
pub mod identity;
pub mod secret;

pub use content::{ContentService, InMemoryContentService, TestId, TestRef};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use secret::{InMemorySecretStore, SecretStore};
