use async_trait::async_trait;
use classroom_domain::error::DomainError;
use classroom_domain::identity::UserId;
use dashmap::DashMap;

use crate::error::AppResult;

/// 教师个人密钥存储（如外部内容生成服务的访问令牌）
///
/// 以教师 `UserId` 为键，与班级、成员关系记录完全分离。
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn put(&self, owner: UserId, secret: String) -> AppResult<()>;

    /// 读取密钥；未保存过时返回 `NotFound`
    async fn get(&self, owner: &UserId) -> AppResult<String>;
}

#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: DashMap<UserId, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn put(&self, owner: UserId, secret: String) -> AppResult<()> {
        self.secrets.insert(owner, secret);
        Ok(())
    }

    async fn get(&self, owner: &UserId) -> AppResult<String> {
        self.secrets
            .get(owner)
            .map(|s| s.value().clone())
            .ok_or_else(|| {
                DomainError::not_found(format!("no secret stored for user {owner}")).into()
            })
    }
}
