use async_trait::async_trait;
use classroom_domain::identity::User;
use dashmap::DashMap;

use crate::error::{AppError, AppResult};

/// 身份提供方：把不透明凭证解析为 `(UserId, Role)`
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, credential: &str) -> AppResult<User>;
}

/// 以令牌表实现的身份提供方
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    tokens: DashMap<String, User>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为用户签发令牌；同一令牌再次签发会覆盖旧用户
    pub fn issue(&self, token: impl Into<String>, user: User) {
        self.tokens.insert(token.into(), user);
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, credential: &str) -> AppResult<User> {
        self.tokens
            .get(credential)
            .map(|u| *u.value())
            .ok_or_else(|| AppError::Unauthenticated("unknown or revoked credential".to_string()))
    }
}
