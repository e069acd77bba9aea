use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::identity::{Role, User, UserId};

/// 业务上下文：谁、因为哪次调用触发了本次变更
#[derive(Builder, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 触发变更的用户
    actor_id: Option<UserId>,
    /// 触发变更时的用户角色
    actor_role: Option<Role>,
}

impl BusinessContext {
    /// 以调用方为主体的上下文
    pub fn for_actor(actor: &User) -> Self {
        Self::builder()
            .actor_id(actor.id)
            .actor_role(actor.role)
            .build()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<UserId> {
        self.actor_id
    }

    pub fn actor_role(&self) -> Option<Role> {
        self.actor_role
    }
}
