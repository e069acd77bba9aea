use bon::Builder;
use classroom_domain::domain_event::BusinessContext;
use classroom_domain::identity::User;

use crate::error::{AppError, AppResult};

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 调用方（`caller`）：由身份提供方认证得到的 `(UserId, Role)`，缺失时为匿名调用；
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者等，随领域事件一起落盘。
///
/// 典型用法：
/// ```rust
/// use classroom_application::context::AppContext;
/// use classroom_domain::domain_event::BusinessContext;
/// use classroom_domain::identity::User;
///
/// let teacher = User::teacher(1);
/// let ctx = AppContext::builder()
///     .caller(teacher)
///     .biz(
///         BusinessContext::builder()
///             .correlation_id("cor-123".to_string())
///             .actor_id(teacher.id)
///             .actor_role(teacher.role)
///             .build(),
///     )
///     .build();
/// assert_eq!(ctx.caller().unwrap(), teacher);
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 已认证的调用方
    pub caller: Option<User>,
    /// 业务语境（链路追踪、审计主体）
    #[builder(default)]
    pub biz: BusinessContext,
}

impl AppContext {
    /// 以已认证用户为主体的上下文
    pub fn for_caller(user: User) -> Self {
        Self {
            caller: Some(user),
            biz: BusinessContext::for_actor(&user),
        }
    }

    pub fn caller(&self) -> AppResult<User> {
        self.caller
            .ok_or_else(|| AppError::Unauthenticated("no authenticated caller".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classroom_domain::error::ErrorKind;

    #[test]
    fn anonymous_context_is_unauthenticated() {
        let err = AppContext::default().caller().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn for_caller_fills_business_context() {
        let student = User::student(4);
        let ctx = AppContext::for_caller(student);
        assert_eq!(ctx.caller().unwrap(), student);
        assert_eq!(ctx.biz.actor_id(), Some(student.id));
        assert_eq!(ctx.biz.actor_role(), Some(student.role));
    }
}
