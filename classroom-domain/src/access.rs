//! 权限判定（AccessController）
//!
//! 基于班级聚合的当前状态与调用方身份得出的纯函数判定，不修改任何状态。
//! 所有写操作在改动状态之前都必须经过这里的谓词；`ensure_*` 系列在判定失败时
//! 返回 `Forbidden`，供登记处与应用服务统一使用。
//!
use tracing::debug;

use crate::classroom::Classroom;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::identity::User;
use crate::specification::Specification;

/// 规约的判定对象：某个班级与某个调用方
#[derive(Debug, Clone, Copy)]
pub struct AccessCandidate<'a> {
    pub classroom: &'a Classroom,
    pub user: &'a User,
}

impl<'a> AccessCandidate<'a> {
    pub fn new(classroom: &'a Classroom, user: &'a User) -> Self {
        Self { classroom, user }
    }
}

/// 调用方是班级所有者
pub struct IsOwner;

impl Specification<AccessCandidate<'_>> for IsOwner {
    fn is_satisfied_by(&self, c: &AccessCandidate<'_>) -> bool {
        c.classroom.is_owner(c.user.id)
    }
}

/// 调用方是成员（含所有者）
pub struct IsMember;

impl Specification<AccessCandidate<'_>> for IsMember {
    fn is_satisfied_by(&self, c: &AccessCandidate<'_>) -> bool {
        c.classroom.is_member(c.user.id)
    }
}

/// 调用方角色为学生
pub struct IsStudent;

impl Specification<AccessCandidate<'_>> for IsStudent {
    fn is_satisfied_by(&self, c: &AccessCandidate<'_>) -> bool {
        c.user.is_student()
    }
}

/// 调用方在该班级有待处理的申请
pub struct HasPendingRequest;

impl Specification<AccessCandidate<'_>> for HasPendingRequest {
    fn is_satisfied_by(&self, c: &AccessCandidate<'_>) -> bool {
        c.classroom.pending_request_of(c.user.id).is_some()
    }
}

/// 班级权限判定
pub struct AccessController;

impl AccessController {
    /// 只有教师可以创建班级
    pub fn can_create_class(user: &User) -> bool {
        user.is_teacher()
    }

    pub fn is_owner(classroom: &Classroom, user: &User) -> bool {
        IsOwner.is_satisfied_by(&AccessCandidate::new(classroom, user))
    }

    pub fn is_member(classroom: &Classroom, user: &User) -> bool {
        IsMember.is_satisfied_by(&AccessCandidate::new(classroom, user))
    }

    /// 学生、尚非成员、且没有待处理申请
    pub fn can_submit_join_request(classroom: &Classroom, user: &User) -> bool {
        IsStudent
            .and(IsMember.not())
            .and(HasPendingRequest.not())
            .is_satisfied_by(&AccessCandidate::new(classroom, user))
    }

    /// 调用方在该班级有待处理的申请
    pub fn has_pending_request(classroom: &Classroom, user: &User) -> bool {
        HasPendingRequest.is_satisfied_by(&AccessCandidate::new(classroom, user))
    }

    pub fn can_manage_requests(classroom: &Classroom, user: &User) -> bool {
        Self::is_owner(classroom, user)
    }

    /// 所有者或已被接收的成员；仅有待处理申请不算
    pub fn can_view_resources(classroom: &Classroom, user: &User) -> bool {
        Self::is_member(classroom, user)
    }

    pub fn can_delete_class(classroom: &Classroom, user: &User) -> bool {
        Self::is_owner(classroom, user)
    }

    pub fn ensure_can_create_class(user: &User) -> DomainResult<()> {
        if Self::can_create_class(user) {
            return Ok(());
        }
        debug!(user_id = %user.id, role = %user.role, "create class denied");
        Err(DomainError::forbidden("only teachers can create classes"))
    }

    /// 只有教师拥有班级，也只有教师保存个人密钥
    pub fn ensure_teacher(user: &User, action: &str) -> DomainResult<()> {
        if user.is_teacher() {
            return Ok(());
        }
        debug!(user_id = %user.id, role = %user.role, action, "teacher-only action denied");
        Err(DomainError::forbidden(format!("only teachers can {action}")))
    }

    /// 提交申请的角色门槛；成员与重复申请属于状态冲突，由聚合报告 `Conflict`
    pub fn ensure_can_request_to_join(user: &User) -> DomainResult<()> {
        if user.is_student() {
            return Ok(());
        }
        debug!(user_id = %user.id, role = %user.role, "join request denied");
        Err(DomainError::forbidden("only students can request to join a class"))
    }

    /// 提交申请的完整判定：角色不符返回 `Forbidden`，已是成员或已有待处理申请返回 `Conflict`
    pub fn ensure_can_submit_join_request(classroom: &Classroom, user: &User) -> DomainResult<()> {
        if Self::can_submit_join_request(classroom, user) {
            return Ok(());
        }
        Self::ensure_can_request_to_join(user)?;
        Self::ensure_no_open_membership(classroom, user)
    }

    /// 申请人既不能已是成员，也不能已有待处理申请
    pub fn ensure_no_open_membership(classroom: &Classroom, user: &User) -> DomainResult<()> {
        let candidate = AccessCandidate::new(classroom, user);
        if IsMember.is_satisfied_by(&candidate) {
            return Err(DomainError::conflict(format!(
                "user {} is already a member of class {}",
                user.id,
                classroom.id()
            )));
        }
        if HasPendingRequest.is_satisfied_by(&candidate) {
            return Err(DomainError::conflict(format!(
                "user {} already has a pending request for class {}",
                user.id,
                classroom.id()
            )));
        }
        Ok(())
    }

    pub fn ensure_can_manage_requests(classroom: &Classroom, user: &User) -> DomainResult<()> {
        Self::ensure_owner(classroom, user, "manage join requests")
    }

    pub fn ensure_can_delete_class(classroom: &Classroom, user: &User) -> DomainResult<()> {
        Self::ensure_owner(classroom, user, "delete the class")
    }

    pub fn ensure_can_rename_class(classroom: &Classroom, user: &User) -> DomainResult<()> {
        Self::ensure_owner(classroom, user, "rename the class")
    }

    pub fn ensure_can_view_resources(classroom: &Classroom, user: &User) -> DomainResult<()> {
        if Self::can_view_resources(classroom, user) {
            return Ok(());
        }
        debug!(user_id = %user.id, class_id = %classroom.id(), "resource access denied");
        Err(DomainError::forbidden("only class members can view its resources"))
    }

    fn ensure_owner(classroom: &Classroom, user: &User, action: &str) -> DomainResult<()> {
        if Self::is_owner(classroom, user) {
            return Ok(());
        }
        debug!(user_id = %user.id, class_id = %classroom.id(), action, "owner-only action denied");
        Err(DomainError::forbidden(format!("only the class owner can {action}")))
    }
}
