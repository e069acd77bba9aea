use super::RequestId;
use crate::identity::UserId;
use crate::value_object::{ClassTitle, Decision};

/// 班级聚合支持的命令
///
/// 权限判定不在聚合内完成，调用方须先经过 `AccessController`；
/// 聚合只负责状态一致性（存在性、唯一性、幂等）。
#[derive(Debug, Clone)]
pub enum ClassroomCommand {
    Create {
        owner_id: UserId,
        title: ClassTitle,
    },
    SubmitRequest {
        request_id: RequestId,
        student_id: UserId,
    },
    Resolve {
        student_id: UserId,
        decision: Decision,
    },
    Rename {
        title: ClassTitle,
    },
    Delete,
}
