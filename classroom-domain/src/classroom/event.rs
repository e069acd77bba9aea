use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RequestId;
use crate::domain_event::DomainEvent;
use crate::identity::UserId;
use crate::value_object::ClassTitle;

/// 班级聚合产生的领域事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassroomEvent {
    Created {
        owner_id: UserId,
        title: ClassTitle,
    },
    RequestSubmitted {
        request_id: RequestId,
        student_id: UserId,
        submitted_at: DateTime<Utc>,
    },
    /// 申请状态转为 accepted 并新增成员
    RequestAccepted {
        request_id: RequestId,
        student_id: UserId,
    },
    RequestRejected {
        request_id: RequestId,
        student_id: UserId,
    },
    Renamed {
        title: ClassTitle,
    },
    /// 级联删除全部成员与申请
    Deleted,
}

impl DomainEvent for ClassroomEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "classroom.created",
            Self::RequestSubmitted { .. } => "classroom.request_submitted",
            Self::RequestAccepted { .. } => "classroom.request_accepted",
            Self::RequestRejected { .. } => "classroom.request_rejected",
            Self::Renamed { .. } => "classroom.renamed",
            Self::Deleted => "classroom.deleted",
        }
    }
}
