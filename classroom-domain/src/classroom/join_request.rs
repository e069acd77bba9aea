use chrono::{DateTime, Utc};
use classroom_macros::value_object;

use super::RequestId;
use crate::identity::UserId;
use crate::value_object::RequestState;

/// 学生对班级的加入申请
///
/// 同一 `(班级, 学生)` 任意时刻最多只有一条 `Pending` 申请；
/// 已处理的申请保留为历史记录，不阻止再次申请。
#[value_object(default = false)]
pub struct JoinRequest {
    pub id: RequestId,
    pub student_id: UserId,
    pub state: RequestState,
    pub submitted_at: DateTime<Utc>,
}

impl JoinRequest {
    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }
}
