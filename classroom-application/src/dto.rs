use chrono::{DateTime, Utc};
use classroom_domain::access::AccessController;
use classroom_domain::classroom::{ClassId, Classroom, JoinRequest, RequestId};
use classroom_domain::entity::Entity;
use classroom_domain::identity::{User, UserId};
use classroom_domain::value_object::RequestState;
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将聚合直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl<T: Dto> Dto for Vec<T> {}

impl Dto for String {}

impl Dto for UserId {}

/// 班级摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDto {
    pub id: ClassId,
    pub title: String,
    pub owner_id: UserId,
}

impl Dto for ClassDto {}

impl From<&Classroom> for ClassDto {
    fn from(classroom: &Classroom) -> Self {
        Self {
            id: *classroom.id(),
            title: classroom.title().as_str().to_string(),
            owner_id: classroom.owner_id(),
        }
    }
}

/// 加入申请
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequestDto {
    pub id: RequestId,
    pub class_id: ClassId,
    pub student_id: UserId,
    pub state: RequestState,
    pub submitted_at: DateTime<Utc>,
}

impl Dto for JoinRequestDto {}

impl JoinRequestDto {
    pub fn new(class_id: ClassId, request: &JoinRequest) -> Self {
        Self {
            id: request.id,
            class_id,
            student_id: request.student_id,
            state: request.state,
            submitted_at: request.submitted_at,
        }
    }
}

/// 调用方与班级的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassRelation {
    Owner,
    Member,
    Pending,
    Outsider,
}

impl ClassRelation {
    pub fn of(classroom: &Classroom, user: &User) -> Self {
        if AccessController::is_owner(classroom, user) {
            Self::Owner
        } else if AccessController::is_member(classroom, user) {
            Self::Member
        } else if AccessController::has_pending_request(classroom, user) {
            Self::Pending
        } else {
            Self::Outsider
        }
    }
}

/// 班级详情：摘要 + 调用方视角
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDetailDto {
    #[serde(flatten)]
    pub class: ClassDto,
    pub relation: ClassRelation,
    pub member_count: usize,
}

impl Dto for ClassDetailDto {}

impl ClassDetailDto {
    pub fn for_caller(classroom: &Classroom, caller: &User) -> Self {
        Self {
            class: ClassDto::from(classroom),
            relation: ClassRelation::of(classroom, caller),
            member_count: classroom.members().len(),
        }
    }
}
