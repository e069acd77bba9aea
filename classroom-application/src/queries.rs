//! 读用例
use classroom_domain::classroom::ClassId;
use classroom_domain::identity::UserId;

use crate::dto::{ClassDetailDto, ClassDto, JoinRequestDto};
use crate::ports::TestRef;
use crate::query::Query;

/// 班主任查看待处理申请（按提交顺序）
#[derive(Debug, Clone)]
pub struct ListPendingRequests {
    pub class_id: ClassId,
}

impl Query for ListPendingRequests {
    const NAME: &'static str = "classroom.list_pending_requests";
    type Dto = Vec<JoinRequestDto>;
}

/// 成员查看班级测验（顺序与内容服务一致）
#[derive(Debug, Clone)]
pub struct ListVisibleTests {
    pub class_id: ClassId,
}

impl Query for ListVisibleTests {
    const NAME: &'static str = "classroom.list_visible_tests";
    type Dto = Vec<TestRef>;
}

/// 班主任查看成员列表（班主任在首位）
#[derive(Debug, Clone)]
pub struct ListMembers {
    pub class_id: ClassId,
}

impl Query for ListMembers {
    const NAME: &'static str = "classroom.list_members";
    type Dto = Vec<UserId>;
}

/// 任意已认证用户查看班级详情及自身关系
#[derive(Debug, Clone)]
pub struct GetClass {
    pub class_id: ClassId,
}

impl Query for GetClass {
    const NAME: &'static str = "classroom.get_class";
    type Dto = ClassDetailDto;
}

/// 教师查看自己创建的班级
#[derive(Debug, Clone, Default)]
pub struct ListOwnedClasses;

impl Query for ListOwnedClasses {
    const NAME: &'static str = "classroom.list_owned_classes";
    type Dto = Vec<ClassDto>;
}

/// 教师读取自己保存的密钥
#[derive(Debug, Clone, Default)]
pub struct GetSecret;

impl Query for GetSecret {
    const NAME: &'static str = "credentials.get_secret";
    type Dto = String;
}
