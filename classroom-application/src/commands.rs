//! 写用例
use classroom_domain::classroom::{ClassId, RequestId};
use classroom_domain::identity::UserId;
use classroom_domain::value_object::Decision;

use crate::command::Command;

/// 教师创建班级
#[derive(Debug, Clone)]
pub struct CreateClass {
    pub title: String,
}

impl Command for CreateClass {
    const NAME: &'static str = "classroom.create_class";
    type Output = ClassId;
}

/// 班主任修改班级标题
#[derive(Debug, Clone)]
pub struct RenameClass {
    pub class_id: ClassId,
    pub title: String,
}

impl Command for RenameClass {
    const NAME: &'static str = "classroom.rename_class";
    type Output = ();
}

/// 班主任删除班级；`confirmation` 必须与当前标题完全一致
#[derive(Debug, Clone)]
pub struct DeleteClass {
    pub class_id: ClassId,
    pub confirmation: String,
}

impl Command for DeleteClass {
    const NAME: &'static str = "classroom.delete_class";
    type Output = ();
}

/// 学生申请加入班级
#[derive(Debug, Clone)]
pub struct SubmitJoinRequest {
    pub class_id: ClassId,
}

impl Command for SubmitJoinRequest {
    const NAME: &'static str = "classroom.submit_join_request";
    type Output = RequestId;
}

/// 班主任处理某位学生的待处理申请
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub class_id: ClassId,
    pub student_id: UserId,
    pub decision: Decision,
}

impl Command for ResolveRequest {
    const NAME: &'static str = "classroom.resolve_request";
    type Output = ();
}

/// 教师保存个人密钥
#[derive(Clone)]
pub struct SaveSecret {
    pub secret: String,
}

impl std::fmt::Debug for SaveSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveSecret").field("secret", &"***").finish()
    }
}

impl Command for SaveSecret {
    const NAME: &'static str = "credentials.save_secret";
    type Output = ();
}
