//! 调用方身份
//!
//! 身份由外部身份提供方签发，本层只消费 `(UserId, Role)`，不做任何修改。
//!
use std::fmt;

use classroom_macros::{entity_id, value_object};

/// 用户标识
#[entity_id(copy = true)]
pub struct UserId(u64);

/// 用户角色
#[value_object(default = false)]
#[derive(Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => f.write_str("teacher"),
            Self::Student => f.write_str("student"),
        }
    }
}

/// 已认证的调用方
#[value_object(default = false)]
#[derive(Copy, Hash)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

impl User {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub const fn teacher(id: u64) -> Self {
        Self::new(UserId::new(id), Role::Teacher)
    }

    pub const fn student(id: u64) -> Self {
        Self::new(UserId::new(id), Role::Student)
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_transparent_in_json() {
        let id = UserId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert_eq!("7".parse::<UserId>().unwrap(), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn role_helpers() {
        assert!(User::teacher(1).is_teacher());
        assert!(!User::teacher(1).is_student());
        assert!(User::student(2).is_student());
        assert_eq!(Role::Student.to_string(), "student");
    }
}
