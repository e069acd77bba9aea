//! 领域层统一错误定义
//!
//! 错误按调用方可见的类别划分（`ErrorKind`），由边界层映射为具体的传输状态码。
//!
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 稳定的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 引用的实体不存在
    NotFound,
    /// 调用方缺少所需的角色、所有权或成员身份
    Forbidden,
    /// 违反状态唯一性（重复申请、已处理的申请、已是成员）
    Conflict,
    /// 输入不合法（空标题、确认文本不匹配）
    Validation,
    /// 调用方身份无法确认（由身份协作方产生）
    Unauthenticated,
    /// 基础设施故障
    Internal,
}

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 调用方可见 ---
    #[error("not found: {reason}")]
    NotFound { reason: String },
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },
    #[error("conflict: {reason}")]
    Conflict { reason: String },
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    // --- 仓储/持久化 ---
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: usize, actual: usize },
    #[error("repository error: {reason}")]
    Repository { reason: String },
}

impl DomainError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// 错误类别；并发写冲突对调用方而言也是一种 `Conflict`
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Conflict { .. } | Self::VersionConflict { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Repository { .. } => ErrorKind::Internal,
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
