//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//!
use std::fmt;

use classroom_macros::value_object;

use crate::error::{DomainError, DomainResult};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 校验当前值是否满足业务约束
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 版本号（用于乐观锁和并发控制）
///
/// # 示例
///
/// ```
/// use classroom_domain::value_object::Version;
///
/// let v1 = Version::new();
/// assert_eq!(v1.value(), 0);
/// assert!(v1.is_new());
///
/// let v2 = v1.next();
/// assert_eq!(v2.value(), 1);
/// assert!(v2 > v1);
/// ```
#[value_object]
#[derive(Copy, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    /// 初始版本（尚未产生任何事件）
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    pub fn is_new(&self) -> bool {
        self.0 == 0
    }

    /// 聚合是否已创建（版本大于零）
    pub fn is_created(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for Version {
    fn from(value: usize) -> Self {
        Self::from_value(value)
    }
}

/// 标题的默认最大长度（按字符计）
pub const DEFAULT_MAX_TITLE_LEN: usize = 200;

/// 班级标题
///
/// 原样保存调用方输入（不做 trim），删除确认时按字节精确比较。
///
/// ```
/// use classroom_domain::value_object::{ClassTitle, DEFAULT_MAX_TITLE_LEN};
///
/// let title = ClassTitle::parse("Algebra", DEFAULT_MAX_TITLE_LEN).unwrap();
/// assert!(title.confirms("Algebra"));
/// assert!(!title.confirms("algebra"));
/// assert!(ClassTitle::parse("   ", DEFAULT_MAX_TITLE_LEN).is_err());
/// ```
#[value_object]
#[derive(Hash)]
pub struct ClassTitle(String);

impl ClassTitle {
    /// 校验并构造标题：长度不超过 `max_len` 个字符，且不能为空。
    ///
    /// 只含空白的标题（如 `"   "`）按空标题处理，返回 `Validation`；
    /// 通过校验的标题原样保存，不做裁剪。
    pub fn parse(raw: impl Into<String>, max_len: usize) -> DomainResult<Self> {
        let title = Self(raw.into());
        title.validate()?;
        let len = title.0.chars().count();
        if len > max_len {
            return Err(DomainError::validation(format!(
                "title is {len} characters long, at most {max_len} allowed"
            )));
        }
        Ok(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 确认文本是否与标题完全一致（区分大小写，不忽略空白）
    pub fn confirms(&self, confirmation: &str) -> bool {
        self.0 == confirmation
    }
}

impl ValueObject for ClassTitle {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0.trim().is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for ClassTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 班主任对加入申请的处理结论
#[value_object(default = false)]
#[derive(Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// 加入申请状态
#[value_object]
#[derive(Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Pending,
    Accepted,
    Rejected,
}
