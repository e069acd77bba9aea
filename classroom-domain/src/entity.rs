//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的标识（Id）与版本（乐观锁）能力。
//!
use std::{fmt::Display, hash::Hash, str::FromStr};

use crate::value_object::Version;

/// 具备唯一标识与版本的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可比较
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    /// 使用给定标识与版本创建实体
    fn new(id: Self::Id, version: Version) -> Self;

    fn id(&self) -> &Self::Id;

    /// 当前版本（用于乐观锁与并发控制）
    fn version(&self) -> Version;
}
