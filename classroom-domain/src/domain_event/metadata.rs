use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_object::Version;

/// 事件元数据
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    event_id: String,
    aggregate_id: String,
    aggregate_type: String,
    /// 应用该事件之后聚合所处的版本
    aggregate_version: Version,
    occurred_at: DateTime<Utc>,
}

impl Metadata {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_version(&self) -> Version {
        self.aggregate_version
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }
}
