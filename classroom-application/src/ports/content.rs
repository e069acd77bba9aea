use async_trait::async_trait;
use classroom_domain::classroom::ClassId;
use classroom_macros::{entity_id, value_object};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::dto::Dto;
use crate::error::AppResult;

/// 测验标识
#[entity_id(copy = true)]
pub struct TestId(u64);

/// 测验引用：内容本身由内容服务持有
#[value_object(default = false)]
pub struct TestRef {
    pub id: TestId,
    pub class_id: ClassId,
    pub title: String,
}

impl Dto for TestRef {}

/// 测验内容服务：按班级返回未经过滤的完整测验列表，顺序由服务决定
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn tests_for(&self, class_id: &ClassId) -> AppResult<Vec<TestRef>>;
}

/// 按发布顺序保存测验的内容服务
#[derive(Default)]
pub struct InMemoryContentService {
    tests: RwLock<Vec<TestRef>>,
    seq: AtomicU64,
}

impl InMemoryContentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, class_id: ClassId, title: impl Into<String>) -> TestRef {
        let test = TestRef {
            id: TestId::new(self.seq.fetch_add(1, Ordering::SeqCst) + 1),
            class_id,
            title: title.into(),
        };
        self.tests.write().await.push(test.clone());
        test
    }
}

#[async_trait]
impl ContentService for InMemoryContentService {
    async fn tests_for(&self, class_id: &ClassId) -> AppResult<Vec<TestRef>> {
        let tests = self.tests.read().await;
        Ok(tests
            .iter()
            .filter(|t| t.class_id == *class_id)
            .cloned()
            .collect())
    }
}
