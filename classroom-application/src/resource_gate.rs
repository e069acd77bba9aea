//! 班级资源门禁（ResourceGate）
//!
//! 测验集合及其顺序属于内容服务；门禁只决定调用方能否看到，不重排、不修改。
//!
use async_trait::async_trait;
use classroom_domain::access::AccessController;
use classroom_domain::classroom::ClassId;
use classroom_domain::identity::User;
use classroom_domain::registry::MembershipRegistry;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::ports::{ContentService, TestRef};
use crate::queries::ListVisibleTests;
use crate::query_handler::QueryHandler;

pub struct ResourceGate {
    registry: Arc<MembershipRegistry>,
    content: Arc<dyn ContentService>,
}

impl ResourceGate {
    pub fn new(registry: Arc<MembershipRegistry>, content: Arc<dyn ContentService>) -> Self {
        Self { registry, content }
    }

    /// 班级不存在时 `NotFound`；非成员（包括仅有待处理申请者）`Forbidden`
    pub async fn list_visible_tests(
        &self,
        user: &User,
        class_id: &ClassId,
    ) -> AppResult<Vec<TestRef>> {
        let classroom = self.registry.get_class(class_id).await?;
        AccessController::ensure_can_view_resources(&classroom, user)?;

        let tests = self.content.tests_for(class_id).await?;
        Ok(tests.into_iter().filter(|t| t.class_id == *class_id).collect())
    }
}

#[async_trait]
impl QueryHandler<ListVisibleTests> for ResourceGate {
    async fn handle(&self, ctx: &AppContext, q: ListVisibleTests) -> AppResult<Vec<TestRef>> {
        let caller = ctx.caller()?;
        self.list_visible_tests(&caller, &q.class_id).await
    }
}
