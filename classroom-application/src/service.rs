//! 应用门面（ClassroomService）
//!
//! 装配登记处、生命周期、资源门禁、协作方端口与两条总线，
//! 对外为每个用例暴露一个异步方法。所有方法都以 `AppContext` 作为调用方来源。
//!
use bon::bon;
use classroom_domain::classroom::{ClassId, RequestId};
use classroom_domain::identity::UserId;
use classroom_domain::persist::ClassroomRepository;
use classroom_domain::registry::MembershipRegistry;
use classroom_domain::value_object::Decision;
use std::sync::Arc;
use tracing::debug;

use crate::command_bus::CommandBus;
use crate::commands::{
    CreateClass, DeleteClass, RenameClass, ResolveRequest, SaveSecret, SubmitJoinRequest,
};
use crate::config::ClassroomConfig;
use crate::context::AppContext;
use crate::credentials::CredentialKeeper;
use crate::dto::{ClassDetailDto, ClassDto, JoinRequestDto};
use crate::error::AppResult;
use crate::lifecycle::ClassLifecycle;
use crate::membership::MembershipDesk;
use crate::ports::{ContentService, IdentityProvider, SecretStore, TestRef};
use crate::queries::{
    GetClass, GetSecret, ListMembers, ListOwnedClasses, ListPendingRequests, ListVisibleTests,
};
use crate::query_bus::QueryBus;
use crate::resource_gate::ResourceGate;
use crate::{InMemoryCommandBus, InMemoryQueryBus};

pub struct ClassroomService {
    identity: Arc<dyn IdentityProvider>,
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
}

#[bon]
impl ClassroomService {
    #[builder]
    pub fn new(
        repository: Arc<dyn ClassroomRepository>,
        identity: Arc<dyn IdentityProvider>,
        content: Arc<dyn ContentService>,
        secrets: Arc<dyn SecretStore>,
        #[builder(default)] config: ClassroomConfig,
    ) -> AppResult<Self> {
        let registry = Arc::new(MembershipRegistry::with_max_title_len(
            repository,
            config.max_title_len,
        ));
        let lifecycle = Arc::new(ClassLifecycle::new(registry.clone()));
        let desk = Arc::new(MembershipDesk::new(registry.clone()));
        let gate = Arc::new(ResourceGate::new(registry, content));
        let keeper = Arc::new(CredentialKeeper::new(secrets));

        let commands = InMemoryCommandBus::new();
        commands.register::<CreateClass, _>(lifecycle.clone())?;
        commands.register::<RenameClass, _>(lifecycle.clone())?;
        commands.register::<DeleteClass, _>(lifecycle.clone())?;
        commands.register::<SubmitJoinRequest, _>(desk.clone())?;
        commands.register::<ResolveRequest, _>(desk.clone())?;
        commands.register::<SaveSecret, _>(keeper.clone())?;

        let queries = InMemoryQueryBus::new();
        queries.register::<ListPendingRequests, _>(desk.clone())?;
        queries.register::<ListMembers, _>(desk.clone())?;
        queries.register::<GetClass, _>(desk)?;
        queries.register::<ListOwnedClasses, _>(lifecycle)?;
        queries.register::<ListVisibleTests, _>(gate)?;
        queries.register::<GetSecret, _>(keeper)?;

        debug!(
            commands = ?commands.registered_commands(),
            queries = ?queries.registered_queries(),
            "classroom service wired"
        );

        Ok(Self {
            identity,
            commands,
            queries,
        })
    }
}

impl ClassroomService {
    /// 以不透明凭证换取已认证的上下文
    pub async fn authenticate(&self, credential: &str) -> AppResult<AppContext> {
        let user = self.identity.authenticate(credential).await?;
        Ok(AppContext::for_caller(user))
    }

    pub async fn create_class(
        &self,
        ctx: &AppContext,
        title: impl Into<String>,
    ) -> AppResult<ClassId> {
        self.commands
            .dispatch(ctx, CreateClass { title: title.into() })
            .await
    }

    pub async fn rename_class(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
        title: impl Into<String>,
    ) -> AppResult<()> {
        self.commands
            .dispatch(
                ctx,
                RenameClass {
                    class_id,
                    title: title.into(),
                },
            )
            .await
    }

    pub async fn delete_class(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
        confirmation: impl Into<String>,
    ) -> AppResult<()> {
        self.commands
            .dispatch(
                ctx,
                DeleteClass {
                    class_id,
                    confirmation: confirmation.into(),
                },
            )
            .await
    }

    pub async fn submit_join_request(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
    ) -> AppResult<RequestId> {
        self.commands
            .dispatch(ctx, SubmitJoinRequest { class_id })
            .await
    }

    pub async fn resolve_request(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
        student_id: UserId,
        decision: Decision,
    ) -> AppResult<()> {
        self.commands
            .dispatch(
                ctx,
                ResolveRequest {
                    class_id,
                    student_id,
                    decision,
                },
            )
            .await
    }

    pub async fn list_pending_requests(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
    ) -> AppResult<Vec<JoinRequestDto>> {
        self.queries
            .dispatch(ctx, ListPendingRequests { class_id })
            .await
    }

    pub async fn list_visible_tests(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
    ) -> AppResult<Vec<TestRef>> {
        self.queries
            .dispatch(ctx, ListVisibleTests { class_id })
            .await
    }

    pub async fn list_members(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
    ) -> AppResult<Vec<UserId>> {
        self.queries.dispatch(ctx, ListMembers { class_id }).await
    }

    pub async fn get_class(
        &self,
        ctx: &AppContext,
        class_id: ClassId,
    ) -> AppResult<ClassDetailDto> {
        self.queries.dispatch(ctx, GetClass { class_id }).await
    }

    pub async fn list_owned_classes(&self, ctx: &AppContext) -> AppResult<Vec<ClassDto>> {
        self.queries.dispatch(ctx, ListOwnedClasses).await
    }

    pub async fn save_secret(&self, ctx: &AppContext, secret: impl Into<String>) -> AppResult<()> {
        self.commands
            .dispatch(
                ctx,
                SaveSecret {
                    secret: secret.into(),
                },
            )
            .await
    }

    pub async fn get_secret(&self, ctx: &AppContext) -> AppResult<String> {
        self.queries.dispatch(ctx, GetSecret).await
    }
}
