//! 加入申请与成员视图
use async_trait::async_trait;
use classroom_domain::classroom::RequestId;
use classroom_domain::identity::UserId;
use classroom_domain::registry::MembershipRegistry;
use std::sync::Arc;

use crate::command_handler::CommandHandler;
use crate::commands::{ResolveRequest, SubmitJoinRequest};
use crate::context::AppContext;
use crate::dto::{ClassDetailDto, JoinRequestDto};
use crate::error::AppResult;
use crate::queries::{GetClass, ListMembers, ListPendingRequests};
use crate::query_handler::QueryHandler;

/// 把成员关系用例路由到 `MembershipRegistry`
pub struct MembershipDesk {
    registry: Arc<MembershipRegistry>,
}

impl MembershipDesk {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl CommandHandler<SubmitJoinRequest> for MembershipDesk {
    async fn handle(&self, ctx: &AppContext, cmd: SubmitJoinRequest) -> AppResult<RequestId> {
        let caller = ctx.caller()?;
        let request_id = self
            .registry
            .submit_request(&cmd.class_id, &caller, ctx.biz.clone())
            .await?;
        Ok(request_id)
    }
}

#[async_trait]
impl CommandHandler<ResolveRequest> for MembershipDesk {
    async fn handle(&self, ctx: &AppContext, cmd: ResolveRequest) -> AppResult<()> {
        let caller = ctx.caller()?;
        self.registry
            .resolve(
                &cmd.class_id,
                cmd.student_id,
                cmd.decision,
                &caller,
                ctx.biz.clone(),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl QueryHandler<ListPendingRequests> for MembershipDesk {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: ListPendingRequests,
    ) -> AppResult<Vec<JoinRequestDto>> {
        let caller = ctx.caller()?;
        let pending = self.registry.list_pending(&q.class_id, &caller).await?;
        Ok(pending
            .iter()
            .map(|r| JoinRequestDto::new(q.class_id, r))
            .collect())
    }
}

#[async_trait]
impl QueryHandler<ListMembers> for MembershipDesk {
    async fn handle(&self, ctx: &AppContext, q: ListMembers) -> AppResult<Vec<UserId>> {
        let caller = ctx.caller()?;
        Ok(self.registry.list_members(&q.class_id, &caller).await?)
    }
}

#[async_trait]
impl QueryHandler<GetClass> for MembershipDesk {
    async fn handle(&self, ctx: &AppContext, q: GetClass) -> AppResult<ClassDetailDto> {
        let caller = ctx.caller()?;
        let classroom = self.registry.get_class(&q.class_id).await?;
        Ok(ClassDetailDto::for_caller(&classroom, &caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_bus::CommandBus;
    use crate::dto::ClassRelation;
    use crate::query_bus::QueryBus;
    use crate::{InMemoryCommandBus, InMemoryQueryBus};
    use classroom_domain::classroom::ClassId;
    use classroom_domain::domain_event::BusinessContext;
    use classroom_domain::error::ErrorKind;
    use classroom_domain::identity::User;
    use classroom_domain::persist::InMemoryClassroomRepository;
    use classroom_domain::value_object::{Decision, RequestState};

    const TEACHER: User = User::teacher(1);
    const ALICE: User = User::student(2);
    const BOB: User = User::student(3);

    struct Fixture {
        commands: InMemoryCommandBus,
        queries: InMemoryQueryBus,
        class_id: ClassId,
    }

    impl Fixture {
        async fn new() -> Self {
            let repo = Arc::new(InMemoryClassroomRepository::new());
            let registry = Arc::new(MembershipRegistry::new(repo));
            let class_id = registry
                .create_class(TEACHER.id, "Physics", BusinessContext::default())
                .await
                .unwrap();

            let desk = Arc::new(MembershipDesk::new(registry));
            let commands = InMemoryCommandBus::new();
            commands.register::<SubmitJoinRequest, _>(desk.clone()).unwrap();
            commands.register::<ResolveRequest, _>(desk.clone()).unwrap();
            let queries = InMemoryQueryBus::new();
            queries.register::<ListPendingRequests, _>(desk.clone()).unwrap();
            queries.register::<ListMembers, _>(desk.clone()).unwrap();
            queries.register::<GetClass, _>(desk).unwrap();

            Self {
                commands,
                queries,
                class_id,
            }
        }

        async fn relation(&self, user: User) -> ClassRelation {
            self.queries
                .dispatch(
                    &AppContext::for_caller(user),
                    GetClass {
                        class_id: self.class_id,
                    },
                )
                .await
                .unwrap()
                .relation
        }
    }

    #[tokio::test]
    async fn anonymous_callers_are_rejected() {
        let f = Fixture::new().await;
        let err = f
            .commands
            .dispatch(
                &AppContext::default(),
                SubmitJoinRequest {
                    class_id: f.class_id,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn pending_requests_carry_class_and_state() {
        let f = Fixture::new().await;
        let class_id = f.class_id;
        let request_id = f
            .commands
            .dispatch(&AppContext::for_caller(ALICE), SubmitJoinRequest { class_id })
            .await
            .unwrap();

        let pending = f
            .queries
            .dispatch(&AppContext::for_caller(TEACHER), ListPendingRequests { class_id })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, request_id);
        assert_eq!(pending[0].class_id, class_id);
        assert_eq!(pending[0].student_id, ALICE.id);
        assert_eq!(pending[0].state, RequestState::Pending);

        let err = f
            .queries
            .dispatch(&AppContext::for_caller(ALICE), ListPendingRequests { class_id })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn relation_follows_request_lifecycle() {
        let f = Fixture::new().await;
        let class_id = f.class_id;

        assert_eq!(f.relation(TEACHER).await, ClassRelation::Owner);
        assert_eq!(f.relation(ALICE).await, ClassRelation::Outsider);

        f.commands
            .dispatch(&AppContext::for_caller(ALICE), SubmitJoinRequest { class_id })
            .await
            .unwrap();
        assert_eq!(f.relation(ALICE).await, ClassRelation::Pending);

        f.commands
            .dispatch(
                &AppContext::for_caller(TEACHER),
                ResolveRequest {
                    class_id,
                    student_id: ALICE.id,
                    decision: Decision::Accept,
                },
            )
            .await
            .unwrap();
        assert_eq!(f.relation(ALICE).await, ClassRelation::Member);
        assert_eq!(f.relation(BOB).await, ClassRelation::Outsider);

        let members = f
            .queries
            .dispatch(&AppContext::for_caller(TEACHER), ListMembers { class_id })
            .await
            .unwrap();
        assert_eq!(members, vec![TEACHER.id, ALICE.id]);

        let detail = f
            .queries
            .dispatch(&AppContext::for_caller(BOB), GetClass { class_id })
            .await
            .unwrap();
        assert_eq!(detail.member_count, 2);
        assert_eq!(detail.class.title, "Physics");
    }

    #[tokio::test]
    async fn missing_class_is_not_found() {
        let f = Fixture::new().await;
        let err = f
            .queries
            .dispatch(
                &AppContext::for_caller(BOB),
                GetClass {
                    class_id: ClassId::new(99),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
