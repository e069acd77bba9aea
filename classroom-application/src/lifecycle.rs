//! 班级生命周期（ClassLifecycle）
//!
//! 编排班级的创建、改名与删除：先经 `AccessController` 判定，再交由
//! `MembershipRegistry` 落地状态变化（删除时级联清除成员与申请）。
//!
use async_trait::async_trait;
use classroom_domain::access::AccessController;
use classroom_domain::classroom::ClassId;
use classroom_domain::error::DomainError;
use classroom_domain::identity::User;
use classroom_domain::registry::MembershipRegistry;
use std::sync::Arc;
use tracing::info;

use crate::command_handler::CommandHandler;
use crate::commands::{CreateClass, DeleteClass, RenameClass};
use crate::context::AppContext;
use crate::dto::ClassDto;
use crate::error::AppResult;
use crate::queries::ListOwnedClasses;
use crate::query_handler::QueryHandler;

pub struct ClassLifecycle {
    registry: Arc<MembershipRegistry>,
}

impl ClassLifecycle {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    /// 只有教师可以创建班级
    pub async fn create(&self, ctx: &AppContext, user: &User, title: &str) -> AppResult<ClassId> {
        AccessController::ensure_can_create_class(user)?;
        let class_id = self
            .registry
            .create_class(user.id, title, ctx.biz.clone())
            .await?;
        Ok(class_id)
    }

    /// 只有班主任可以改名；无权限时先报告 `Forbidden`，再校验新标题
    pub async fn rename(
        &self,
        ctx: &AppContext,
        user: &User,
        class_id: &ClassId,
        title: &str,
    ) -> AppResult<()> {
        self.registry
            .rename_class(class_id, title, ctx.biz.clone(), |classroom| {
                AccessController::ensure_can_rename_class(classroom, user)
            })
            .await?;
        Ok(())
    }

    /// 删除班级。
    ///
    /// 授权判定在确认文本比对之前：非班主任无论提供什么确认文本都只会得到 `Forbidden`，
    /// 确认文本与标题不完全一致（区分大小写、不去除空白）时得到 `Validation`。
    pub async fn delete(
        &self,
        ctx: &AppContext,
        user: &User,
        class_id: &ClassId,
        confirmation: &str,
    ) -> AppResult<()> {
        self.registry
            .delete_class(class_id, ctx.biz.clone(), |classroom| {
                AccessController::ensure_can_delete_class(classroom, user)?;
                if !classroom.title().confirms(confirmation) {
                    return Err(DomainError::validation(
                        "confirmation text does not match the class title",
                    ));
                }
                Ok(())
            })
            .await?;

        info!(%class_id, user_id = %user.id, "class deleted by owner");
        Ok(())
    }

    /// 教师自己创建的班级，按班级标识排序
    pub async fn owned_by(&self, user: &User) -> AppResult<Vec<ClassDto>> {
        AccessController::ensure_teacher(user, "list owned classes")?;
        let classes = self.registry.classes_owned_by(&user.id).await?;
        Ok(classes.iter().map(ClassDto::from).collect())
    }
}

#[async_trait]
impl CommandHandler<CreateClass> for ClassLifecycle {
    async fn handle(&self, ctx: &AppContext, cmd: CreateClass) -> AppResult<ClassId> {
        let caller = ctx.caller()?;
        self.create(ctx, &caller, &cmd.title).await
    }
}

#[async_trait]
impl CommandHandler<RenameClass> for ClassLifecycle {
    async fn handle(&self, ctx: &AppContext, cmd: RenameClass) -> AppResult<()> {
        let caller = ctx.caller()?;
        self.rename(ctx, &caller, &cmd.class_id, &cmd.title).await
    }
}

#[async_trait]
impl CommandHandler<DeleteClass> for ClassLifecycle {
    async fn handle(&self, ctx: &AppContext, cmd: DeleteClass) -> AppResult<()> {
        let caller = ctx.caller()?;
        self.delete(ctx, &caller, &cmd.class_id, &cmd.confirmation).await
    }
}

#[async_trait]
impl QueryHandler<ListOwnedClasses> for ClassLifecycle {
    async fn handle(&self, ctx: &AppContext, _q: ListOwnedClasses) -> AppResult<Vec<ClassDto>> {
        let caller = ctx.caller()?;
        self.owned_by(&caller).await
    }
}
