//! 成员关系登记处（MembershipRegistry）
//!
//! 班级、成员与加入申请的唯一写入口。每个写操作都遵循同一流程：
//! 取得该班级的互斥锁 → 加载聚合 → 权限判定 → 执行命令 → 应用事件 → 原子保存。
//! 因此同一班级上的并发写被完全串行化：重复申请只会产生一条待处理申请，
//! 重复处理只会有一次成功，删除与其他写操作不会交错。
//!
//! 错误判定顺序：班级不存在（`NotFound`）→ 权限（`Forbidden`）→ 状态（`Conflict`/`NotFound`）
//! → 输入校验（`Validation`，改名时标题在权限之后校验）。
//!
//! 读操作不取班级锁，直接读取仓储提供的一致快照。
//!
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument};

use crate::access::AccessController;
use crate::aggregate::Aggregate;
use crate::classroom::{ClassId, Classroom, ClassroomCommand, JoinRequest, RequestId};
use crate::domain_event::BusinessContext;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::identity::{User, UserId};
use crate::persist::ClassroomRepository;
use crate::value_object::{ClassTitle, DEFAULT_MAX_TITLE_LEN, Decision, Version};

/// 成员关系登记处
pub struct MembershipRegistry {
    repo: Arc<dyn ClassroomRepository>,
    locks: DashMap<ClassId, Arc<Mutex<()>>>,
    max_title_len: usize,
}

impl MembershipRegistry {
    pub fn new(repo: Arc<dyn ClassroomRepository>) -> Self {
        Self::with_max_title_len(repo, DEFAULT_MAX_TITLE_LEN)
    }

    pub fn with_max_title_len(repo: Arc<dyn ClassroomRepository>, max_title_len: usize) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
            max_title_len,
        }
    }

    pub fn max_title_len(&self) -> usize {
        self.max_title_len
    }

    /// 创建班级；班主任隐式成为成员。角色门槛由调用方（`ClassLifecycle`）负责。
    #[instrument(skip(self, title, context), fields(owner_id = %owner_id))]
    pub async fn create_class(
        &self,
        owner_id: UserId,
        title: &str,
        context: BusinessContext,
    ) -> DomainResult<ClassId> {
        let title = ClassTitle::parse(title, self.max_title_len)?;
        let class_id = self.repo.next_class_id().await?;

        let classroom = <Classroom as Entity>::new(class_id, Version::new());
        self.commit(classroom, ClassroomCommand::Create { owner_id, title }, context)
            .await?;

        info!(%class_id, "class created");
        Ok(class_id)
    }

    /// 学生提交加入申请
    #[instrument(skip(self, context), fields(class_id = %class_id, student_id = %student.id))]
    pub async fn submit_request(
        &self,
        class_id: &ClassId,
        student: &User,
        context: BusinessContext,
    ) -> DomainResult<RequestId> {
        let _held = self.lock(class_id).await;

        let classroom = self.get_class(class_id).await?;
        AccessController::ensure_can_submit_join_request(&classroom, student)?;

        let request_id = self.repo.next_request_id().await?;
        let command = ClassroomCommand::SubmitRequest {
            request_id,
            student_id: student.id,
        };
        self.commit(classroom, command, context).await?;

        info!(%request_id, "join request submitted");
        Ok(request_id)
    }

    /// 某班级的待处理申请，按提交顺序；仅班主任可查看
    pub async fn list_pending(
        &self,
        class_id: &ClassId,
        caller: &User,
    ) -> DomainResult<Vec<JoinRequest>> {
        let classroom = self.get_class(class_id).await?;
        AccessController::ensure_can_manage_requests(&classroom, caller)?;
        Ok(classroom.pending_requests().cloned().collect())
    }

    /// 处理待处理申请。同意时申请状态与成员关系由同一事件原子生效；
    /// 对已处理的申请再次调用返回 `NotFound`。
    #[instrument(
        skip(self, caller, context),
        fields(class_id = %class_id, student_id = %student_id, decision = %decision)
    )]
    pub async fn resolve(
        &self,
        class_id: &ClassId,
        student_id: UserId,
        decision: Decision,
        caller: &User,
        context: BusinessContext,
    ) -> DomainResult<()> {
        let _held = self.lock(class_id).await;

        let classroom = self.get_class(class_id).await?;
        AccessController::ensure_can_manage_requests(&classroom, caller)?;

        let command = ClassroomCommand::Resolve {
            student_id,
            decision,
        };
        self.commit(classroom, command, context).await?;

        info!("join request resolved");
        Ok(())
    }

    /// 修改标题；`guard` 在班级锁内、加载之后执行，用于权限判定
    #[instrument(skip(self, title, context, guard), fields(class_id = %class_id))]
    pub async fn rename_class<G>(
        &self,
        class_id: &ClassId,
        title: &str,
        context: BusinessContext,
        guard: G,
    ) -> DomainResult<()>
    where
        G: FnOnce(&Classroom) -> DomainResult<()> + Send,
    {
        let _held = self.lock(class_id).await;

        let classroom = self.get_class(class_id).await?;
        guard(&classroom)?;

        let title = ClassTitle::parse(title, self.max_title_len)?;
        self.commit(classroom, ClassroomCommand::Rename { title }, context)
            .await?;

        info!("class renamed");
        Ok(())
    }

    /// 删除班级并级联清除全部成员关系与申请。
    ///
    /// `guard` 在班级锁内、加载之后执行：权限判定与删除确认都应放在这里，
    /// 以保证判定所依据的状态就是被删除的状态。
    #[instrument(skip(self, context, guard), fields(class_id = %class_id))]
    pub async fn delete_class<G>(
        &self,
        class_id: &ClassId,
        context: BusinessContext,
        guard: G,
    ) -> DomainResult<()>
    where
        G: FnOnce(&Classroom) -> DomainResult<()> + Send,
    {
        {
            let _held = self.lock(class_id).await;

            let classroom = self.get_class(class_id).await?;
            guard(&classroom)?;
            self.commit(classroom, ClassroomCommand::Delete, context)
                .await?;
        }

        self.locks.remove(class_id);
        info!("class deleted");
        Ok(())
    }

    /// 读取班级快照；不存在或已删除时返回 `NotFound`
    pub async fn get_class(&self, class_id: &ClassId) -> DomainResult<Classroom> {
        self.repo
            .load(class_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("class {class_id} not found")))
    }

    /// 成员列表（班主任在首位）；仅班主任可查看
    pub async fn list_members(
        &self,
        class_id: &ClassId,
        caller: &User,
    ) -> DomainResult<Vec<UserId>> {
        let classroom = self.get_class(class_id).await?;
        AccessController::ensure_can_manage_requests(&classroom, caller)?;
        Ok(classroom.members().to_vec())
    }

    /// 某位教师拥有的班级
    pub async fn classes_owned_by(&self, owner_id: &UserId) -> DomainResult<Vec<Classroom>> {
        self.repo.list_by_owner(owner_id).await
    }

    async fn lock(&self, class_id: &ClassId) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(*class_id).or_default().clone();
        lock.lock_owned().await
    }

    async fn commit(
        &self,
        mut classroom: Classroom,
        command: ClassroomCommand,
        context: BusinessContext,
    ) -> DomainResult<Classroom> {
        let events = classroom.execute(command)?;
        for event in &events {
            classroom.apply(event);
        }
        self.repo.save(&classroom, events, context).await?;
        Ok(classroom)
    }
}
