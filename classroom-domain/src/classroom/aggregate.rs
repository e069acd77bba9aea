use chrono::Utc;
use classroom_macros::entity;

use super::{ClassId, ClassroomCommand, ClassroomEvent, JoinRequest};
use crate::aggregate::Aggregate;
use crate::entity::Entity;
use crate::error::DomainError;
use crate::access::AccessController;
use crate::identity::{Role, User, UserId};
use crate::value_object::{ClassTitle, Decision, RequestState};

/// 班级聚合根
///
/// - `members` 以班主任开头，其后按同意顺序排列；
/// - `requests` 按提交顺序保存全部申请（含已处理的历史）；
/// - `deleted` 为墓碑标记，删除后不再接受任何命令。
#[entity(id = ClassId)]
pub struct Classroom {
    title: ClassTitle,
    owner_id: UserId,
    members: Vec<UserId>,
    requests: Vec<JoinRequest>,
    deleted: bool,
}

impl Classroom {
    pub fn title(&self) -> &ClassTitle {
        &self.title
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn requests(&self) -> &[JoinRequest] {
        &self.requests
    }

    /// 待处理申请，按提交顺序
    pub fn pending_requests(&self) -> impl Iterator<Item = &JoinRequest> {
        self.requests.iter().filter(|r| r.is_pending())
    }

    pub fn pending_request_of(&self, student_id: UserId) -> Option<&JoinRequest> {
        self.pending_requests().find(|r| r.student_id == student_id)
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// 班主任隐式是成员
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.is_owner(user_id) || self.members.contains(&user_id)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// 已创建且未删除
    pub fn exists(&self) -> bool {
        self.version.is_created() && !self.deleted
    }

    fn ensure_exists(&self) -> Result<(), DomainError> {
        if self.exists() {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("class {} not found", self.id)))
        }
    }
}

impl Aggregate for Classroom {
    const TYPE: &'static str = "classroom";

    type Command = ClassroomCommand;
    type Event = ClassroomEvent;
    type Error = DomainError;

    fn execute(&self, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if !matches!(command, ClassroomCommand::Create { .. }) {
            self.ensure_exists()?;
        }

        match command {
            ClassroomCommand::Create { owner_id, title } => {
                if self.version.is_created() {
                    return Err(DomainError::conflict(format!(
                        "class {} already exists",
                        self.id
                    )));
                }
                Ok(vec![ClassroomEvent::Created { owner_id, title }])
            }
            ClassroomCommand::SubmitRequest {
                request_id,
                student_id,
            } => {
                let applicant = User::new(student_id, Role::Student);
                AccessController::ensure_no_open_membership(self, &applicant)?;
                Ok(vec![ClassroomEvent::RequestSubmitted {
                    request_id,
                    student_id,
                    submitted_at: Utc::now(),
                }])
            }
            ClassroomCommand::Resolve {
                student_id,
                decision,
            } => {
                let Some(pending) = self.pending_request_of(student_id) else {
                    return Err(DomainError::not_found(format!(
                        "no pending request from user {student_id} for class {}",
                        self.id
                    )));
                };
                let request_id = pending.id;
                Ok(vec![match decision {
                    Decision::Accept => ClassroomEvent::RequestAccepted {
                        request_id,
                        student_id,
                    },
                    Decision::Reject => ClassroomEvent::RequestRejected {
                        request_id,
                        student_id,
                    },
                }])
            }
            ClassroomCommand::Rename { title } => Ok(vec![ClassroomEvent::Renamed { title }]),
            ClassroomCommand::Delete => Ok(vec![ClassroomEvent::Deleted]),
        }
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ClassroomEvent::Created { owner_id, title } => {
                self.owner_id = *owner_id;
                self.title = title.clone();
                self.members = vec![*owner_id];
            }
            ClassroomEvent::RequestSubmitted {
                request_id,
                student_id,
                submitted_at,
            } => {
                self.requests.push(JoinRequest {
                    id: *request_id,
                    student_id: *student_id,
                    state: RequestState::Pending,
                    submitted_at: *submitted_at,
                });
            }
            ClassroomEvent::RequestAccepted {
                request_id,
                student_id,
            } => {
                self.transition(*request_id, RequestState::Accepted);
                if !self.members.contains(student_id) {
                    self.members.push(*student_id);
                }
            }
            ClassroomEvent::RequestRejected { request_id, .. } => {
                self.transition(*request_id, RequestState::Rejected);
            }
            ClassroomEvent::Renamed { title } => {
                self.title = title.clone();
            }
            ClassroomEvent::Deleted => {
                self.deleted = true;
                self.members.clear();
                self.requests.clear();
            }
        }
        self.version = self.version.next();
    }
}

impl Classroom {
    fn transition(&mut self, request_id: super::RequestId, state: RequestState) {
        if let Some(request) = self.requests.iter_mut().find(|r| r.id == request_id) {
            request.state = state;
        }
    }

    /// 从事件序列重建聚合
    pub fn replay<'a>(id: ClassId, events: impl IntoIterator<Item = &'a ClassroomEvent>) -> Self {
        let mut classroom = <Self as Entity>::new(id, Default::default());
        for event in events {
            classroom.apply(event);
        }
        classroom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classroom::RequestId;
    use crate::value_object::DEFAULT_MAX_TITLE_LEN;

    const OWNER: UserId = UserId::new(1);
    const STUDENT: UserId = UserId::new(2);

    fn run(classroom: &mut Classroom, command: ClassroomCommand) -> Vec<ClassroomEvent> {
        let events = classroom.execute(command).unwrap();
        for e in &events {
            classroom.apply(e);
        }
        events
    }

    fn physics() -> Classroom {
        let mut c = <Classroom as Entity>::new(ClassId::new(1), Default::default());
        run(
            &mut c,
            ClassroomCommand::Create {
                owner_id: OWNER,
                title: ClassTitle::parse("Physics", DEFAULT_MAX_TITLE_LEN).unwrap(),
            },
        );
        c
    }

    fn submit(c: &mut Classroom, request_id: u64) {
        run(
            c,
            ClassroomCommand::SubmitRequest {
                request_id: RequestId::new(request_id),
                student_id: STUDENT,
            },
        );
    }

    #[test]
    fn create_makes_owner_implicit_member() {
        let c = physics();
        assert!(c.exists());
        assert_eq!(c.version().value(), 1);
        assert_eq!(c.title().as_str(), "Physics");
        assert!(c.is_owner(OWNER));
        assert!(c.is_member(OWNER));
        assert_eq!(c.members(), &[OWNER]);
        assert!(c.requests().is_empty());
    }

    #[test]
    fn create_twice_conflicts() {
        let c = physics();
        let err = c
            .execute(ClassroomCommand::Create {
                owner_id: OWNER,
                title: ClassTitle::parse("Again", DEFAULT_MAX_TITLE_LEN).unwrap(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[test]
    fn commands_on_missing_class_are_not_found() {
        let c = <Classroom as Entity>::new(ClassId::new(9), Default::default());
        let err = c.execute(ClassroomCommand::Delete).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn duplicate_pending_request_conflicts() {
        let mut c = physics();
        submit(&mut c, 1);
        let err = c
            .execute(ClassroomCommand::SubmitRequest {
                request_id: RequestId::new(2),
                student_id: STUDENT,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(c.pending_requests().count(), 1);
    }

    #[test]
    fn accept_transitions_request_and_adds_member_in_one_event() {
        let mut c = physics();
        submit(&mut c, 1);
        let events = run(
            &mut c,
            ClassroomCommand::Resolve {
                student_id: STUDENT,
                decision: Decision::Accept,
            },
        );
        assert_eq!(events.len(), 1);
        assert_eq!(c.requests()[0].state, RequestState::Accepted);
        assert!(c.is_member(STUDENT));
        assert_eq!(c.members(), &[OWNER, STUDENT]);
    }

    #[test]
    fn second_resolution_is_not_found() {
        let mut c = physics();
        submit(&mut c, 1);
        run(
            &mut c,
            ClassroomCommand::Resolve {
                student_id: STUDENT,
                decision: Decision::Accept,
            },
        );
        for decision in [Decision::Accept, Decision::Reject] {
            let err = c
                .execute(ClassroomCommand::Resolve {
                    student_id: STUDENT,
                    decision,
                })
                .unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
        }
        assert_eq!(c.members().iter().filter(|m| **m == STUDENT).count(), 1);
    }

    #[test]
    fn member_cannot_request_again() {
        let mut c = physics();
        submit(&mut c, 1);
        run(
            &mut c,
            ClassroomCommand::Resolve {
                student_id: STUDENT,
                decision: Decision::Accept,
            },
        );
        let err = c
            .execute(ClassroomCommand::SubmitRequest {
                request_id: RequestId::new(2),
                student_id: STUDENT,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[test]
    fn rejected_request_allows_fresh_submission() {
        let mut c = physics();
        submit(&mut c, 1);
        run(
            &mut c,
            ClassroomCommand::Resolve {
                student_id: STUDENT,
                decision: Decision::Reject,
            },
        );
        assert!(!c.is_member(STUDENT));
        submit(&mut c, 2);

        let states: Vec<_> = c.requests().iter().map(|r| (r.id, r.state)).collect();
        assert_eq!(
            states,
            vec![
                (RequestId::new(1), RequestState::Rejected),
                (RequestId::new(2), RequestState::Pending),
            ]
        );
    }

    #[test]
    fn owner_cannot_request_to_join_own_class() {
        let c = physics();
        let err = c
            .execute(ClassroomCommand::SubmitRequest {
                request_id: RequestId::new(1),
                student_id: OWNER,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[test]
    fn delete_cascades_and_blocks_further_commands() {
        let mut c = physics();
        submit(&mut c, 1);
        run(&mut c, ClassroomCommand::Delete);
        assert!(c.is_deleted());
        assert!(!c.exists());
        assert!(c.members().is_empty());
        assert!(c.requests().is_empty());

        let err = c
            .execute(ClassroomCommand::Resolve {
                student_id: STUDENT,
                decision: Decision::Accept,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn replay_rebuilds_same_state() {
        let mut c = physics();
        let mut log = vec![ClassroomEvent::Created {
            owner_id: OWNER,
            title: c.title().clone(),
        }];
        log.extend(run(
            &mut c,
            ClassroomCommand::SubmitRequest {
                request_id: RequestId::new(1),
                student_id: STUDENT,
            },
        ));
        log.extend(run(
            &mut c,
            ClassroomCommand::Rename {
                title: ClassTitle::parse("Physics II", DEFAULT_MAX_TITLE_LEN).unwrap(),
            },
        ));

        let rebuilt = Classroom::replay(ClassId::new(1), &log);
        assert_eq!(rebuilt.version(), c.version());
        assert_eq!(rebuilt.title(), c.title());
        assert_eq!(rebuilt.requests(), c.requests());
    }
}
