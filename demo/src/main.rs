use classroom_application::ClassroomService;
use classroom_application::config::AppConfig;
use classroom_application::ports::{
    InMemoryContentService, InMemoryIdentityProvider, InMemorySecretStore,
};
use classroom_application::telemetry::init_logging;
use classroom_domain::identity::User;
use classroom_domain::persist::InMemoryClassroomRepository;
use classroom_domain::value_object::Decision;
use std::sync::Arc;
use tracing::{info, warn};

const TEACHER: User = User::teacher(1);
const STUDENT: User = User::student(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.log)?;

    let identity = Arc::new(InMemoryIdentityProvider::new());
    identity.issue("teacher-token", TEACHER);
    identity.issue("student-token", STUDENT);
    let content = Arc::new(InMemoryContentService::new());

    let service = ClassroomService::builder()
        .repository(Arc::new(InMemoryClassroomRepository::new()))
        .identity(identity)
        .content(content.clone())
        .secrets(Arc::new(InMemorySecretStore::new()))
        .config(config.classroom)
        .build()?;

    let teacher = service.authenticate("teacher-token").await?;
    let student = service.authenticate("student-token").await?;

    let class_id = service.create_class(&teacher, "Physics").await?;
    content.publish(class_id, "Kinematics quiz").await;
    info!(%class_id, "teacher created Physics");

    if let Err(e) = service.list_visible_tests(&student, class_id).await {
        warn!(kind = ?e.kind(), "outsider cannot see tests yet: {e}");
    }

    service.submit_join_request(&student, class_id).await?;
    if let Err(e) = service.submit_join_request(&student, class_id).await {
        warn!(kind = ?e.kind(), "second request rejected: {e}");
    }

    for request in service.list_pending_requests(&teacher, class_id).await? {
        info!(request = %serde_json::to_string(&request)?, "pending");
    }

    service
        .resolve_request(&teacher, class_id, STUDENT.id, Decision::Accept)
        .await?;

    let tests = service.list_visible_tests(&student, class_id).await?;
    info!(count = tests.len(), "member sees tests");

    let detail = service.get_class(&student, class_id).await?;
    info!(detail = %serde_json::to_string(&detail)?, "student view");

    if let Err(e) = service.delete_class(&student, class_id, "Physics").await {
        warn!(kind = ?e.kind(), "student cannot delete: {e}");
    }
    service.delete_class(&teacher, class_id, "Physics").await?;

    if let Err(e) = service.get_class(&teacher, class_id).await {
        info!(kind = ?e.kind(), "class is gone: {e}");
    }

    Ok(())
}
