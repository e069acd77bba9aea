//! 教师个人密钥
//!
//! 密钥只以调用方自己的 `UserId` 为键存取，调用方无法读写他人的密钥。
//!
use async_trait::async_trait;
use classroom_domain::access::AccessController;
use classroom_domain::error::DomainError;
use std::sync::Arc;
use tracing::info;

use crate::command_handler::CommandHandler;
use crate::commands::SaveSecret;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::ports::SecretStore;
use crate::queries::GetSecret;
use crate::query_handler::QueryHandler;

pub struct CredentialKeeper {
    store: Arc<dyn SecretStore>,
}

impl CredentialKeeper {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler<SaveSecret> for CredentialKeeper {
    async fn handle(&self, ctx: &AppContext, cmd: SaveSecret) -> AppResult<()> {
        let caller = ctx.caller()?;
        AccessController::ensure_teacher(&caller, "store a secret")?;
        if cmd.secret.trim().is_empty() {
            return Err(DomainError::validation("secret must not be empty").into());
        }

        self.store.put(caller.id, cmd.secret).await?;
        info!(user_id = %caller.id, "secret stored");
        Ok(())
    }
}

#[async_trait]
impl QueryHandler<GetSecret> for CredentialKeeper {
    async fn handle(&self, ctx: &AppContext, _q: GetSecret) -> AppResult<String> {
        let caller = ctx.caller()?;
        AccessController::ensure_teacher(&caller, "read a secret")?;
        self.store.get(&caller.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_bus::CommandBus;
    use crate::ports::InMemorySecretStore;
    use crate::query_bus::QueryBus;
    use crate::{InMemoryCommandBus, InMemoryQueryBus};
    use classroom_domain::error::ErrorKind;
    use classroom_domain::identity::User;

    fn buses() -> (InMemoryCommandBus, InMemoryQueryBus) {
        let keeper = Arc::new(CredentialKeeper::new(Arc::new(InMemorySecretStore::new())));
        let commands = InMemoryCommandBus::new();
        commands.register::<SaveSecret, _>(keeper.clone()).unwrap();
        let queries = InMemoryQueryBus::new();
        queries.register::<GetSecret, _>(keeper).unwrap();
        (commands, queries)
    }

    #[tokio::test]
    async fn each_teacher_reads_only_their_own_secret() {
        let (commands, queries) = buses();
        let alice = AppContext::for_caller(User::teacher(1));
        let bob = AppContext::for_caller(User::teacher(2));

        commands
            .dispatch(&alice, SaveSecret { secret: "sk-a".into() })
            .await
            .unwrap();
        assert_eq!(queries.dispatch(&alice, GetSecret).await.unwrap(), "sk-a");

        let err = queries.dispatch(&bob, GetSecret).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn students_and_blank_secrets_are_rejected() {
        let (commands, _) = buses();
        let err = commands
            .dispatch(
                &AppContext::for_caller(User::student(3)),
                SaveSecret { secret: "sk".into() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = commands
            .dispatch(
                &AppContext::for_caller(User::teacher(1)),
                SaveSecret { secret: "  ".into() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
