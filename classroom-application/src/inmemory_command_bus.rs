use crate::{
    command::Command,
    command_bus::CommandBus,
    command_handler::CommandHandler,
    context::AppContext,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

type BoxAnySend = Box<dyn Any + Send>;

type CmdHandlerFuture<'a> = Pin<Box<dyn Future<Output = AppResult<BoxAnySend>> + Send + 'a>>;

type CmdHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> CmdHandlerFuture<'a> + Send + Sync>;

fn erase<F>(f: F) -> CmdHandlerFn
where
    F: for<'a> Fn(BoxAnySend, &'a AppContext) -> CmdHandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 注册不同 Command 对应的 Handler，每种命令只允许一个处理器
/// - 运行时以类型擦除（Any）方式进行调度，并在调用端还原结果类型
#[derive(Default)]
pub struct InMemoryCommandBus {
    handlers: DashMap<TypeId, (&'static str, CmdHandlerFn)>,
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器；重复注册同一命令返回 `AlreadyRegisteredCommand`
    pub fn register<C, H>(&self, handler: Arc<H>) -> AppResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f = erase(move |boxed_cmd, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包同一泛型 C，正常情况下 downcast 不会失败
                match boxed_cmd.downcast::<C>() {
                    Ok(cmd) => {
                        let out = handler.handle(ctx, *cmd).await?;
                        Ok(Box::new(out) as BoxAnySend)
                    }
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: C::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        match self.handlers.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredCommand { command: C::NAME }),
            Entry::Vacant(slot) => {
                slot.insert((C::NAME, f));
                Ok(())
            }
        }
    }

    /// 已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> AppResult<C::Output>
    where
        C: Command,
    {
        let Some(f) = self
            .handlers
            .get(&TypeId::of::<C>())
            .map(|e| e.value().1.clone())
        else {
            return Err(AppError::HandlerNotFound(C::NAME));
        };

        debug!(command = C::NAME, "dispatching command");
        let out = (f)(Box::new(cmd), ctx).await?;

        match out.downcast::<C::Output>() {
            Ok(out) => Ok(*out),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<C::Output>(),
                found: "unknown",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinSet;

    struct Bump;

    impl Command for Bump {
        const NAME: &'static str = "test.bump";
        type Output = usize;
    }

    struct BumpHandler {
        counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler<Bump> for BumpHandler {
        async fn handle(&self, _ctx: &AppContext, _cmd: Bump) -> AppResult<usize> {
            Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn bump_handler() -> Arc<BumpHandler> {
        Arc::new(BumpHandler {
            counter: Arc::new(AtomicUsize::new(0)),
        })
    }

    #[tokio::test]
    async fn register_and_dispatch_works() {
        let bus = InMemoryCommandBus::new();
        bus.register::<Bump, _>(bump_handler()).unwrap();

        let ctx = AppContext::default();
        assert_eq!(bus.dispatch(&ctx, Bump).await.unwrap(), 1);
        assert_eq!(bus.dispatch(&ctx, Bump).await.unwrap(), 2);
        assert_eq!(bus.registered_commands(), vec!["test.bump"]);
    }

    #[tokio::test]
    async fn unregistered_command_is_handler_not_found() {
        let bus = InMemoryCommandBus::new();
        let err = bus.dispatch(&AppContext::default(), Bump).await.unwrap_err();
        match err {
            AppError::HandlerNotFound(name) => assert_eq!(name, "test.bump"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let bus = InMemoryCommandBus::new();
        bus.register::<Bump, _>(bump_handler()).unwrap();
        let err = bus.register::<Bump, _>(bump_handler()).unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyRegisteredCommand { command: "test.bump" }
        ));
    }

    #[tokio::test]
    async fn type_mismatch_when_output_downcast_fails() {
        let bus = InMemoryCommandBus::new();
        // 手动插入一个错误的条目：键是 Bump，但闭包返回 String 而非 usize
        let f = erase(|_boxed, _ctx| {
            Box::pin(async move { Ok(Box::new(String::from("oops")) as BoxAnySend) })
        });
        bus.handlers.insert(TypeId::of::<Bump>(), (Bump::NAME, f));

        let err = bus.dispatch(&AppContext::default(), Bump).await.unwrap_err();
        match err {
            AppError::TypeMismatch { expected, .. } => assert_eq!(expected, "usize"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_dispatch_is_safe() {
        let bus = Arc::new(InMemoryCommandBus::new());
        bus.register::<Bump, _>(bump_handler()).unwrap();

        let mut set = JoinSet::new();
        for _ in 0..50 {
            let bus = bus.clone();
            set.spawn(async move { bus.dispatch(&AppContext::default(), Bump).await.unwrap() });
        }
        let mut results = Vec::new();
        while let Some(res) = set.join_next().await {
            results.push(res.unwrap());
        }
        results.sort_unstable();
        assert_eq!(results, (1..=50).collect::<Vec<_>>());
    }
}
