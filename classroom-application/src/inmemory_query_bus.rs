use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    query::Query,
    query_bus::QueryBus,
    query_handler::QueryHandler,
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

type QueryHandlerFuture<'a> =
    Pin<Box<dyn Future<Output = AppResult<BoxAnySend>> + Send + 'a>>;

type QueryHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> QueryHandlerFuture<'a> + Send + Sync>;

fn erase<F>(f: F) -> QueryHandlerFn
where
    F: for<'a> Fn(BoxAnySend, &'a AppContext) -> QueryHandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 基于内存的 QueryBus 实现
/// - 通过 TypeId 注册不同 Query 对应的 Handler
/// - 以类型擦除方式调度，并在调用端还原为 `Q::Dto`
#[derive(Default)]
pub struct InMemoryQueryBus {
    handlers: DashMap<TypeId, (&'static str, QueryHandlerFn)>,
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册查询处理器；重复注册同一查询返回 `AlreadyRegisteredQuery`
    pub fn register<Q, H>(&self, handler: Arc<H>) -> AppResult<()>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let f = erase(move |boxed_q, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed_q.downcast::<Q>() {
                    Ok(q) => {
                        let dto = handler.handle(ctx, *q).await?;
                        Ok(Box::new(dto) as BoxAnySend)
                    }
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: type_name::<Q>(),
                        found: "unknown",
                    }),
                }
            })
        });

        match self.handlers.entry(TypeId::of::<Q>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredQuery { query: Q::NAME }),
            Entry::Vacant(slot) => {
                slot.insert((Q::NAME, f));
                Ok(())
            }
        }
    }

    /// 已注册的查询名列表（只读视图）
    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q>(&self, ctx: &AppContext, q: Q) -> AppResult<Q::Dto>
    where
        Q: Query,
    {
        let Some(f) = self
            .handlers
            .get(&TypeId::of::<Q>())
            .map(|e| e.value().1.clone())
        else {
            return Err(AppError::HandlerNotFound(Q::NAME));
        };

        debug!(query = Q::NAME, "dispatching query");
        let out = (f)(Box::new(q), ctx).await?;

        match out.downcast::<Q::Dto>() {
            Ok(dto) => Ok(*dto),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<Q::Dto>(),
                found: "unknown",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Dto;
    use serde::Serialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinSet;

    struct CountVisits;

    impl Query for CountVisits {
        const NAME: &'static str = "test.count_visits";
        type Dto = VisitsDto;
    }

    #[derive(Debug, Serialize)]
    struct VisitsDto {
        visits: usize,
    }

    impl Dto for VisitsDto {}

    #[derive(Default)]
    struct VisitCounter {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl QueryHandler<CountVisits> for VisitCounter {
        async fn handle(&self, _ctx: &AppContext, _q: CountVisits) -> AppResult<VisitsDto> {
            Ok(VisitsDto {
                visits: self.seen.fetch_add(1, Ordering::SeqCst) + 1,
            })
        }
    }

    #[tokio::test]
    async fn routes_by_query_type() {
        let bus = InMemoryQueryBus::new();
        bus.register::<CountVisits, _>(Arc::new(VisitCounter::default()))
            .unwrap();

        let ctx = AppContext::default();
        assert_eq!(bus.dispatch(&ctx, CountVisits).await.unwrap().visits, 1);
        assert_eq!(bus.dispatch(&ctx, CountVisits).await.unwrap().visits, 2);
        assert_eq!(bus.registered_queries(), vec!["test.count_visits"]);
    }

    #[tokio::test]
    async fn unknown_query_reports_its_name() {
        let bus = InMemoryQueryBus::new();
        let err = bus
            .dispatch(&AppContext::default(), CountVisits)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("test.count_visits")));
    }

    #[tokio::test]
    async fn second_handler_for_same_query_is_rejected() {
        let bus = InMemoryQueryBus::new();
        bus.register::<CountVisits, _>(Arc::new(VisitCounter::default()))
            .unwrap();
        let err = bus
            .register::<CountVisits, _>(Arc::new(VisitCounter::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyRegisteredQuery {
                query: "test.count_visits"
            }
        ));
    }

    #[tokio::test]
    async fn wrong_dto_type_is_a_type_mismatch() {
        let bus = InMemoryQueryBus::new();
        let f = erase(|_q, _ctx| Box::pin(async move { Ok(Box::new(0u8) as BoxAnySend) }));
        bus.handlers
            .insert(TypeId::of::<CountVisits>(), (CountVisits::NAME, f));

        let err = bus
            .dispatch(&AppContext::default(), CountVisits)
            .await
            .unwrap_err();
        match err {
            AppError::TypeMismatch { expected, .. } => assert!(expected.ends_with("VisitsDto")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_dispatch_sees_every_increment() {
        let bus = Arc::new(InMemoryQueryBus::new());
        bus.register::<CountVisits, _>(Arc::new(VisitCounter::default()))
            .unwrap();

        let mut set = JoinSet::new();
        for _ in 0..64 {
            let bus = bus.clone();
            set.spawn(async move {
                bus.dispatch(&AppContext::default(), CountVisits)
                    .await
                    .map(|dto| dto.visits)
            });
        }

        let mut seen = Vec::new();
        while let Some(res) = set.join_next().await {
            seen.push(res.unwrap().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=64).collect::<Vec<_>>());
    }
}
