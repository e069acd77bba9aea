/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，会修改领域状态。
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用；
/// - 命名保持“动宾结构”，如 `CreateClass`、`ResolveRequest`。
///
/// 关联项：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`；
/// - `Output`：执行成功后返回给调用方的最小结果（如新建实体的标识）。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 执行结果
    type Output: Send + 'static;
}
