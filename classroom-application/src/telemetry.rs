//! 日志初始化
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

/// 安装全局 tracing 订阅者。
///
/// `RUST_LOG` 存在时优先于 `config.level`；全局订阅者只能安装一次，重复调用返回 `AppError::Config`。
pub fn init_logging(config: &LogConfig) -> AppResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::Config(format!("invalid log level {:?}: {e}", config.level)))?,
    };

    let fmt_layer = fmt::layer().with_target(config.with_target);

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    installed.map_err(|e| AppError::Config(format!("failed to install subscriber: {e}")))
}
