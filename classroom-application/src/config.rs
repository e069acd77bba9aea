//! 配置管理
//!
//! 默认值 → 可选配置文件 → 环境变量（前缀 `CLASSROOM_`，层级分隔符 `__`），后者覆盖前者。
//! 例如 `CLASSROOM_LOG__LEVEL=debug`、`CLASSROOM_CLASSROOM__MAX_TITLE_LEN=120`。
//!
use classroom_domain::value_object::DEFAULT_MAX_TITLE_LEN;
use serde::Deserialize;
use std::path::Path;

use crate::error::AppResult;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 班级规则
    #[serde(default)]
    pub classroom: ClassroomConfig,

    /// 日志
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassroomConfig {
    /// 班级标题的最大字符数
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            max_title_len: default_max_title_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别或过滤指令（`RUST_LOG` 优先）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 输出 JSON 格式
    #[serde(default)]
    pub json: bool,

    /// 输出事件的 target
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            with_target: default_with_target(),
        }
    }
}

fn default_max_title_len() -> usize {
    DEFAULT_MAX_TITLE_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}

const ENV_PREFIX: &str = "CLASSROOM";

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// 从环境变量加载
    pub fn load() -> AppResult<Self> {
        let config = ::config::Config::builder()
            .add_source(environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 从配置文件加载（格式按扩展名识别），环境变量仍可覆盖
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.classroom.max_title_len, 200);
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
        assert!(config.log.with_target);
    }

    #[test]
    fn file_overrides_defaults_and_keeps_the_rest() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classroom]\nmax_title_len = 40\n\n[log]\njson = true").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.classroom.max_title_len, 40);
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
        assert!(config.log.with_target);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
