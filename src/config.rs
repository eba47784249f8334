//! 配置加载
//!
//! YAML 文件，所有字段都有默认值：
//! ```yaml
//! memory:
//!   default_namespace: temp
//! shell:
//!   prompt: "turn-state> "
//!   history_file: ~/.turn-state/history.txt
//!   log_filter: turn_state=info
//! ```
//! 环境变量（支持 `.env`）`TURN_STATE_DEFAULT_NAMESPACE` 覆盖 `memory.default_namespace`。

use crate::error::{ConfigError, Result};
use crate::memory::DEFAULT_NAMESPACE;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 覆盖默认命名空间的环境变量
pub const NAMESPACE_ENV: &str = "TURN_STATE_DEFAULT_NAMESPACE";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

/// 记忆存储配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MemoryConfig {
    /// 单段路径改写时使用的顶层命名空间，必须是不含 `.` 的非空单段
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
}

/// 交互式 shell 配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShellConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// 历史记录文件，`None` 表示不保存
    #[serde(default = "default_history_file")]
    pub history_file: Option<String>,
    /// `RUST_LOG` 未设置时使用的日志过滤规则
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_prompt() -> String {
    "turn-state> ".to_string()
}

fn default_history_file() -> Option<String> {
    Some("~/.turn-state/history.txt".to_string())
}

fn default_log_filter() -> String {
    "turn_state=info".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history_file: default_history_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<()> {
        let ns = &self.default_namespace;
        if ns.is_empty() || ns.contains('.') {
            return Err(ConfigError::InvalidValue {
                field: "memory.default_namespace".to_string(),
                message: format!("'{}' must be a single non-empty segment", ns),
            }
            .into());
        }
        Ok(())
    }
}

impl Config {
    /// 读取 YAML 配置文件，再应用环境变量覆盖并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.with_env_overrides()
    }

    /// 仅解析与校验，不读取环境变量
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.memory.validate()?;
        Ok(config)
    }

    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Result<Self> {
        Config::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Result<Self> {
        dotenv().ok();
        self.with_namespace_override(std::env::var(NAMESPACE_ENV).ok())
    }

    /// 覆盖默认命名空间（`None` 时保持不变）并校验
    pub fn with_namespace_override(mut self, namespace: Option<String>) -> Result<Self> {
        if let Some(ns) = namespace {
            self.memory.default_namespace = ns;
        }
        self.memory.validate()?;
        Ok(self)
    }
}

/// 展开 `~/` 前缀
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var("HOME")
            .ok()
            .or_else(|| std::env::var("USERPROFILE").ok())
        {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.memory.default_namespace, "temp");
        assert_eq!(config.shell.prompt, "turn-state> ");
    }

    #[test]
    fn test_partial_yaml() {
        let raw = r#"
memory:
  default_namespace: scratch
shell:
  history_file: ~
"#;
        let config = Config::from_yaml_str(raw).unwrap();
        assert_eq!(config.memory.default_namespace, "scratch");
        assert_eq!(config.shell.history_file, None);
        assert_eq!(config.shell.log_filter, "turn_state=info");
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let err = Config::from_yaml_str("memory:\n  default_namespace: \"a.b\"\n").unwrap_err();
        assert!(matches!(
            err,
            StateError::Config(ConfigError::InvalidValue { .. })
        ));

        let err = Config::default()
            .with_namespace_override(Some(String::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            StateError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_namespace_override() {
        let config = Config::default()
            .with_namespace_override(Some("session".to_string()))
            .unwrap();
        assert_eq!(config.memory.default_namespace, "session");

        let unchanged = Config::default().with_namespace_override(None).unwrap();
        assert_eq!(unchanged.memory.default_namespace, "temp");
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = Config::from_yaml_str("memory: [unclosed").unwrap_err();
        assert!(matches!(err, StateError::Config(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/turn-state.yaml").unwrap_err();
        assert!(matches!(err, StateError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/tmp/history"), PathBuf::from("/tmp/history"));
        assert_eq!(expand_tilde("relative/h"), PathBuf::from("relative/h"));
    }
}
