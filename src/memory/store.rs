//! 路径寻址存储
//!
//! [`PathStore`] 独占持有一棵以 [`serde_json::Value`] 表示的状态树，
//! 根是一个映射，顶层键即作用域（`conversation`、`user`、`temp` 等）。
//! 不做持久化、不做淘汰，也不做内部加锁：一个实例只归一轮对话独占使用。

use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};
use crate::memory::path::{MemoryPath, value_kind};
use crate::memory::{DEFAULT_NAMESPACE, Memory};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// 点分路径寻址的内存 KV 存储
#[derive(Debug, Clone, PartialEq)]
pub struct PathStore {
    /// 作用域名 → 子树
    root: Map<String, Value>,
    default_namespace: String,
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PathStore {
    /// 空存储，默认命名空间为 `temp`
    pub fn new() -> Self {
        Self {
            root: Map::new(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// 按配置创建空存储，配置非法时返回 [`ConfigError::InvalidValue`](crate::error::ConfigError::InvalidValue)
    pub fn with_config(config: &MemoryConfig) -> Result<Self> {
        config.validate()?;
        info!(default_namespace = %config.default_namespace, "🧠 PathStore 初始化");
        Ok(Self {
            root: Map::new(),
            default_namespace: config.default_namespace.clone(),
        })
    }

    /// 从快照恢复，根必须是映射
    pub fn from_value(snapshot: Value, config: &MemoryConfig) -> Result<Self> {
        let mut store = Self::with_config(config)?;
        match snapshot {
            Value::Object(root) => {
                store.root = root;
                Ok(store)
            }
            other => Err(MemoryError::TypeMismatch {
                path: String::new(),
                expected: "mapping",
                found: value_kind(&other),
            }
            .into()),
        }
    }

    /// 整棵树的快照
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// 当前所有作用域名（字典序）
    pub fn scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.root.keys().cloned().collect();
        names.sort();
        names
    }

    /// 丢弃整个作用域，返回其是否存在
    pub fn clear_scope(&mut self, name: &str) -> bool {
        let existed = self.root.remove(name).is_some();
        debug!(scope = %name, existed, "🧹 清空作用域");
        existed
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl Memory for PathStore {
    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    fn lookup(&self, path: &MemoryPath) -> Option<&Value> {
        path.lookup_in(&self.root)
    }

    fn assign(&mut self, path: &MemoryPath, value: Value) {
        debug!(path = %path, kind = value_kind(&value), "📝 写入记忆");
        path.assign_in(&mut self.root, value);
    }

    fn remove(&mut self, path: &MemoryPath) -> Option<Value> {
        let removed = path.remove_from(&mut self.root);
        debug!(path = %path, found = removed.is_some(), "🗑️ 删除记忆");
        removed
    }
}
