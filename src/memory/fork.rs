//! 写时复制的记忆分支
//!
//! [`MemoryFork`] 以共享借用持有父记忆，读取未改动的作用域时直接穿透到父记忆；
//! 第一次在某个作用域内写入或删除时，先把父记忆中该作用域的子树复制到分支内，
//! 之后该作用域的读写都只发生在分支上。父记忆在分支存活期间不可变。
//!
//! 分支被丢弃即放弃全部修改；需要保留时用 [`MemoryFork::into_scopes`]
//! 取出改动过的作用域，再交给父记忆的 [`MemoryExt::merge_scopes`](crate::memory::MemoryExt::merge_scopes)。
//!
//! ```rust
//! use turn_state::memory::{MemoryExt, MemoryFork, PathStore};
//!
//! # fn main() -> turn_state::error::Result<()> {
//! let mut store = PathStore::new();
//! store.set_value("user.name", "alice")?;
//!
//! let mut fork = MemoryFork::new(&store);
//! fork.set_value("user.name", "bob")?;
//! assert_eq!(fork.get_value::<String>("user.name")?.as_deref(), Some("bob"));
//!
//! let changes = fork.into_scopes();
//! assert_eq!(store.get_value::<String>("user.name")?.as_deref(), Some("alice"));
//!
//! store.merge_scopes(changes);
//! assert_eq!(store.get_value::<String>("user.name")?.as_deref(), Some("bob"));
//! # Ok(())
//! # }
//! ```

use crate::memory::Memory;
use crate::memory::path::MemoryPath;
use serde_json::{Map, Value};
use tracing::debug;

/// 覆盖在父记忆之上的可写视图
pub struct MemoryFork<'a> {
    parent: &'a dyn Memory,
    /// 已复制到分支内的作用域
    scopes: Map<String, Value>,
}

impl<'a> MemoryFork<'a> {
    pub fn new(parent: &'a dyn Memory) -> Self {
        Self {
            parent,
            scopes: Map::new(),
        }
    }

    /// 分支内已改动过的作用域名
    pub fn forked_scopes(&self) -> Vec<&str> {
        self.scopes.keys().map(String::as_str).collect()
    }

    /// 取出改动过的作用域（作用域名 → 完整子树）
    pub fn into_scopes(self) -> Map<String, Value> {
        self.scopes
    }

    /// 确保作用域已复制到分支内
    fn fork_scope(&mut self, scope: &str) {
        if self.scopes.contains_key(scope) {
            return;
        }
        let subtree = self
            .parent
            .lookup(&MemoryPath::scope_root(scope))
            .filter(|value| value.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        debug!(scope = %scope, "🌿 分支复制作用域");
        self.scopes.insert(scope.to_string(), subtree);
    }
}

impl Memory for MemoryFork<'_> {
    fn default_namespace(&self) -> &str {
        self.parent.default_namespace()
    }

    fn lookup(&self, path: &MemoryPath) -> Option<&Value> {
        if self.scopes.contains_key(path.scope()) {
            path.lookup_in(&self.scopes)
        } else {
            self.parent.lookup(path)
        }
    }

    fn assign(&mut self, path: &MemoryPath, value: Value) {
        self.fork_scope(path.scope());
        path.assign_in(&mut self.scopes, value);
    }

    fn remove(&mut self, path: &MemoryPath) -> Option<Value> {
        // 父记忆里没有这个叶子时不复制作用域，删除保持为空操作
        if !self.scopes.contains_key(path.scope()) {
            self.parent.lookup(path)?;
        }
        self.fork_scope(path.scope());
        path.remove_from(&mut self.scopes)
    }
}
