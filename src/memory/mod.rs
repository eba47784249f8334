//! 会话记忆
//!
//! 以点分路径寻址的内存 KV 容器，作为单轮/单会话的临时状态区：
//!
//! | 类型 | 作用 |
//! |------|------|
//! | [`PathStore`] | 持有整棵状态树的存储本体 |
//! | [`MemoryFork`] | 覆盖在父记忆上的写时复制视图，可提交或丢弃 |
//! | [`MemoryPath`] | 已解析的路径，负责默认命名空间改写与树遍历 |
//!
//! 读写接口由 [`Memory`]（底层、对象安全）与 [`MemoryExt`]（带类型的便捷方法）组成，
//! `MemoryExt` 对所有 `Memory` 实现（包括 `dyn Memory`）自动可用。
//!
//! ## 快速上手
//!
//! ```rust
//! use turn_state::memory::{MemoryExt, PathStore};
//!
//! # fn main() -> turn_state::error::Result<()> {
//! let mut store = PathStore::new();
//! store.set_value("a.b", "test")?;
//! assert!(store.has_value("a.b")?);
//! assert_eq!(store.get_value::<String>("a.b")?.as_deref(), Some("test"));
//!
//! // 单段 key 落在默认命名空间 temp 下
//! store.set_value("test", "123")?;
//! assert_eq!(store.get_value::<String>("temp.test")?.as_deref(), Some("123"));
//!
//! store.delete_value("a.b")?;
//! assert!(!store.has_value("a.b")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## 类型不匹配
//!
//! [`MemoryExt::get_value`] 在值存在但无法视为请求类型时返回 `Ok(None)`；
//! 需要区分"不存在"和"类型不对"时使用 [`MemoryExt::try_get_value`]，
//! 后者返回 [`MemoryError::TypeMismatch`]。

pub mod fork;
pub mod path;
pub mod store;

pub use fork::MemoryFork;
pub use path::MemoryPath;
pub use store::PathStore;

use crate::error::{MemoryError, Result};
use path::value_kind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// 会话级作用域
pub const CONVERSATION_SCOPE: &str = "conversation";
/// 用户级作用域
pub const USER_SCOPE: &str = "user";
/// 临时作用域，通常每轮结束后清空
pub const TEMP_SCOPE: &str = "temp";
/// 单段路径默认落入的命名空间
pub const DEFAULT_NAMESPACE: &str = TEMP_SCOPE;

/// 路径寻址记忆的底层接口
///
/// 只处理已解析的 [`MemoryPath`] 与原始 [`Value`]；字符串路径与类型转换
/// 由 [`MemoryExt`] 提供。
pub trait Memory {
    /// 单段路径改写时使用的命名空间
    fn default_namespace(&self) -> &str;

    fn lookup(&self, path: &MemoryPath) -> Option<&Value>;

    fn assign(&mut self, path: &MemoryPath, value: Value);

    /// 删除叶子，返回被删除的值
    fn remove(&mut self, path: &MemoryPath) -> Option<Value>;

    /// 按本记忆的默认命名空间解析字符串路径
    fn resolve(&self, path: &str) -> Result<MemoryPath> {
        Ok(MemoryPath::parse(path, self.default_namespace())?)
    }
}

/// 带类型的读写便捷方法
pub trait MemoryExt: Memory {
    /// 读取并视为 `T`；不存在或类型不匹配均返回 `Ok(None)`
    fn get_value<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let path = self.resolve(path)?;
        Ok(self
            .lookup(&path)
            .and_then(|value| T::deserialize(value).ok()))
    }

    /// 与 [`get_value`](MemoryExt::get_value) 相同，但类型不匹配时返回
    /// [`MemoryError::TypeMismatch`]
    fn try_get_value<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let path = self.resolve(path)?;
        let Some(value) = self.lookup(&path) else {
            return Ok(None);
        };
        T::deserialize(value).map(Some).map_err(|_| {
            MemoryError::TypeMismatch {
                path: path.to_string(),
                expected: std::any::type_name::<T>(),
                found: value_kind(value),
            }
            .into()
        })
    }

    /// 写入任意可序列化的值，替换旧值
    fn set_value<T: Serialize>(&mut self, path: &str, value: T) -> Result<()> {
        let path = self.resolve(path)?;
        let value = serde_json::to_value(value)?;
        self.assign(&path, value);
        Ok(())
    }

    /// 路径上是否存在值（不论类型，`null` 也算存在）
    fn has_value(&self, path: &str) -> Result<bool> {
        let path = self.resolve(path)?;
        Ok(self.lookup(&path).is_some())
    }

    /// 删除叶子；路径或任一祖先不存在时为空操作
    fn delete_value(&mut self, path: &str) -> Result<()> {
        let path = self.resolve(path)?;
        self.remove(&path);
        Ok(())
    }

    /// 用给定子树整体替换对应作用域，通常用于提交 [`MemoryFork`]
    fn merge_scopes(&mut self, scopes: Map<String, Value>) {
        for (name, subtree) in scopes {
            self.assign(&MemoryPath::scope_root(name), subtree);
        }
    }
}

impl<M: Memory + ?Sized> MemoryExt for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        turns: u32,
    }

    #[test]
    fn test_source_scenarios() {
        let mut store = PathStore::new();
        store.set_value("a.b", "test").unwrap();
        assert!(store.has_value("a.b").unwrap());
        assert_eq!(store.get_value::<String>("a.b").unwrap(), Some("test".to_string()));
        store.delete_value("a.b").unwrap();
        assert!(!store.has_value("a.b").unwrap());

        store.set_value("test", "123").unwrap();
        assert!(store.has_value("temp.test").unwrap());
        assert_eq!(
            store.get_value::<String>("temp.test").unwrap(),
            Some("123".to_string())
        );
        assert_eq!(store.get_value::<String>("test").unwrap(), Some("123".to_string()));
    }

    #[test]
    fn test_round_trip_value_kinds() {
        let mut store = PathStore::new();
        store.set_value("conversation.count", 3).unwrap();
        store.set_value("conversation.ratio", 0.5).unwrap();
        store.set_value("conversation.done", false).unwrap();
        store.set_value("conversation.tags", vec!["a", "b"]).unwrap();
        store
            .set_value(
                "user.profile",
                Profile {
                    name: "alice".to_string(),
                    turns: 2,
                },
            )
            .unwrap();

        assert_eq!(store.get_value::<i64>("conversation.count").unwrap(), Some(3));
        assert_eq!(store.get_value::<f64>("conversation.ratio").unwrap(), Some(0.5));
        assert_eq!(store.get_value::<bool>("conversation.done").unwrap(), Some(false));
        assert_eq!(
            store.get_value::<Vec<String>>("conversation.tags").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            store.get_value::<Profile>("user.profile").unwrap(),
            Some(Profile {
                name: "alice".to_string(),
                turns: 2
            })
        );
        // 嵌套字段可以直接按路径读取
        assert_eq!(
            store.get_value::<String>("user.profile.name").unwrap(),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_mismatched_type_is_silent_absence() {
        let mut store = PathStore::new();
        store.set_value("a.b", "123").unwrap();

        assert_eq!(store.get_value::<i64>("a.b").unwrap(), None);
        assert_eq!(store.get_value::<bool>("a.b").unwrap(), None);
        // 值本身仍然存在
        assert!(store.has_value("a.b").unwrap());
        assert_eq!(store.get_value::<Value>("a.b").unwrap(), Some(json!("123")));
    }

    #[test]
    fn test_strict_read_reports_type_mismatch() {
        let mut store = PathStore::new();
        store.set_value("a.b", "123").unwrap();

        assert_eq!(
            store.try_get_value::<String>("a.b").unwrap(),
            Some("123".to_string())
        );
        match store.try_get_value::<i64>("a.b") {
            Err(StateError::Memory(MemoryError::TypeMismatch {
                path,
                expected,
                found,
            })) => {
                assert_eq!(path, "a.b");
                assert_eq!(expected, "i64");
                assert_eq!(found, "string");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
        // 不存在的路径在严格模式下也不是错误
        assert_eq!(store.try_get_value::<i64>("a.missing").unwrap(), None);
    }

    #[test]
    fn test_null_counts_as_present() {
        let mut store = PathStore::new();
        store.set_value("a.b", Value::Null).unwrap();
        assert!(store.has_value("a.b").unwrap());
        assert_eq!(store.get_value::<Option<String>>("a.b").unwrap(), Some(None));
        assert_eq!(store.get_value::<String>("a.b").unwrap(), None);
    }

    #[test]
    fn test_invalid_path_on_every_operation() {
        let mut store = PathStore::new();
        for bad in ["", "a..b", ".a", "a."] {
            assert!(store.set_value(bad, 1).unwrap_err().is_invalid_path(), "set {bad:?}");
            assert!(store.get_value::<i64>(bad).unwrap_err().is_invalid_path(), "get {bad:?}");
            assert!(store.has_value(bad).unwrap_err().is_invalid_path(), "has {bad:?}");
            assert!(store.delete_value(bad).unwrap_err().is_invalid_path(), "delete {bad:?}");
        }
        assert!(store.is_empty(), "rejected writes must not touch the tree");
    }

    #[test]
    fn test_works_through_dyn_memory() {
        let mut store = PathStore::new();
        let memory: &mut dyn Memory = &mut store;
        memory.set_value("k", 7).unwrap();
        assert_eq!(memory.get_value::<u8>("temp.k").unwrap(), Some(7));
    }

    #[test]
    fn test_merge_scopes_replaces_whole_scope() {
        let mut store = PathStore::new();
        store.set_value("user.name", "alice").unwrap();
        store.set_value("user.age", 30).unwrap();

        let mut scopes = Map::new();
        scopes.insert("user".to_string(), json!({"name": "bob"}));
        store.merge_scopes(scopes);

        assert_eq!(store.get_value::<String>("user.name").unwrap(), Some("bob".to_string()));
        assert!(!store.has_value("user.age").unwrap());
    }
}
