//! 点分路径解析与树遍历
//!
//! 路径形如 `conversation.user.name`，每一段对应一层嵌套映射。
//! 不含 `.` 的单段路径会被改写到默认命名空间下：
//! `"test"` → `"temp.test"`。
//!
//! ```rust
//! use turn_state::memory::path::MemoryPath;
//!
//! let path = MemoryPath::parse("test", "temp").unwrap();
//! assert_eq!(path.to_string(), "temp.test");
//! assert_eq!(path.scope(), "temp");
//! assert_eq!(path.leaf(), "test");
//! ```

use crate::error::PathError;
use serde_json::{Map, Value};
use std::fmt;

/// 已解析的记忆路径，至少包含一段，所有段均非空
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryPath {
    segments: Vec<String>,
}

impl MemoryPath {
    /// 解析调用方传入的路径，单段路径改写到 `default_namespace` 下
    pub fn parse(raw: &str, default_namespace: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        if !raw.contains('.') {
            return Ok(Self {
                segments: vec![default_namespace.to_string(), raw.to_string()],
            });
        }

        let mut segments = Vec::new();
        for (position, part) in raw.split('.').enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: raw.to_string(),
                    position,
                });
            }
            segments.push(part.to_string());
        }
        Ok(Self { segments })
    }

    /// 指向整个作用域（根映射下的顶层键）的单段路径
    pub fn scope_root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// 顶层作用域名
    pub fn scope(&self) -> &str {
        &self.segments[0]
    }

    /// 叶子段
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// 从根映射出发查找叶子，任一中间段缺失或不是映射时返回 `None`
    pub fn lookup_in<'a>(&self, root: &'a Map<String, Value>) -> Option<&'a Value> {
        let (leaf, parents) = self.segments.split_last()?;
        let mut map = root;
        for segment in parents {
            map = map.get(segment)?.as_object()?;
        }
        map.get(leaf)
    }

    /// 写入叶子，沿途创建缺失的映射；非映射的中间值会被替换为空映射
    pub fn assign_in(&self, root: &mut Map<String, Value>, value: Value) {
        assign_at(root, &self.segments, value);
    }

    /// 删除叶子并返回旧值；父映射不存在时什么也不做
    pub fn remove_from(&self, root: &mut Map<String, Value>) -> Option<Value> {
        let (leaf, parents) = self.segments.split_last()?;
        let mut map = root;
        for segment in parents {
            map = map.get_mut(segment)?.as_object_mut()?;
        }
        map.remove(leaf)
    }
}

impl fmt::Display for MemoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// 逐层下降写入；中间层取出后再放回，非映射值在取出时被丢弃
fn assign_at(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let mut child = match map.remove(head) {
                Some(Value::Object(inner)) => inner,
                _ => Map::new(),
            };
            assign_at(&mut child, rest, value);
            map.insert(head.clone(), Value::Object(child));
        }
    }
}

/// 值的类型名，用于类型不匹配的错误信息
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
