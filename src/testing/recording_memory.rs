//! 可观测的记忆实现，底层委托给 [`PathStore`]。

use crate::memory::path::MemoryPath;
use crate::memory::{Memory, PathStore};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// 一次底层调用，路径为解析后的完整点分形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryCall {
    Lookup(String),
    Assign(String),
    Remove(String),
}

/// 记录全部 `lookup` / `assign` / `remove` 调用的 Memory。
///
/// 调用日志放在 `Arc<Mutex<_>>` 里，`clone()` 出的副本共享同一份日志。
#[derive(Clone, Default)]
pub struct RecordingMemory {
    inner: PathStore,
    calls: Arc<Mutex<Vec<MemoryCall>>>,
}

impl RecordingMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有存储为底层
    pub fn wrap(inner: PathStore) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 已记录的调用总次数
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 所有调用（按时序排列）
    pub fn calls(&self) -> Vec<MemoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<MemoryCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// 清空调用日志，不影响已存储的数据
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// 底层存储
    pub fn inner(&self) -> &PathStore {
        &self.inner
    }

    fn record(&self, call: MemoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Memory for RecordingMemory {
    fn default_namespace(&self) -> &str {
        self.inner.default_namespace()
    }

    fn lookup(&self, path: &MemoryPath) -> Option<&Value> {
        self.record(MemoryCall::Lookup(path.to_string()));
        self.inner.lookup(path)
    }

    fn assign(&mut self, path: &MemoryPath, value: Value) {
        self.record(MemoryCall::Assign(path.to_string()));
        self.inner.assign(path, value);
    }

    fn remove(&mut self, path: &MemoryPath) -> Option<Value> {
        self.record(MemoryCall::Remove(path.to_string()));
        self.inner.remove(path)
    }
}
