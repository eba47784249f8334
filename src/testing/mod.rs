//! 测试基础设施
//!
//! | 类型 | 用途 |
//! |------|------|
//! | [`RecordingMemory`] | 包装真实 [`PathStore`](crate::memory::PathStore)，记录每次底层读写，用于验证上层组件的访问模式 |
//!
//! ```rust
//! use turn_state::memory::MemoryExt;
//! use turn_state::testing::{MemoryCall, RecordingMemory};
//!
//! let mut memory = RecordingMemory::new();
//! memory.set_value("a.b", 1).unwrap();
//! memory.has_value("a.b").unwrap();
//!
//! assert_eq!(memory.call_count(), 2);
//! assert_eq!(memory.last_call(), Some(MemoryCall::Lookup("a.b".to_string())));
//! ```

mod recording_memory;

pub use recording_memory::{MemoryCall, RecordingMemory};
