pub mod config;
pub mod error;
pub mod memory;
pub mod shell;
pub mod testing;

pub mod prelude {
    pub use crate::config::{Config, MemoryConfig};
    pub use crate::error::{Result, StateError};
    pub use crate::memory::{Memory, MemoryExt, MemoryFork, MemoryPath, PathStore};
}
