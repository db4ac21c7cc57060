//! SQLite Repository Implementations

mod memory_repository;

pub use memory_repository::{MemoryConfig, SqliteContentMemory};
