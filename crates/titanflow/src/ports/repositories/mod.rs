//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod memory_repository;

pub use memory_repository::*;
