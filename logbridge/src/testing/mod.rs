//! In-memory doubles of both logging abstractions, for tests.
mod memory;

pub use memory::{HostEntry, MemoryHostLogger, MemoryLog};
