//! Shared single-writer store task, its handle, and the handle registry.

/// Event stream types emitted by the shared task.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
/// Per-file handle registry.
pub mod registry;
