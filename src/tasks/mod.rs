//! Background Tasks Module
//!
//! Long-running maintenance tasks for the cache layer.

mod purge;

pub use purge::spawn_purge_task;
