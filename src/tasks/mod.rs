//! Background Tasks Module
//!
//! Contains background tasks that run periodically while caches are alive.
//!
//! # Tasks
//! - TTL Sweep: removes expired entries from one cache at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
