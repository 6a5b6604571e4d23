//! Runtime backends for tensor computation
//!
//! This module defines the `Runtime` trait and the CPU backend.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity, raw memory primitives)
//! ├── Device (identifies a specific compute unit)
//! └── Client (dispatches operations, owns the thread pool)
//! ```

mod parallelism;
mod traits;

pub mod cpu;

pub use parallelism::ParallelismConfig;
pub use traits::{Device, Runtime, RuntimeClient};
