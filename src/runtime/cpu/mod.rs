//! CPU runtime implementation
//!
//! The CPU runtime uses 64-byte aligned heap allocation and runs every
//! operation synchronously. With the `rayon` feature, independent lanes of a
//! kernel are spread across the client's thread pool.
//!
//! # Non-contiguous Tensors
//!
//! Strided inputs are gathered into a contiguous buffer with
//! `Runtime::copy_strided` before the typed kernels run.

mod client;
mod device;
pub(crate) mod helpers;
pub(crate) mod kernels;
mod runtime;
pub(crate) mod topk;

pub use client::CpuClient;
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
