//! # topkr
//!
//! **Top-k selection over dense n-dimensional tensors.**
//!
//! topkr selects the k largest (or smallest) elements along one axis of a
//! tensor and reports them together with their original positions. It ships
//! the small tensor runtime the operation needs: a strided `Tensor`, runtime
//! dtypes and a parallel CPU backend.
//!
//! ## Features
//!
//! - **Top-k**: `k` as a host value or a one-element tensor, largest or
//!   smallest, rank-ordered or in original index order
//! - **Deterministic ties**: equal values prefer the lower index; NaN ranks
//!   above every number
//! - **Out-parameter form**: reuse output buffers across calls
//! - **k-th value and gradient**: `kthvalue` and `topk_backward` share the
//!   same ordering
//! - **Multiple dtypes**: f64, f32, f16, bf16 and all integer widths
//!
//! ## Quick Start
//!
//! ```
//! use topkr::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0], &[8], &device);
//! let (values, indices) = client.topk(&a, 3, -1, true, true)?;
//!
//! assert_eq!(values.to_vec::<f32>(), [9.0, 6.0, 5.0]);
//! assert_eq!(indices.to_vec::<i64>(), [5, 7, 4]);
//! # Ok::<(), topkr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Multi-threaded CPU operations
//! - `f16`: Half-precision floats (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{KScalar, TopkOps};
    pub use crate::runtime::{Device, ParallelismConfig, Runtime, RuntimeClient};
    pub use crate::tensor::{Layout, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
}

/// Default runtime based on enabled features
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
