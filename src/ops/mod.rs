//! Tensor operations
//!
//! Operations are defined as traits that are implemented by `RuntimeClient`.
//! This gives operations access to the device and thread pool when creating
//! output tensors.
//!
//! ```text
//! RuntimeClient<R>
//!   └── implements TopkOps<R>
//!         ├── topk, topk_scalar  (k largest/smallest along an axis)
//!         ├── topk_into          (out-parameter form)
//!         ├── kthvalue           (k-th smallest along an axis)
//!         └── topk_backward      (gradient scatter)
//! ```
//!
//! # Implementing Operations for a New Backend
//!
//! Implement `TopkOps<YourRuntime>` for your `Client` type, validate with
//! [`plan_topk`] (or [`plan_kthvalue`], [`plan_topk_backward`]) before
//! allocating anything, then launch kernels over `plan.lanes()` independent
//! lanes of `plan.dim_size` elements.

pub(crate) mod cpu;
mod scalar;
mod topk;
mod traits;

pub use scalar::KScalar;
pub use topk::{
    SelectPlan, compute_reduce_strides, normalize_dim, plan_kthvalue, plan_topk,
    plan_topk_backward,
};
pub use traits::TopkOps;
