//! CPU kernel implementations
//!
//! Low-level compute kernels for CPU operations. Kernels are generic over
//! `T: Element` and work on raw pointers into contiguous buffers.

#![allow(unsafe_op_in_unsafe_fn)] // Kernels are already marked unsafe, inner unsafe is redundant

pub mod topk;

pub use topk::{kthvalue_kernel, kthvalue_lane, topk_backward_kernel, topk_kernel, topk_lane};
