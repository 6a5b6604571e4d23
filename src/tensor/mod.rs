//! Tensor types
//!
//! This module provides the core `Tensor` type, an n-dimensional array stored
//! on a compute device, along with its `Layout` and reference-counted `Storage`.

mod core;
mod layout;
mod storage;

pub use core::Tensor;
pub use layout::{Layout, Shape, Strides};
pub use storage::Storage;
