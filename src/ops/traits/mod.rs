//! Operation traits for tensor operations.
//!
//! This module contains trait definitions for tensor operations.
//! Implementations are in the backend-specific modules (cpu/).

mod topk;

pub use topk::TopkOps;
