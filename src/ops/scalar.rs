//! Selector for the `k` argument of top-k

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;
use std::fmt;

/// The number of elements to select, known on the host or held in a tensor
///
/// `Tensor` selectors are read at call time and must contain exactly one
/// non-negative integer.
///
/// # Example
///
/// ```
/// use topkr::prelude::*;
///
/// let device = CpuDevice::new();
/// let k_tensor = Tensor::<CpuRuntime>::from_slice(&[3i32], &[1], &device);
///
/// assert_eq!(KScalar::<CpuRuntime>::from(3).resolve()?, 3);
/// assert_eq!(KScalar::from(&k_tensor).resolve()?, 3);
/// # Ok::<(), topkr::error::Error>(())
/// ```
pub enum KScalar<'a, R: Runtime> {
    /// Value known on the host
    Const(usize),
    /// One-element integer tensor
    Tensor(&'a Tensor<R>),
}

impl<R: Runtime> KScalar<'_, R> {
    /// Read the selector as a host integer
    pub fn resolve(&self) -> Result<usize> {
        let t = match self {
            Self::Const(k) => return Ok(*k),
            Self::Tensor(t) => *t,
        };

        if t.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: t.shape().to_vec(),
            });
        }

        if !t.dtype().is_int() {
            return Err(Error::unsupported_dtype(t.dtype(), "topk"));
        }

        let value: i128 = match t.dtype() {
            DType::I64 => t.item::<i64>()?.into(),
            DType::I32 => t.item::<i32>()?.into(),
            DType::I16 => t.item::<i16>()?.into(),
            DType::I8 => t.item::<i8>()?.into(),
            DType::U64 => t.item::<u64>()?.into(),
            DType::U32 => t.item::<u32>()?.into(),
            DType::U16 => t.item::<u16>()?.into(),
            DType::U8 => t.item::<u8>()?.into(),
            other => return Err(Error::unsupported_dtype(other, "topk")),
        };

        usize::try_from(value)
            .map_err(|_| Error::invalid_argument("k", format!("k ({value}) must be non-negative")))
    }
}

impl<R: Runtime> Clone for KScalar<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Runtime> Copy for KScalar<'_, R> {}

impl<R: Runtime> From<usize> for KScalar<'_, R> {
    fn from(k: usize) -> Self {
        Self::Const(k)
    }
}

impl<'a, R: Runtime> From<&'a Tensor<R>> for KScalar<'a, R> {
    fn from(t: &'a Tensor<R>) -> Self {
        Self::Tensor(t)
    }
}

impl<R: Runtime> fmt::Debug for KScalar<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(k) => f.debug_tuple("Const").field(k).finish(),
            Self::Tensor(t) => f.debug_tuple("Tensor").field(t).finish(),
        }
    }
}
