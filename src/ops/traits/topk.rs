//! Top-k selection operations trait.

use crate::error::{Error, Result};
use crate::ops::KScalar;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Top-k selection operations trait
///
/// Provides the top-k selection, its out-parameter and gradient forms, and the
/// k-th value selection that shares the same ordering.
///
/// # Ordering
///
/// Elements are ranked by value, and equal values rank the lower original
/// index first in both directions. NaN ranks above every other value, so
/// `largest = true` selects NaNs first and `largest = false` selects them last.
pub trait TopkOps<R: Runtime> {
    /// Return top K largest (or smallest) values and their indices along a dimension.
    ///
    /// # Arguments
    ///
    /// * `a` - Input tensor
    /// * `k` - Number of top elements to return
    /// * `dim` - Dimension along which to find top-k (supports negative indexing)
    /// * `largest` - If true, return largest elements; if false, return smallest
    /// * `sorted` - If true, return in rank order; if false, return the same
    ///   elements in ascending original index order
    ///
    /// # Returns
    ///
    /// Tuple of (values, indices) where:
    /// - `values`: Tensor with shape [..., k, ...] (dim replaced with k), same dtype as input
    /// - `indices`: I64 tensor with same shape as values, containing original indices
    ///
    /// A 0-d input accepts `dim` of `0` or `-1` and `k = 1`, and returns 0-d outputs.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if k > dim_size
    /// - `InvalidDimension` if `dim` is out of range
    /// - `UnsupportedDType` for Bool (and F16/BF16 without the `f16` feature)
    ///
    /// # Example
    ///
    /// ```
    /// # use topkr::prelude::*;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, 1.0, 4.0, 1.0, 5.0], &[5], &device);
    /// let (values, indices) = client.topk(&a, 2, 0, true, true)?;
    /// assert_eq!(values.to_vec::<f32>(), [5.0, 4.0]);
    /// assert_eq!(indices.to_vec::<i64>(), [4, 2]);
    /// # Ok::<(), topkr::error::Error>(())
    /// ```
    fn topk(
        &self,
        a: &Tensor<R>,
        k: usize,
        dim: isize,
        largest: bool,
        sorted: bool,
    ) -> Result<(Tensor<R>, Tensor<R>)> {
        let _ = (a, k, dim, largest, sorted);
        Err(Error::NotImplemented {
            feature: "TopkOps::topk",
        })
    }

    /// Top-k with `k` given as a host value or a one-element integer tensor.
    ///
    /// Resolves `k` and then behaves exactly like [`TopkOps::topk`].
    ///
    /// # Errors
    ///
    /// In addition to the errors of `topk`, a tensor selector fails with
    /// `ShapeMismatch` if it does not hold exactly one element,
    /// `UnsupportedDType` if it is not an integer tensor and `InvalidArgument`
    /// if its value is negative.
    ///
    /// # Example
    ///
    /// ```
    /// # use topkr::prelude::*;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[3i32, 1, 4, 1, 5, 9, 2, 6], &[8], &device);
    /// let k = Tensor::<CpuRuntime>::from_slice(&[3i64], &[1], &device);
    /// let (values, indices) = client.topk_scalar(&a, &KScalar::from(&k), -1, true, true)?;
    /// assert_eq!(values.to_vec::<i32>(), [9, 6, 5]);
    /// assert_eq!(indices.to_vec::<i64>(), [5, 7, 4]);
    /// # Ok::<(), topkr::error::Error>(())
    /// ```
    fn topk_scalar(
        &self,
        a: &Tensor<R>,
        k: &KScalar<'_, R>,
        dim: isize,
        largest: bool,
        sorted: bool,
    ) -> Result<(Tensor<R>, Tensor<R>)> {
        let k = k.resolve()?;
        self.topk(a, k, dim, largest, sorted)
    }

    /// Top-k written into existing output tensors.
    ///
    /// Outputs that already have the result shape and dtype, are contiguous
    /// and are not shared with another tensor are overwritten in place.
    /// Otherwise they are replaced with newly allocated tensors. On error
    /// neither output is modified.
    #[allow(clippy::too_many_arguments)]
    fn topk_into(
        &self,
        a: &Tensor<R>,
        k: &KScalar<'_, R>,
        dim: isize,
        largest: bool,
        sorted: bool,
        values: &mut Tensor<R>,
        indices: &mut Tensor<R>,
    ) -> Result<()> {
        let _ = (a, k, dim, largest, sorted, values, indices);
        Err(Error::NotImplemented {
            feature: "TopkOps::topk_into",
        })
    }

    /// Return the k-th smallest value (1-based `k`) and its index along a dimension.
    ///
    /// Ties are resolved like `topk`: among equal values the lower index
    /// ranks first.
    ///
    /// # Arguments
    ///
    /// * `a` - Input tensor
    /// * `k` - Rank of the element to return, starting at 1
    /// * `dim` - Dimension to select along (supports negative indexing)
    /// * `keepdim` - If true, keep `dim` with size 1
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `1 <= k <= dim_size`.
    ///
    /// # Example
    ///
    /// ```
    /// # use topkr::prelude::*;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[3.0f64, 1.0, 4.0, 1.0, 5.0], &[5], &device);
    /// let (value, index) = client.kthvalue(&a, 3, 0, false)?;
    /// assert_eq!(value.item::<f64>()?, 3.0);
    /// assert_eq!(index.item::<i64>()?, 0);
    /// # Ok::<(), topkr::error::Error>(())
    /// ```
    fn kthvalue(
        &self,
        a: &Tensor<R>,
        k: usize,
        dim: isize,
        keepdim: bool,
    ) -> Result<(Tensor<R>, Tensor<R>)> {
        let _ = (a, k, dim, keepdim);
        Err(Error::NotImplemented {
            feature: "TopkOps::kthvalue",
        })
    }

    /// Gradient of `topk` with respect to its input.
    ///
    /// Scatters `grad` into a zero tensor of `input_shape` at `indices`
    /// along `dim`. Repeated indices accumulate.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDType` if `grad` is not a floating point tensor
    /// - `DTypeMismatch` if `indices` is not I64
    /// - `ShapeMismatch` if `grad` and `indices` differ in shape, or do not
    ///   match `input_shape` outside `dim`
    /// - `IndexOutOfBounds` if an index falls outside `dim`
    fn topk_backward(
        &self,
        grad: &Tensor<R>,
        indices: &Tensor<R>,
        input_shape: &[usize],
        dim: isize,
    ) -> Result<Tensor<R>> {
        let _ = (grad, indices, input_shape, dim);
        Err(Error::NotImplemented {
            feature: "TopkOps::topk_backward",
        })
    }
}
