//! Core Tensor type

use super::{Layout, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::fmt;

/// N-dimensional array stored on a compute device
///
/// `Tensor` consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape, strides, and offset defining the view into storage
/// - **DType**: Element type (determined at runtime)
///
/// Views like `transpose` and `reshape` share the underlying storage.
///
/// # Example
///
/// ```
/// use topkr::prelude::*;
///
/// let device = CpuDevice::new();
/// let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device);
/// let b = a.transpose(-1, -2)?; // shares storage with a
/// assert!(!b.is_contiguous());
/// # Ok::<(), topkr::error::Error>(())
/// ```
pub struct Tensor<R: Runtime> {
    storage: Storage<R>,
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from storage and layout
    pub fn from_parts(storage: Storage<R>, layout: Layout) -> Self {
        Self { storage, layout }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions,
    /// or if memory allocation fails.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor with unspecified contents
    ///
    /// Every element must be written before it is read back.
    pub fn empty(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_empty(shape, dtype, device).expect("Tensor::empty failed")
    }

    /// Create a tensor with unspecified contents (fallible version)
    pub fn try_empty(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        let storage = Storage::new(len, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_zeros(shape, dtype, device).expect("Tensor::zeros failed")
    }

    /// Create a tensor filled with zeros (fallible version)
    ///
    /// All-zero bytes are the zero value for every supported dtype, so the
    /// buffer is uploaded explicitly rather than relying on the backend
    /// allocator to zero memory.
    pub fn try_zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        if len == 0 {
            return Self::try_empty(shape, dtype, device);
        }

        let bytes = vec![0u8; len * dtype.size_in_bytes()];
        let storage = Storage::from_bytes(&bytes, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn size(&self, dim: isize) -> Option<usize> {
        self.layout.dim(dim)
    }

    // ===== View Operations (Zero-Copy) =====

    /// Transpose two dimensions (zero-copy)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let new_layout =
            self.layout
                .transpose(dim0, dim1)
                .ok_or_else(|| Error::InvalidDimension {
                    dim: dim0,
                    ndim: self.ndim(),
                })?;

        Ok(Self::from_parts(self.storage.clone(), new_layout))
    }

    /// Reshape to a new shape (zero-copy, requires a contiguous tensor)
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if !self.is_contiguous() {
            return Err(Error::NotContiguous);
        }
        let new_layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;

        Ok(Self::from_parts(self.storage.clone(), new_layout))
    }

    /// Make tensor contiguous (copy if needed)
    ///
    /// # Panics
    ///
    /// Panics if the copy cannot be allocated. Use [`Self::try_contiguous`]
    /// to handle that case.
    pub fn contiguous(&self) -> Self {
        self.try_contiguous()
            .expect("Tensor::contiguous allocation failed")
    }

    /// Make tensor contiguous (fallible version)
    ///
    /// If the tensor is already contiguous, returns a view (zero-copy).
    /// Otherwise, allocates new storage and gathers the strided elements into it
    /// with `Runtime::copy_strided`.
    pub fn try_contiguous(&self) -> Result<Self> {
        if self.is_contiguous() {
            return Ok(self.clone());
        }

        let dtype = self.dtype();
        let device = self.storage.device();
        let new_storage = Storage::new(self.numel(), dtype, device)?;

        let elem_size = dtype.size_in_bytes();
        R::copy_strided(
            self.storage.ptr(),
            self.layout.offset() * elem_size,
            new_storage.ptr(),
            self.shape(),
            self.strides(),
            elem_size,
            device,
        )?;

        Ok(Self::from_parts(new_storage, Layout::contiguous(self.shape())))
    }

    // ===== Data Access =====

    /// Copy tensor data to a Vec on the host
    ///
    /// Non-contiguous tensors are gathered first.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the tensor's element size or the device
    /// copy fails.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        assert_eq!(
            std::mem::size_of::<T>(),
            self.dtype().size_in_bytes(),
            "to_vec element size does not match dtype {}",
            self.dtype()
        );

        let tensor = self.contiguous();
        let numel = tensor.numel();
        let mut result = vec![T::zeroed(); numel];
        if numel == 0 {
            return result;
        }

        // Allocate with correct alignment for T, then view as bytes for the copy.
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        let byte_offset = tensor.layout.offset() * std::mem::size_of::<T>();
        let src_ptr = tensor.storage.ptr() + byte_offset as u64;
        R::copy_from_device(src_ptr, bytes, tensor.storage.device())
            .expect("copy_from_device failed in to_vec()");
        result
    }

    /// Extract the scalar value from a single-element tensor
    ///
    /// Returns an error if the tensor doesn't contain exactly one element.
    pub fn item<T: bytemuck::Pod>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        if std::mem::size_of::<T>() != self.dtype().size_in_bytes() {
            return Err(Error::unsupported_dtype(self.dtype(), "item"));
        }

        let tensor = self.try_contiguous()?;
        let byte_offset = tensor.layout.offset() * std::mem::size_of::<T>();
        let src_ptr = tensor.storage.ptr() + byte_offset as u64;

        let mut result = T::zeroed();
        let bytes: &mut [u8] = bytemuck::bytes_of_mut(&mut result);
        R::copy_from_device(src_ptr, bytes, tensor.storage.device())?;
        Ok(result)
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
