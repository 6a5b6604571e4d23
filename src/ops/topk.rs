//! Shape planning shared by the selection operations
//!
//! Backends call these helpers before touching any memory, so every
//! validation error is raised before an output exists.

use crate::error::{Error, Result};

/// Validated geometry of one selection along a single axis
///
/// The input is viewed as `[outer_size, dim_size, inner_size]`; each
/// `(outer, inner)` pair is one independent lane of `dim_size` elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectPlan {
    /// Normalized axis (0 for 0-d tensors)
    pub dim: usize,
    /// Product of the dimensions before `dim`
    pub outer_size: usize,
    /// Extent of the selected axis
    pub dim_size: usize,
    /// Product of the dimensions after `dim`
    pub inner_size: usize,
    /// Number of selected elements per lane
    pub k: usize,
    /// Shape of the produced tensors
    pub out_shape: Vec<usize>,
}

impl SelectPlan {
    /// Number of independent lanes
    #[inline]
    pub fn lanes(&self) -> usize {
        self.outer_size * self.inner_size
    }

    /// Number of elements in each output
    #[inline]
    pub fn out_numel(&self) -> usize {
        self.out_shape.iter().product()
    }
}

/// Normalize a possibly negative axis against `ndim`
///
/// A 0-d tensor accepts `0` and `-1` and maps both to axis `0`.
pub fn normalize_dim(dim: isize, ndim: usize) -> Result<usize> {
    let rank = ndim.max(1) as isize;
    let idx = if dim < 0 { rank + dim } else { dim };
    if idx >= 0 && idx < rank {
        Ok(idx as usize)
    } else {
        Err(Error::InvalidDimension { dim, ndim })
    }
}

/// Split `shape` around `dim` into `(outer_size, dim_size, inner_size)`
///
/// A 0-d shape is treated as a single lane of one element.
pub fn compute_reduce_strides(shape: &[usize], dim: usize) -> (usize, usize, usize) {
    if shape.is_empty() {
        return (1, 1, 1);
    }
    let outer_size = shape[..dim].iter().product();
    let inner_size = shape[dim + 1..].iter().product();
    (outer_size, shape[dim], inner_size)
}

/// Plan a top-k selection of `k` elements along `dim`
pub fn plan_topk(shape: &[usize], k: usize, dim: isize) -> Result<SelectPlan> {
    let dim_idx = normalize_dim(dim, shape.len())?;
    let (outer_size, dim_size, inner_size) = compute_reduce_strides(shape, dim_idx);

    if shape.is_empty() && k != 1 {
        return Err(Error::invalid_argument(
            "k",
            format!("k ({k}) must be 1 for a 0-d tensor"),
        ));
    }
    if k > dim_size {
        return Err(Error::invalid_argument(
            "k",
            format!("k ({k}) cannot be greater than dimension size ({dim_size})"),
        ));
    }

    let mut out_shape = shape.to_vec();
    if !shape.is_empty() {
        out_shape[dim_idx] = k;
    }

    Ok(SelectPlan {
        dim: dim_idx,
        outer_size,
        dim_size,
        inner_size,
        k,
        out_shape,
    })
}

/// Plan a k-th smallest selection (`k` is 1-based) along `dim`
pub fn plan_kthvalue(shape: &[usize], k: usize, dim: isize, keepdim: bool) -> Result<SelectPlan> {
    let dim_idx = normalize_dim(dim, shape.len())?;
    let (outer_size, dim_size, inner_size) = compute_reduce_strides(shape, dim_idx);

    if k == 0 || k > dim_size {
        return Err(Error::invalid_argument(
            "k",
            format!("k ({k}) must be in 1..={dim_size}"),
        ));
    }

    let out_shape = if shape.is_empty() {
        Vec::new()
    } else if keepdim {
        let mut s = shape.to_vec();
        s[dim_idx] = 1;
        s
    } else {
        shape
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != dim_idx)
            .map(|(_, &s)| s)
            .collect()
    };

    Ok(SelectPlan {
        dim: dim_idx,
        outer_size,
        dim_size,
        inner_size,
        k,
        out_shape,
    })
}

/// Plan the gradient scatter of a top-k result back to `input_shape`
///
/// `grad_shape` must equal `input_shape` everywhere except along `dim`,
/// whose extent becomes the plan's `k`.
pub fn plan_topk_backward(
    grad_shape: &[usize],
    input_shape: &[usize],
    dim: isize,
) -> Result<SelectPlan> {
    let dim_idx = normalize_dim(dim, input_shape.len())?;
    let (outer_size, dim_size, inner_size) = compute_reduce_strides(input_shape, dim_idx);

    if grad_shape.len() != input_shape.len() {
        return Err(Error::shape_mismatch(input_shape, grad_shape));
    }
    let k = grad_shape.get(dim_idx).copied().unwrap_or(1);

    let mut expected = input_shape.to_vec();
    if !expected.is_empty() {
        expected[dim_idx] = k;
    }
    if expected != grad_shape {
        return Err(Error::shape_mismatch(&expected, grad_shape));
    }

    Ok(SelectPlan {
        dim: dim_idx,
        outer_size,
        dim_size,
        inner_size,
        k,
        out_shape: input_shape.to_vec(),
    })
}
