//! Selection operations for CPU runtime

use super::helpers::{dispatch_dtype, ensure_contiguous};
use super::{CpuClient, CpuRuntime, kernels};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::ops::{SelectPlan, plan_kthvalue, plan_topk, plan_topk_backward};
use crate::tensor::Tensor;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

type TensorPair = (Tensor<CpuRuntime>, Tensor<CpuRuntime>);

/// Log a rejected call before handing the error back
fn rejected(op: &'static str) -> impl FnOnce(&Error) {
    move |err| tracing::debug!(op, error = %err, "invalid arguments")
}

/// Fail early for dtypes without a selection kernel
fn check_dtype(dtype: DType, op: &'static str) -> Result<()> {
    dispatch_dtype!(dtype, T => {
        debug_assert_eq!(T::DTYPE, dtype);
    }, op);
    Ok(())
}

/// Run `f(scratch, lane)` for every lane, in parallel when the client allows it
///
/// Each worker gets its own scratch value from `init`. `f` must only write
/// output positions owned by its lane.
fn for_each_lane<S, I, F>(client: &CpuClient, lanes: usize, init: I, f: F)
where
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, usize) + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        let min_len = client.rayon_min_len();
        if client.is_parallel() && lanes > min_len {
            client.install_parallelism(|| {
                (0..lanes)
                    .into_par_iter()
                    .with_min_len(min_len)
                    .for_each_init(&init, |scratch, lane| f(scratch, lane));
            });
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = client;

    let mut scratch = init();
    for lane in 0..lanes {
        f(&mut scratch, lane);
    }
}

/// Whether `out` can be overwritten in place with a `shape`/`dtype` result
fn reusable(out: &Tensor<CpuRuntime>, shape: &[usize], dtype: DType) -> bool {
    out.shape() == shape
        && out.dtype() == dtype
        && out.is_contiguous()
        && out.storage().is_unique()
}

/// Reuse `out` when possible, otherwise allocate a fresh tensor
fn output_like(
    client: &CpuClient,
    out: &Tensor<CpuRuntime>,
    shape: &[usize],
    dtype: DType,
) -> Result<Tensor<CpuRuntime>> {
    if reusable(out, shape, dtype) {
        Ok(out.clone())
    } else {
        tracing::trace!(from = ?out.shape(), to = ?shape, %dtype, "reallocating output");
        Tensor::try_empty(shape, dtype, &client.device)
    }
}

/// Fill `out_values`/`out_indices` with the top-k of `a` described by `plan`
fn topk_fill(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    plan: &SelectPlan,
    largest: bool,
    sorted: bool,
    out_values: &Tensor<CpuRuntime>,
    out_indices: &Tensor<CpuRuntime>,
) -> Result<()> {
    let dtype = a.dtype();
    if plan.k == 0 || plan.out_numel() == 0 {
        return Ok(());
    }

    let a_addr = a.storage().ptr() as usize;
    let values_addr = out_values.storage().ptr() as usize;
    let indices_addr = out_indices.storage().ptr() as usize;
    let SelectPlan {
        outer_size,
        dim_size,
        inner_size,
        k,
        ..
    } = *plan;

    dispatch_dtype!(dtype, T => {
        if client.is_parallel() && plan.lanes() > 1 {
            for_each_lane(
                client,
                plan.lanes(),
                || Vec::<(T, i64)>::with_capacity(dim_size),
                |scratch, lane| unsafe {
                    kernels::topk_lane::<T>(
                        a_addr as *const T,
                        values_addr as *mut T,
                        indices_addr as *mut i64,
                        lane,
                        dim_size,
                        inner_size,
                        k,
                        largest,
                        sorted,
                        scratch,
                    );
                },
            );
        } else {
            unsafe {
                kernels::topk_kernel::<T>(
                    a_addr as *const T,
                    values_addr as *mut T,
                    indices_addr as *mut i64,
                    outer_size,
                    dim_size,
                    inner_size,
                    k,
                    largest,
                    sorted,
                );
            }
        }
    }, "topk");

    Ok(())
}

/// Top-k values and indices along a dimension
pub fn topk_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    k: usize,
    dim: isize,
    largest: bool,
    sorted: bool,
) -> Result<TensorPair> {
    let _span = tracing::trace_span!(
        "topk",
        k,
        dim,
        largest,
        sorted,
        dtype = %a.dtype(),
        shape = ?a.shape()
    )
    .entered();

    let dtype = a.dtype();
    check_dtype(dtype, "topk").inspect_err(rejected("topk"))?;
    let plan = plan_topk(a.shape(), k, dim).inspect_err(rejected("topk"))?;

    let a_contig = ensure_contiguous(a)?;
    let out_values = Tensor::<CpuRuntime>::try_empty(&plan.out_shape, dtype, &client.device)?;
    let out_indices =
        Tensor::<CpuRuntime>::try_empty(&plan.out_shape, DType::index(), &client.device)?;

    topk_fill(
        client,
        &a_contig,
        &plan,
        largest,
        sorted,
        &out_values,
        &out_indices,
    )?;

    Ok((out_values, out_indices))
}

/// Top-k written into caller-provided outputs
///
/// Outputs whose shape, dtype and layout already fit, and that no other
/// tensor shares, are written in place. Anything else is replaced by a fresh
/// tensor. Neither output changes when an error is returned.
#[allow(clippy::too_many_arguments)]
pub fn topk_into_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    k: usize,
    dim: isize,
    largest: bool,
    sorted: bool,
    values: &mut Tensor<CpuRuntime>,
    indices: &mut Tensor<CpuRuntime>,
) -> Result<()> {
    let _span = tracing::trace_span!(
        "topk_into",
        k,
        dim,
        largest,
        sorted,
        dtype = %a.dtype(),
        shape = ?a.shape()
    )
    .entered();

    let dtype = a.dtype();
    check_dtype(dtype, "topk").inspect_err(rejected("topk_into"))?;
    let plan = plan_topk(a.shape(), k, dim).inspect_err(rejected("topk_into"))?;

    let a_contig = ensure_contiguous(a)?;
    let out_values = output_like(client, values, &plan.out_shape, dtype)?;
    let out_indices = output_like(client, indices, &plan.out_shape, DType::index())?;

    topk_fill(
        client,
        &a_contig,
        &plan,
        largest,
        sorted,
        &out_values,
        &out_indices,
    )?;

    *values = out_values;
    *indices = out_indices;
    Ok(())
}

/// k-th smallest value (1-based `k`) and its index along a dimension
pub fn kthvalue_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    k: usize,
    dim: isize,
    keepdim: bool,
) -> Result<TensorPair> {
    let _span = tracing::trace_span!(
        "kthvalue",
        k,
        dim,
        keepdim,
        dtype = %a.dtype(),
        shape = ?a.shape()
    )
    .entered();

    let dtype = a.dtype();
    check_dtype(dtype, "kthvalue").inspect_err(rejected("kthvalue"))?;
    let plan = plan_kthvalue(a.shape(), k, dim, keepdim).inspect_err(rejected("kthvalue"))?;

    let a_contig = ensure_contiguous(a)?;
    let out_values = Tensor::<CpuRuntime>::try_empty(&plan.out_shape, dtype, &client.device)?;
    let out_indices =
        Tensor::<CpuRuntime>::try_empty(&plan.out_shape, DType::index(), &client.device)?;

    if plan.lanes() == 0 {
        return Ok((out_values, out_indices));
    }

    let a_addr = a_contig.storage().ptr() as usize;
    let values_addr = out_values.storage().ptr() as usize;
    let indices_addr = out_indices.storage().ptr() as usize;
    let SelectPlan {
        outer_size,
        dim_size,
        inner_size,
        ..
    } = plan;

    dispatch_dtype!(dtype, T => {
        if client.is_parallel() && plan.lanes() > 1 {
            for_each_lane(
                client,
                plan.lanes(),
                || Vec::<(T, i64)>::with_capacity(dim_size),
                |scratch, lane| unsafe {
                    kernels::kthvalue_lane::<T>(
                        a_addr as *const T,
                        values_addr as *mut T,
                        indices_addr as *mut i64,
                        lane,
                        dim_size,
                        inner_size,
                        k,
                        scratch,
                    );
                },
            );
        } else {
            unsafe {
                kernels::kthvalue_kernel::<T>(
                    a_addr as *const T,
                    values_addr as *mut T,
                    indices_addr as *mut i64,
                    outer_size,
                    dim_size,
                    inner_size,
                    k,
                );
            }
        }
    }, "kthvalue");

    Ok((out_values, out_indices))
}

/// Gradient of top-k with respect to its input
///
/// `grad` and `indices` have the shape of the top-k outputs; the result has
/// `input_shape` and receives `grad` at `indices`, accumulating repeats.
/// Gradients must be floating point.
pub fn topk_backward_impl(
    client: &CpuClient,
    grad: &Tensor<CpuRuntime>,
    indices: &Tensor<CpuRuntime>,
    input_shape: &[usize],
    dim: isize,
) -> Result<Tensor<CpuRuntime>> {
    let _span = tracing::trace_span!(
        "topk_backward",
        dim,
        dtype = %grad.dtype(),
        grad_shape = ?grad.shape(),
        input_shape = ?input_shape
    )
    .entered();

    let dtype = grad.dtype();
    check_dtype(dtype, "topk_backward").inspect_err(rejected("topk_backward"))?;
    if !dtype.is_float() {
        let err = Error::unsupported_dtype(dtype, "topk_backward");
        rejected("topk_backward")(&err);
        return Err(err);
    }
    if indices.dtype() != DType::index() {
        let err = Error::DTypeMismatch {
            lhs: indices.dtype(),
            rhs: DType::index(),
        };
        rejected("topk_backward")(&err);
        return Err(err);
    }
    if indices.shape() != grad.shape() {
        let err = Error::shape_mismatch(grad.shape(), indices.shape());
        rejected("topk_backward")(&err);
        return Err(err);
    }
    let plan =
        plan_topk_backward(grad.shape(), input_shape, dim).inspect_err(rejected("topk_backward"))?;

    let grad_contig = ensure_contiguous(grad)?;
    let indices_contig = ensure_contiguous(indices)?;

    let idx_addr = indices_contig.storage().ptr() as usize;
    let n_idx = indices_contig.numel();
    if n_idx > 0 {
        let idx_slice = unsafe { std::slice::from_raw_parts(idx_addr as *const i64, n_idx) };
        if let Some(&bad) = idx_slice
            .iter()
            .find(|&&i| i < 0 || i as usize >= plan.dim_size)
        {
            let err = Error::IndexOutOfBounds {
                index: bad,
                size: plan.dim_size,
            };
            rejected("topk_backward")(&err);
            return Err(err);
        }
    }

    let out = Tensor::<CpuRuntime>::try_zeros(&plan.out_shape, dtype, &client.device)?;
    if n_idx == 0 {
        return Ok(out);
    }

    let grad_addr = grad_contig.storage().ptr() as usize;
    let out_addr = out.storage().ptr() as usize;

    dispatch_dtype!(dtype, T => {
        unsafe {
            kernels::topk_backward_kernel::<T>(
                grad_addr as *const T,
                idx_addr as *const i64,
                out_addr as *mut T,
                plan.outer_size,
                plan.k,
                plan.dim_size,
                plan.inner_size,
            );
        }
    }, "topk_backward");

    Ok(out)
}
