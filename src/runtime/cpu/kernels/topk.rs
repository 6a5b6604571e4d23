//! Selection kernels: top-k, k-th value and the top-k gradient scatter
//!
//! All kernels view the input as `[outer_size, sort_size, inner_size]` and
//! process each `(outer, inner)` lane independently. Lanes are numbered
//! `outer * inner_size + inner`.
//!
//! Elements are ranked by a total order: NaN compares greater than every
//! other value and equal to another NaN, and equal values rank the lower
//! original index first.

use crate::dtype::Element;
use std::cmp::Ordering;

/// Total order over elements with NaN as the greatest value
#[inline]
#[allow(clippy::eq_op)]
pub fn total_cmp<T: Element>(a: &T, b: &T) -> Ordering {
    match a.partial_cmp(b) {
        Some(ord) => ord,
        // Only NaN is unequal to itself
        None => match (a != a, b != b) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        },
    }
}

/// Rank `(value, index)` pairs: best value first, then lower index
#[inline]
fn rank<T: Element>(x: &(T, i64), y: &(T, i64), largest: bool) -> Ordering {
    let by_value = if largest {
        total_cmp(&y.0, &x.0)
    } else {
        total_cmp(&x.0, &y.0)
    };
    by_value.then(x.1.cmp(&y.1))
}

/// Gather one lane into `scratch` as `(value, index)` pairs
#[inline]
unsafe fn gather_lane<T: Element>(
    a: *const T,
    lane: usize,
    sort_size: usize,
    inner_size: usize,
    scratch: &mut Vec<(T, i64)>,
) -> (usize, usize) {
    let outer = lane / inner_size;
    let inner = lane % inner_size;
    let base = outer * sort_size * inner_size + inner;

    scratch.clear();
    for i in 0..sort_size {
        scratch.push((*a.add(base + i * inner_size), i as i64));
    }
    (outer, inner)
}

/// Top-k of a single lane
///
/// # Safety
/// - `a` must point to `outer_size * sort_size * inner_size` elements
/// - `out_values` and `out_indices` must point to `outer_size * k * inner_size` elements
/// - `lane < outer_size * inner_size` and `1 <= k <= sort_size`
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn topk_lane<T: Element>(
    a: *const T,
    out_values: *mut T,
    out_indices: *mut i64,
    lane: usize,
    sort_size: usize,
    inner_size: usize,
    k: usize,
    largest: bool,
    sorted: bool,
    scratch: &mut Vec<(T, i64)>,
) {
    let (outer, inner) = gather_lane(a, lane, sort_size, inner_size, scratch);

    if k < sort_size {
        scratch.select_nth_unstable_by(k - 1, |x, y| rank(x, y, largest));
        scratch.truncate(k);
    }

    // Ranks are distinct (indices break every tie), so unstable sorts are deterministic.
    if sorted {
        scratch.sort_unstable_by(|x, y| rank(x, y, largest));
    } else {
        scratch.sort_unstable_by_key(|&(_, idx)| idx);
    }

    let out_base = outer * k * inner_size + inner;
    for (i, &(val, idx)) in scratch.iter().enumerate() {
        let out_idx = out_base + i * inner_size;
        *out_values.add(out_idx) = val;
        *out_indices.add(out_idx) = idx;
    }
}

/// Find top-k values along a dimension
///
/// # Safety
/// - `a` must point to `outer_size * sort_size * inner_size` elements
/// - `out_values` must point to `outer_size * k * inner_size` elements
/// - `out_indices` must point to `outer_size * k * inner_size` i64 elements
/// - `k` must be <= `sort_size`
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn topk_kernel<T: Element>(
    a: *const T,
    out_values: *mut T,
    out_indices: *mut i64,
    outer_size: usize,
    sort_size: usize,
    inner_size: usize,
    k: usize,
    largest: bool,
    sorted: bool,
) {
    if sort_size == 0 || k == 0 {
        return;
    }

    let mut scratch = Vec::with_capacity(sort_size);
    for lane in 0..outer_size * inner_size {
        topk_lane(
            a,
            out_values,
            out_indices,
            lane,
            sort_size,
            inner_size,
            k,
            largest,
            sorted,
            &mut scratch,
        );
    }
}

/// k-th smallest element (1-based `k`) of a single lane
///
/// The result is written at position `lane` of the outputs.
///
/// # Safety
/// - `a` must point to `outer_size * sort_size * inner_size` elements
/// - `out_values` and `out_indices` must point to `outer_size * inner_size` elements
/// - `lane < outer_size * inner_size` and `1 <= k <= sort_size`
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn kthvalue_lane<T: Element>(
    a: *const T,
    out_values: *mut T,
    out_indices: *mut i64,
    lane: usize,
    sort_size: usize,
    inner_size: usize,
    k: usize,
    scratch: &mut Vec<(T, i64)>,
) {
    gather_lane(a, lane, sort_size, inner_size, scratch);
    let (_, &mut (val, idx), _) = scratch.select_nth_unstable_by(k - 1, |x, y| rank(x, y, false));
    *out_values.add(lane) = val;
    *out_indices.add(lane) = idx;
}

/// k-th smallest element (1-based `k`) along a dimension
///
/// # Safety
/// - `a` must point to `outer_size * sort_size * inner_size` elements
/// - `out_values` and `out_indices` must point to `outer_size * inner_size` elements
/// - `1 <= k <= sort_size`
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn kthvalue_kernel<T: Element>(
    a: *const T,
    out_values: *mut T,
    out_indices: *mut i64,
    outer_size: usize,
    sort_size: usize,
    inner_size: usize,
    k: usize,
) {
    if sort_size == 0 || k == 0 {
        return;
    }

    let mut scratch = Vec::with_capacity(sort_size);
    for lane in 0..outer_size * inner_size {
        kthvalue_lane(
            a,
            out_values,
            out_indices,
            lane,
            sort_size,
            inner_size,
            k,
            &mut scratch,
        );
    }
}

/// Scatter-add `grad` into `out` at `indices` along the selected dimension
///
/// # Safety
/// - `grad` and `indices` must point to `outer_size * k * inner_size` elements
/// - `out` must point to `outer_size * dim_size * inner_size` zero-initialized elements
/// - every index must lie in `0..dim_size`
#[inline]
pub unsafe fn topk_backward_kernel<T: Element>(
    grad: *const T,
    indices: *const i64,
    out: *mut T,
    outer_size: usize,
    k: usize,
    dim_size: usize,
    inner_size: usize,
) {
    for outer in 0..outer_size {
        for i in 0..k {
            for inner in 0..inner_size {
                let src = outer * k * inner_size + i * inner_size + inner;
                let idx = *indices.add(src) as usize;
                let dst = outer * dim_size * inner_size + idx * inner_size + inner;
                *out.add(dst) = *out.add(dst) + *grad.add(src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cmp_nan_is_greatest() {
        assert_eq!(total_cmp(&f32::NAN, &f32::INFINITY), Ordering::Greater);
        assert_eq!(total_cmp(&1.0f64, &f64::NAN), Ordering::Less);
        assert_eq!(total_cmp(&f32::NAN, &f32::NAN), Ordering::Equal);
        assert_eq!(total_cmp(&-0.0f32, &0.0), Ordering::Equal);
        assert_eq!(total_cmp(&3i32, &2), Ordering::Greater);
    }

    #[test]
    fn test_topk() {
        let a = [3.0f32, 1.0, 4.0, 1.0, 5.0];
        let mut values = [0.0f32; 2];
        let mut indices = [0i64; 2];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                5,
                1,
                2,
                true, // largest
                true, // sorted
            );
        }

        assert_eq!(values, [5.0, 4.0]);
        assert_eq!(indices, [4, 2]);
    }

    #[test]
    fn test_topk_largest_three() {
        let a = [3i32, 1, 4, 1, 5, 9, 2, 6];
        let mut values = [0i32; 3];
        let mut indices = [0i64; 3];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                8,
                1,
                3,
                true,
                true,
            );
        }

        assert_eq!(values, [9, 6, 5]);
        assert_eq!(indices, [5, 7, 4]);
    }

    #[test]
    fn test_topk_smallest_ties_prefer_lower_index() {
        let a = [3.0f64, 1.0, 4.0, 1.0, 5.0];
        let mut values = [0.0f64; 2];
        let mut indices = [0i64; 2];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                5,
                1,
                2,
                false,
                true,
            );
        }

        assert_eq!(values, [1.0, 1.0]);
        assert_eq!(indices, [1, 3]);
    }

    #[test]
    fn test_topk_unsorted_keeps_index_order() {
        let a = [3u8, 1, 4, 1, 5, 9, 2, 6];
        let mut values = [0u8; 3];
        let mut indices = [0i64; 3];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                8,
                1,
                3,
                true,
                false,
            );
        }

        assert_eq!(indices, [4, 5, 7]);
        assert_eq!(values, [5, 9, 6]);
    }

    #[test]
    fn test_topk_inner_lanes() {
        // [3, 2] along dim 0: columns [1, 5, 3] and [6, 2, 4]
        let a = [1.0f32, 6.0, 5.0, 2.0, 3.0, 4.0];
        let mut values = [0.0f32; 2];
        let mut indices = [0i64; 2];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                3,
                2,
                1,
                true,
                true,
            );
        }

        assert_eq!(values, [5.0, 6.0]);
        assert_eq!(indices, [1, 0]);
    }

    #[test]
    fn test_topk_nan_selected_first() {
        let a = [1.0f32, f32::NAN, 3.0];
        let mut values = [0.0f32; 2];
        let mut indices = [0i64; 2];

        unsafe {
            topk_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                1,
                3,
                1,
                2,
                true,
                true,
            );
        }

        assert!(values[0].is_nan());
        assert_eq!(values[1], 3.0);
        assert_eq!(indices, [1, 2]);
    }

    #[test]
    fn test_kthvalue() {
        let a = [3.0f32, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let mut values = [0.0f32; 2];
        let mut indices = [0i64; 2];

        // two lanes of four: [3, 1, 4, 1] and [5, 9, 2, 6]
        unsafe {
            kthvalue_kernel(
                a.as_ptr(),
                values.as_mut_ptr(),
                indices.as_mut_ptr(),
                2,
                4,
                1,
                2,
            );
        }

        assert_eq!(values, [1.0, 5.0]);
        assert_eq!(indices, [3, 0]);
    }

    #[test]
    fn test_topk_backward_scatter() {
        let grad = [1.0f32, 2.0, 3.0, 4.0];
        let indices = [2i64, 0, 1, 1];
        let mut out = [0.0f32; 6];

        // two lanes of three, k = 2
        unsafe {
            topk_backward_kernel(
                grad.as_ptr(),
                indices.as_ptr(),
                out.as_mut_ptr(),
                2,
                2,
                3,
                1,
            );
        }

        assert_eq!(out, [2.0, 0.0, 1.0, 0.0, 7.0, 0.0]);
    }
}
