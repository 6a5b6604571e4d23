//! Common test utilities
#![allow(dead_code)]

use topkr::runtime::Runtime;
use topkr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use topkr::runtime::ParallelismConfig;

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// Create a CPU client that splits work into many small parallel tasks
pub fn create_parallel_cpu_client(threads: usize) -> (CpuClient, CpuDevice) {
    let (client, device) = create_cpu_client();
    let client = client.with_parallelism(ParallelismConfig::new(Some(threads), Some(1)));
    (client, device)
}

/// Brute-force top-k of one lane: `(value, index)` pairs in rank order
///
/// NaN ranks above every number; equal values rank the lower index first.
pub fn reference_topk(lane: &[f64], k: usize, largest: bool) -> Vec<(f64, i64)> {
    let mut pairs: Vec<(f64, i64)> = lane
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i as i64))
        .collect();
    pairs.sort_by(|a, b| {
        let by_value = if largest {
            b.0.total_cmp(&a.0)
        } else {
            a.0.total_cmp(&b.0)
        };
        by_value.then(a.1.cmp(&b.1))
    });
    pairs.truncate(k);
    pairs
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
