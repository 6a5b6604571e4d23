//! Integration tests for CPU runtime
//!
//! These tests verify the public API of the CPU runtime implementation.

use topkr::dtype::DType;
use topkr::runtime::cpu::{CpuDevice, CpuRuntime};
use topkr::runtime::{Device, Runtime, RuntimeClient};
use topkr::tensor::Tensor;

#[test]
fn test_allocate_deallocate() {
    let device = CpuDevice::new();
    let ptr = CpuRuntime::allocate(1024, &device).unwrap();
    assert_ne!(ptr, 0);
    assert_eq!(ptr % 64, 0);
    CpuRuntime::deallocate(ptr, 1024, &device);
}

#[test]
fn test_copy_roundtrip() {
    let device = CpuDevice::new();
    let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8];

    let ptr = CpuRuntime::allocate(data.len(), &device).unwrap();
    CpuRuntime::copy_to_device(&data, ptr, &device).unwrap();

    let mut result = vec![0u8; data.len()];
    CpuRuntime::copy_from_device(ptr, &mut result, &device).unwrap();

    assert_eq!(data, result);

    CpuRuntime::deallocate(ptr, data.len(), &device);
}

#[test]
fn test_zero_allocation() {
    let device = CpuDevice::new();
    let ptr = CpuRuntime::allocate(0, &device).unwrap();
    assert_eq!(ptr, 0);
    CpuRuntime::deallocate(ptr, 0, &device); // Should not panic
}

#[test]
fn test_huge_allocation_is_an_error() {
    let device = CpuDevice::new();
    let result = CpuRuntime::allocate(usize::MAX - 8, &device);
    assert!(matches!(
        result,
        Err(topkr::error::Error::OutOfMemory { .. })
    ));
}

#[test]
fn test_device_and_client() {
    let device = CpuRuntime::default_device();
    assert_eq!(device.id(), 0);
    assert_eq!(device.name(), "cpu");
    assert!(device.is_same(&CpuDevice::new()));
    assert_eq!(CpuRuntime::name(), "cpu");

    let client = CpuRuntime::default_client(&device);
    assert_eq!(client.device().id(), device.id());
    client.synchronize();
}

#[test]
fn test_tensor_creation() {
    let device = CpuDevice::new();
    let tensor = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device);

    assert_eq!(tensor.shape(), &[2, 2]);
    assert_eq!(tensor.strides(), &[2, 1]);
    assert_eq!(tensor.ndim(), 2);
    assert_eq!(tensor.numel(), 4);
    assert_eq!(tensor.dtype(), DType::F32);
    assert_eq!(tensor.size(-1), Some(2));
}

#[test]
fn test_tensor_transpose_shares_storage() {
    let device = CpuDevice::new();
    let tensor = Tensor::<CpuRuntime>::from_slice(&[1i64, 2, 3, 4, 5, 6], &[2, 3], &device);
    let transposed = tensor.transpose(0, 1).unwrap();

    assert_eq!(transposed.shape(), &[3, 2]);
    assert_eq!(transposed.storage().ptr(), tensor.storage().ptr());
    assert!(!tensor.storage().is_unique());

    let data: Vec<i64> = transposed.to_vec();
    assert_eq!(data, [1, 4, 2, 5, 3, 6]);
}

#[test]
fn test_tensor_zeros_all_dtypes() {
    let device = CpuDevice::new();
    for dtype in [DType::F64, DType::F32, DType::I32, DType::U8, DType::Bool] {
        let tensor = Tensor::<CpuRuntime>::zeros(&[3], dtype, &device);
        assert_eq!(tensor.dtype(), dtype);
        assert_eq!(tensor.storage().size_in_bytes(), 3 * dtype.size_in_bytes());
    }
}
