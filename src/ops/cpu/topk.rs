//! CPU implementation of top-k selection operations.

use crate::error::Result;
use crate::ops::{KScalar, TopkOps};
use crate::runtime::cpu::{CpuClient, CpuRuntime, topk};
use crate::tensor::Tensor;

impl TopkOps<CpuRuntime> for CpuClient {
    fn topk(
        &self,
        a: &Tensor<CpuRuntime>,
        k: usize,
        dim: isize,
        largest: bool,
        sorted: bool,
    ) -> Result<(Tensor<CpuRuntime>, Tensor<CpuRuntime>)> {
        topk::topk_impl(self, a, k, dim, largest, sorted)
    }

    fn topk_into(
        &self,
        a: &Tensor<CpuRuntime>,
        k: &KScalar<'_, CpuRuntime>,
        dim: isize,
        largest: bool,
        sorted: bool,
        values: &mut Tensor<CpuRuntime>,
        indices: &mut Tensor<CpuRuntime>,
    ) -> Result<()> {
        let k = k.resolve()?;
        topk::topk_into_impl(self, a, k, dim, largest, sorted, values, indices)
    }

    fn kthvalue(
        &self,
        a: &Tensor<CpuRuntime>,
        k: usize,
        dim: isize,
        keepdim: bool,
    ) -> Result<(Tensor<CpuRuntime>, Tensor<CpuRuntime>)> {
        topk::kthvalue_impl(self, a, k, dim, keepdim)
    }

    fn topk_backward(
        &self,
        grad: &Tensor<CpuRuntime>,
        indices: &Tensor<CpuRuntime>,
        input_shape: &[usize],
        dim: isize,
    ) -> Result<Tensor<CpuRuntime>> {
        topk::topk_backward_impl(self, grad, indices, input_shape, dim)
    }
}
