//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::ops::Add;

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to the runtime dtype system.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `Add` - Gradient accumulation in `topk_backward` (float dtypes only)
/// - `PartialOrd` - Ordering for selection kernels (NaN handled by the kernels)
pub trait Element:
    Copy + Send + Sync + Pod + Zeroable + 'static + Add<Output = Self> + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident;)*) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element! {
    f64 => F64;
    f32 => F32;
    i64 => I64;
    i32 => I32;
    i16 => I16;
    i8 => I8;
    u64 => U64;
    u32 => U32;
    u16 => U16;
    u8 => U8;
}

// Note: bool doesn't implement Pod, so Bool tensors have no Element type and
// are rejected by the dtype dispatch.

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_dtypes() {
        assert_eq!(f32::DTYPE, DType::F32);
        assert_eq!(f64::DTYPE, DType::F64);
        assert_eq!(i64::DTYPE, DType::I64);
        assert_eq!(u8::DTYPE, DType::U8);
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_half_elements() {
        assert_eq!(half::f16::DTYPE, DType::F16);
        assert_eq!(half::bf16::DTYPE, DType::BF16);
    }
}
