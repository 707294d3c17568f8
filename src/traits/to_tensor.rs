use burn::{prelude::*, tensor::BasicOps};

/// A trait for converting items to tensors
///
/// Implemented for slices of fixed-size rows so a batch of state or target
/// vectors becomes one `[batch, A]` tensor.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B, const A: usize> ToTensor<B, 2, Float> for &[[f32; A]]
where
    B: Backend,
{
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2> {
        let data = Data::new(
            self.iter().flatten().copied().collect::<Vec<f32>>(),
            Shape::new([self.len(), A]),
        );
        Tensor::from_floats(data, device)
    }
}

impl<B, const A: usize> ToTensor<B, 2, Float> for &[f32; A]
where
    B: Backend,
{
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::from_floats(Data::new(self.to_vec(), Shape::new([1, A])), device)
    }
}
