//! Backend type aliases and device management
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend used by the
//!   actor-critic agent while it learns
//! - **InferenceBackend**: plain NdArray backend for action selection and
//!   value estimates, where no gradients are tracked
//!
//! The maze is tiny and so is the network, so the CPU backend is all we need.
//! The actor-critic agent is generic over [`burn::tensor::backend::AutodiffBackend`];
//! everything else in the crate uses these aliases.
//!
//! # Example
//!
//! ```rust
//! use basurahan_maze::rl::{ActorCriticAgent, AlgorithmSettings, TrainingBackend, default_device};
//!
//! let settings = AlgorithmSettings::default();
//! let agent = ActorCriticAgent::<TrainingBackend>::new(&settings, 6, 6, default_device());
//! assert_eq!(agent.updates(), 0);
//! ```

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

/// Backend type for training (with autodiff)
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;

    #[test]
    fn test_default_device_builds_tensors() {
        let device = default_device();
        let tensor = Tensor::<TrainingBackend, 1>::from_floats([1.0, 2.0], &device);
        assert_eq!(tensor.dims(), [2]);

        let tensor = Tensor::<InferenceBackend, 1>::from_floats([1.0, 2.0], &device);
        assert_eq!(tensor.sum().into_scalar(), 3.0);
    }
}
