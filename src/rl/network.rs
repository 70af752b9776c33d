//! Two-head actor-critic network
//!
//! A small fully connected network shared by the policy and the value
//! estimate:
//! - **Actor head**: action logits for the four moves, turned into a policy by
//!   a temperature-scaled softmax in the agent
//! - **Critic head**: scalar estimate of the state value `V(s)`
//!
//! The shared trunk receives gradients from both losses; each head only from
//! its own.
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 3, H, W]
//!   ↓ Flatten: [batch, 3*H*W]
//!   ↓ Linear(3*H*W → 128) + ReLU
//!   ↓ Linear(128 → 64) + ReLU
//!   ↓ Split
//!   ├─→ Actor: Linear(64 → 32) + ReLU → Linear(32 → 4) → Action logits
//!   └─→ Critic: Linear(64 → 32) + ReLU → Linear(32 → 1) → Value estimate
//! ```
//!
//! The input is the observation built by
//! [`create_observation`](super::observation::create_observation):
//! - Channel 0: robot position
//! - Channel 1: adversary position
//! - Channel 2: remaining trash
//!
//! # Example
//!
//! ```rust
//! use basurahan_maze::rl::{ActorCriticConfig, ActorCriticNetwork};
//! use burn::backend::NdArray;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! // Network for the classic 6x6 maze
//! let device = NdArrayDevice::default();
//! let network: ActorCriticNetwork<Backend> = ActorCriticConfig::new(6, 6).init(&device);
//!
//! // Forward pass with a batch of two observations
//! let observation = Tensor::zeros([2, 3, 6, 6], &device);
//! let (action_logits, value) = network.forward(observation);
//!
//! assert_eq!(action_logits.dims(), [2, 4]); // [batch, num_actions]
//! assert_eq!(value.dims(), [2, 1]);         // [batch, 1]
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};

use super::observation::OBSERVATION_CHANNELS;
use crate::maze::Action;

/// Configuration for the actor-critic network
#[derive(Debug, Clone)]
pub struct ActorCriticConfig {
    /// Number of input channels
    pub input_channels: usize,

    /// Number of actions the policy can output
    pub num_actions: usize,

    pub grid_height: usize,
    pub grid_width: usize,

    /// Widths of the two shared layers (default: [128, 64])
    pub shared_dims: [usize; 2],

    /// Width of the hidden layer in each head (default: 32)
    pub head_dim: usize,
}

impl ActorCriticConfig {
    pub fn new(grid_height: usize, grid_width: usize) -> Self {
        Self {
            input_channels: OBSERVATION_CHANNELS,
            num_actions: Action::COUNT,
            grid_height,
            grid_width,
            shared_dims: [128, 64],
            head_dim: 32,
        }
    }

    /// Flattened observation size
    pub fn input_dim(&self) -> usize {
        self.input_channels * self.grid_height * self.grid_width
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> ActorCriticNetwork<B> {
        let [shared1, shared2] = self.shared_dims;

        ActorCriticNetwork {
            shared1: LinearConfig::new(self.input_dim(), shared1).init(device),
            shared2: LinearConfig::new(shared1, shared2).init(device),
            actor_hidden: LinearConfig::new(shared2, self.head_dim).init(device),
            actor_out: LinearConfig::new(self.head_dim, self.num_actions).init(device),
            critic_hidden: LinearConfig::new(shared2, self.head_dim).init(device),
            critic_out: LinearConfig::new(self.head_dim, 1).init(device),
        }
    }
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self::new(6, 6)
    }
}

/// Actor-critic multilayer perceptron
///
/// Generic over the backend so the same module trains under `Autodiff` and
/// runs inference on the plain backend via `valid()`.
#[derive(Module, Debug)]
pub struct ActorCriticNetwork<B: Backend> {
    shared1: Linear<B>,
    shared2: Linear<B>,
    actor_hidden: Linear<B>,
    actor_out: Linear<B>,
    critic_hidden: Linear<B>,
    critic_out: Linear<B>,
}

impl<B: Backend> ActorCriticNetwork<B> {
    /// Forward pass
    ///
    /// * `observation` - `[batch, 3, height, width]`
    ///
    /// Returns `(action_logits [batch, 4], value [batch, 1])`.
    pub fn forward(&self, observation: Tensor<B, 4>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, channels, height, width] = observation.dims();
        let x = observation.reshape([batch_size, channels * height * width]);

        let x = relu(self.shared1.forward(x));
        let x = relu(self.shared2.forward(x));

        let actor = relu(self.actor_hidden.forward(x.clone()));
        let action_logits = self.actor_out.forward(actor);

        let critic = relu(self.critic_hidden.forward(x));
        let value = self.critic_out.forward(critic);

        (action_logits, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::Autodiff;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use burn::tensor::{Distribution, TensorData};

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_forward_pass_shapes() {
        let device = NdArrayDevice::default();
        let network = ActorCriticConfig::new(6, 6).init::<TestBackend>(&device);

        let observation = Tensor::zeros([2, 3, 6, 6], &device);
        let (action_logits, value) = network.forward(observation);

        assert_eq!(action_logits.dims(), [2, 4]);
        assert_eq!(value.dims(), [2, 1]);
    }

    #[test]
    fn test_non_square_grid() {
        let device = NdArrayDevice::default();
        let config = ActorCriticConfig::new(4, 9);
        assert_eq!(config.input_dim(), 3 * 4 * 9);

        let network = config.init::<TestBackend>(&device);
        let (logits, value) = network.forward(Tensor::zeros([1, 3, 4, 9], &device));
        assert_eq!(logits.dims(), [1, 4]);
        assert_eq!(value.dims(), [1, 1]);
    }

    #[test]
    fn test_gradient_flow() {
        let device = NdArrayDevice::default();
        let network = ActorCriticConfig::new(6, 6).init::<TestAutodiffBackend>(&device);

        let observation = Tensor::ones([1, 3, 6, 6], &device).require_grad();
        let (action_logits, value) = network.forward(observation.clone());
        let loss = action_logits.sum() + value.sum();
        let gradients = loss.backward();

        assert!(observation.grad(&gradients).is_some());
    }

    #[test]
    fn test_output_finite() {
        let device = NdArrayDevice::default();
        let network = ActorCriticConfig::new(6, 6).init::<TestBackend>(&device);

        let observation = Tensor::random([8, 3, 6, 6], Distribution::Uniform(0.0, 1.0), &device);
        let (action_logits, value) = network.forward(observation);

        let logits_data: TensorData = action_logits.into_data();
        for &val in logits_data.as_slice::<f32>().unwrap() {
            assert!(val.is_finite(), "Logits should be finite, got: {}", val);
        }
        let value_data: TensorData = value.into_data();
        for &val in value_data.as_slice::<f32>().unwrap() {
            assert!(val.is_finite(), "Values should be finite, got: {}", val);
        }
    }

    #[test]
    fn test_with_real_observation() {
        use crate::maze::{Layout, MazeState};
        use crate::rl::create_observation;

        let device = NdArrayDevice::default();
        let state = MazeState::from_layout(&Layout::classic());
        let obs = create_observation::<TestBackend>(&state, &device).unsqueeze_dim(0);

        let network = ActorCriticConfig::new(6, 6).init::<TestBackend>(&device);
        let (logits, value) = network.forward(obs);

        assert_eq!(logits.dims(), [1, 4]);
        assert_eq!(value.dims(), [1, 1]);
    }
}
