//! One-step actor-critic agent
//!
//! The network is updated after every transition with two optimizers: the
//! critic step regresses `V(s)` onto the one-step target, then the actor step
//! follows `log π(a|s) · advantage` plus an entropy bonus on a fresh forward
//! pass. Policy logits are divided by the temperature `β` both when sampling and
//! when training.

use burn::{
    module::AutodiffModule,
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{
        ElementConversion, Int, Tensor,
        activation::{log_softmax, softmax},
        backend::{AutodiffBackend, Backend},
    },
};
use rand::{Rng, distributions::Standard, rngs::StdRng};

use super::agent::{Agent, Algorithm, LossReport, Transition, explore};
use super::network::{ActorCriticConfig, ActorCriticNetwork};
use super::observation::create_observation;
use super::q_table::ActionValues;
use super::settings::AlgorithmSettings;
use crate::maze::{Action, MazeState};

pub struct ActorCriticAgent<B: AutodiffBackend> {
    network: ActorCriticNetwork<B>,

    /// Stepped with the policy loss
    actor_optim: OptimizerAdaptor<Adam, ActorCriticNetwork<B>, B>,

    /// Stepped with the value loss
    critic_optim: OptimizerAdaptor<Adam, ActorCriticNetwork<B>, B>,

    settings: AlgorithmSettings,

    /// Gradient updates performed so far
    updates: usize,

    episodes_trained: usize,

    grid_height: usize,
    grid_width: usize,

    rng: StdRng,
    device: B::Device,
}

impl<B: AutodiffBackend> ActorCriticAgent<B> {
    /// Create an agent with a freshly initialised network
    pub fn new(
        settings: &AlgorithmSettings,
        grid_height: usize,
        grid_width: usize,
        device: B::Device,
    ) -> Self {
        let network = ActorCriticConfig::new(grid_height, grid_width).init::<B>(&device);
        Self::with_network(network, settings, grid_height, grid_width, device)
    }

    /// Wrap an existing network, e.g. one restored from disk
    pub fn with_network(
        network: ActorCriticNetwork<B>,
        settings: &AlgorithmSettings,
        grid_height: usize,
        grid_width: usize,
        device: B::Device,
    ) -> Self {
        Self {
            network,
            actor_optim: AdamConfig::new().init(),
            critic_optim: AdamConfig::new().init(),
            settings: settings.clone(),
            updates: 0,
            episodes_trained: 0,
            grid_height,
            grid_width,
            rng: settings.rng(),
            device,
        }
    }

    /// Action probabilities after temperature scaling
    pub fn policy(&self, state: &MazeState) -> [f32; Action::COUNT] {
        let (logits, _) = self.infer(state);
        let probs = softmax(logits.div_scalar(self.settings.beta), 1);
        let mut out = [0.0; Action::COUNT];
        if let Ok(values) = probs.into_data().to_vec::<f32>() {
            for (slot, value) in out.iter_mut().zip(values) {
                *slot = value;
            }
        }
        out
    }

    fn infer(&self, state: &MazeState) -> (Tensor<B::InnerBackend, 2>, Tensor<B::InnerBackend, 2>) {
        let network = self.network.clone().valid();
        let obs = create_observation::<B::InnerBackend>(state, &self.device).unsqueeze_dim(0);
        network.forward(obs)
    }

    fn value_of(&self, state: &MazeState) -> f32 {
        let (_, value) = self.infer(state);
        value.squeeze::<1>(1).into_scalar().elem::<f32>()
    }

    /// One-step TD target; only a terminated transition drops the bootstrap
    fn td_target(&self, transition: &Transition) -> f32 {
        let next_value = if transition.terminated {
            0.0
        } else {
            self.value_of(&transition.next_state)
        };
        transition.reward + self.settings.gamma * next_value
    }

    fn critic_step(&mut self, obs: Tensor<B, 4>, target: f32) -> (f32, f32) {
        let (_, value) = self.network.forward(obs);
        let value = value.squeeze::<1>(1);
        let estimate = value.clone().into_scalar().elem::<f32>();

        let diff = value.sub_scalar(target);
        let value_loss = (diff.clone() * diff).mul_scalar(self.settings.value_weight);
        let loss_scalar = value_loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(value_loss.backward(), &self.network);
        self.network = self.critic_optim.step(
            self.settings.critic_lr as f64,
            self.network.clone(),
            grads,
        );

        (estimate, loss_scalar)
    }

    fn actor_step(&mut self, obs: Tensor<B, 4>, action: Action, advantage: f32) -> (f32, f32) {
        let (logits, _) = self.network.forward(obs);
        let log_probs = log_softmax(logits.div_scalar(self.settings.beta), 1);
        let probs = log_probs.clone().exp();

        let action_tensor = Tensor::<B, 1, Int>::from_ints([action.index() as i32], &self.device);
        let log_prob = log_probs
            .clone()
            .gather(1, action_tensor.unsqueeze_dim(1))
            .squeeze::<1>(1);
        let entropy = (probs * log_probs).sum_dim(1).neg().squeeze::<1>(1);

        let policy_loss = log_prob
            .mul_scalar(-self.settings.advantage_weight * advantage)
            - entropy.clone().mul_scalar(self.settings.entropy_weight);

        let loss_scalar = policy_loss.clone().into_scalar().elem::<f32>();
        let entropy_scalar = entropy.into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(policy_loss.backward(), &self.network);
        self.network = self.actor_optim.step(
            self.settings.actor_lr as f64,
            self.network.clone(),
            grads,
        );

        (loss_scalar, entropy_scalar)
    }

    pub fn network(&self) -> &ActorCriticNetwork<B> {
        &self.network
    }

    pub fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }
}

impl<B: AutodiffBackend> Agent for ActorCriticAgent<B> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ActorCritic
    }

    fn select_action(&mut self, state: &MazeState) -> Action {
        if let Some(action) = explore(&mut self.rng, self.settings.epsilon) {
            return action;
        }

        let (logits, _) = self.infer(state);
        let probs = softmax(logits.div_scalar(self.settings.beta), 1);
        let idx = sample_categorical(probs, &mut self.rng);
        Action::from_index(idx).unwrap_or(Action::Up)
    }

    fn observe(&mut self, transition: &Transition) -> Option<LossReport> {
        let target = self.td_target(transition);

        let obs = create_observation::<B>(&transition.state, &self.device).unsqueeze_dim(0);

        let (estimate, value_loss) = self.critic_step(obs.clone(), target);
        let advantage = target - estimate;
        let (policy_loss, entropy) = self.actor_step(obs, transition.action, advantage);

        self.updates += 1;

        Some(LossReport {
            policy_loss,
            value_loss,
            entropy,
        })
    }

    fn end_episode(&mut self) {
        self.episodes_trained += 1;
    }

    fn state_value(&self, state: &MazeState) -> Option<f32> {
        Some(self.value_of(state))
    }

    fn action_values(&self) -> Option<&ActionValues> {
        None
    }
}

/// Sample an index from a `[1, n]` probability tensor
fn sample_categorical<B: Backend>(probs: Tensor<B, 2>, rng: &mut StdRng) -> usize {
    let probs: Vec<f32> = probs.into_data().to_vec().unwrap_or_default();

    let random_val: f32 = rng.sample(Standard);
    let mut cumsum = 0.0;
    for (idx, &prob) in probs.iter().enumerate() {
        cumsum += prob;
        if random_val < cumsum {
            return idx;
        }
    }

    probs.len().saturating_sub(1)
}
