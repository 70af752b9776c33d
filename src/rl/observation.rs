use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::maze::{Cell, MazeState, Position};

/// Number of observation channels fed to the network
pub const OBSERVATION_CHANNELS: usize = 3;

/// Create a 3-channel observation tensor from the maze state
///
/// Channels:
/// - 0: Robot (1.0 at its position)
/// - 1: Adversary (1.0 at its position)
/// - 2: Remaining trash (1.0 on every uncollected trash cell)
///
/// Returns: Tensor<B, 3> with shape [3, height, width]
pub fn create_observation<B: Backend>(state: &MazeState, device: &B::Device) -> Tensor<B, 3> {
    let agent_channel = position_channel(state, state.agent, device);
    let adversary_channel = position_channel(state, state.adversary, device);
    let trash_channel = trash_channel(state, device);

    Tensor::stack(vec![agent_channel, adversary_channel, trash_channel], 0)
}

/// One-hot channel for a single robot
fn position_channel<B: Backend>(
    state: &MazeState,
    pos: Position,
    device: &B::Device,
) -> Tensor<B, 2> {
    let mut data = vec![0.0f32; state.grid_height * state.grid_width];

    if state.is_in_bounds(pos) {
        data[pos.y as usize * state.grid_width + pos.x as usize] = 1.0;
    }

    let tensor_data = TensorData::new(data, [state.grid_height, state.grid_width]);
    Tensor::<B, 2>::from_data(tensor_data, device)
}

fn trash_channel<B: Backend>(state: &MazeState, device: &B::Device) -> Tensor<B, 2> {
    let data: Vec<f32> = state
        .cells
        .iter()
        .map(|&cell| if cell == Cell::Trash { 1.0 } else { 0.0 })
        .collect();

    let tensor_data = TensorData::new(data, [state.grid_height, state.grid_width]);
    Tensor::<B, 2>::from_data(tensor_data, device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Action, Layout, MazeConfig, MazeEngine};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn classic_state() -> MazeState {
        MazeState::from_layout(&Layout::classic())
    }

    #[test]
    fn test_observation_shape() {
        let device = NdArrayDevice::default();
        let obs = create_observation::<TestBackend>(&classic_state(), &device);
        assert_eq!(obs.shape().dims, [3, 6, 6]);
    }

    #[test]
    fn test_robot_channels() {
        let device = NdArrayDevice::default();
        let state = classic_state();

        let agent = position_channel::<TestBackend>(&state, state.agent, &device).to_data();
        let agent = agent.as_slice::<f32>().unwrap();
        assert_eq!(agent[0], 1.0);
        assert_eq!(agent.iter().sum::<f32>(), 1.0);

        let adversary =
            position_channel::<TestBackend>(&state, state.adversary, &device).to_data();
        let adversary = adversary.as_slice::<f32>().unwrap();
        assert_eq!(adversary[3 * 6 + 3], 1.0);
        assert_eq!(adversary.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_trash_channel_follows_collection() {
        let device = NdArrayDevice::default();
        let engine = MazeEngine::new(MazeConfig::default());
        let mut state = engine.reset();

        let before = trash_channel::<TestBackend>(&state, &device).to_data();
        assert_eq!(before.as_slice::<f32>().unwrap().iter().sum::<f32>(), 3.0);

        engine.step(&mut state, Action::Right);
        engine.step(&mut state, Action::Right);

        let after = trash_channel::<TestBackend>(&state, &device).to_data();
        let after = after.as_slice::<f32>().unwrap();
        assert_eq!(after.iter().sum::<f32>(), 2.0);
        assert_eq!(after[2], 0.0);
    }

    #[test]
    fn test_custom_grid_shape() {
        let device = NdArrayDevice::default();
        let layout = Layout::parse("A.T.\n.RE.").unwrap();
        let state = MazeState::from_layout(&layout);
        let obs = create_observation::<TestBackend>(&state, &device);
        assert_eq!(obs.shape().dims, [3, 2, 4]);
    }
}
