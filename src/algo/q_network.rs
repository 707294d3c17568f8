use burn::{
    module::AutodiffModule,
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    optim::{AdaGradConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::relu, backend::AutodiffBackend, ElementConversion},
};

use crate::{gym::StateVector, traits::ToTensor};

use super::dqn::{ActionValues, ValueModel, NUM_ACTIONS};

/// Two fully connected layers: ReLU hidden units and a linear output per action
#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    hidden: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> Mlp<B> {
    /// In shape: `[batch, inputs]`
    ///
    /// Out shape: `[batch, outputs]`
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden.forward(input));
        self.output.forward(x)
    }
}

#[derive(Config, Debug)]
pub struct QNetworkConfig {
    #[config(default = 4)]
    pub inputs: usize,
    #[config(default = 10)]
    pub hidden: usize,
    #[config(default = 4)]
    pub outputs: usize,
    /// AdaGrad learning rate
    #[config(default = 0.1)]
    pub lr: f64,
}

impl QNetworkConfig {
    pub fn init<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> QNetwork<B, impl Optimizer<Mlp<B>, B>> {
        assert_eq!(self.outputs, NUM_ACTIONS, "One output per action is required.");
        let model = Mlp {
            hidden: LinearConfig::new(self.inputs, self.hidden).init(device),
            output: LinearConfig::new(self.hidden, self.outputs).init(device),
        };

        QNetwork {
            model,
            optimizer: AdaGradConfig::new().init::<B, Mlp<B>>(),
            loss: MseLoss::new(),
            lr: self.lr,
            device: device.clone(),
        }
    }
}

/// A [`ValueModel`] backed by a burn [`Mlp`], trained on mean squared error
///
/// ### Generics
/// - `B`: A burn autodiff backend
/// - `O`: The [`Optimizer`], AdaGrad when built from [`QNetworkConfig::init`]
pub struct QNetwork<B: AutodiffBackend, O> {
    model: Mlp<B>,
    optimizer: O,
    loss: MseLoss<B>,
    lr: f64,
    device: B::Device,
}

impl<B: AutodiffBackend, O> QNetwork<B, O> {
    fn infer(&self, states: &[StateVector]) -> Tensor<B::InnerBackend, 2> {
        self.model.valid().forward(states.to_tensor(&self.device))
    }
}

impl<B, O> ValueModel for QNetwork<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<Mlp<B>, B>,
{
    fn predict(&self, states: &[StateVector]) -> Vec<ActionValues> {
        self.infer(states)
            .into_data()
            .convert::<f32>()
            .value
            .chunks_exact(NUM_ACTIONS)
            .map(|row| std::array::from_fn(|i| row[i]))
            .collect()
    }

    fn best_action(&self, state: &StateVector) -> usize {
        let ix = self
            .infer(std::slice::from_ref(state))
            .argmax(1)
            .into_scalar()
            .elem::<i64>();
        ix as usize
    }

    fn train_step(&mut self, states: &[StateVector], targets: &[ActionValues]) -> f32 {
        let output = self.model.forward(states.to_tensor(&self.device));
        let targets: Tensor<B, 2> = targets.to_tensor(&self.device);
        let loss = self.loss.forward(output, targets, Reduction::Mean);
        let value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optimizer.step(self.lr, self.model.clone(), grads);

        value
    }

    fn first_layer_weights(&self) -> Vec<Vec<f32>> {
        let weight = self.model.hidden.weight.val();
        let [_, units] = weight.dims();
        weight
            .into_data()
            .convert::<f32>()
            .value
            .chunks_exact(units)
            .map(<[f32]>::to_vec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::{Autodiff, NdArray};

    use crate::{
        algo::DQNAgentConfig,
        exploration::EpsilonGreedy,
        sim::{Simulation, REPORT_EVERY},
        util::argmax,
    };

    use super::*;

    type TestBackend = Autodiff<NdArray>;

    fn network() -> QNetwork<TestBackend, impl Optimizer<Mlp<TestBackend>, TestBackend>> {
        TestBackend::seed(17);
        QNetworkConfig::new().init::<TestBackend>(&Default::default())
    }

    #[test]
    fn predict_shapes() {
        let net = network();
        let states = [[0.1, 0.2, 0.3, 0.4], [0.9, 0.8, 0.7, 0.6], [0.5; 4]];
        let values = net.predict(&states);
        assert_eq!(values.len(), 3, "one row per state");
        assert!(
            values.iter().flatten().all(|v| v.is_finite()),
            "finite predictions"
        );
    }

    #[test]
    fn best_action_is_argmax_of_prediction() {
        let net = network();
        for state in [[0.1, 0.2, 0.3, 0.4], [0.95, 0.05, 0.5, 0.5], [0.0; 4]] {
            let values = net.predict(&[state]);
            assert_eq!(net.best_action(&state), argmax(&values[0]), "argmax agrees");
        }
    }

    #[test]
    fn train_step_reduces_loss() {
        let mut net = network();
        let states = [[0.1, 0.2, 0.3, 0.4], [0.5, 0.5, 0.1, 0.9], [0.8, 0.3, 0.6, 0.2]];
        let targets = [
            [1.0, 0.0, -1.0, 0.5],
            [0.0, 1.0, 0.5, -0.5],
            [-0.5, 0.5, 1.0, 0.0],
        ];

        let first = net.train_step(&states, &targets);
        let mut last = first;
        for _ in 0..100 {
            last = net.train_step(&states, &targets);
        }
        assert!(last < first, "loss went from {first} to {last}");
    }

    #[test]
    fn first_layer_weights_shape() {
        let net = network();
        let weights = net.first_layer_weights();
        assert_eq!(weights.len(), 4, "one row per input");
        assert!(weights.iter().all(|row| row.len() == 10), "one column per unit");
    }

    #[test]
    #[should_panic(expected = "One output per action")]
    fn wrong_output_count_panics() {
        QNetworkConfig::new()
            .with_outputs(3)
            .init::<TestBackend>(&Default::default());
    }

    #[test]
    fn simulation_trains_network() {
        let config = DQNAgentConfig {
            memory_capacity: 100,
            batch_size: 8,
            exploration: EpsilonGreedy::new(0.5),
            ..Default::default()
        };
        let mut sim = Simulation::new(network(), config, 21);

        for i in 1..8 {
            assert_eq!(sim.step().loss, None, "no training with {i} stored");
        }
        let loss = sim.step().loss;
        assert!(
            loss.is_some_and(f32::is_finite),
            "training starts once a batch is stored, got {loss:?}"
        );

        while sim.iteration() <= REPORT_EVERY {
            assert!(sim.step().loss.is_some(), "trains every step after the first batch");
        }

        let report = sim.last_report().expect("report after a trained step");
        assert_eq!(report.iteration, REPORT_EVERY);
        assert_eq!(report.delta.len(), 4, "delta has one row per input");
        assert!(
            report.delta.iter().flatten().any(|d| *d != 0.0),
            "weights moved during the reported step"
        );
    }
}
