//! Fixed-architecture feedforward policy.
//!
//! ```text
//! Observation (12)
//!       ↓
//! Dense(512) + ReLU
//!       ↓
//! Dense(3)   → scores for [straight, turn right, turn left]
//!       ↓
//! argmax     → Action
//! ```
//!
//! Nothing here is trained by gradients. The parameters of a [`PolicyNetwork`]
//! are its genome: they change only through [`PolicyNetwork::copy_from`] and
//! [`PolicyNetwork::mutate`], driven by the genetic algorithm in
//! `snakevo-training`.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use snakevo_engine::Action;

use crate::observation::Observation;

/// Width of the single hidden layer.
pub const HIDDEN_SIZE: usize = 512;

/// Error returned when deserialized parameters do not fit the architecture.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{layer} layer: expected {expected}, got {actual}")]
pub struct NetworkShapeError {
    layer: &'static str,
    expected: String,
    actual: String,
}

/// Fully connected layer with row-major weights (`outputs × inputs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl DenseLayer {
    /// Creates a layer with parameters drawn from `U(-1/sqrt(inputs), 1/sqrt(inputs))`.
    pub fn random<R>(inputs: usize, outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let bound = 1.0 / (inputs as f32).sqrt();
        let mut sample = || rng.random_range(-bound..bound);
        let weights = (0..inputs * outputs).map(|_| sample()).collect();
        let biases = (0..outputs).map(|_| sample()).collect();
        Self {
            inputs,
            outputs,
            weights,
            biases,
        }
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    fn forward_into(&self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), self.inputs);
        debug_assert_eq!(output.len(), self.outputs);
        let rows = self.weights.chunks_exact(self.inputs);
        for ((out, row), bias) in output.iter_mut().zip(rows).zip(&self.biases) {
            *out = bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>();
        }
    }

    fn check_shape(
        &self,
        layer: &'static str,
        inputs: usize,
        outputs: usize,
    ) -> Result<(), NetworkShapeError> {
        let actual = (self.inputs, self.outputs, self.weights.len(), self.biases.len());
        let expected = (inputs, outputs, inputs * outputs, outputs);
        if actual == expected {
            return Ok(());
        }
        Err(NetworkShapeError {
            layer,
            expected: format!(
                "{inputs}x{outputs} with {} weights and {} biases",
                expected.2, expected.3
            ),
            actual: format!(
                "{}x{} with {} weights and {} biases",
                actual.0, actual.1, actual.2, actual.3
            ),
        })
    }
}

/// Policy network mapping an [`Observation`] to an [`Action`].
///
/// The full parameter set is the genome of one agent. Cloning is a deep copy;
/// two networks never share parameter storage.
///
/// Deserialization checks that the layers match the fixed architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPolicyNetwork")]
pub struct PolicyNetwork {
    hidden: DenseLayer,
    output: DenseLayer,
}

#[derive(Deserialize)]
struct UncheckedPolicyNetwork {
    hidden: DenseLayer,
    output: DenseLayer,
}

impl TryFrom<UncheckedPolicyNetwork> for PolicyNetwork {
    type Error = NetworkShapeError;

    fn try_from(value: UncheckedPolicyNetwork) -> Result<Self, Self::Error> {
        value
            .hidden
            .check_shape("hidden", Observation::LEN, HIDDEN_SIZE)?;
        value
            .output
            .check_shape("output", HIDDEN_SIZE, Action::LEN)?;
        Ok(Self {
            hidden: value.hidden,
            output: value.output,
        })
    }
}

impl PolicyNetwork {
    /// Creates a freshly initialized network.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            hidden: DenseLayer::random(Observation::LEN, HIDDEN_SIZE, rng),
            output: DenseLayer::random(HIDDEN_SIZE, Action::LEN, rng),
        }
    }

    /// Computes one score per action, indexed like [`Action::ALL`].
    #[must_use]
    pub fn forward(&self, observation: &Observation) -> [f32; Action::LEN] {
        let mut hidden = [0.0; HIDDEN_SIZE];
        self.hidden.forward_into(observation.as_array(), &mut hidden);
        for h in &mut hidden {
            *h = h.max(0.0);
        }
        let mut scores = [0.0; Action::LEN];
        self.output.forward_into(&hidden, &mut scores);
        scores
    }

    /// Picks the action with the highest score.
    ///
    /// Ties go to the lowest index, so equal scores prefer going straight.
    #[must_use]
    pub fn select_action(&self, observation: &Observation) -> Action {
        let scores = self.forward(observation);
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    /// Overwrites this network's parameters with a deep copy of `other`'s.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Applies Gaussian mutation in place.
    ///
    /// Each parameter independently, with probability `rate`, gets
    /// `power × N(0, 1)` added. Untouched parameters keep their exact value,
    /// so `rate = 0` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not in `[0, 1]`.
    pub fn mutate<R>(&mut self, rate: f32, power: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let rate = f64::from(rate);
        for param in self.parameters_mut() {
            if rng.random_bool(rate) {
                let noise: f32 = rng.sample(StandardNormal);
                *param += power * noise;
            }
        }
    }

    /// Iterates over every parameter: hidden weights, hidden biases, output
    /// weights, output biases.
    pub fn parameters(&self) -> impl Iterator<Item = f32> + '_ {
        [&self.hidden, &self.output]
            .into_iter()
            .flat_map(|layer| layer.weights.iter().chain(&layer.biases))
            .copied()
    }

    fn parameters_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        [&mut self.hidden, &mut self.output]
            .into_iter()
            .flat_map(|layer| layer.weights.iter_mut().chain(&mut layer.biases))
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        [&self.hidden, &self.output]
            .iter()
            .map(|layer| layer.weights.len() + layer.biases.len())
            .sum()
    }

    #[must_use]
    pub fn hidden_layer(&self) -> &DenseLayer {
        &self.hidden
    }

    #[must_use]
    pub fn output_layer(&self) -> &DenseLayer {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn network(seed: u64) -> PolicyNetwork {
        PolicyNetwork::random(&mut Pcg32::seed_from_u64(seed))
    }

    fn observation(fill: f32) -> Observation {
        Observation::from_array([fill; Observation::LEN])
    }

    #[test]
    fn test_architecture() {
        let net = network(0);
        assert_eq!(net.hidden_layer().inputs(), 12);
        assert_eq!(net.hidden_layer().outputs(), 512);
        assert_eq!(net.output_layer().inputs(), 512);
        assert_eq!(net.output_layer().outputs(), 3);
        assert_eq!(net.parameter_count(), 12 * 512 + 512 + 512 * 3 + 3);
        assert_eq!(net.parameters().count(), net.parameter_count());
    }

    #[test]
    fn test_initialization_bounds() {
        let net = network(1);
        let hidden_bound = 1.0 / 12.0_f32.sqrt();
        let output_bound = 1.0 / 512.0_f32.sqrt();
        let hidden_params = 12 * 512 + 512;
        for (i, p) in net.parameters().enumerate() {
            let bound = if i < hidden_params {
                hidden_bound
            } else {
                output_bound
            };
            assert!(p.abs() <= bound, "parameter {i} = {p} exceeds {bound}");
        }
    }

    #[test]
    fn test_forward_is_pure() {
        let net = network(2);
        let obs = observation(0.5);
        assert_eq!(net.forward(&obs), net.forward(&obs));
        assert_eq!(net.select_action(&obs), net.select_action(&obs));
    }

    #[test]
    fn test_zero_network_ties_go_straight() {
        let mut net = network(3);
        for p in net.parameters_mut() {
            *p = 0.0;
        }
        assert_eq!(net.forward(&observation(1.0)), [0.0; 3]);
        assert_eq!(net.select_action(&observation(1.0)), Action::Straight);
    }

    #[test]
    fn test_select_action_follows_largest_bias() {
        let mut net = network(4);
        for p in net.parameters_mut() {
            *p = 0.0;
        }
        net.output.biases = vec![0.1, 0.3, 0.3];
        assert_eq!(net.select_action(&observation(1.0)), Action::TurnRight);
        net.output.biases = vec![0.1, 0.2, 0.9];
        assert_eq!(net.select_action(&observation(1.0)), Action::TurnLeft);
    }

    #[test]
    fn test_relu_blocks_negative_hidden_units() {
        let mut net = network(5);
        for p in net.parameters_mut() {
            *p = 0.0;
        }
        // hidden unit 0 gets a negative pre-activation and feeds "turn left"
        net.hidden.biases[0] = -1.0;
        net.output.weights[2 * HIDDEN_SIZE] = 10.0;
        assert_eq!(net.forward(&observation(0.0)), [0.0; 3]);

        net.hidden.biases[0] = 1.0;
        assert_eq!(net.forward(&observation(0.0)), [0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_copy_from_is_deep() {
        let source = network(6);
        let mut copy = network(7);
        assert_ne!(copy, source);
        copy.copy_from(&source);
        assert_eq!(copy, source);

        copy.mutate(1.0, 1.0, &mut Pcg32::seed_from_u64(8));
        assert_ne!(copy, source);
        assert_eq!(source, network(6));
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let source = network(9);
        let mut child = source.clone();
        child.mutate(0.0, 5.0, &mut Pcg32::seed_from_u64(10));
        assert!(
            child
                .parameters()
                .zip(source.parameters())
                .all(|(a, b)| a.to_bits() == b.to_bits())
        );
    }

    #[test]
    fn test_mutate_rate_one_changes_every_parameter() {
        let source = network(11);
        let mut child = source.clone();
        child.mutate(1.0, 1.0, &mut Pcg32::seed_from_u64(12));
        let unchanged = child
            .parameters()
            .zip(source.parameters())
            .filter(|(a, b)| a.to_bits() == b.to_bits())
            .count();
        assert_eq!(unchanged, 0);
    }

    #[test]
    fn test_mutate_partial_rate() {
        let source = network(13);
        let mut child = source.clone();
        child.mutate(0.05, 0.2, &mut Pcg32::seed_from_u64(14));
        let changed = child
            .parameters()
            .zip(source.parameters())
            .filter(|(a, b)| a.to_bits() != b.to_bits())
            .count();
        #[expect(clippy::cast_precision_loss)]
        let fraction = changed as f32 / source.parameter_count() as f32;
        assert!((0.03..0.07).contains(&fraction), "fraction = {fraction}");
    }

    #[test]
    fn test_json_roundtrip_preserves_parameters() {
        let net = network(15);
        let json = serde_json::to_string(&net).unwrap();
        let back: PolicyNetwork = serde_json::from_str(&json).unwrap();
        assert!(
            back.parameters()
                .zip(net.parameters())
                .all(|(a, b)| a.to_bits() == b.to_bits())
        );
        let obs = observation(0.7);
        assert_eq!(back.select_action(&obs), net.select_action(&obs));
    }

    #[test]
    fn test_deserialize_rejects_wrong_shape() {
        let mut value = serde_json::to_value(network(16)).unwrap();
        value["output"]["biases"] = serde_json::json!([0.0, 0.0]);
        let err = serde_json::from_value::<PolicyNetwork>(value).unwrap_err();
        assert!(err.to_string().contains("output layer"), "{err}");
    }
}
