//! A small tanh MLP over flat parameter vectors, with manual backprop.
//!
//! Parameters live in one contiguous `Vec<f32>` (per layer: weights
//! row-major `[out x in]`, then biases), which keeps perturbation-based
//! learners and serialization trivial.

use serde::{Deserialize, Serialize};

/// Network topology; the parameter values travel separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mlp {
    pub sizes: Vec<usize>,
}

impl Mlp {
    #[must_use]
    pub fn new(sizes: Vec<usize>) -> Self {
        assert!(sizes.len() >= 2, "an mlp needs at least input and output sizes");
        Self { sizes }
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.sizes.windows(2).map(|w| w[0] * w[1] + w[1]).sum()
    }

    /// Xavier-uniform weights, zero biases.
    #[must_use]
    pub fn init(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        let mut params = Vec::with_capacity(self.param_count());
        for w in self.sizes.windows(2) {
            let (fan_in, fan_out) = (w[0], w[1]);
            let limit = (6.0_f32 / (fan_in + fan_out) as f32).sqrt();
            for _ in 0..fan_in * fan_out {
                params.push((rng.f32() * 2.0 - 1.0) * limit);
            }
            params.extend(std::iter::repeat(0.0).take(fan_out));
        }
        params
    }

    /// Forward pass: tanh on hidden layers, linear output.
    #[must_use]
    pub fn forward(&self, params: &[f32], x: &[f32]) -> Vec<f32> {
        self.forward_cached(params, x).0
    }

    /// Forward pass keeping every layer's input activation for backprop.
    /// `cache[l]` is the input to layer `l`; the last entry is the output.
    #[must_use]
    pub fn forward_cached(&self, params: &[f32], x: &[f32]) -> (Vec<f32>, Vec<Vec<f32>>) {
        debug_assert_eq!(params.len(), self.param_count());
        debug_assert_eq!(x.len(), self.sizes[0]);
        let layers = self.sizes.len() - 1;
        let mut cache = Vec::with_capacity(layers + 1);
        let mut activation = x.to_vec();
        let mut offset = 0;
        for (l, w) in self.sizes.windows(2).enumerate() {
            let (fan_in, fan_out) = (w[0], w[1]);
            let weights = &params[offset..offset + fan_in * fan_out];
            let biases = &params[offset + fan_in * fan_out..offset + fan_in * fan_out + fan_out];
            offset += fan_in * fan_out + fan_out;

            let mut out = Vec::with_capacity(fan_out);
            for o in 0..fan_out {
                let mut sum = biases[o];
                for i in 0..fan_in {
                    sum += weights[o * fan_in + i] * activation[i];
                }
                out.push(if l + 1 < layers { sum.tanh() } else { sum });
            }
            cache.push(activation);
            activation = out;
        }
        cache.push(activation.clone());
        (activation, cache)
    }

    /// Backpropagate `grad_out` through a cached forward pass, accumulating
    /// parameter gradients into `grads` (same layout as `params`) and
    /// returning the gradient with respect to the input.
    pub fn backward(
        &self,
        params: &[f32],
        cache: &[Vec<f32>],
        grad_out: &[f32],
        grads: &mut [f32],
    ) -> Vec<f32> {
        debug_assert_eq!(grads.len(), self.param_count());
        let layers = self.sizes.len() - 1;
        // Per-layer parameter offsets, front to back.
        let mut offsets = Vec::with_capacity(layers);
        let mut offset = 0;
        for w in self.sizes.windows(2) {
            offsets.push(offset);
            offset += w[0] * w[1] + w[1];
        }

        let mut grad = grad_out.to_vec();
        for l in (0..layers).rev() {
            let (fan_in, fan_out) = (self.sizes[l], self.sizes[l + 1]);
            let input = &cache[l];
            let output = &cache[l + 1];
            let base = offsets[l];
            let weights = &params[base..base + fan_in * fan_out];

            // Undo the tanh on hidden layers: output holds tanh(z).
            let dz: Vec<f32> = if l + 1 < layers {
                grad.iter().zip(output).map(|(g, t)| g * (1.0 - t * t)).collect()
            } else {
                grad.clone()
            };

            let mut grad_in = vec![0.0; fan_in];
            for o in 0..fan_out {
                let d = dz[o];
                for i in 0..fan_in {
                    grads[base + o * fan_in + i] += d * input[i];
                    grad_in[i] += weights[o * fan_in + i] * d;
                }
                grads[base + fan_in * fan_out + o] += d;
            }
            grad = grad_in;
        }
        grad
    }
}

/// One standard-normal draw via Box-Muller.
pub fn normal(rng: &mut fastrand::Rng) -> f32 {
    let u1 = (1.0 - rng.f32()).max(f32::MIN_POSITIVE);
    let u2 = rng.f32();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

/// Running observation statistics (Welford), applied before every forward
/// pass when observation normalization is on. Ships inside the checkpoint so
/// inference sees the same inputs training saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalizer {
    pub count: f32,
    pub mean: Vec<f32>,
    pub m2: Vec<f32>,
}

impl Normalizer {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { count: 0.0, mean: vec![0.0; dim], m2: vec![0.0; dim] }
    }

    pub fn update(&mut self, obs: &[f32]) {
        debug_assert_eq!(obs.len(), self.mean.len());
        self.count += 1.0;
        for ((mean, m2), x) in self.mean.iter_mut().zip(&mut self.m2).zip(obs) {
            let delta = x - *mean;
            *mean += delta / self.count;
            *m2 += delta * (x - *mean);
        }
    }

    #[must_use]
    pub fn apply(&self, obs: &[f32]) -> Vec<f32> {
        if self.count < 2.0 {
            return obs.to_vec();
        }
        let var_scale = 1.0 / (self.count - 1.0);
        obs.iter()
            .zip(&self.mean)
            .zip(&self.m2)
            .map(|((x, mean), m2)| (x - mean) / (m2 * var_scale).sqrt().max(1e-6))
            .collect()
    }
}
