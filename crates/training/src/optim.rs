//! Flat-vector optimizers.

/// Adam over a flat parameter vector, with bias correction folded into the
/// step size.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<f32>,
    v: Vec<f32>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32, param_count: usize) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: vec![0.0; param_count],
            v: vec![0.0; param_count],
        }
    }

    /// Descend `params` along `grads`.
    pub fn step(&mut self, params: &mut [f32], grads: &[f32]) {
        debug_assert_eq!(params.len(), self.m.len());
        debug_assert_eq!(grads.len(), self.m.len());
        self.t += 1;
        let lr_t = self.lr * (1.0 - self.beta2.powi(self.t as i32)).sqrt()
            / (1.0 - self.beta1.powi(self.t as i32));
        for ((p, g), (m, v)) in
            params.iter_mut().zip(grads).zip(self.m.iter_mut().zip(self.v.iter_mut()))
        {
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + self.eps);
        }
    }
}

/// Scale `grads` in place so their global L2 norm is at most `max_norm`.
pub fn clip_global_norm(grads: &mut [f32], max_norm: f32) {
    let norm = grads.iter().map(|g| g * g).sum::<f32>().sqrt();
    if norm > max_norm && norm > 0.0 {
        let scale = max_norm / norm;
        for g in grads {
            *g *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adam_minimizes_a_quadratic() {
        let mut params = vec![5.0, -3.0];
        let mut adam = Adam::new(0.1, 2);
        for _ in 0..500 {
            let grads: Vec<f32> = params.iter().map(|p| 2.0 * p).collect();
            adam.step(&mut params, &grads);
        }
        assert!(params.iter().all(|p| p.abs() < 1e-2), "{params:?}");
    }

    #[test]
    fn clip_caps_the_global_norm() {
        let mut grads = vec![3.0, 4.0];
        clip_global_norm(&mut grads, 1.0);
        let norm = grads.iter().map(|g| g * g).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);

        let mut small = vec![0.1, 0.1];
        clip_global_norm(&mut small, 1.0);
        assert_eq!(small, vec![0.1, 0.1]);
    }
}
