//! Fixed-capacity experience replay with uniform sampling.

#[derive(Debug, Clone)]
pub struct Transition {
    pub obs: Vec<f32>,
    pub action: Vec<f32>,
    pub reward: f32,
    pub next_obs: Vec<f32>,
    pub done: f32,
}

/// Ring buffer: once full, the oldest transition is overwritten.
pub struct Replay {
    capacity: usize,
    buf: Vec<Transition>,
    next: usize,
}

impl Replay {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be positive");
        Self { capacity, buf: Vec::with_capacity(capacity.min(1 << 16)), next: 0 }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.buf.len() < self.capacity {
            self.buf.push(transition);
        } else {
            self.buf[self.next] = transition;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// `n` transitions drawn uniformly with replacement.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng, n: usize) -> Vec<&Transition> {
        (0..n).map(|_| &self.buf[rng.usize(..self.buf.len())]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(tag: f32) -> Transition {
        Transition { obs: vec![tag], action: vec![0.0], reward: tag, next_obs: vec![tag], done: 0.0 }
    }

    #[test]
    fn capacity_is_enforced_by_overwrite() {
        let mut replay = Replay::new(3);
        for i in 0..5 {
            replay.push(transition(i as f32));
        }
        assert_eq!(replay.len(), 3);
        // 0 and 1 were overwritten by 3 and 4.
        let rewards: Vec<f32> = replay.buf.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![3.0, 4.0, 2.0]);
    }

    #[test]
    fn sampling_draws_from_stored_transitions() {
        let mut replay = Replay::new(8);
        for i in 0..8 {
            replay.push(transition(i as f32));
        }
        let mut rng = fastrand::Rng::with_seed(0);
        for t in replay.sample(&mut rng, 32) {
            assert!((0.0..8.0).contains(&t.reward));
        }
    }
}
