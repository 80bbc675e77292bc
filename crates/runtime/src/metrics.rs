//! Count-gated metrics logging.

use std::collections::BTreeMap;

/// Forwards every `every`-th progress report to the log. The gate is a call
/// count, not a clock, so runs stay reproducible.
pub struct MetricsWriter {
    every: u64,
    calls: u64,
    written: u64,
}

impl MetricsWriter {
    #[must_use]
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1), calls: 0, written: 0 }
    }

    pub fn write(&mut self, env_steps: u64, metrics: &BTreeMap<String, f32>) {
        self.calls += 1;
        if self.calls % self.every != 0 {
            return;
        }
        self.written += 1;
        let rendered: Vec<String> =
            metrics.iter().map(|(name, value)| format!("{name}={value:.4}")).collect();
        tracing::info!(env_steps, "{}", rendered.join(" "));
    }

    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_every_nth_call() {
        let mut writer = MetricsWriter::new(3);
        let metrics = BTreeMap::from([("reward".to_owned(), 1.0)]);
        for step in 0..10 {
            writer.write(step, &metrics);
        }
        assert_eq!(writer.written(), 3);
    }

    #[test]
    fn zero_frequency_degrades_to_every_call() {
        let mut writer = MetricsWriter::new(0);
        writer.write(1, &BTreeMap::new());
        assert_eq!(writer.written(), 1);
    }
}
