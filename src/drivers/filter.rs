use std::f64::consts::PI;
/// Single-pole causal high-pass filter.
///
/// The smoothing coefficient is `1 / (2π·fcut + 1)` and does not depend on the
/// sample interval. Output magnitudes of existing recordings rely on this, so
/// `dt` is accepted but unused.
#[derive(Clone, Debug)]
pub struct HighPassFilter {
    cutoff_hz: f64,
    value: Option<f64>,
    last_raw: Option<f64>,
}
impl HighPassFilter {
    pub fn new(cutoff_hz: f64) -> Self {
        Self {
            cutoff_hz,
            value: None,
            last_raw: None,
        }
    }
    /// Current output, `None` until the first sample.
    #[cfg(test)]
    pub fn value(&self) -> Option<f64> {
        self.value
    }
    pub fn alpha(&self) -> f64 {
        1.0 / (2.0 * PI * self.cutoff_hz + 1.0)
    }
    pub fn update(&mut self, x: f64, _dt: Option<f64>) -> f64 {
        let (Some(value), Some(last_raw)) = (self.value, self.last_raw) else {
            // Seed with the first sample so there is no start-up transient.
            self.value = Some(x);
            self.last_raw = Some(x);
            return x;
        };
        let filtered = self.alpha() * (value + (x - last_raw));
        self.value = Some(filtered);
        self.last_raw = Some(x);
        filtered
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn first_sample_seeds_output() {
        let mut filter = HighPassFilter::new(1.0);
        assert_eq!(filter.value(), None);
        assert_eq!(filter.update(5.0, None), 5.0);
        assert_eq!(filter.value(), Some(5.0));
    }
    #[test]
    fn follows_recurrence() {
        let mut filter = HighPassFilter::new(0.5);
        let alpha = 1.0 / (PI + 1.0);
        filter.update(1.0, None);
        let y1 = filter.update(3.0, Some(0.1));
        assert_eq!(y1, alpha * (1.0 + 2.0));
        let y2 = filter.update(2.0, Some(0.1));
        assert_eq!(y2, alpha * (y1 - 1.0));
    }
    #[test]
    fn dt_does_not_change_output() {
        let mut a = HighPassFilter::new(2.0);
        let mut b = HighPassFilter::new(2.0);
        for (i, x) in [0.3, 1.7, -0.4, 2.2].into_iter().enumerate() {
            assert_eq!(a.update(x, Some(0.01)), b.update(x, Some(i as f64 + 10.0)));
        }
    }
    #[test]
    fn identical_inputs_give_identical_outputs() {
        let inputs: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() + 0.01 * i as f64).collect();
        let run = |inputs: &[f64]| {
            let mut filter = HighPassFilter::new(1.3);
            inputs
                .iter()
                .map(|&x| filter.update(x, Some(0.02)).to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(&inputs), run(&inputs));
    }
    #[test]
    fn constant_input_decays_towards_zero() {
        let mut filter = HighPassFilter::new(1.0);
        filter.update(4.0, None);
        let mut last = 4.0;
        for _ in 0..20 {
            last = filter.update(4.0, Some(0.01));
        }
        assert!(last.abs() < 1e-9);
    }
}
