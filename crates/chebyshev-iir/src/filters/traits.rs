//! Core Filter Traits
//!
//! ```text
//! Filter (core trait, complex samples)
//!    └── RealFilter (real-valued fast path)
//!
//! FrequencyResponse (frequency domain analysis)
//! ```
//!
//! [`crate::ChebyshevFilter`] implements the processing traits;
//! [`crate::Cascade`] implements [`FrequencyResponse`] so a design can be
//! inspected without running samples through it.

use num_complex::Complex64;

/// Core trait for sample-processing filters.
pub trait Filter: Send + Sync {
    /// Process a single complex sample through the filter.
    ///
    /// Filters keep their delay state between calls.
    fn process(&mut self, input: Complex64) -> Complex64;

    /// Process a block of samples, returning filtered output.
    fn process_block(&mut self, input: &[Complex64]) -> Vec<Complex64> {
        input.iter().map(|&s| self.process(s)).collect()
    }

    /// Process samples in place.
    fn process_inplace(&mut self, samples: &mut [Complex64]) {
        for s in samples.iter_mut() {
            *s = self.process(*s);
        }
    }

    /// Reset filter state (clear delay lines).
    fn reset(&mut self);

    /// Group delay in samples at DC.
    fn group_delay(&self) -> f64;

    /// Transfer function order.
    fn order(&self) -> usize;
}

/// Filters with real coefficients that can run real samples directly.
pub trait RealFilter: Filter {
    /// Process a single real-valued sample.
    fn process_real(&mut self, input: f64) -> f64;

    /// Process a block of real samples.
    fn process_real_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process_real(s)).collect()
    }

    /// Process real samples in place.
    fn process_real_inplace(&mut self, samples: &mut [f64]) {
        for s in samples.iter_mut() {
            *s = self.process_real(*s);
        }
    }
}

/// Magnitude and phase response at specific frequencies.
pub trait FrequencyResponse {
    /// Magnitude response (linear scale) at `freq_hz`.
    fn magnitude_response(&self, freq_hz: f64, sample_rate: f64) -> f64;

    /// Magnitude response in decibels.
    fn magnitude_response_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        20.0 * self.magnitude_response(freq_hz, sample_rate).log10()
    }

    /// Phase response in radians at `freq_hz`.
    fn phase_response(&self, freq_hz: f64, sample_rate: f64) -> f64;

    /// (magnitude, phase) at multiple frequencies.
    fn frequency_response(&self, freqs_hz: &[f64], sample_rate: f64) -> Vec<(f64, f64)> {
        freqs_hz
            .iter()
            .map(|&f| (self.magnitude_response(f, sample_rate), self.phase_response(f, sample_rate)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    // One-pole smoother y[n] = (1-a)·x[n] + a·y[n-1]
    struct MockOnePole {
        a: f64,
        state: Complex64,
    }

    impl Filter for MockOnePole {
        fn process(&mut self, input: Complex64) -> Complex64 {
            self.state = input * (1.0 - self.a) + self.state * self.a;
            self.state
        }

        fn reset(&mut self) {
            self.state = Complex64::new(0.0, 0.0);
        }

        fn group_delay(&self) -> f64 {
            self.a / (1.0 - self.a)
        }

        fn order(&self) -> usize {
            1
        }
    }

    impl RealFilter for MockOnePole {
        fn process_real(&mut self, input: f64) -> f64 {
            self.process(Complex64::new(input, 0.0)).re
        }
    }

    impl FrequencyResponse for MockOnePole {
        fn magnitude_response(&self, freq_hz: f64, sample_rate: f64) -> f64 {
            let z = Complex64::from_polar(1.0, 2.0 * PI * freq_hz / sample_rate);
            ((1.0 - self.a) / (1.0 - self.a / z)).norm()
        }

        fn phase_response(&self, freq_hz: f64, sample_rate: f64) -> f64 {
            let z = Complex64::from_polar(1.0, 2.0 * PI * freq_hz / sample_rate);
            ((1.0 - self.a) / (1.0 - self.a / z)).arg()
        }
    }

    #[test]
    fn test_block_and_reset() {
        let mut filter = MockOnePole {
            a: 0.5,
            state: Complex64::new(0.0, 0.0),
        };
        let out = filter.process_real_block(&[1.0; 20]);
        assert!((out[19] - 1.0).abs() < 1e-5);

        filter.reset();
        let mut samples = [1.0, 0.0];
        filter.process_real_inplace(&mut samples);
        assert_eq!(samples, [0.5, 0.25]);
    }

    #[test]
    fn test_frequency_response_defaults() {
        let filter = MockOnePole {
            a: 0.9,
            state: Complex64::new(0.0, 0.0),
        };
        assert!(filter.magnitude_response_db(0.0, 1000.0).abs() < 1e-9);

        let response = filter.frequency_response(&[0.0, 250.0, 500.0], 1000.0);
        assert_eq!(response.len(), 3);
        assert!(response[2].0 < response[1].0 && response[1].0 < response[0].0);
    }
}
