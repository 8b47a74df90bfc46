//! Biquad sections and cascades
//!
//! A [`Cascade`] is the output of the design pipeline: an ordered list of
//! second-order sections
//!
//! ```text
//!   H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (a0 + a1·z⁻¹ + a2·z⁻²),   a0 = 1
//! ```
//!
//! whose product is the designed transfer function. First-order stages are
//! stored as degenerate sections with `b2 = a2 = 0`.
//!
//! Cascades serialize as a plain list of `[b0, b1, b2, a0, a1, a2]` tuples.

use super::layout::{DigitalLayout, PoleZeroPair, MAX_ORDER};
use super::traits::FrequencyResponse;
use crate::error::CascadeError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A single second-order section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 6]", into = "[f64; 6]")]
pub struct BiquadSection {
    /// Numerator coefficients [b0, b1, b2]
    b: [f64; 3],
    /// Denominator coefficients [a0, a1, a2] with a0 == 1
    a: [f64; 3],
}

impl BiquadSection {
    /// Create a section, normalizing the denominator so `a0 == 1`.
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Result<Self, CascadeError> {
        if a[0] == 0.0 {
            return Err(CascadeError::ZeroLeadingDenominator);
        }
        let norm = a[0];
        Ok(Self {
            b: [b[0] / norm, b[1] / norm, b[2] / norm],
            a: [1.0, a[1] / norm, a[2] / norm],
        })
    }

    /// Pass-through section.
    pub const fn unity() -> Self {
        Self {
            b: [1.0, 0.0, 0.0],
            a: [1.0, 0.0, 0.0],
        }
    }

    /// Build the monic section for a digital pole/zero pair.
    pub fn from_pair(pair: &PoleZeroPair) -> Self {
        let [p1, p2] = pair.poles();
        let [z1, z2] = pair.zeros().map(|z| z.unwrap_or(Complex64::new(-1.0, 0.0)));
        Self {
            b: [1.0, -(z1 + z2).re, (z1 * z2).re],
            a: [1.0, -(p1 + p2).re, (p1 * p2).re],
        }
    }

    /// Build a first-order section from a real pole and zero.
    pub fn first_order(pole: f64, zero: f64) -> Self {
        Self {
            b: [1.0, -zero, 0.0],
            a: [1.0, -pole, 0.0],
        }
    }

    pub fn numerator(&self) -> &[f64; 3] {
        &self.b
    }

    pub fn denominator(&self) -> &[f64; 3] {
        &self.a
    }

    /// Coefficients in the order `b0, b1, b2, a0, a1, a2`.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.b[0], self.b[1], self.b[2], self.a[0], self.a[1], self.a[2]]
    }

    pub fn is_first_order(&self) -> bool {
        self.b[2] == 0.0 && self.a[2] == 0.0
    }

    /// Check if this section is stable (poles inside unit circle).
    pub fn is_stable(&self) -> bool {
        // For 1 + a1*z^-1 + a2*z^-2: |a2| < 1 and |a1| < 1 + a2
        self.a[2].abs() < 1.0 && self.a[1].abs() < 1.0 + self.a[2]
    }

    /// Roots of the denominator.
    ///
    /// First-order sections report their single pole twice.
    pub fn poles(&self) -> [Complex64; 2] {
        if self.a[2] == 0.0 {
            let p = Complex64::new(-self.a[1], 0.0);
            return [p, p];
        }
        quadratic_roots(self.a[1], self.a[2])
    }

    /// Section response at `z`.
    pub fn response_at(&self, z: Complex64) -> Complex64 {
        let z_inv = z.inv();
        let z_inv2 = z_inv * z_inv;
        let num = self.b[0] + self.b[1] * z_inv + self.b[2] * z_inv2;
        let den = self.a[0] + self.a[1] * z_inv + self.a[2] * z_inv2;
        num / den
    }

    /// Run one sample through the section in Direct Form II Transposed.
    ///
    /// `state` holds the two delay registers and is updated in place.
    pub fn process<T>(&self, state: &mut [T; 2], input: T) -> T
    where
        T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
    {
        let output = input * self.b[0] + state[0];
        state[0] = input * self.b[1] - output * self.a[1] + state[1];
        state[1] = input * self.b[2] - output * self.a[2];
        output
    }

    fn scale_numerator(&mut self, k: f64) {
        for b in &mut self.b {
            *b *= k;
        }
    }
}

impl Default for BiquadSection {
    fn default() -> Self {
        Self::unity()
    }
}

impl TryFrom<[f64; 6]> for BiquadSection {
    type Error = CascadeError;

    fn try_from(c: [f64; 6]) -> Result<Self, Self::Error> {
        Self::new([c[0], c[1], c[2]], [c[3], c[4], c[5]])
    }
}

impl From<BiquadSection> for [f64; 6] {
    fn from(section: BiquadSection) -> Self {
        section.coefficients()
    }
}

/// Roots of `z² + a1·z + a2`.
fn quadratic_roots(a1: f64, a2: f64) -> [Complex64; 2] {
    let half = -a1 / 2.0;
    let disc = half * half - a2;
    if disc >= 0.0 {
        let d = disc.sqrt();
        [Complex64::new(half + d, 0.0), Complex64::new(half - d, 0.0)]
    } else {
        let d = (-disc).sqrt();
        [Complex64::new(half, d), Complex64::new(half, -d)]
    }
}

/// Ordered cascade of biquad sections with fixed capacity.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BiquadSection>", into = "Vec<BiquadSection>")]
pub struct Cascade {
    sections: [BiquadSection; MAX_ORDER],
    len: usize,
}

impl Cascade {
    /// Empty cascade (unity response).
    pub fn new() -> Self {
        Self {
            sections: [BiquadSection::unity(); MAX_ORDER],
            len: 0,
        }
    }

    /// Build a cascade from explicit sections.
    pub fn from_sections(sections: &[BiquadSection]) -> Result<Self, CascadeError> {
        if sections.len() > MAX_ORDER {
            return Err(CascadeError::TooManySections {
                count: sections.len(),
                capacity: MAX_ORDER,
            });
        }
        let mut cascade = Self::new();
        cascade.sections[..sections.len()].copy_from_slice(sections);
        cascade.len = sections.len();
        Ok(cascade)
    }

    /// Assemble a digital layout into an ordered cascade.
    ///
    /// Each pair becomes one section and the unpaired root a first-order
    /// section. Sections are sorted by ascending pole/zero radius ratio so
    /// the poles nearest the unit circle come last, and the layout's gain is
    /// applied to the first section's numerator.
    pub fn from_layout(layout: &DigitalLayout) -> Self {
        let mut keyed = [(0.0_f64, BiquadSection::unity()); MAX_ORDER];
        let mut len = 0;

        for pair in layout.pairs() {
            let pole_radius = pair.poles().iter().map(|p| p.norm()).fold(0.0, f64::max);
            let zero_radius = pair
                .zeros()
                .iter()
                .flatten()
                .map(|z| z.norm())
                .fold(0.0, f64::max);
            keyed[len] = (radius_ratio(pole_radius, zero_radius), BiquadSection::from_pair(pair));
            len += 1;
        }
        if let Some(single) = layout.single() {
            let zero = single.zero.unwrap_or(Complex64::new(-1.0, 0.0));
            keyed[len] = (
                radius_ratio(single.pole.norm(), zero.norm()),
                BiquadSection::first_order(single.pole.re, zero.re),
            );
            len += 1;
        }

        let keyed = &mut keyed[..len];
        keyed.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut cascade = Self::new();
        for (dst, (_, section)) in cascade.sections.iter_mut().zip(keyed.iter()) {
            *dst = *section;
        }
        cascade.len = len;
        if let Some(first) = cascade.sections[..len].first_mut() {
            first.scale_numerator(layout.gain());
        }
        cascade
    }

    pub fn sections(&self) -> &[BiquadSection] {
        &self.sections[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Transfer function order (number of poles).
    pub fn order(&self) -> usize {
        self.sections()
            .iter()
            .map(|s| if s.is_first_order() { 1 } else { 2 })
            .sum()
    }

    /// Check if every section is stable.
    pub fn is_stable(&self) -> bool {
        self.sections().iter().all(BiquadSection::is_stable)
    }

    /// All poles recovered from the section denominators.
    pub fn poles(&self) -> impl Iterator<Item = Complex64> + '_ {
        self.sections().iter().flat_map(|s| {
            let roots = s.poles();
            let n = if s.is_first_order() { 1 } else { 2 };
            roots.into_iter().take(n)
        })
    }

    /// Response at an arbitrary point of the z-plane.
    pub fn response_at(&self, z: Complex64) -> Complex64 {
        self.sections()
            .iter()
            .fold(Complex64::new(1.0, 0.0), |h, s| h * s.response_at(z))
    }

    /// Complex frequency response H(e^jω).
    pub fn complex_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        self.response_at(Complex64::from_polar(1.0, omega))
    }

    /// Group delay in samples at `freq_hz`, from the phase slope.
    pub fn group_delay_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let delta = 1e-4;
        let lo = self.response_at(Complex64::from_polar(1.0, omega - delta));
        let hi = self.response_at(Complex64::from_polar(1.0, omega + delta));
        // Phase difference of the two points, wrapped to (-π, π]
        let d_phase = (hi * lo.conj()).arg();
        -d_phase / (2.0 * delta)
    }
}

fn radius_ratio(pole_radius: f64, zero_radius: f64) -> f64 {
    if zero_radius > f64::EPSILON {
        pole_radius / zero_radius
    } else {
        pole_radius
    }
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sections()).finish()
    }
}

impl TryFrom<Vec<BiquadSection>> for Cascade {
    type Error = CascadeError;

    fn try_from(sections: Vec<BiquadSection>) -> Result<Self, Self::Error> {
        Self::from_sections(&sections)
    }
}

impl From<Cascade> for Vec<BiquadSection> {
    fn from(cascade: Cascade) -> Self {
        cascade.sections().to_vec()
    }
}

impl FrequencyResponse for Cascade {
    fn magnitude_response(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        self.complex_response(freq_hz, sample_rate).norm()
    }

    fn phase_response(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        self.complex_response(freq_hz, sample_rate).arg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::layout::{PoleZero, Reference};
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_section_normalizes_a0() {
        let s = BiquadSection::new([2.0, 4.0, 2.0], [2.0, 1.0, 0.5]).unwrap();
        assert_eq!(s.coefficients(), [1.0, 2.0, 1.0, 1.0, 0.5, 0.25]);
        assert_eq!(
            BiquadSection::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Err(CascadeError::ZeroLeadingDenominator)
        );
    }

    #[test]
    fn test_section_stability() {
        let stable = BiquadSection::new([1.0, 0.0, 0.0], [1.0, 0.5, 0.2]).unwrap();
        assert!(stable.is_stable());

        let unstable = BiquadSection::new([1.0, 0.0, 0.0], [1.0, 2.0, 0.5]).unwrap();
        assert!(!unstable.is_stable());
    }

    #[test]
    fn test_section_poles_from_pair() {
        let pair = PoleZeroPair::conjugate(PoleZero::new(c(0.6, 0.3), Some(c(-1.0, 0.0))));
        let section = BiquadSection::from_pair(&pair);
        let [p1, p2] = section.poles();
        assert_relative_eq!(p1.re, 0.6, epsilon = 1e-12);
        assert_relative_eq!(p1.im.abs(), 0.3, epsilon = 1e-12);
        assert_relative_eq!((p1 - p2.conj()).norm(), 0.0, epsilon = 1e-12);
        assert_eq!(section.numerator(), &[1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_layout_ordering_and_gain() {
        let mut layout = DigitalLayout::new(Reference::dc());
        layout
            .push_pair(PoleZeroPair::conjugate(PoleZero::new(c(0.0, 0.95), Some(c(-1.0, 0.0)))))
            .unwrap();
        layout
            .push_pair(PoleZeroPair::conjugate(PoleZero::new(c(0.5, 0.0), Some(c(-1.0, 0.0)))))
            .unwrap();
        layout
            .set_single(PoleZero::new(c(0.2, 0.0), Some(c(-1.0, 0.0))))
            .unwrap();
        layout.set_gain(0.25);

        let cascade = Cascade::from_layout(&layout);
        assert_eq!(cascade.len(), 3);
        assert_eq!(cascade.order(), 5);
        assert!(cascade.sections()[0].is_first_order());

        let radii: Vec<f64> = cascade
            .sections()
            .iter()
            .map(|s| s.poles()[0].norm())
            .collect();
        assert!(radii.windows(2).all(|w| w[0] <= w[1]), "{:?}", radii);

        assert_eq!(cascade.sections()[0].numerator(), &[0.25, 0.25, 0.0]);
        assert_eq!(cascade.sections()[1].numerator()[0], 1.0);
    }

    #[test]
    fn test_response_matches_layout() {
        let mut layout = DigitalLayout::new(Reference::dc());
        layout
            .push_pair(PoleZeroPair::conjugate(PoleZero::new(c(0.3, 0.4), Some(c(0.1, 0.9)))))
            .unwrap();
        layout.set_gain(0.7);
        let cascade = Cascade::from_layout(&layout);

        for &w in &[0.0, 0.4, 1.3, PI] {
            let z = Complex64::from_polar(1.0, w);
            let a = cascade.response_at(z);
            let b = layout.response_at(z);
            assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_process_impulse_matches_difference_equation() {
        let section = BiquadSection::new([0.2, 0.3, 0.1], [1.0, -0.5, 0.25]).unwrap();
        let mut state = [0.0; 2];
        let out: Vec<f64> = [1.0, 0.0, 0.0, 0.0]
            .iter()
            .map(|&x| section.process(&mut state, x))
            .collect();

        // y[n] = b·x - a1·y[n-1] - a2·y[n-2]
        let y0 = 0.2;
        let y1 = 0.3 + 0.5 * y0;
        let y2 = 0.1 + 0.5 * y1 - 0.25 * y0;
        let y3 = 0.5 * y2 - 0.25 * y1;
        assert_relative_eq!(out[0], y0, epsilon = 1e-15);
        assert_relative_eq!(out[1], y1, epsilon = 1e-15);
        assert_relative_eq!(out[2], y2, epsilon = 1e-15);
        assert_relative_eq!(out[3], y3, epsilon = 1e-15);
    }

    #[test]
    fn test_group_delay_of_pure_delay() {
        // H(z) = z^-2
        let cascade =
            Cascade::from_sections(&[BiquadSection::new([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]).unwrap()])
                .unwrap();
        assert_relative_eq!(cascade.group_delay_at(1000.0, 8000.0), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_capacity() {
        let sections = vec![BiquadSection::unity(); MAX_ORDER + 1];
        assert!(matches!(
            Cascade::from_sections(&sections),
            Err(CascadeError::TooManySections { .. })
        ));
        let cascade = Cascade::from_sections(&sections[..MAX_ORDER]).unwrap();
        assert_eq!(cascade.len(), MAX_ORDER);
    }

    #[test]
    fn test_serializes_as_coefficient_tuples() {
        let cascade = Cascade::from_sections(&[
            BiquadSection::new([0.1, 0.2, 0.1], [1.0, -0.5, 0.25]).unwrap(),
            BiquadSection::first_order(0.3, -1.0),
        ])
        .unwrap();

        let yaml = serde_yaml::to_string(&cascade).unwrap();
        let value: Vec<[f64; 6]> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value[0], [0.1, 0.2, 0.1, 1.0, -0.5, 0.25]);
        assert_eq!(value[1], [1.0, 1.0, 0.0, 1.0, -0.3, 0.0]);

        let back: Cascade = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cascade);
    }
}
