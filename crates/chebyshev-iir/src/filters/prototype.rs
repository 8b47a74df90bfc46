//! Chebyshev Type I analog prototypes
//!
//! Prototypes are normalized to a passband edge of 1 rad/s. Poles sit on an
//! ellipse whose semi-axes are `sinh(v0)` (real) and `cosh(v0)` (imaginary),
//! with `v0 = asinh(1/ε)/N`:
//!
//! ```text
//!   p_k = -sinh(v0)·sin(θ_k) + j·cosh(v0)·cos(θ_k),   θ_k = π(2k+1)/(2N)
//! ```
//!
//! The low-shelf prototype places zeros on a second ellipse sharing the same
//! angles, so the response steps from the shelf gain at DC to unity at
//! infinity with the ripple confined to the shelf band.

use super::layout::{AnalogLayout, PoleZero, PoleZeroPair, Reference};
use crate::error::{DesignError, DesignResult};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Shelf gains below this magnitude are designed flat.
const FLAT_GAIN_DB: f64 = 1e-9;

/// Shelf ripple is held this fraction below the gain magnitude.
const RIPPLE_CLAMP: f64 = 1.0 - 1e-3;

/// Ripple factor ε for a passband ripple in dB.
pub fn ripple_factor(ripple_db: f64) -> f64 {
    (10.0_f64.powf(ripple_db / 10.0) - 1.0).sqrt()
}

/// Build the all-pole lowpass prototype.
///
/// The layout is pinned to unity gain at DC, so even orders ripple between
/// 0 dB and `+ripple_db`, odd orders between `-ripple_db` and 0 dB.
pub fn low_pass_prototype(order: usize, ripple_db: f64) -> DesignResult<AnalogLayout> {
    check_ripple(ripple_db)?;

    let v0 = (1.0 / ripple_factor(ripple_db)).asinh() / order as f64;
    let (sinh_v0, cosh_v0) = (v0.sinh(), v0.cosh());

    let mut layout = AnalogLayout::new(Reference::dc());
    for k in 0..order / 2 {
        let theta = pole_angle(k, order);
        let pole = Complex64::new(-sinh_v0 * theta.sin(), cosh_v0 * theta.cos());
        layout.push_pair(PoleZeroPair::conjugate(PoleZero::all_pole(pole)))?;
    }
    if order % 2 == 1 {
        layout.set_single(PoleZero::all_pole(Complex64::new(-sinh_v0, 0.0)))?;
    }

    tracing::trace!(order, ripple_db, ?layout, "lowpass prototype");
    Ok(layout)
}

/// Build the low-shelf prototype.
///
/// `gain_db` is the gain below the shelf edge; the response is pinned to
/// unity at infinity. A zero or negligible gain yields a flat layout whose
/// zeros cancel its poles. A ripple at or above `|gain_db|` is clamped just
/// below it.
///
/// The ripple lies inside `[0, gain_db]` for odd orders. Even orders shift
/// the design gain so DC lands on `gain_db` and the ripple lies beyond it.
pub fn low_shelf_prototype(
    order: usize,
    gain_db: f64,
    ripple_db: f64,
) -> DesignResult<AnalogLayout> {
    if !gain_db.is_finite() {
        return Err(DesignError::InvalidGain { gain_db });
    }
    check_ripple(ripple_db)?;

    if gain_db.abs() < FLAT_GAIN_DB {
        let poles = low_pass_prototype(order, ripple_db)?;
        return Ok(poles.map_roots(Reference::infinity(), |pz| {
            PoleZero::new(pz.pole, Some(pz.pole))
        }));
    }
    let ripple_db = if ripple_db >= gain_db.abs() {
        let clamped = gain_db.abs() * RIPPLE_CLAMP;
        tracing::debug!(ripple_db, clamped, gain_db, "shelf ripple clamped to gain");
        clamped
    } else {
        ripple_db
    };

    // Even orders touch the bottom of the ripple at DC; shift the design gain
    // so DC lands on the requested gain.
    let design_db = if order % 2 == 0 {
        gain_db + ripple_db.copysign(gain_db)
    } else {
        gain_db
    };

    // The ellipses are derived for the inverse shelf (unity at DC, cut or
    // boost at infinity) and come out inverted.
    let stop_db = -design_db;
    let edge_db = stop_db - ripple_db.copysign(stop_db);
    let g = 10.0_f64.powf(stop_db / 20.0);
    let gb = 10.0_f64.powf(edge_db / 20.0);

    let n = order as f64;
    let eps = ((g * g - gb * gb) / (gb * gb - 1.0)).sqrt();
    let root = (1.0 + 1.0 / (eps * eps)).sqrt();
    let u = (g / eps + gb * root).powf(1.0 / n).ln();
    let v = (1.0 / eps + root).powf(1.0 / n).ln();
    let (sinh_u, cosh_u) = (u.sinh(), u.cosh());
    let (sinh_v, cosh_v) = (v.sinh(), v.cosh());

    let mut layout = AnalogLayout::new(Reference::infinity());
    for k in 0..order / 2 {
        let theta = pole_angle(k, order);
        let (sn, cs) = theta.sin_cos();
        let pole = Complex64::new(-sn * sinh_u, cs * cosh_u);
        let zero = Complex64::new(-sn * sinh_v, cs * cosh_v);
        layout.push_pair(PoleZeroPair::conjugate(PoleZero::new(pole, Some(zero))))?;
    }
    if order % 2 == 1 {
        layout.set_single(PoleZero::new(
            Complex64::new(-sinh_u, 0.0),
            Some(Complex64::new(-sinh_v, 0.0)),
        ))?;
    }

    tracing::trace!(order, gain_db, ripple_db, ?layout, "low-shelf prototype");
    Ok(layout)
}

fn pole_angle(k: usize, order: usize) -> f64 {
    PI * (2 * k + 1) as f64 / (2 * order) as f64
}

fn check_ripple(ripple_db: f64) -> DesignResult<()> {
    if ripple_db > 0.0 && ripple_db.is_finite() {
        Ok(())
    } else {
        Err(DesignError::InvalidRipple {
            ripple_db,
            reason: "must be positive and finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// |H(s)| of an analog layout with unit scalar gain.
    fn analog_magnitude(layout: &AnalogLayout, s: Complex64) -> f64 {
        let mut h = Complex64::new(1.0, 0.0);
        for (p, z) in layout.poles().zip(layout.zeros()) {
            if let Some(z) = z {
                h *= s - z;
            }
            h /= s - p;
        }
        h.norm()
    }

    #[test]
    fn test_lowpass_pole_count_and_stability() {
        for order in 1..=12 {
            let layout = low_pass_prototype(order, 1.0).unwrap();
            assert_eq!(layout.order(), order);
            assert_eq!(layout.poles().count(), order);
            assert!(layout.poles().all(|p| p.re < 0.0));
            assert!(layout.zeros().all(|z| z.is_none()));
        }
    }

    #[test]
    fn test_lowpass_ripple_at_band_edge() {
        for order in 1..=8 {
            for &ripple_db in &[0.1, 0.5, 1.0, 3.0] {
                let layout = low_pass_prototype(order, ripple_db).unwrap();
                let dc = analog_magnitude(&layout, Complex64::new(0.0, 0.0));
                let edge = analog_magnitude(&layout, Complex64::new(0.0, 1.0));
                let deviation_db = (20.0 * (edge / dc).log10()).abs();
                assert!(
                    deviation_db <= ripple_db + 1e-9,
                    "order {} ripple {}: edge deviates {} dB",
                    order,
                    ripple_db,
                    deviation_db
                );
            }
        }
    }

    #[test]
    fn test_lowpass_known_poles() {
        // Second order, 1 dB: classic table values
        let layout = low_pass_prototype(2, 1.0).unwrap();
        let p = layout.pairs()[0].first.pole;
        assert_relative_eq!(p.re, -0.548_867, epsilon = 1e-5);
        assert_relative_eq!(p.im, 0.895_129, epsilon = 1e-5);
    }

    #[test]
    fn test_lowpass_rejects_bad_ripple() {
        assert!(matches!(
            low_pass_prototype(4, 0.0),
            Err(DesignError::InvalidRipple { .. })
        ));
        assert!(matches!(
            low_pass_prototype(4, f64::NAN),
            Err(DesignError::InvalidRipple { .. })
        ));
    }

    #[test]
    fn test_shelf_gain_at_dc_and_infinity() {
        for order in 1..=6 {
            for &gain_db in &[6.0, -6.0, 12.0] {
                let layout = low_shelf_prototype(order, gain_db, 0.5).unwrap();
                assert_eq!(layout.order(), order);
                let dc = analog_magnitude(&layout, Complex64::new(0.0, 0.0));
                let far = analog_magnitude(&layout, Complex64::new(0.0, 1e9));
                assert_relative_eq!(dc, 10.0_f64.powf(gain_db / 20.0), epsilon = 1e-9);
                assert_relative_eq!(far, 1.0, epsilon = 1e-6);
                assert!(layout.poles().all(|p| p.re < 0.0));
            }
        }
    }

    #[test]
    fn test_shelf_zero_gain_is_flat() {
        let layout = low_shelf_prototype(4, 0.0, 1.0).unwrap();
        for &w in &[0.0, 0.5, 1.0, 3.0] {
            let mag = analog_magnitude(&layout, Complex64::new(0.0, w));
            assert_relative_eq!(mag, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shelf_rejects_non_finite_gain() {
        assert!(matches!(
            low_shelf_prototype(2, f64::INFINITY, 0.5),
            Err(DesignError::InvalidGain { .. })
        ));
        assert!(matches!(
            low_shelf_prototype(2, f64::NAN, 0.5),
            Err(DesignError::InvalidGain { .. })
        ));
    }

    #[test]
    fn test_shelf_ripple_larger_than_gain() {
        for order in 1..=6 {
            for &(gain_db, ripple_db) in &[(0.3, 0.5), (1.0, 1.0), (-0.5, 1.0), (1e-6, 1.0)] {
                let layout = low_shelf_prototype(order, gain_db, ripple_db).unwrap();
                assert!(layout.poles().chain(layout.zeros().flatten()).all(|r| r.is_finite()));
                assert!(layout.poles().all(|p| p.re < 0.0));

                let dc = analog_magnitude(&layout, Complex64::new(0.0, 0.0));
                let far = analog_magnitude(&layout, Complex64::new(0.0, 1e9));
                assert_relative_eq!(dc, 10.0_f64.powf(gain_db / 20.0), epsilon = 1e-9);
                assert_relative_eq!(far, 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_negligible_shelf_gain_is_flat() {
        let layout = low_shelf_prototype(3, 1e-12, 0.5).unwrap();
        for &w in &[0.0, 1.0, 10.0] {
            let mag = analog_magnitude(&layout, Complex64::new(0.0, w));
            assert_relative_eq!(mag, 1.0, epsilon = 1e-12);
        }
    }
}
