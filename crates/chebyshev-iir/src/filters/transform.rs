//! Analog band transforms
//!
//! Each function maps a unit-cutoff prototype to a new layout at the target
//! angular frequency. Frequencies are in rad/s and are expected to be
//! prewarped already (see [`super::bilinear::prewarp`]).
//!
//! | Transform | Substitution                 | Roots per prototype root |
//! |-----------|------------------------------|--------------------------|
//! | lowpass   | `s → s/ωc`                   | 1                        |
//! | highpass  | `s → ωc/s`                   | 1                        |
//! | bandpass  | `s → (s² + ω0²)/(BW·s)`      | 2                        |
//! | bandstop  | `s → BW·s/(s² + ω0²)`        | 2                        |

use super::layout::{AnalogLayout, PoleZero, PoleZeroPair, Reference};
use crate::error::DesignResult;
use num_complex::Complex64;

/// Lowpass-to-lowpass: scale every root by `wc`.
pub fn low_pass(proto: &AnalogLayout, wc: f64) -> AnalogLayout {
    let r = proto.reference();
    let reference = Reference::new(r.omega * wc, r.gain);
    proto.map_roots(reference, |pz| PoleZero {
        pole: pz.pole * wc,
        zero: pz.zero.map(|z| z * wc),
    })
}

/// Lowpass-to-highpass: reciprocal map. Zeros at infinity land on the
/// origin and finite zeros at the origin move to infinity.
pub fn high_pass(proto: &AnalogLayout, wc: f64) -> AnalogLayout {
    let r = proto.reference();
    let omega = if r.omega == 0.0 {
        f64::INFINITY
    } else if r.omega.is_infinite() {
        0.0
    } else {
        wc / r.omega
    };
    proto.map_roots(Reference::new(omega, r.gain), |pz| PoleZero {
        pole: wc / pz.pole,
        zero: match pz.zero {
            None => Some(Complex64::new(0.0, 0.0)),
            Some(z) if z == Complex64::new(0.0, 0.0) => None,
            Some(z) => Some(wc / z),
        },
    })
}

/// Lowpass-to-bandpass around `w0` with bandwidth `bw`.
///
/// The order doubles. The prototype's DC reference moves to the band
/// center; an infinite reference stays at infinity.
pub fn band_pass(proto: &AnalogLayout, w0: f64, bw: f64) -> DesignResult<AnalogLayout> {
    let r = proto.reference();
    let omega = if r.omega.is_infinite() {
        f64::INFINITY
    } else {
        // Upper root of s² - j·ω·BW·s + ω0² = 0 on the imaginary axis
        let half = r.omega * bw / 2.0;
        half + (half * half + w0 * w0).sqrt()
    };

    let split = |x: Option<Complex64>| -> [Option<Complex64>; 2] {
        match x {
            None => [Some(Complex64::new(0.0, 0.0)), None],
            Some(x) => {
                let (a, b) = band_pass_roots(x, w0, bw);
                [Some(a), Some(b)]
            }
        }
    };
    let split_pole = |p: Complex64| band_pass_roots(p, w0, bw);

    transform_band(proto, Reference::new(omega, r.gain), split_pole, split)
}

/// Lowpass-to-bandstop around `w0` with stop width `bw`.
///
/// Zeros at infinity become the notch pair `±j·w0`. The prototype's DC
/// reference maps to DC.
pub fn band_stop(proto: &AnalogLayout, w0: f64, bw: f64) -> DesignResult<AnalogLayout> {
    let r = proto.reference();
    let omega = if r.omega == 0.0 {
        0.0
    } else if r.omega.is_infinite() {
        w0
    } else {
        // Upper root of j·ω·(s² + ω0²) = BW·s on the imaginary axis
        let half = bw / (2.0 * r.omega);
        half + (half * half + w0 * w0).sqrt()
    };

    let notch = Complex64::new(0.0, w0);
    let split = |x: Option<Complex64>| -> [Option<Complex64>; 2] {
        match x {
            None => [Some(notch), Some(notch.conj())],
            Some(x) if x == Complex64::new(0.0, 0.0) => [Some(Complex64::new(0.0, 0.0)), None],
            Some(x) => {
                let (a, b) = band_stop_roots(x, w0, bw);
                [Some(a), Some(b)]
            }
        }
    };
    let split_pole = |p: Complex64| band_stop_roots(p, w0, bw);

    transform_band(proto, Reference::new(omega, r.gain), split_pole, split)
}

/// Roots of `s² - x·BW·s + w0² = 0`.
fn band_pass_roots(x: Complex64, w0: f64, bw: f64) -> (Complex64, Complex64) {
    let half = x * (bw / 2.0);
    let d = (half * half - w0 * w0).sqrt();
    (half + d, half - d)
}

/// Roots of `x·s² - BW·s + x·w0² = 0`.
fn band_stop_roots(x: Complex64, w0: f64, bw: f64) -> (Complex64, Complex64) {
    let half = bw / (2.0 * x);
    let d = (half * half - w0 * w0).sqrt();
    (half + d, half - d)
}

/// Shared pairing for the quadratic transforms.
///
/// A conjugate prototype pair `(p, p*)` yields two new conjugate pairs
/// `(a, a*)` and `(b, b*)` from the roots `a, b` of `p`. The unpaired real
/// root yields a single pair `(a, b)`, which is either conjugate or real.
fn transform_band(
    proto: &AnalogLayout,
    reference: Reference,
    split_pole: impl Fn(Complex64) -> (Complex64, Complex64),
    split_zero: impl Fn(Option<Complex64>) -> [Option<Complex64>; 2],
) -> DesignResult<AnalogLayout> {
    let mut out = AnalogLayout::new(reference);

    for pair in proto.pairs() {
        let (pa, pb) = split_pole(pair.first.pole);
        let [za, zb] = split_zero(pair.first.zero);
        out.push_pair(PoleZeroPair::conjugate(PoleZero::new(pa, za)))?;
        out.push_pair(PoleZeroPair::conjugate(PoleZero::new(pb, zb)))?;
    }

    if let Some(single) = proto.single() {
        let (pa, pb) = split_pole(single.pole);
        let [za, zb] = split_zero(single.zero);
        out.push_pair(PoleZeroPair::new(PoleZero::new(pa, za), PoleZero::new(pb, zb)))?;
    }

    tracing::trace!(order = out.order(), ?out, "band transform");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::prototype::{low_pass_prototype, low_shelf_prototype};
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_low_pass_scales_roots() {
        let proto = low_pass_prototype(3, 1.0).unwrap();
        let lp = low_pass(&proto, 100.0);
        assert_eq!(lp.order(), 3);
        for (a, b) in proto.poles().zip(lp.poles()) {
            assert_relative_eq!((a * 100.0 - b).norm(), 0.0, epsilon = 1e-9);
        }
        assert_eq!(lp.reference().omega, 0.0);
    }

    #[test]
    fn test_high_pass_adds_zeros_at_origin() {
        let proto = low_pass_prototype(4, 0.5).unwrap();
        let hp = high_pass(&proto, 10.0);
        assert_eq!(hp.order(), 4);
        assert!(hp.zeros().all(|z| z == Some(c(0.0, 0.0))));
        assert!(hp.poles().all(|p| p.re < 0.0));
        assert!(hp.reference().omega.is_infinite());
    }

    #[test]
    fn test_high_pass_of_shelf_keeps_finite_zeros() {
        let proto = low_shelf_prototype(3, 6.0, 0.5).unwrap();
        let hs = high_pass(&proto, 5.0);
        assert!(hs.zeros().all(|z| matches!(z, Some(z) if z.norm() > 0.0)));
        assert_eq!(hs.reference().omega, 0.0);
    }

    #[test]
    fn test_band_pass_doubles_order() {
        for order in 1..=5 {
            let proto = low_pass_prototype(order, 1.0).unwrap();
            let bp = band_pass(&proto, 1000.0, 200.0).unwrap();
            assert_eq!(bp.order(), 2 * order);
            assert!(bp.single().is_none());
            assert!(bp.poles().all(|p| p.re < 0.0));

            let at_origin = bp.zeros().filter(|z| *z == Some(c(0.0, 0.0))).count();
            let at_infinity = bp.zeros().filter(|z| z.is_none()).count();
            assert_eq!(at_origin, order);
            assert_eq!(at_infinity, order);
            assert_relative_eq!(bp.reference().omega, 1000.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_band_pass_poles_are_conjugate_symmetric() {
        let proto = low_pass_prototype(3, 1.0).unwrap();
        let bp = band_pass(&proto, 50.0, 400.0).unwrap();
        for pair in bp.pairs() {
            let [a, b] = pair.poles();
            let conjugate = (a - b.conj()).norm() < 1e-9;
            let both_real = a.im.abs() < 1e-9 && b.im.abs() < 1e-9;
            assert!(conjugate || both_real, "pair {:?} is not real-valued", pair);
        }
    }

    #[test]
    fn test_band_stop_places_notch_zeros() {
        let proto = low_pass_prototype(2, 1.0).unwrap();
        let bs = band_stop(&proto, 300.0, 50.0).unwrap();
        assert_eq!(bs.order(), 4);
        for z in bs.zeros() {
            let z = z.expect("bandstop zeros are finite");
            assert_relative_eq!(z.re, 0.0);
            assert_relative_eq!(z.im.abs(), 300.0, epsilon = 1e-9);
        }
        assert_eq!(bs.reference().omega, 0.0);
    }
}
