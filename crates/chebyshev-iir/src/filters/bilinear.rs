//! Bilinear transform
//!
//! Maps analog layouts to the z-plane with
//!
//! ```text
//!   z = (2·fs + s) / (2·fs - s)
//! ```
//!
//! The transform compresses the whole analog frequency axis into
//! `[0, fs/2)`, so frequencies are prewarped with `ω = 2·fs·tan(π·f/fs)`
//! before the analog design is built. Zeros at infinity land on `z = -1`.

use super::layout::{AnalogLayout, DigitalLayout, PoleZero, Reference};
use crate::error::{DesignError, DesignResult};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Pre-warp a frequency in Hz to the analog angular frequency (rad/s) that
/// the bilinear transform maps back onto `freq_hz`.
pub fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Prewarped band parameters for a band centered at `center_hz` of width
/// `width_hz`.
///
/// Both edges are prewarped, so they land exactly after digitization.
/// Returns `(ω0, BW)` with `ω0` the geometric center of the warped edges.
pub fn prewarp_band(center_hz: f64, width_hz: f64, sample_rate: f64) -> (f64, f64) {
    let low = prewarp(center_hz - width_hz / 2.0, sample_rate);
    let high = prewarp(center_hz + width_hz / 2.0, sample_rate);
    ((low * high).sqrt(), high - low)
}

/// Digital angle (radians per sample) of an analog angular frequency.
pub fn digital_angle(omega: f64, sample_rate: f64) -> f64 {
    2.0 * (omega / (2.0 * sample_rate)).atan()
}

fn map_root(s: Complex64, k: f64) -> Complex64 {
    (k + s) / (k - s)
}

/// Digitize an analog layout.
///
/// The digital gain is chosen so the response at the layout's reference
/// point equals the reference gain. Fails with
/// [`DesignError::DesignUnstable`] when a pole does not fall strictly inside
/// the unit circle or the reference response cannot be normalized.
pub fn digitize(analog: &AnalogLayout, sample_rate: f64) -> DesignResult<DigitalLayout> {
    let k = 2.0 * sample_rate;
    let r = analog.reference();
    let theta = digital_angle(r.omega, sample_rate);

    let mut digital: DigitalLayout = analog.map_roots(Reference::new(theta, r.gain), |pz| {
        PoleZero {
            pole: map_root(pz.pole, k),
            zero: Some(pz.zero.map_or(Complex64::new(-1.0, 0.0), |z| map_root(z, k))),
        }
    });

    let radius = digital.max_pole_radius();
    if radius.is_nan() {
        return Err(DesignError::DesignUnstable {
            magnitude: radius,
            reason: "pole is not a number",
        });
    }
    if radius >= 1.0 {
        return Err(DesignError::DesignUnstable {
            magnitude: radius,
            reason: "pole on or outside the unit circle",
        });
    }

    let magnitude = digital.response_at(Complex64::from_polar(1.0, theta)).norm();
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return Err(DesignError::DesignUnstable {
            magnitude,
            reason: "response at the reference point cannot be normalized",
        });
    }
    digital.set_gain(r.gain / magnitude);

    tracing::trace!(sample_rate, theta, gain = digital.gain(), ?digital, "digitized");
    Ok(digital)
}
