//! Chebyshev Type I filter design
//!
//! Ties the pipeline stages together:
//!
//! ```text
//!   FilterSpec ─► prototype ─► band transform ─► bilinear ─► Cascade
//!                 (s-plane)     (s-plane)         (z-plane)
//! ```
//!
//! [`design`] is the pure entry point. [`ChebyshevFilter`] wraps a cascade
//! with Direct Form II Transposed state for running samples.
//!
//! ## Example
//!
//! ```rust,ignore
//! use chebyshev_iir::{ChebyshevFilter, FilterSpec, RealFilter};
//!
//! let mut filter = ChebyshevFilter::default();
//! filter.setup(&FilterSpec::low_pass(4, 44_100.0, 1000.0, 1.0))?;
//! let y = filter.process_real(0.5);
//! ```

use super::bilinear::{digitize, prewarp, prewarp_band};
use super::cascade::Cascade;
use super::layout::{AnalogLayout, DigitalLayout, Reference, MAX_ORDER};
use super::prototype::{low_pass_prototype, low_shelf_prototype};
use super::traits::{Filter, RealFilter};
use super::transform;
use crate::config::DesignConfig;
use crate::error::{DesignError, DesignResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Band shape and its frequency parameters (Hz).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    LowPass { cutoff_hz: f64 },
    HighPass { cutoff_hz: f64 },
    BandPass { center_hz: f64, width_hz: f64 },
    BandStop { center_hz: f64, width_hz: f64 },
    /// Boost or cut `gain_db` below `cutoff_hz`
    LowShelf { cutoff_hz: f64, gain_db: f64 },
    /// Boost or cut `gain_db` above `cutoff_hz`
    HighShelf { cutoff_hz: f64, gain_db: f64 },
    /// Boost or cut `gain_db` inside the band
    BandShelf {
        center_hz: f64,
        width_hz: f64,
        gain_db: f64,
    },
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::LowPass { .. } => "low_pass",
            FilterKind::HighPass { .. } => "high_pass",
            FilterKind::BandPass { .. } => "band_pass",
            FilterKind::BandStop { .. } => "band_stop",
            FilterKind::LowShelf { .. } => "low_shelf",
            FilterKind::HighShelf { .. } => "high_shelf",
            FilterKind::BandShelf { .. } => "band_shelf",
        }
    }

    /// Band kinds double the prototype order.
    pub fn is_band(&self) -> bool {
        matches!(
            self,
            FilterKind::BandPass { .. } | FilterKind::BandStop { .. } | FilterKind::BandShelf { .. }
        )
    }
}

/// Complete set of design parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Prototype order
    pub order: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Passband ripple in dB
    pub ripple_db: f64,
    pub kind: FilterKind,
}

impl FilterSpec {
    pub fn new(order: usize, sample_rate: f64, ripple_db: f64, kind: FilterKind) -> Self {
        Self {
            order,
            sample_rate,
            ripple_db,
            kind,
        }
    }

    pub fn low_pass(order: usize, sample_rate: f64, cutoff_hz: f64, ripple_db: f64) -> Self {
        Self::new(order, sample_rate, ripple_db, FilterKind::LowPass { cutoff_hz })
    }

    pub fn high_pass(order: usize, sample_rate: f64, cutoff_hz: f64, ripple_db: f64) -> Self {
        Self::new(order, sample_rate, ripple_db, FilterKind::HighPass { cutoff_hz })
    }

    pub fn band_pass(
        order: usize,
        sample_rate: f64,
        center_hz: f64,
        width_hz: f64,
        ripple_db: f64,
    ) -> Self {
        Self::new(
            order,
            sample_rate,
            ripple_db,
            FilterKind::BandPass {
                center_hz,
                width_hz,
            },
        )
    }

    pub fn band_stop(
        order: usize,
        sample_rate: f64,
        center_hz: f64,
        width_hz: f64,
        ripple_db: f64,
    ) -> Self {
        Self::new(
            order,
            sample_rate,
            ripple_db,
            FilterKind::BandStop {
                center_hz,
                width_hz,
            },
        )
    }

    pub fn low_shelf(
        order: usize,
        sample_rate: f64,
        cutoff_hz: f64,
        gain_db: f64,
        ripple_db: f64,
    ) -> Self {
        Self::new(
            order,
            sample_rate,
            ripple_db,
            FilterKind::LowShelf { cutoff_hz, gain_db },
        )
    }

    pub fn high_shelf(
        order: usize,
        sample_rate: f64,
        cutoff_hz: f64,
        gain_db: f64,
        ripple_db: f64,
    ) -> Self {
        Self::new(
            order,
            sample_rate,
            ripple_db,
            FilterKind::HighShelf { cutoff_hz, gain_db },
        )
    }

    pub fn band_shelf(
        order: usize,
        sample_rate: f64,
        center_hz: f64,
        width_hz: f64,
        gain_db: f64,
        ripple_db: f64,
    ) -> Self {
        Self::new(
            order,
            sample_rate,
            ripple_db,
            FilterKind::BandShelf {
                center_hz,
                width_hz,
                gain_db,
            },
        )
    }

    /// Same parameters at another prototype order.
    pub fn with_order(self, order: usize) -> Self {
        Self { order, ..self }
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Check order, sample rate and frequencies.
    ///
    /// Ripple and gain are checked by the prototype builders.
    pub fn validate(&self, max_order: usize) -> DesignResult<()> {
        let max = max_order.min(MAX_ORDER);
        if self.order == 0 || self.order > max {
            return Err(DesignError::InvalidOrder {
                order: self.order,
                max,
            });
        }
        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) {
            return Err(DesignError::InvalidFrequency {
                parameter: "sample_rate",
                value: self.sample_rate,
                limit: f64::INFINITY,
            });
        }

        let nyquist = self.nyquist();
        match self.kind {
            FilterKind::LowPass { cutoff_hz }
            | FilterKind::HighPass { cutoff_hz }
            | FilterKind::LowShelf { cutoff_hz, .. }
            | FilterKind::HighShelf { cutoff_hz, .. } => check_frequency("cutoff", cutoff_hz, nyquist),
            FilterKind::BandPass {
                center_hz,
                width_hz,
            }
            | FilterKind::BandStop {
                center_hz,
                width_hz,
            }
            | FilterKind::BandShelf {
                center_hz,
                width_hz,
                ..
            } => check_band(center_hz, width_hz, nyquist),
        }
    }
}

fn check_frequency(parameter: &'static str, value: f64, nyquist: f64) -> DesignResult<()> {
    if value > 0.0 && value < nyquist {
        Ok(())
    } else {
        Err(DesignError::InvalidFrequency {
            parameter,
            value,
            limit: nyquist,
        })
    }
}

fn check_band(center_hz: f64, width_hz: f64, nyquist: f64) -> DesignResult<()> {
    check_frequency("center", center_hz, nyquist)?;
    check_frequency("width", width_hz, nyquist)?;
    let limit = 2.0 * center_hz.min(nyquist - center_hz);
    if width_hz < limit {
        Ok(())
    } else {
        Err(DesignError::InvalidBandwidth {
            center: center_hz,
            width: width_hz,
            limit,
        })
    }
}

/// Band-reject shapes pin their unity band on the side farther from the
/// band: Nyquist for a center below `fs/4`, DC otherwise.
fn band_reject_reference(center_hz: f64, sample_rate: f64) -> Reference {
    if center_hz < sample_rate / 4.0 {
        Reference::infinity()
    } else {
        Reference::dc()
    }
}

/// Build the band-transformed analog layout for a validated spec.
fn analog_layout(spec: &FilterSpec) -> DesignResult<AnalogLayout> {
    let FilterSpec {
        order,
        sample_rate: fs,
        ripple_db,
        kind,
    } = *spec;

    let layout = match kind {
        FilterKind::LowPass { cutoff_hz } => {
            transform::low_pass(&low_pass_prototype(order, ripple_db)?, prewarp(cutoff_hz, fs))
        }
        FilterKind::HighPass { cutoff_hz } => {
            transform::high_pass(&low_pass_prototype(order, ripple_db)?, prewarp(cutoff_hz, fs))
        }
        FilterKind::BandPass {
            center_hz,
            width_hz,
        } => {
            let (w0, bw) = prewarp_band(center_hz, width_hz, fs);
            transform::band_pass(&low_pass_prototype(order, ripple_db)?, w0, bw)?
        }
        FilterKind::BandStop {
            center_hz,
            width_hz,
        } => {
            let (w0, bw) = prewarp_band(center_hz, width_hz, fs);
            let mut layout = transform::band_stop(&low_pass_prototype(order, ripple_db)?, w0, bw)?;
            layout.set_reference(band_reject_reference(center_hz, fs));
            layout
        }
        FilterKind::LowShelf { cutoff_hz, gain_db } => transform::low_pass(
            &low_shelf_prototype(order, gain_db, ripple_db)?,
            prewarp(cutoff_hz, fs),
        ),
        FilterKind::HighShelf { cutoff_hz, gain_db } => transform::high_pass(
            &low_shelf_prototype(order, gain_db, ripple_db)?,
            prewarp(cutoff_hz, fs),
        ),
        FilterKind::BandShelf {
            center_hz,
            width_hz,
            gain_db,
        } => {
            let (w0, bw) = prewarp_band(center_hz, width_hz, fs);
            let proto = low_shelf_prototype(order, gain_db, ripple_db)?;
            let mut layout = transform::band_pass(&proto, w0, bw)?;
            layout.set_reference(band_reject_reference(center_hz, fs));
            layout
        }
    };
    Ok(layout)
}

/// Validate `spec` and run it through the analog and digital stages.
pub fn digital_layout(spec: &FilterSpec, config: &DesignConfig) -> DesignResult<DigitalLayout> {
    spec.validate(config.max_order)?;
    let analog = analog_layout(spec)?;
    digitize(&analog, spec.sample_rate)
}

/// Design a Chebyshev Type I filter.
///
/// Returns `ceil(order / 2)` sections for lowpass, highpass and shelves and
/// `order` sections for band kinds.
pub fn design(spec: &FilterSpec, config: &DesignConfig) -> DesignResult<Cascade> {
    match digital_layout(spec, config) {
        Ok(digital) => {
            let cascade = Cascade::from_layout(&digital);
            debug!(
                kind = spec.kind.name(),
                order = spec.order,
                sample_rate = spec.sample_rate,
                sections = cascade.len(),
                gain = digital.gain(),
                "designed filter"
            );
            Ok(cascade)
        }
        Err(e) => {
            debug!(kind = spec.kind.name(), order = spec.order, error = %e, "design rejected");
            Err(e)
        }
    }
}

/// Chebyshev Type I filter with processing state.
///
/// Starts as a pass-through. Each successful [`ChebyshevFilter::setup`]
/// replaces the cascade and clears the delay registers; a failed one leaves
/// both untouched.
#[derive(Debug, Clone)]
pub struct ChebyshevFilter {
    config: DesignConfig,
    spec: Option<FilterSpec>,
    cascade: Cascade,
    /// DF2T registers per section, real path
    state: [[f64; 2]; MAX_ORDER],
    /// DF2T registers per section, complex path
    state_complex: [[Complex64; 2]; MAX_ORDER],
}

impl ChebyshevFilter {
    pub fn new(config: DesignConfig) -> Self {
        Self {
            config,
            spec: None,
            cascade: Cascade::new(),
            state: [[0.0; 2]; MAX_ORDER],
            state_complex: [[Complex64::new(0.0, 0.0); 2]; MAX_ORDER],
        }
    }

    /// Create and design in one step.
    pub fn with_spec(spec: &FilterSpec, config: DesignConfig) -> DesignResult<Self> {
        let mut filter = Self::new(config);
        filter.setup(spec)?;
        Ok(filter)
    }

    /// Re-design the filter.
    pub fn setup(&mut self, spec: &FilterSpec) -> DesignResult<()> {
        let cascade = design(spec, &self.config)?;
        self.cascade = cascade;
        self.spec = Some(*spec);
        self.reset();
        Ok(())
    }

    /// Re-design at the configured maximum order, ignoring `spec.order`.
    pub fn setup_max_order(&mut self, spec: &FilterSpec) -> DesignResult<()> {
        let order = self.config.max_order.min(MAX_ORDER);
        self.setup(&spec.with_order(order))
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Parameters of the current design, if any.
    pub fn spec(&self) -> Option<&FilterSpec> {
        self.spec.as_ref()
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    pub fn is_stable(&self) -> bool {
        self.cascade.is_stable()
    }
}

impl Default for ChebyshevFilter {
    fn default() -> Self {
        Self::new(DesignConfig::default())
    }
}

impl Filter for ChebyshevFilter {
    fn process(&mut self, input: Complex64) -> Complex64 {
        self.cascade
            .sections()
            .iter()
            .zip(self.state_complex.iter_mut())
            .fold(input, |x, (section, state)| section.process(state, x))
    }

    fn reset(&mut self) {
        self.state = [[0.0; 2]; MAX_ORDER];
        self.state_complex = [[Complex64::new(0.0, 0.0); 2]; MAX_ORDER];
    }

    fn group_delay(&self) -> f64 {
        // Frequency dependent; report DC
        let fs = self.spec.map_or(1.0, |s| s.sample_rate);
        self.cascade.group_delay_at(0.0, fs)
    }

    fn order(&self) -> usize {
        self.cascade.order()
    }
}

impl RealFilter for ChebyshevFilter {
    fn process_real(&mut self, input: f64) -> f64 {
        self.cascade
            .sections()
            .iter()
            .zip(self.state.iter_mut())
            .fold(input, |x, (section, state)| section.process(state, x))
    }
}
