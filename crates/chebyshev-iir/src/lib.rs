//! # Chebyshev Type I IIR Designer
//!
//! Computes the coefficients of Chebyshev Type I digital filters as cascades
//! of second-order sections. Supported shapes are lowpass, highpass,
//! bandpass, bandstop and the low-shelf, high-shelf and band-shelf gain
//! variants, parameterized by order, sample rate, frequencies, passband
//! ripple and (for shelves) gain.
//!
//! ## Signal Flow
//!
//! ```text
//! FilterSpec → analog prototype → band transform → bilinear → Cascade
//!                                                               ↓
//!                                         ChebyshevFilter (DF2T processing)
//! ```
//!
//! Design never allocates: layouts and cascades live in fixed arrays sized by
//! [`MAX_ORDER`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use chebyshev_iir::{design, DesignConfig, FilterSpec, FrequencyResponse};
//!
//! let spec = FilterSpec::low_pass(4, 44_100.0, 1000.0, 1.0);
//! let cascade = design(&spec, &DesignConfig::default()).unwrap();
//!
//! for section in cascade.sections() {
//!     println!("{:?}", section.coefficients());
//! }
//! println!("{:.2} dB at 2 kHz", cascade.magnitude_response_db(2000.0, 44_100.0));
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod observe;

pub use config::{Config, DesignConfig};
pub use error::{CascadeError, ConfigError, DesignError, DesignResult};
pub use filters::{
    design, BiquadSection, Cascade, ChebyshevFilter, Filter, FilterKind, FilterSpec,
    FrequencyResponse, RealFilter, MAX_ORDER,
};
