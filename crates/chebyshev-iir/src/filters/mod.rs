//! Chebyshev Type I IIR Filter Design
//!
//! Designs are built in four stages, each returning a fresh value:
//!
//! ```text
//! prototype (s-plane, unit cutoff)
//!     → band transform (s-plane, prewarped target)
//!         → bilinear transform (z-plane, gain normalized)
//!             → cascade of biquad sections
//! ```
//!
//! - **Prototype**: equiripple lowpass poles, or low-shelf poles and zeros
//! - **Transform**: lowpass, highpass, bandpass and bandstop root mappings
//! - **Bilinear**: prewarp, s→z mapping and stability check
//! - **Cascade**: pairs roots into sections ordered by pole radius
//!
//! ## Why Biquads?
//!
//! A high-order transfer function expanded into a single polynomial is very
//! sensitive to coefficient rounding. Factored into second-order sections the
//! same design stays stable in double precision well past order 20.

pub mod bilinear;
pub mod cascade;
pub mod chebyshev;
pub mod layout;
pub mod prototype;
pub mod traits;
pub mod transform;

pub use cascade::{BiquadSection, Cascade};
pub use chebyshev::{design, digital_layout, ChebyshevFilter, FilterKind, FilterSpec};
pub use layout::{
    AnalogLayout, DigitalLayout, Layout, Plane, PoleZero, PoleZeroPair, Reference, SPlane, ZPlane,
    MAX_ORDER,
};
pub use traits::{Filter, FrequencyResponse, RealFilter};
