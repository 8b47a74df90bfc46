//! Pole/zero layouts
//!
//! A layout is the factored form of a transfer function: second-order
//! pole/zero pairs plus at most one unpaired real pole/zero. The same
//! container describes analog (s-plane) and digital (z-plane) designs; the
//! plane is tracked in the type so an analog layout cannot be handed to the
//! cascade assembler by mistake.
//!
//! Storage is a fixed array sized by [`MAX_ORDER`], so building a layout never
//! touches the heap.

use crate::error::{DesignError, DesignResult};
use num_complex::Complex64;
use std::fmt;
use std::marker::PhantomData;

/// Largest prototype order the fixed storage supports.
///
/// Band designs double the order, but each prototype root still yields a
/// single pair, so `MAX_ORDER` pairs cover every design.
pub const MAX_ORDER: usize = 32;

/// Marker trait for the complex plane a layout lives in.
pub trait Plane: Copy + fmt::Debug + Send + Sync + 'static {
    /// Short name used in debug output
    const NAME: &'static str;
}

/// Continuous-time (Laplace) plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SPlane;

/// Discrete-time plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZPlane;

impl Plane for SPlane {
    const NAME: &'static str = "s";
}

impl Plane for ZPlane {
    const NAME: &'static str = "z";
}

/// A pole and its partner zero.
///
/// `zero == None` is a zero at infinity: the stage contributes a pole only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleZero {
    pub pole: Complex64,
    pub zero: Option<Complex64>,
}

impl PoleZero {
    pub const fn new(pole: Complex64, zero: Option<Complex64>) -> Self {
        Self { pole, zero }
    }

    /// Pole with its zero at infinity
    pub const fn all_pole(pole: Complex64) -> Self {
        Self { pole, zero: None }
    }

    /// Complex conjugate of both roots
    pub fn conj(&self) -> Self {
        Self {
            pole: self.pole.conj(),
            zero: self.zero.map(|z| z.conj()),
        }
    }
}

/// Two pole/zero entries forming one second-order stage.
///
/// The two poles (and the two zeros) are either a conjugate pair or both
/// real, which keeps the stage's polynomial coefficients real.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleZeroPair {
    pub first: PoleZero,
    pub second: PoleZero,
}

impl PoleZeroPair {
    const EMPTY: PoleZeroPair = PoleZeroPair {
        first: PoleZero::all_pole(Complex64::new(0.0, 0.0)),
        second: PoleZero::all_pole(Complex64::new(0.0, 0.0)),
    };

    pub const fn new(first: PoleZero, second: PoleZero) -> Self {
        Self { first, second }
    }

    /// Pair a pole/zero with its own conjugate.
    pub fn conjugate(pz: PoleZero) -> Self {
        Self {
            first: pz,
            second: pz.conj(),
        }
    }

    pub fn poles(&self) -> [Complex64; 2] {
        [self.first.pole, self.second.pole]
    }

    pub fn zeros(&self) -> [Option<Complex64>; 2] {
        [self.first.zero, self.second.zero]
    }
}

/// Point at which a layout's gain is pinned.
///
/// In the s-plane `omega` is an angular frequency in rad/s and may be
/// `f64::INFINITY`. In the z-plane it is the normalized angle in `[0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub omega: f64,
    pub gain: f64,
}

impl Reference {
    pub const fn new(omega: f64, gain: f64) -> Self {
        Self { omega, gain }
    }

    /// Unity gain at DC
    pub const fn dc() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Unity gain at infinite frequency
    pub const fn infinity() -> Self {
        Self::new(f64::INFINITY, 1.0)
    }
}

/// Factored transfer function in plane `P`.
#[derive(Clone, Copy)]
pub struct Layout<P: Plane> {
    pairs: [PoleZeroPair; MAX_ORDER],
    num_pairs: usize,
    single: Option<PoleZero>,
    reference: Reference,
    gain: f64,
    _plane: PhantomData<P>,
}

/// Layout in the s-plane
pub type AnalogLayout = Layout<SPlane>;

/// Layout in the z-plane
pub type DigitalLayout = Layout<ZPlane>;

impl<P: Plane> Layout<P> {
    /// Create an empty layout pinned at `reference`.
    pub fn new(reference: Reference) -> Self {
        Self {
            pairs: [PoleZeroPair::EMPTY; MAX_ORDER],
            num_pairs: 0,
            single: None,
            reference,
            gain: 1.0,
            _plane: PhantomData,
        }
    }

    /// Append a second-order pair.
    ///
    /// At most [`MAX_ORDER`] stages fit, counting the unpaired entry.
    pub fn push_pair(&mut self, pair: PoleZeroPair) -> DesignResult<()> {
        if self.num_stages() == MAX_ORDER {
            return Err(DesignError::InvalidOrder {
                order: self.order() + 2,
                max: MAX_ORDER,
            });
        }
        self.pairs[self.num_pairs] = pair;
        self.num_pairs += 1;
        Ok(())
    }

    /// Set the unpaired real pole/zero, replacing any previous one.
    pub fn set_single(&mut self, pz: PoleZero) -> DesignResult<()> {
        if self.single.is_none() && self.num_stages() == MAX_ORDER {
            return Err(DesignError::InvalidOrder {
                order: self.order() + 1,
                max: MAX_ORDER,
            });
        }
        self.single = Some(pz);
        Ok(())
    }

    pub fn pairs(&self) -> &[PoleZeroPair] {
        &self.pairs[..self.num_pairs]
    }

    pub fn single(&self) -> Option<&PoleZero> {
        self.single.as_ref()
    }

    /// Number of poles.
    pub fn order(&self) -> usize {
        self.num_pairs * 2 + usize::from(self.single.is_some())
    }

    /// Number of second-order (or first-order) stages.
    pub fn num_stages(&self) -> usize {
        self.num_pairs + usize::from(self.single.is_some())
    }

    pub fn reference(&self) -> Reference {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Reference) {
        self.reference = reference;
    }

    /// Scalar multiplying the product of root factors.
    ///
    /// Analog stages leave this at 1; the digitizer resolves it from the
    /// reference point.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub(crate) fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    /// All poles, pairs first.
    pub fn poles(&self) -> impl Iterator<Item = Complex64> + '_ {
        self.pairs()
            .iter()
            .flat_map(|p| p.poles())
            .chain(self.single.iter().map(|s| s.pole))
    }

    /// All zeros in the same order as [`Layout::poles`]; `None` is a zero at
    /// infinity.
    pub fn zeros(&self) -> impl Iterator<Item = Option<Complex64>> + '_ {
        self.pairs()
            .iter()
            .flat_map(|p| p.zeros())
            .chain(self.single.iter().map(|s| s.zero))
    }

    /// Map every pole/zero one-to-one into a new layout.
    ///
    /// Pair structure and the unpaired entry are preserved; the reference is
    /// replaced by `reference`.
    pub fn map_roots<Q: Plane>(
        &self,
        reference: Reference,
        mut f: impl FnMut(PoleZero) -> PoleZero,
    ) -> Layout<Q> {
        let mut out = Layout::<Q>::new(reference);
        for (dst, src) in out.pairs.iter_mut().zip(self.pairs()) {
            *dst = PoleZeroPair::new(f(src.first), f(src.second));
        }
        out.num_pairs = self.num_pairs;
        out.single = self.single.map(f);
        out
    }
}

impl Layout<ZPlane> {
    /// Transfer function evaluated at `z`, scalar gain included.
    pub fn response_at(&self, z: Complex64) -> Complex64 {
        let mut h = Complex64::new(self.gain, 0.0);
        for (pole, zero) in self.poles().zip(self.zeros()) {
            if let Some(zero) = zero {
                h *= z - zero;
            }
            h /= z - pole;
        }
        h
    }

    /// Largest pole magnitude; below 1 means stable. NaN if any pole is NaN.
    pub fn max_pole_radius(&self) -> f64 {
        self.poles().map(|p| p.norm()).fold(0.0, |max, r| {
            if max.is_nan() || r.is_nan() {
                f64::NAN
            } else {
                max.max(r)
            }
        })
    }
}

impl<P: Plane> fmt::Debug for Layout<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("plane", &P::NAME)
            .field("order", &self.order())
            .field("pairs", &self.pairs())
            .field("single", &self.single)
            .field("reference", &self.reference)
            .field("gain", &self.gain)
            .finish()
    }
}
