//! Q31 complex samples and the rounding arithmetic shared by every
//! butterfly kernel.
//!
//! A Q31 word holds a value in `[-1, 1)` with 31 fractional bits. All
//! arithmetic here is two's-complement with explicit rounding so that a
//! transform produces bit-identical results on every target.

use core::ops::{Add, Neg, Sub};

/// Complex sample in Q31 fixed point, real part first.
///
/// The layout is a pair of `i32` words aligned to 8 bytes, so any
/// `&[ComplexQ31]` can be handed to DMA or hardware FFT front-ends that
/// expect 8-byte-aligned interleaved buffers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C, align(8))]
pub struct ComplexQ31 {
    pub re: i32,
    pub im: i32,
}

impl ComplexQ31 {
    #[inline(always)]
    pub const fn new(re: i32, im: i32) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self { re: 0, im: 0 }
    }

    /// Complex conjugate. The imaginary part wraps on `i32::MIN`, like
    /// every negation in the engine.
    #[inline(always)]
    pub const fn conj(self) -> Self {
        Self {
            re: self.re,
            im: self.im.wrapping_neg(),
        }
    }
}

impl Add for ComplexQ31 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for ComplexQ31 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Neg for ComplexQ31 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

/// Q31 multiply with round-to-nearest: `(a * b + 2^30) >> 31`.
#[inline(always)]
pub(crate) fn mul_q31(a: i32, b: i32) -> i32 {
    ((i64::from(a) * i64::from(b) + (1 << 30)) >> 31) as i32
}

/// Complex Q31 multiply with a single rounding per component.
///
/// Both cross products are summed in 64 bits before the narrowing
/// shift, so each component is rounded once rather than twice.
#[inline(always)]
pub(crate) fn cmul_q31(x: ComplexQ31, w: ComplexQ31) -> ComplexQ31 {
    let re = i64::from(x.re) * i64::from(w.re) - i64::from(x.im) * i64::from(w.im);
    let im = i64::from(x.re) * i64::from(w.im) + i64::from(x.im) * i64::from(w.re);
    ComplexQ31::new(
        ((re + (1 << 30)) >> 31) as i32,
        ((im + (1 << 30)) >> 31) as i32,
    )
}

/// Arithmetic right shift with round-half-up. `s == 0` is the identity.
///
/// The rounding bias is added in 64 bits so `i32::MAX` survives a
/// one-bit shift without wrapping.
#[inline(always)]
pub(crate) fn sra_rnd(x: i32, s: u32) -> i32 {
    if s == 0 {
        x
    } else {
        ((i64::from(x) + (1i64 << (s - 1))) >> s) as i32
    }
}

/// Component-wise [`sra_rnd`].
#[inline(always)]
pub(crate) fn sra_rnd_c(x: ComplexQ31, s: u32) -> ComplexQ31 {
    ComplexQ31::new(sra_rnd(x.re, s), sra_rnd(x.im, s))
}

/// Narrowing right shift with rounding for 64-bit intermediates.
/// `s` must be at least 1.
#[inline(always)]
pub(crate) fn sra_rnd64(x: i64, s: u32) -> i32 {
    debug_assert!(s >= 1);
    ((x + (1i64 << (s - 1))) >> s) as i32
}

/// Halves a 64-bit intermediate with rounding.
#[inline(always)]
pub(crate) fn rnd_half(x: i64) -> i32 {
    sra_rnd64(x, 1)
}
