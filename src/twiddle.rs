//! Q31 twiddle tables, built once per plan and immutable afterwards.
//!
//! Table construction is the only place floating point appears; the
//! transform data path never touches it. `libm` keeps the build
//! `no_std`-safe and bit-identical across hosts.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::num::ComplexQ31;

/// 1/sqrt(2) in Q31 (0.70710678).
pub(crate) const Q31_FRAC_1_SQRT_2: i32 = 0x5A82_799A;
/// sqrt(3)/2 in Q31 (0.86602540).
pub(crate) const Q31_SQRT3_2: i32 = 1_859_775_393;
/// cos(2*pi/5) in Q31 (0.30901699).
pub(crate) const Q31_COS_2PI_5: i32 = 663_608_942;
/// sin(2*pi/5) in Q31 (0.95105652).
pub(crate) const Q31_SIN_2PI_5: i32 = 2_042_378_317;
/// cos(4*pi/5) in Q31 (-0.80901699).
pub(crate) const Q31_COS_4PI_5: i32 = -1_737_350_766;
/// sin(4*pi/5) in Q31 (0.58778525).
pub(crate) const Q31_SIN_4PI_5: i32 = 1_262_259_218;

/// `round(x * 2^31)` clamped to the i32 range, ties away from zero.
///
/// Clamping matters only at +1.0, which quantizes to `0x7FFFFFFF`.
pub(crate) fn q31(x: f64) -> i32 {
    let scaled = libm::round(x * 2_147_483_648.0);
    if scaled >= 2_147_483_647.0 {
        i32::MAX
    } else if scaled <= -2_147_483_648.0 {
        i32::MIN
    } else {
        scaled as i32
    }
}

/// Forward twiddle table for an `n`-point transform.
///
/// Entry `i` holds `(cos, -sin)` of `2*pi*i/n`, which is `W_n^i` for
/// the decimation-in-frequency stages.
pub(crate) fn forward_table(n: usize) -> Box<[ComplexQ31]> {
    let mut table = Vec::with_capacity(n);
    for i in 0..n {
        let angle = 2.0 * PI * (i as f64) / (n as f64);
        table.push(ComplexQ31::new(
            q31(libm::cos(angle)),
            q31(-libm::sin(angle)),
        ));
    }
    table.into_boxed_slice()
}

/// Reconstruction twiddles for the real adapter of an `n`-point
/// transform: `W_n^k` for `k` up to and including `n/4`. The paired
/// bin loop tops out just below that for even halves and exactly
/// there for odd ones.
pub(crate) fn half_table(n: usize) -> Box<[ComplexQ31]> {
    debug_assert!(n >= 4 && n % 2 == 0);
    let mut table = Vec::with_capacity(n / 4 + 1);
    for k in 0..=n / 4 {
        let angle = 2.0 * PI * (k as f64) / (n as f64);
        table.push(ComplexQ31::new(
            q31(libm::cos(angle)),
            q31(-libm::sin(angle)),
        ));
    }
    table.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q31_clamps_and_rounds() {
        assert_eq!(q31(1.0), i32::MAX);
        assert_eq!(q31(-1.0), i32::MIN);
        assert_eq!(q31(0.0), 0);
        assert_eq!(q31(0.5), 1 << 30);
        assert_eq!(q31(-0.5), -(1 << 30));
    }

    #[test]
    fn kernel_constants_match_quantizer() {
        assert_eq!(Q31_FRAC_1_SQRT_2, q31(1.0 / libm::sqrt(2.0)));
        assert_eq!(Q31_SQRT3_2, q31(libm::sqrt(3.0) / 2.0));
        assert_eq!(Q31_COS_2PI_5, q31(libm::cos(2.0 * PI / 5.0)));
        assert_eq!(Q31_SIN_2PI_5, q31(libm::sin(2.0 * PI / 5.0)));
        assert_eq!(Q31_COS_4PI_5, q31(libm::cos(4.0 * PI / 5.0)));
        assert_eq!(Q31_SIN_4PI_5, q31(libm::sin(4.0 * PI / 5.0)));
    }

    #[test]
    fn forward_table_landmarks() {
        let t = forward_table(4);
        assert_eq!(t.len(), 4);
        // W^0 = 1
        assert_eq!(t[0], ComplexQ31::new(i32::MAX, 0));
        // W^1 = -j
        assert_eq!(t[1], ComplexQ31::new(0, i32::MIN));
        // W^2 = -1
        assert_eq!(t[2], ComplexQ31::new(i32::MIN, 0));
        // W^3 = +j
        assert_eq!(t[3], ComplexQ31::new(0, i32::MAX));
    }

    #[test]
    fn forward_table_symmetry() {
        let n = 48;
        let t = forward_table(n);
        for k in 1..n / 2 {
            let a = t[k];
            let b = t[n - k];
            // W^(n-k) is the conjugate of W^k, within quantization.
            assert!((a.re - b.re).abs() <= 1, "k={k}");
            assert!((i64::from(a.im) + i64::from(b.im)).abs() <= 1, "k={k}");
        }
    }

    #[test]
    fn half_table_covers_the_first_quadrant() {
        let t = half_table(32);
        assert_eq!(t.len(), 9);
        assert_eq!(t[0], ComplexQ31::new(i32::MAX, 0));
        // Entry n/8 sits at 45 degrees, entry n/4 at -j.
        assert_eq!(t[4], ComplexQ31::new(Q31_FRAC_1_SQRT_2, -Q31_FRAC_1_SQRT_2));
        assert_eq!(t[8], ComplexQ31::new(0, i32::MIN));
        // The shortest real length still reaches its top pair index.
        assert_eq!(half_table(6).len(), 2);
    }
}
