//! Radix-3 butterflies in sum/difference form.
//!
//! With `s = x1 + x2` and `d = x1 - x2` the 3-point DFT needs one real
//! constant: `y0 = x0 + s`, `y1,y2 = x0 - s/2 -+ j*(sqrt(3)/2)*d` (the
//! forward sign puts `+sqrt(3)/2 * d.im` into `y1.re`).

use crate::num::{cmul_q31, mul_q31, rnd_half, sra_rnd_c, ComplexQ31};
use crate::scale::mag_c;
use crate::twiddle::Q31_SQRT3_2;

#[inline(always)]
fn butterfly(x0: ComplexQ31, x1: ComplexQ31, x2: ComplexQ31) -> (ComplexQ31, ComplexQ31, ComplexQ31) {
    let s = x1 + x2;
    let d = x1 - x2;
    let y0 = x0 + s;
    // x0 - s/2, the common real rotation of both outer outputs.
    let f = ComplexQ31::new(
        x0.re - rnd_half(i64::from(s.re)),
        x0.im - rnd_half(i64::from(s.im)),
    );
    let g = ComplexQ31::new(mul_q31(d.re, Q31_SQRT3_2), mul_q31(d.im, Q31_SQRT3_2));
    let y1 = ComplexQ31::new(f.re + g.im, f.im - g.re);
    let y2 = ComplexQ31::new(f.re - g.im, f.im + g.re);
    (y0, y1, y2)
}

/// Opening stage at unit stride 1.
pub(super) fn first(
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    m: usize,
    shift: u32,
) -> u32 {
    debug_assert_eq!(src.len(), 3 * m);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let x0 = sra_rnd_c(src[i], shift);
        let x1 = sra_rnd_c(src[m + i], shift);
        let x2 = sra_rnd_c(src[2 * m + i], shift);
        let (y0, y1, y2) = butterfly(x0, x1, x2);
        let y1 = cmul_q31(y1, tw[i]);
        let y2 = cmul_q31(y2, tw[2 * i]);
        dst[3 * i] = y0;
        dst[3 * i + 1] = y1;
        dst[3 * i + 2] = y2;
        acc = mag_c(mag_c(mag_c(acc, y0), y1), y2);
    }
    acc
}

/// Interior stage at unit stride `v` with `m` twiddle lanes.
pub(super) fn middle(
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    v: usize,
    m: usize,
    shift: u32,
) -> u32 {
    debug_assert_eq!(src.len(), 3 * m * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let w1 = tw[v * i];
        let w2 = tw[2 * v * i];
        for b in 0..v {
            let x0 = sra_rnd_c(src[i * v + b], shift);
            let x1 = sra_rnd_c(src[(m + i) * v + b], shift);
            let x2 = sra_rnd_c(src[(2 * m + i) * v + b], shift);
            let (y0, y1, y2) = butterfly(x0, x1, x2);
            let y1 = cmul_q31(y1, w1);
            let y2 = cmul_q31(y2, w2);
            dst[3 * i * v + b] = y0;
            dst[(3 * i + 1) * v + b] = y1;
            dst[(3 * i + 2) * v + b] = y2;
            acc = mag_c(mag_c(mag_c(acc, y0), y1), y2);
        }
    }
    acc
}

/// Closing stage: twiddle-free butterflies across the unit stride.
pub(super) fn last(src: &[ComplexQ31], dst: &mut [ComplexQ31], v: usize, shift: u32) -> u32 {
    debug_assert_eq!(src.len(), 3 * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for b in 0..v {
        let x0 = sra_rnd_c(src[b], shift);
        let x1 = sra_rnd_c(src[v + b], shift);
        let x2 = sra_rnd_c(src[2 * v + b], shift);
        let (y0, y1, y2) = butterfly(x0, x1, x2);
        dst[b] = y0;
        dst[v + b] = y1;
        dst[2 * v + b] = y2;
        acc = mag_c(mag_c(mag_c(acc, y0), y1), y2);
    }
    acc
}
