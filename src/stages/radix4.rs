//! Radix-4 butterflies.
//!
//! The 4-point DFT needs no general multiplies: the `-j` rotation of
//! the odd difference is a real/imaginary lane swap with one negation.

use crate::num::{cmul_q31, sra_rnd_c, ComplexQ31};
use crate::scale::mag_c;

#[inline(always)]
fn butterfly(
    x0: ComplexQ31,
    x1: ComplexQ31,
    x2: ComplexQ31,
    x3: ComplexQ31,
) -> (ComplexQ31, ComplexQ31, ComplexQ31, ComplexQ31) {
    let t0 = x0 + x2;
    let t1 = x0 - x2;
    let t2 = x1 + x3;
    let t3 = x1 - x3;
    let y0 = t0 + t2;
    let y2 = t0 - t2;
    // -j * t3 = (t3.im, -t3.re)
    let y1 = ComplexQ31::new(t1.re + t3.im, t1.im - t3.re);
    let y3 = ComplexQ31::new(t1.re - t3.im, t1.im + t3.re);
    (y0, y1, y2, y3)
}

/// Opening stage at unit stride 1.
pub(super) fn first(
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    m: usize,
    shift: u32,
) -> u32 {
    debug_assert_eq!(src.len(), 4 * m);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let x0 = sra_rnd_c(src[i], shift);
        let x1 = sra_rnd_c(src[m + i], shift);
        let x2 = sra_rnd_c(src[2 * m + i], shift);
        let x3 = sra_rnd_c(src[3 * m + i], shift);
        let (y0, y1, y2, y3) = butterfly(x0, x1, x2, x3);
        let y1 = cmul_q31(y1, tw[i]);
        let y2 = cmul_q31(y2, tw[2 * i]);
        let y3 = cmul_q31(y3, tw[3 * i]);
        dst[4 * i] = y0;
        dst[4 * i + 1] = y1;
        dst[4 * i + 2] = y2;
        dst[4 * i + 3] = y3;
        acc = mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3);
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
    debug_assert_eq!(src.len(), 4 * m * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let w1 = tw[v * i];
        let w2 = tw[2 * v * i];
        let w3 = tw[3 * v * i];
        for b in 0..v {
            let x0 = sra_rnd_c(src[i * v + b], shift);
            let x1 = sra_rnd_c(src[(m + i) * v + b], shift);
            let x2 = sra_rnd_c(src[(2 * m + i) * v + b], shift);
            let x3 = sra_rnd_c(src[(3 * m + i) * v + b], shift);
            let (y0, y1, y2, y3) = butterfly(x0, x1, x2, x3);
            let y1 = cmul_q31(y1, w1);
            let y2 = cmul_q31(y2, w2);
            let y3 = cmul_q31(y3, w3);
            dst[4 * i * v + b] = y0;
            dst[(4 * i + 1) * v + b] = y1;
            dst[(4 * i + 2) * v + b] = y2;
            dst[(4 * i + 3) * v + b] = y3;
            acc = mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3);
        }
    }
    acc
}

/// Closing stage: twiddle-free butterflies across the unit stride.
pub(super) fn last(src: &[ComplexQ31], dst: &mut [ComplexQ31], v: usize, shift: u32) -> u32 {
    debug_assert_eq!(src.len(), 4 * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for b in 0..v {
        let x0 = sra_rnd_c(src[b], shift);
        let x1 = sra_rnd_c(src[v + b], shift);
        let x2 = sra_rnd_c(src[2 * v + b], shift);
        let x3 = sra_rnd_c(src[3 * v + b], shift);
        let (y0, y1, y2, y3) = butterfly(x0, x1, x2, x3);
        dst[b] = y0;
        dst[v + b] = y1;
        dst[2 * v + b] = y2;
        dst[3 * v + b] = y3;
        acc = mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3);
    }
    acc
}
