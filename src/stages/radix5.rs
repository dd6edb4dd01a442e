//! Radix-5 butterflies in sum/difference form.
//!
//! The 5-point DFT pairs `x1` with `x4` and `x2` with `x3`; the two
//! rotation constants are `W_5 = (cos 72, -sin 72)` and
//! `W_5^2 = (cos 144, -sin 144)`.

use crate::num::{cmul_q31, mul_q31, sra_rnd_c, ComplexQ31};
use crate::scale::mag_c;
use crate::twiddle::{Q31_COS_2PI_5, Q31_COS_4PI_5, Q31_SIN_2PI_5, Q31_SIN_4PI_5};

const YA_RE: i32 = Q31_COS_2PI_5;
const YA_IM: i32 = -Q31_SIN_2PI_5;
const YB_RE: i32 = Q31_COS_4PI_5;
const YB_IM: i32 = -Q31_SIN_4PI_5;

#[inline(always)]
fn butterfly(
    x0: ComplexQ31,
    x1: ComplexQ31,
    x2: ComplexQ31,
    x3: ComplexQ31,
    x4: ComplexQ31,
) -> (ComplexQ31, ComplexQ31, ComplexQ31, ComplexQ31, ComplexQ31) {
    let s14 = x1 + x4;
    let d14 = x1 - x4;
    let s23 = x2 + x3;
    let d23 = x2 - x3;

    let y0 = x0 + s14 + s23;

    let a = ComplexQ31::new(
        x0.re + mul_q31(s14.re, YA_RE) + mul_q31(s23.re, YB_RE),
        x0.im + mul_q31(s14.im, YA_RE) + mul_q31(s23.im, YB_RE),
    );
    let b = ComplexQ31::new(
        mul_q31(d14.im, YA_IM) + mul_q31(d23.im, YB_IM),
        -mul_q31(d14.re, YA_IM) - mul_q31(d23.re, YB_IM),
    );
    let y1 = a - b;
    let y4 = a + b;

    let c = ComplexQ31::new(
        x0.re + mul_q31(s14.re, YB_RE) + mul_q31(s23.re, YA_RE),
        x0.im + mul_q31(s14.im, YB_RE) + mul_q31(s23.im, YA_RE),
    );
    let d = ComplexQ31::new(
        mul_q31(d23.im, YA_IM) - mul_q31(d14.im, YB_IM),
        mul_q31(d14.re, YB_IM) - mul_q31(d23.re, YA_IM),
    );
    let y2 = c + d;
    let y3 = c - d;

    (y0, y1, y2, y3, y4)
}

/// Opening stage at unit stride 1.
pub(super) fn first(
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    m: usize,
    shift: u32,
) -> u32 {
    debug_assert_eq!(src.len(), 5 * m);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let x0 = sra_rnd_c(src[i], shift);
        let x1 = sra_rnd_c(src[m + i], shift);
        let x2 = sra_rnd_c(src[2 * m + i], shift);
        let x3 = sra_rnd_c(src[3 * m + i], shift);
        let x4 = sra_rnd_c(src[4 * m + i], shift);
        let (y0, y1, y2, y3, y4) = butterfly(x0, x1, x2, x3, x4);
        let y1 = cmul_q31(y1, tw[i]);
        let y2 = cmul_q31(y2, tw[2 * i]);
        let y3 = cmul_q31(y3, tw[3 * i]);
        let y4 = cmul_q31(y4, tw[4 * i]);
        dst[5 * i] = y0;
        dst[5 * i + 1] = y1;
        dst[5 * i + 2] = y2;
        dst[5 * i + 3] = y3;
        dst[5 * i + 4] = y4;
        acc = mag_c(mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3), y4);
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
    debug_assert_eq!(src.len(), 5 * m * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let w1 = tw[v * i];
        let w2 = tw[2 * v * i];
        let w3 = tw[3 * v * i];
        let w4 = tw[4 * v * i];
        for b in 0..v {
            let x0 = sra_rnd_c(src[i * v + b], shift);
            let x1 = sra_rnd_c(src[(m + i) * v + b], shift);
            let x2 = sra_rnd_c(src[(2 * m + i) * v + b], shift);
            let x3 = sra_rnd_c(src[(3 * m + i) * v + b], shift);
            let x4 = sra_rnd_c(src[(4 * m + i) * v + b], shift);
            let (y0, y1, y2, y3, y4) = butterfly(x0, x1, x2, x3, x4);
            let y1 = cmul_q31(y1, w1);
            let y2 = cmul_q31(y2, w2);
            let y3 = cmul_q31(y3, w3);
            let y4 = cmul_q31(y4, w4);
            dst[5 * i * v + b] = y0;
            dst[(5 * i + 1) * v + b] = y1;
            dst[(5 * i + 2) * v + b] = y2;
            dst[(5 * i + 3) * v + b] = y3;
            dst[(5 * i + 4) * v + b] = y4;
            acc = mag_c(mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3), y4);
        }
    }
    acc
}

/// Closing stage: twiddle-free butterflies across the unit stride.
pub(super) fn last(src: &[ComplexQ31], dst: &mut [ComplexQ31], v: usize, shift: u32) -> u32 {
    debug_assert_eq!(src.len(), 5 * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for b in 0..v {
        let x0 = sra_rnd_c(src[b], shift);
        let x1 = sra_rnd_c(src[v + b], shift);
        let x2 = sra_rnd_c(src[2 * v + b], shift);
        let x3 = sra_rnd_c(src[3 * v + b], shift);
        let x4 = sra_rnd_c(src[4 * v + b], shift);
        let (y0, y1, y2, y3, y4) = butterfly(x0, x1, x2, x3, x4);
        dst[b] = y0;
        dst[v + b] = y1;
        dst[2 * v + b] = y2;
        dst[3 * v + b] = y3;
        dst[4 * v + b] = y4;
        acc = mag_c(mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3), y4);
    }
    acc
}
