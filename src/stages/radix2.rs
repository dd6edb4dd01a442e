//! Radix-2 butterflies.

use crate::num::{cmul_q31, sra_rnd_c, ComplexQ31};
use crate::scale::mag_c;

/// Opening stage at unit stride 1: `m` butterflies over `src[i]` and
/// `src[m + i]`, output pairs interleaved.
pub(super) fn first(
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    m: usize,
    shift: u32,
) -> u32 {
    debug_assert_eq!(src.len(), 2 * m);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let x0 = sra_rnd_c(src[i], shift);
        let x1 = sra_rnd_c(src[m + i], shift);
        let y0 = x0 + x1;
        let y1 = cmul_q31(x0 - x1, tw[i]);
        dst[2 * i] = y0;
        dst[2 * i + 1] = y1;
        acc = mag_c(mag_c(acc, y0), y1);
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
    debug_assert_eq!(src.len(), 2 * m * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for i in 0..m {
        let w = tw[v * i];
        for b in 0..v {
            let x0 = sra_rnd_c(src[i * v + b], shift);
            let x1 = sra_rnd_c(src[(m + i) * v + b], shift);
            let y0 = x0 + x1;
            let y1 = cmul_q31(x0 - x1, w);
            dst[2 * i * v + b] = y0;
            dst[(2 * i + 1) * v + b] = y1;
            acc = mag_c(mag_c(acc, y0), y1);
        }
    }
    acc
}

/// Closing stage: one twiddle-free butterfly per unit-stride lane.
pub(super) fn last(src: &[ComplexQ31], dst: &mut [ComplexQ31], v: usize, shift: u32) -> u32 {
    debug_assert_eq!(src.len(), 2 * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for b in 0..v {
        let x0 = sra_rnd_c(src[b], shift);
        let x1 = sra_rnd_c(src[v + b], shift);
        let y0 = x0 + x1;
        let y1 = x0 - x1;
        dst[b] = y0;
        dst[v + b] = y1;
        acc = mag_c(mag_c(acc, y0), y1);
    }
    acc
}
