//! Fused radix-8 closing stage.
//!
//! One load/store pass per lane: a 4-point DFT over the even-index
//! inputs, a 4-point DFT over the odd-index inputs, the odd results
//! rotated by `W_8^q` (which is where 1/sqrt(2) appears) and a radix-2
//! combine. Only the closing position exists for this radix, so the
//! stage is twiddle-table-free.

use crate::num::{mul_q31, sra_rnd_c, ComplexQ31};
use crate::scale::mag_c;
use crate::twiddle::Q31_FRAC_1_SQRT_2;

pub(super) fn last(src: &[ComplexQ31], dst: &mut [ComplexQ31], v: usize, shift: u32) -> u32 {
    debug_assert_eq!(src.len(), 8 * v);
    debug_assert_eq!(src.len(), dst.len());
    let mut acc = 0u32;
    for b in 0..v {
        let x0 = sra_rnd_c(src[b], shift);
        let x1 = sra_rnd_c(src[v + b], shift);
        let x2 = sra_rnd_c(src[2 * v + b], shift);
        let x3 = sra_rnd_c(src[3 * v + b], shift);
        let x4 = sra_rnd_c(src[4 * v + b], shift);
        let x5 = sra_rnd_c(src[5 * v + b], shift);
        let x6 = sra_rnd_c(src[6 * v + b], shift);
        let x7 = sra_rnd_c(src[7 * v + b], shift);

        // 4-point DFT over the even inputs.
        let ea = x0 + x4;
        let eb = x0 - x4;
        let ec = x2 + x6;
        let ed = x2 - x6;
        let e0 = ea + ec;
        let e2 = ea - ec;
        let e1 = ComplexQ31::new(eb.re + ed.im, eb.im - ed.re);
        let e3 = ComplexQ31::new(eb.re - ed.im, eb.im + ed.re);

        // 4-point DFT over the odd inputs.
        let oa = x1 + x5;
        let ob = x1 - x5;
        let oc = x3 + x7;
        let od = x3 - x7;
        let o0 = oa + oc;
        let o2 = oa - oc;
        let o1 = ComplexQ31::new(ob.re + od.im, ob.im - od.re);
        let o3 = ComplexQ31::new(ob.re - od.im, ob.im + od.re);

        // Rotate the odd half: W_8^0 = 1, W_8^1 = (c, -c),
        // W_8^2 = -j, W_8^3 = (-c, -c) with c = 1/sqrt(2).
        let t0 = o0;
        let t1 = ComplexQ31::new(
            mul_q31(o1.re + o1.im, Q31_FRAC_1_SQRT_2),
            mul_q31(o1.im - o1.re, Q31_FRAC_1_SQRT_2),
        );
        let t2 = ComplexQ31::new(o2.im, -o2.re);
        let t3 = ComplexQ31::new(
            mul_q31(o3.im - o3.re, Q31_FRAC_1_SQRT_2),
            mul_q31(-o3.re - o3.im, Q31_FRAC_1_SQRT_2),
        );

        let y0 = e0 + t0;
        let y1 = e1 + t1;
        let y2 = e2 + t2;
        let y3 = e3 + t3;
        let y4 = e0 - t0;
        let y5 = e1 - t1;
        let y6 = e2 - t2;
        let y7 = e3 - t3;

        dst[b] = y0;
        dst[v + b] = y1;
        dst[2 * v + b] = y2;
        dst[3 * v + b] = y3;
        dst[4 * v + b] = y4;
        dst[5 * v + b] = y5;
        dst[6 * v + b] = y6;
        dst[7 * v + b] = y7;

        acc = mag_c(mag_c(mag_c(mag_c(acc, y0), y1), y2), y3);
        acc = mag_c(mag_c(mag_c(mag_c(acc, y4), y5), y6), y7);
    }
    acc
}
