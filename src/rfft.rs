//! Real-input transforms layered on the half-size complex FFT.
//!
//! A length-`n` real block is packed into `n/2` complex samples (even
//! samples real, odd samples imaginary), run through the complex
//! engine, then unpacked into the `n/2 + 1` non-redundant spectrum
//! bins via conjugate symmetry. The inverse runs the same recipe
//! backwards. Reconstruction arithmetic runs in 64 bits and rounds
//! once per component; each direction reports the inner transform's
//! shift plus one for the reconstruction halving, and the inverse
//! adds the guard bit it claims on the incoming bins.

use alloc::boxed::Box;
use alloc::sync::Arc;
use hashbrown::HashMap;

use crate::fft::{FftError, FftPlan, FftPlanner};
use crate::num::{cmul_q31, rnd_half, sra_rnd64, sra_rnd_c, ComplexQ31};
use crate::scale::{block_exponent_complex, Scaling};
use crate::twiddle::half_table;

/// Validates a real transform length and returns the half length.
fn check_len(n: usize) -> Result<usize, FftError> {
    if n == 0 {
        return Err(FftError::EmptyInput);
    }
    if n < 4 || n % 2 != 0 {
        return Err(FftError::UnsupportedLength(n));
    }
    Ok(n / 2)
}

/// Immutable descriptor for a real transform of length `n`.
///
/// Wraps the complex plan for `n/2` together with the split twiddles
/// `W_n^k` used to stitch the packed spectrum back apart.
pub struct RfftPlan {
    n: usize,
    half: Arc<FftPlan>,
    twiddles: Box<[ComplexQ31]>,
}

impl RfftPlan {
    /// Builds a plan for an even length `n >= 4` whose half length the
    /// complex engine supports.
    pub fn new(n: usize) -> Result<Self, FftError> {
        let m = check_len(n)?;
        let half = FftPlan::new(m).map_err(|_| FftError::UnsupportedLength(n))?;
        Ok(Self::assemble(n, Arc::new(half)))
    }

    fn assemble(n: usize, half: Arc<FftPlan>) -> Self {
        #[cfg(feature = "verbose-logging")]
        log::debug!("rfft plan n={} half={}", n, half.n());
        Self {
            n,
            half,
            twiddles: half_table(n),
        }
    }

    /// The real transform length this plan was built for.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of spectrum bins, `n/2 + 1`.
    pub fn bins(&self) -> usize {
        self.n / 2 + 1
    }

    /// Forward real transform.
    ///
    /// Reads `n` real samples, writes `n/2 + 1` bins and needs `n`
    /// elements of scratch. Returns the accumulated right shift `s`;
    /// the unscaled spectrum is `output * 2^s`.
    pub fn rfft(
        &self,
        input: &[i32],
        output: &mut [ComplexQ31],
        scratch: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        let m = self.n / 2;
        if input.is_empty() {
            return Err(FftError::EmptyInput);
        }
        if input.len() != self.n {
            return Err(FftError::MismatchedLengths {
                expected: self.n,
                got: input.len(),
            });
        }
        if output.len() != m + 1 {
            return Err(FftError::MismatchedLengths {
                expected: m + 1,
                got: output.len(),
            });
        }
        if scratch.len() < self.n {
            return Err(FftError::ScratchTooSmall {
                required: self.n,
                got: scratch.len(),
            });
        }
        let (za, rest) = scratch.split_at_mut(m);
        let zb = &mut rest[..m];
        for (i, z) in za.iter_mut().enumerate() {
            *z = ComplexQ31::new(input[2 * i], input[2 * i + 1]);
        }
        let inner = self.half.fft(za, zb, scaling)?;

        // DC and Nyquist come straight out of bin zero.
        let z0 = zb[0];
        output[0] = ComplexQ31::new(rnd_half(i64::from(z0.re) + i64::from(z0.im)), 0);
        output[m] = ComplexQ31::new(rnd_half(i64::from(z0.re) - i64::from(z0.im)), 0);
        for k in 1..(m + 1) / 2 {
            let a = zb[k];
            let b = zb[m - k].conj();
            let sr = rnd_half(i64::from(a.re) + i64::from(b.re));
            let si = rnd_half(i64::from(a.im) + i64::from(b.im));
            let dr = rnd_half(i64::from(a.re) - i64::from(b.re));
            let di = rnd_half(i64::from(a.im) - i64::from(b.im));
            let t = cmul_q31(ComplexQ31::new(dr, di), self.twiddles[k]);
            output[k] = ComplexQ31::new(
                rnd_half(i64::from(sr) + i64::from(t.im)),
                rnd_half(i64::from(si) - i64::from(t.re)),
            );
            output[m - k] = ComplexQ31::new(
                rnd_half(i64::from(sr) - i64::from(t.im)),
                rnd_half(-i64::from(si) - i64::from(t.re)),
            );
        }
        if m % 2 == 0 {
            // The middle bin pairs with itself and reduces to a
            // conjugate, no twiddle needed.
            let z = zb[m / 2];
            output[m / 2] =
                ComplexQ31::new(rnd_half(i64::from(z.re)), rnd_half(-i64::from(z.im)));
        }
        Ok(inner + 1)
    }

    /// Inverse real transform.
    ///
    /// Reads `n/2 + 1` bins, writes `n` real samples and needs `n`
    /// elements of scratch. Bins may span the full 32-bit range: the
    /// reconstruction claims one guard bit before combining (measured
    /// from the bins under dynamic scaling, fixed under static) and
    /// folds it into the returned shift. No `1/n` normalization is
    /// applied; with forward shift `s_f` and inverse shift `s_i`, the
    /// chain `irfft(rfft(x))` reproduces `n * x / 2^(s_f + s_i + 1)`.
    pub fn irfft(
        &self,
        input: &[ComplexQ31],
        output: &mut [i32],
        scratch: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        let m = self.n / 2;
        if input.is_empty() {
            return Err(FftError::EmptyInput);
        }
        if input.len() != m + 1 {
            return Err(FftError::MismatchedLengths {
                expected: m + 1,
                got: input.len(),
            });
        }
        if output.len() != self.n {
            return Err(FftError::MismatchedLengths {
                expected: self.n,
                got: output.len(),
            });
        }
        if scratch.len() < self.n {
            return Err(FftError::ScratchTooSmall {
                required: self.n,
                got: scratch.len(),
            });
        }
        // Caller bins carry no headroom guarantee; claim one guard bit
        // before combining (measured under dynamic scaling, fixed
        // under static).
        let guard = match scaling {
            Scaling::Dynamic => 1u32.saturating_sub(block_exponent_complex(input)),
            Scaling::Static => 1,
        };
        let (za, rest) = scratch.split_at_mut(m);
        let zb = &mut rest[..m];
        let x0 = sra_rnd_c(input[0], guard);
        let xm = sra_rnd_c(input[m], guard);
        za[0] = ComplexQ31::new(
            sra_rnd64(i64::from(x0.re) + i64::from(xm.re), 2),
            sra_rnd64(i64::from(x0.re) - i64::from(xm.re), 2),
        );
        for k in 1..(m + 1) / 2 {
            let a = sra_rnd_c(input[k], guard);
            let b = sra_rnd_c(input[m - k], guard).conj();
            let sr = rnd_half(i64::from(a.re) + i64::from(b.re));
            let si = rnd_half(i64::from(a.im) + i64::from(b.im));
            let dr = rnd_half(i64::from(a.re) - i64::from(b.re));
            let di = rnd_half(i64::from(a.im) - i64::from(b.im));
            let w = self.twiddles[k].conj();
            let t = cmul_q31(ComplexQ31::new(dr, di), w);
            za[k] = ComplexQ31::new(
                rnd_half(i64::from(sr) - i64::from(t.im)),
                rnd_half(i64::from(si) + i64::from(t.re)),
            );
            za[m - k] = ComplexQ31::new(
                rnd_half(i64::from(sr) + i64::from(t.im)),
                rnd_half(-i64::from(si) + i64::from(t.re)),
            );
        }
        if m % 2 == 0 {
            let z = sra_rnd_c(input[m / 2], guard);
            za[m / 2] = ComplexQ31::new(rnd_half(i64::from(z.re)), rnd_half(-i64::from(z.im)));
        }
        let inner = self.half.ifft(za, zb, scaling)?;
        for (i, z) in zb.iter().enumerate() {
            output[2 * i] = z.re;
            output[2 * i + 1] = z.im;
        }
        Ok(guard + inner + 1)
    }
}

/// Builds and memoizes [`RfftPlan`]s, sharing the underlying half-size
/// complex plans through an embedded [`FftPlanner`].
pub struct RfftPlanner {
    plans: HashMap<usize, Arc<RfftPlan>>,
    complex: FftPlanner,
}

impl RfftPlanner {
    pub fn new() -> Self {
        Self {
            plans: HashMap::new(),
            complex: FftPlanner::new(),
        }
    }

    /// Returns the cached plan for `n`, building it on first use.
    pub fn plan(&mut self, n: usize) -> Result<Arc<RfftPlan>, FftError> {
        if let Some(plan) = self.plans.get(&n) {
            return Ok(plan.clone());
        }
        let m = check_len(n)?;
        let half = self
            .complex
            .plan(m)
            .map_err(|_| FftError::UnsupportedLength(n))?;
        let plan = Arc::new(RfftPlan::assemble(n, half));
        self.plans.insert(n, plan.clone());
        Ok(plan)
    }

    /// Plans for `input.len()` if needed, then runs the forward real
    /// transform.
    pub fn rfft(
        &mut self,
        input: &[i32],
        output: &mut [ComplexQ31],
        scratch: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        if input.is_empty() {
            return Err(FftError::EmptyInput);
        }
        let plan = self.plan(input.len())?;
        plan.rfft(input, output, scratch, scaling)
    }

    /// Plans for `output.len()` if needed, then runs the inverse real
    /// transform.
    pub fn irfft(
        &mut self,
        input: &[ComplexQ31],
        output: &mut [i32],
        scratch: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        if output.is_empty() {
            return Err(FftError::EmptyInput);
        }
        let plan = self.plan(output.len())?;
        plan.irfft(input, output, scratch, scaling)
    }
}

impl Default for RfftPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn plan_validation() {
        assert_eq!(RfftPlan::new(0).err(), Some(FftError::EmptyInput));
        assert_eq!(RfftPlan::new(2).err(), Some(FftError::UnsupportedLength(2)));
        assert_eq!(RfftPlan::new(5).err(), Some(FftError::UnsupportedLength(5)));
        // 14 is even but its half does not factor into 2/3/5.
        assert_eq!(
            RfftPlan::new(14).err(),
            Some(FftError::UnsupportedLength(14))
        );
        let plan = RfftPlan::new(8).unwrap();
        assert_eq!(plan.n(), 8);
        assert_eq!(plan.bins(), 5);
    }

    #[test]
    fn dc_block_lands_in_bin_zero() {
        let c = 1 << 20;
        let plan = RfftPlan::new(8).unwrap();
        let input = [c; 8];
        let mut output = vec![ComplexQ31::new(-1, -1); 5];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let shift = plan
            .rfft(&input, &mut output, &mut scratch, Scaling::Dynamic)
            .unwrap();
        assert_eq!(shift, 1);
        assert_eq!(output[0], ComplexQ31::new(4 * c, 0));
        for bin in &output[1..] {
            assert_eq!(*bin, ComplexQ31::zero());
        }
    }

    #[test]
    fn dc_block_static_shift_is_inner_plus_one() {
        let c = 1 << 20;
        let plan = RfftPlan::new(8).unwrap();
        let input = [c; 8];
        let mut output = vec![ComplexQ31::zero(); 5];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let shift = plan
            .rfft(&input, &mut output, &mut scratch, Scaling::Static)
            .unwrap();
        // The half-size plan is a single radix-4 stage with headroom 3.
        assert_eq!(shift, 4);
        assert_eq!(output[0], ComplexQ31::new(1 << 19, 0));
    }

    #[test]
    fn alternating_block_lands_in_nyquist_bin() {
        let c = 1 << 20;
        let plan = RfftPlan::new(8).unwrap();
        let mut input = [c; 8];
        for (i, x) in input.iter_mut().enumerate() {
            if i % 2 == 1 {
                *x = -c;
            }
        }
        let mut output = vec![ComplexQ31::zero(); 5];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let shift = plan
            .rfft(&input, &mut output, &mut scratch, Scaling::Dynamic)
            .unwrap();
        assert_eq!(shift, 1);
        assert_eq!(output[4], ComplexQ31::new(4 * c, 0));
        for bin in &output[..4] {
            assert_eq!(*bin, ComplexQ31::zero());
        }
    }

    #[test]
    fn odd_half_length_is_supported() {
        // n = 6 runs a radix-3 half plan and has no middle bin.
        let c = 1 << 20;
        let plan = RfftPlan::new(6).unwrap();
        let input = [c; 6];
        let mut output = vec![ComplexQ31::zero(); 4];
        let mut scratch = vec![ComplexQ31::zero(); 6];
        let shift = plan
            .rfft(&input, &mut output, &mut scratch, Scaling::Dynamic)
            .unwrap();
        assert_eq!(shift, 1);
        assert_eq!(output[0], ComplexQ31::new(3 * c, 0));
        for bin in &output[1..] {
            assert_eq!(*bin, ComplexQ31::zero());
        }
    }

    #[test]
    fn dc_roundtrip_is_exact() {
        let c = 1 << 20;
        let plan = RfftPlan::new(8).unwrap();
        let input = [c; 8];
        let mut spectrum = vec![ComplexQ31::zero(); 5];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let s_f = plan
            .rfft(&input, &mut spectrum, &mut scratch, Scaling::Dynamic)
            .unwrap();
        let mut time = [0i32; 8];
        let s_i = plan
            .irfft(&spectrum, &mut time, &mut scratch, Scaling::Dynamic)
            .unwrap();
        assert_eq!(s_f, 1);
        assert_eq!(s_i, 1);
        // n * x = y * 2^(s_f + s_i + 1) with n = 8 collapses to y = x.
        assert_eq!(time, input);
    }

    #[test]
    fn inverse_static_shift_is_data_independent() {
        let plan = RfftPlan::new(8).unwrap();
        let mut time = [0i32; 8];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let quiet = vec![ComplexQ31::new(1 << 8, 0); 5];
        let loud = vec![ComplexQ31::new(i32::MAX, i32::MIN); 5];
        let s_quiet = plan
            .irfft(&quiet, &mut time, &mut scratch, Scaling::Static)
            .unwrap();
        let s_loud = plan
            .irfft(&loud, &mut time, &mut scratch, Scaling::Static)
            .unwrap();
        assert_eq!(s_quiet, s_loud);
        // Two fixed units on top of the half plan: the guard bit and
        // the merge halving.
        assert_eq!(s_quiet, plan.half.static_shift() + 2);
    }

    #[test]
    fn buffer_validation_covers_every_surface() {
        let plan = RfftPlan::new(8).unwrap();
        let input = [0i32; 8];
        let short_input = [0i32; 6];
        let mut output = vec![ComplexQ31::zero(); 5];
        let mut short_output = vec![ComplexQ31::zero(); 4];
        let mut scratch = vec![ComplexQ31::zero(); 8];
        let mut short_scratch = vec![ComplexQ31::zero(); 7];

        assert_eq!(
            plan.rfft(&short_input, &mut output, &mut scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::MismatchedLengths { expected: 8, got: 6 })
        );
        assert_eq!(
            plan.rfft(&input, &mut short_output, &mut scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::MismatchedLengths { expected: 5, got: 4 })
        );
        assert_eq!(
            plan.rfft(&input, &mut output, &mut short_scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::ScratchTooSmall { required: 8, got: 7 })
        );
        assert_eq!(
            plan.rfft(&[], &mut output, &mut scratch, Scaling::Dynamic).err(),
            Some(FftError::EmptyInput)
        );

        let bins = vec![ComplexQ31::zero(); 5];
        let mut time = [0i32; 8];
        let mut short_time = [0i32; 7];
        assert_eq!(
            plan.irfft(&bins[..4], &mut time, &mut scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::MismatchedLengths { expected: 5, got: 4 })
        );
        assert_eq!(
            plan.irfft(&bins, &mut short_time, &mut scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::MismatchedLengths { expected: 8, got: 7 })
        );
        assert_eq!(
            plan.irfft(&bins, &mut time, &mut short_scratch, Scaling::Dynamic)
                .err(),
            Some(FftError::ScratchTooSmall { required: 8, got: 7 })
        );
    }

    #[test]
    fn planner_shares_half_plans_and_caches() {
        let mut planner = RfftPlanner::new();
        let a = planner.plan(48).unwrap();
        let b = planner.plan(48).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let complex_half = planner.complex.plan(24).unwrap();
        assert!(Arc::ptr_eq(&a.half, &complex_half));
        assert_eq!(
            planner.plan(10).err(),
            Some(FftError::UnsupportedLength(10))
        );
    }

    #[test]
    fn planner_entry_points_match_direct_plan_use() {
        let mut planner = RfftPlanner::new();
        let input: Vec<i32> = (0..24).map(|i| (i as i32 - 11) << 20).collect();
        let mut out_a = vec![ComplexQ31::zero(); 13];
        let mut out_b = vec![ComplexQ31::zero(); 13];
        let mut scratch = vec![ComplexQ31::zero(); 24];
        let s_a = planner
            .rfft(&input, &mut out_a, &mut scratch, Scaling::Static)
            .unwrap();
        let plan = RfftPlan::new(24).unwrap();
        let s_b = plan
            .rfft(&input, &mut out_b, &mut scratch, Scaling::Static)
            .unwrap();
        assert_eq!(s_a, s_b);
        assert_eq!(out_a, out_b);
    }
}

#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn arb_len() -> impl Strategy<Value = usize> {
        prop::sample::select(
            crate::fft::supported_lengths()
                .into_iter()
                .filter(|&m| m <= 128)
                .map(|m| 2 * m)
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn real_roundtrip_recovers_scaled_input(n in arb_len(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let input: Vec<i32> = (0..n).map(|_| rng.gen_range(-(1 << 26)..(1 << 26))).collect();
            let plan = RfftPlan::new(n).unwrap();
            let mut spectrum = vec![ComplexQ31::zero(); n / 2 + 1];
            let mut scratch = vec![ComplexQ31::zero(); n];
            let s_f = plan
                .rfft(&input, &mut spectrum, &mut scratch, Scaling::Dynamic)
                .unwrap();
            let mut time = vec![0i32; n];
            let s_i = plan
                .irfft(&spectrum, &mut time, &mut scratch, Scaling::Dynamic)
                .unwrap();
            let scale = (1i64 << (s_f + s_i + 1)) as f64 / n as f64;
            let tol = scale * 64.0 + 24.0;
            for (got, want) in time.iter().zip(&input) {
                let y = *got as f64 * scale;
                prop_assert!(
                    (y - *want as f64).abs() <= tol,
                    "n={} got={} want={}", n, y, want
                );
            }
        }
    }
}
