//! Complex block-floating-point FFT plans and the planner cache.
//!
//! A [`FftPlan`] resolves a transform length into a Stockham stage
//! cascade over the radix-2/3/4/5/8 kernels and owns the twiddle table
//! for that length. [`FftPlanner`] memoizes plans behind `Arc` handles
//! so hot paths pay the factorization and table cost once.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::num::ComplexQ31;
use crate::scale::{
    bexp_from_acc, block_exponent_complex, min_headroom, stage_shift, ScaleState, Scaling,
};
use crate::stages::{run_stage, Position, Radix, Stage};
use crate::twiddle::forward_table;

/// Largest transform length a plan will accept.
pub const MAX_FFT_LEN: usize = 4096;

/// Errors reported by plan construction and the transform entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// An input buffer of length zero was supplied.
    EmptyInput,
    /// The length is not of the form `2^a * 3^b * 5^c` within range.
    UnsupportedLength(usize),
    /// A buffer does not match the planned transform length.
    MismatchedLengths { expected: usize, got: usize },
    /// The caller-provided scratch buffer is too short.
    ScratchTooSmall { required: usize, got: usize },
    /// A numeric scaling-policy code outside the accepted set.
    InvalidScalingCode(u32),
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => f.write_str("input must not be empty"),
            FftError::UnsupportedLength(n) => f.write_fmt(format_args!(
                "unsupported transform length {n}: must be 2^a * 3^b * 5^c in 2..={MAX_FFT_LEN}"
            )),
            FftError::MismatchedLengths { expected, got } => f.write_fmt(format_args!(
                "buffer length {got} does not match transform length {expected}"
            )),
            FftError::ScratchTooSmall { required, got } => f.write_fmt(format_args!(
                "scratch buffer holds {got} elements but {required} are required"
            )),
            FftError::InvalidScalingCode(code) => f.write_fmt(format_args!(
                "invalid scaling code {code}: expected 2 (dynamic) or 3 (static)"
            )),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Splits `n` into its 2/3/5 exponents, or `None` when another prime
/// divides it or it falls outside `2..=MAX_FFT_LEN`.
fn factorize(n: usize) -> Option<(u32, u32, u32)> {
    if !(2..=MAX_FFT_LEN).contains(&n) {
        return None;
    }
    let mut rest = n;
    let mut twos = 0;
    while rest % 2 == 0 {
        rest /= 2;
        twos += 1;
    }
    let mut threes = 0;
    while rest % 3 == 0 {
        rest /= 3;
        threes += 1;
    }
    let mut fives = 0;
    while rest % 5 == 0 {
        rest /= 5;
        fives += 1;
    }
    (rest == 1).then_some((twos, threes, fives))
}

/// Every transform length accepted by [`FftPlan::new`], in ascending
/// order.
pub fn supported_lengths() -> Vec<usize> {
    (2..=MAX_FFT_LEN).filter(|&n| factorize(n).is_some()).collect()
}

/// Lays out the stage cadence for `n`.
///
/// Radix-5 stages run first, then radix-4, then radix-3. The power of
/// two left over after the fours either vanishes, closes with a single
/// radix-2 stage, or closes with a fused radix-8 stage. The closing
/// slot is the only place the radix-8 kernel ever appears.
fn build_stages(n: usize) -> Option<Box<[Stage]>> {
    let (twos, threes, fives) = factorize(n)?;
    let (fours, closer) = match twos {
        0 => (0, None),
        1 => (0, Some(Radix::R2)),
        t if t % 2 == 0 => (t / 2, None),
        t => ((t - 3) / 2, Some(Radix::R8)),
    };

    let mut radices = Vec::new();
    for _ in 0..fives {
        radices.push(Radix::R5);
    }
    for _ in 0..fours {
        radices.push(Radix::R4);
    }
    for _ in 0..threes {
        radices.push(Radix::R3);
    }
    if let Some(radix) = closer {
        radices.push(radix);
    }

    let count = radices.len();
    let mut stages = Vec::with_capacity(count);
    let mut v = 1usize;
    for (i, &radix) in radices.iter().enumerate() {
        let position = if i + 1 == count {
            Position::Last
        } else if i == 0 {
            Position::First
        } else {
            Position::Middle
        };
        stages.push(Stage {
            radix,
            position,
            v,
            m: n / (v * radix.width()),
        });
        v *= radix.width();
    }
    debug_assert_eq!(v, n);
    Some(stages.into_boxed_slice())
}

/// Immutable descriptor for one transform length.
///
/// A plan owns the resolved stage cascade and the forward twiddle
/// table and holds no mutable state, so a single plan can serve any
/// number of callers, typically behind an [`Arc`].
pub struct FftPlan {
    n: usize,
    stages: Box<[Stage]>,
    twiddles: Box<[ComplexQ31]>,
}

impl FftPlan {
    /// Builds a plan for length `n`.
    pub fn new(n: usize) -> Result<Self, FftError> {
        let stages = build_stages(n).ok_or(FftError::UnsupportedLength(n))?;
        let twiddles = forward_table(n);
        #[cfg(feature = "verbose-logging")]
        log::debug!(
            "fft plan n={} stages={:?}",
            n,
            stages.iter().map(|s| s.radix.width()).collect::<Vec<_>>()
        );
        Ok(Self { n, stages, twiddles })
    }

    /// The transform length this plan was built for.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The stage radices in execution order.
    pub fn radices(&self) -> impl Iterator<Item = usize> + '_ {
        self.stages.iter().map(|s| s.radix.width())
    }

    /// The total right shift every run of this plan applies under
    /// [`Scaling::Static`].
    pub fn static_shift(&self) -> u32 {
        self.stages.iter().map(|s| min_headroom(s.radix)).sum()
    }

    /// Forward transform of `input` into `output`.
    ///
    /// `input` is clobbered as working scratch. Returns the accumulated
    /// right shift `s`; the unscaled spectrum is `output * 2^s`.
    pub fn fft(
        &self,
        input: &mut [ComplexQ31],
        output: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        self.check(input.len(), output.len())?;
        Ok(self.run(input, output, scaling))
    }

    /// Inverse transform via conjugation, with the same buffer contract
    /// and shift semantics as [`Self::fft`].
    ///
    /// No `1/n` normalization is applied: up to the reported shifts,
    /// `ifft(fft(x))` reproduces `n * x`.
    pub fn ifft(
        &self,
        input: &mut [ComplexQ31],
        output: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        self.check(input.len(), output.len())?;
        for z in input.iter_mut() {
            *z = z.conj();
        }
        let shift = self.run(input, output, scaling);
        for z in output.iter_mut() {
            *z = z.conj();
        }
        Ok(shift)
    }

    fn check(&self, input_len: usize, output_len: usize) -> Result<(), FftError> {
        if input_len == 0 {
            return Err(FftError::EmptyInput);
        }
        if input_len != self.n {
            return Err(FftError::MismatchedLengths {
                expected: self.n,
                got: input_len,
            });
        }
        if output_len != self.n {
            return Err(FftError::MismatchedLengths {
                expected: self.n,
                got: output_len,
            });
        }
        Ok(())
    }

    /// Runs the stage cascade, ping-ponging between the two buffers.
    fn run(&self, x: &mut [ComplexQ31], y: &mut [ComplexQ31], scaling: Scaling) -> u32 {
        let mut state = ScaleState {
            bexp: match scaling {
                Scaling::Dynamic => block_exponent_complex(x),
                Scaling::Static => 0,
            },
            shift: 0,
        };
        let mut src: &mut [ComplexQ31] = x;
        let mut dst: &mut [ComplexQ31] = y;
        for &stage in self.stages.iter() {
            let shift = stage_shift(scaling, stage.radix, stage.position, state.bexp);
            let acc = run_stage(stage, src, dst, &self.twiddles, shift);
            state = ScaleState {
                bexp: bexp_from_acc(acc),
                shift: state.shift + shift,
            };
            core::mem::swap(&mut src, &mut dst);
        }
        // The final swap leaves the result in `src`. With an even stage
        // count that is the caller's input buffer, so mirror it out.
        if self.stages.len() % 2 == 0 {
            dst.copy_from_slice(src);
        }
        #[cfg(feature = "verbose-logging")]
        log::trace!(
            "fft run n={} scaling={:?} shift={}",
            self.n,
            scaling,
            state.shift
        );
        state.shift
    }
}

/// Builds and memoizes [`FftPlan`]s keyed by transform length.
pub struct FftPlanner {
    plans: HashMap<usize, Arc<FftPlan>>,
}

impl FftPlanner {
    pub fn new() -> Self {
        Self {
            plans: HashMap::new(),
        }
    }

    /// Returns the cached plan for `n`, building it on first use.
    pub fn plan(&mut self, n: usize) -> Result<Arc<FftPlan>, FftError> {
        if let Some(plan) = self.plans.get(&n) {
            return Ok(plan.clone());
        }
        let plan = Arc::new(FftPlan::new(n)?);
        self.plans.insert(n, plan.clone());
        Ok(plan)
    }

    /// Plans for `input.len()` if needed, then runs the forward
    /// transform.
    pub fn fft(
        &mut self,
        input: &mut [ComplexQ31],
        output: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        if input.is_empty() {
            return Err(FftError::EmptyInput);
        }
        let plan = self.plan(input.len())?;
        plan.fft(input, output, scaling)
    }

    /// Plans for `input.len()` if needed, then runs the inverse
    /// transform.
    pub fn ifft(
        &mut self,
        input: &mut [ComplexQ31],
        output: &mut [ComplexQ31],
        scaling: Scaling,
    ) -> Result<u32, FftError> {
        if input.is_empty() {
            return Err(FftError::EmptyInput);
        }
        let plan = self.plan(input.len())?;
        plan.ifft(input, output, scaling)
    }
}

impl Default for FftPlanner {
    fn default() -> Self {
        Self::new()
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
            supported_lengths()
                .into_iter()
                .filter(|&n| n <= 256)
                .collect::<Vec<_>>(),
        )
    }

    fn random_block(n: usize, seed: u64) -> Vec<ComplexQ31> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                ComplexQ31::new(
                    rng.gen_range(-(1 << 26)..(1 << 26)),
                    rng.gen_range(-(1 << 26)..(1 << 26)),
                )
            })
            .collect()
    }

    proptest! {
        #[test]
        fn forward_inverse_recovers_scaled_input(n in arb_len(), seed in any::<u64>()) {
            let input = random_block(n, seed);
            let plan = FftPlan::new(n).unwrap();
            for scaling in [Scaling::Dynamic, Scaling::Static] {
                let mut x = input.clone();
                let mut spectrum = vec![ComplexQ31::zero(); n];
                let s1 = plan.fft(&mut x, &mut spectrum, scaling).unwrap();
                let mut time = vec![ComplexQ31::zero(); n];
                let s2 = plan.ifft(&mut spectrum, &mut time, scaling).unwrap();
                let scale = (1i64 << (s1 + s2)) as f64 / n as f64;
                let tol = scale * 64.0 + 24.0;
                for (got, want) in time.iter().zip(&input) {
                    let re = got.re as f64 * scale;
                    let im = got.im as f64 * scale;
                    prop_assert!(
                        (re - want.re as f64).abs() <= tol && (im - want.im as f64).abs() <= tol,
                        "n={} scaling={:?} got=({}, {}) want=({}, {})",
                        n, scaling, re, im, want.re, want.im
                    );
                }
            }
        }

        #[test]
        fn dynamic_runs_are_deterministic(n in arb_len(), seed in any::<u64>()) {
            let input = random_block(n, seed);
            let plan = FftPlan::new(n).unwrap();
            let mut x1 = input.clone();
            let mut y1 = vec![ComplexQ31::zero(); n];
            let s1 = plan.fft(&mut x1, &mut y1, Scaling::Dynamic).unwrap();
            let mut x2 = input.clone();
            let mut y2 = vec![ComplexQ31::zero(); n];
            let s2 = plan.fft(&mut x2, &mut y2, Scaling::Dynamic).unwrap();
            prop_assert_eq!(s1, s2);
            prop_assert_eq!(y1, y2);
        }

        #[test]
        fn parseval_energy_matches(n in arb_len(), seed in any::<u64>()) {
            let input = random_block(n, seed);
            let plan = FftPlan::new(n).unwrap();
            let mut x = input.clone();
            let mut y = vec![ComplexQ31::zero(); n];
            let s = plan.fft(&mut x, &mut y, Scaling::Dynamic).unwrap();
            let scale = (1i64 << s) as f64;
            let time_energy: f64 = input
                .iter()
                .map(|z| z.re as f64 * z.re as f64 + z.im as f64 * z.im as f64)
                .sum();
            let freq_energy: f64 = y
                .iter()
                .map(|z| {
                    let re = z.re as f64 * scale;
                    let im = z.im as f64 * scale;
                    re * re + im * im
                })
                .sum::<f64>()
                / n as f64;
            let denom = time_energy.max(1.0);
            prop_assert!(
                ((time_energy - freq_energy) / denom).abs() < 1e-3,
                "n={} time={} freq={}", n, time_energy, freq_energy
            );
        }
    }
}
