#![allow(dead_code)]

use bfpfft::ComplexQ31;

/// Deterministic 64-bit LCG so failures reproduce without a rand
/// dependency in the default test build.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 32) as u32
    }

    /// Signed sample with at most `bits` magnitude bits.
    pub fn next_sample(&mut self, bits: u32) -> i32 {
        let mask = (1u32 << bits) - 1;
        let mag = (self.next_u32() & mask) as i32;
        if self.next_u32() & 1 == 0 {
            mag
        } else {
            -mag
        }
    }
}

pub fn random_complex(n: usize, bits: u32, seed: u64) -> Vec<ComplexQ31> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| ComplexQ31::new(rng.next_sample(bits), rng.next_sample(bits)))
        .collect()
}

pub fn random_real(n: usize, bits: u32, seed: u64) -> Vec<i32> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_sample(bits)).collect()
}

/// Direct `O(n^2)` DFT in double precision, `e^{-2 pi i k j / n}` for
/// the forward direction and the conjugate kernel (no `1/n`) for the
/// inverse.
pub fn naive_dft(input: &[ComplexQ31], inverse: bool) -> Vec<(f64, f64)> {
    let n = input.len();
    let sign = if inverse { 1.0 } else { -1.0 };
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut re = 0.0;
        let mut im = 0.0;
        for (j, z) in input.iter().enumerate() {
            let angle = sign * 2.0 * std::f64::consts::PI * ((k * j) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            re += z.re as f64 * c - z.im as f64 * s;
            im += z.re as f64 * s + z.im as f64 * c;
        }
        out.push((re, im));
    }
    out
}

/// The `n/2 + 1` non-redundant bins of a real-input DFT.
pub fn naive_real_dft(input: &[i32]) -> Vec<(f64, f64)> {
    let n = input.len();
    let mut out = Vec::with_capacity(n / 2 + 1);
    for k in 0..=n / 2 {
        let mut re = 0.0;
        let mut im = 0.0;
        for (j, &x) in input.iter().enumerate() {
            let angle = -2.0 * std::f64::consts::PI * ((k * j) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            re += x as f64 * c;
            im += x as f64 * s;
        }
        out.push((re, im));
    }
    out
}

/// Unnormalized inverse of an `n/2 + 1`-bin real spectrum. The full
/// spectrum is extended by conjugate symmetry, so every interior bin
/// contributes twice its real projection; DC and Nyquist contribute
/// their real parts only, as the packed forward transform defines
/// them.
pub fn naive_inverse_real_dft(bins: &[ComplexQ31], n: usize) -> Vec<f64> {
    assert_eq!(bins.len(), n / 2 + 1);
    let mut out = Vec::with_capacity(n);
    for j in 0..n {
        let nyquist = bins[n / 2].re as f64;
        let mut acc = bins[0].re as f64 + if j % 2 == 0 { nyquist } else { -nyquist };
        for k in 1..n / 2 {
            let z = bins[k];
            let angle = 2.0 * std::f64::consts::PI * ((k * j) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            acc += 2.0 * (z.re as f64 * c - z.im as f64 * s);
        }
        out.push(acc);
    }
    out
}

/// Largest deviation of `got * 2^shift` from `want` over both
/// components of every bin.
pub fn max_error(got: &[ComplexQ31], shift: u32, want: &[(f64, f64)]) -> f64 {
    assert_eq!(got.len(), want.len());
    let scale = (1i64 << shift) as f64;
    got.iter()
        .zip(want)
        .map(|(g, w)| {
            let dr = (g.re as f64 * scale - w.0).abs();
            let di = (g.im as f64 * scale - w.1).abs();
            dr.max(di)
        })
        .fold(0.0, f64::max)
}

pub fn spectrum_peak(want: &[(f64, f64)]) -> f64 {
    want.iter()
        .map(|w| w.0.abs().max(w.1.abs()))
        .fold(0.0, f64::max)
}

/// Rounding tolerance for a transform that reported `shift`: a fixed
/// number of output LSBs plus a small relative term for twiddle
/// quantization.
pub fn tolerance(shift: u32, peak: f64) -> f64 {
    (1i64 << shift) as f64 * 48.0 + peak * 2e-6
}
