//! # bfpfft - Block-floating-point FFT engine for fixed-point DSP
//!
//! A mixed-radix FFT for Q31 fixed-point data with per-stage
//! block-floating-point scaling, built for embedded targets where
//! floating point is unavailable or too slow on the hot path.
//!
//! ## Features
//!
//! - **Q31 data path**: all transform arithmetic is 32-bit integer
//!   with 64-bit intermediates, no floats after plan construction
//! - **Mixed radix**: lengths of the form `2^a * 3^b * 5^c` up to
//!   4096, driven by radix-2/3/4/5 stages and a fused radix-8 finish
//! - **Block-floating-point scaling**: dynamic policy shifts only as
//!   far as the measured block exponent demands, static policy applies
//!   the fixed worst-case shift per stage
//! - **Self-sorting stages**: Stockham ping-pong between two buffers,
//!   no bit-reversal pass
//! - **Real transforms**: `n`-point real FFT/IFFT via a half-size
//!   complex transform and conjugate symmetry
//! - **`no_std` + alloc**: suitable for MCU targets with a heap
//!
//! ## Cargo Features
//!
//! - `std` (default): standard library integration (`std::error::Error`)
//! - `verbose-logging`: plan and run tracing through the `log` facade
//! - `internal-tests`: property-based test suites (development only)
//!
//! ## Example
//!
//! ```
//! use bfpfft::{ComplexQ31, FftPlan, Scaling};
//!
//! let plan = FftPlan::new(4).unwrap();
//! let mut input = vec![ComplexQ31::zero(); 4];
//! input[0] = ComplexQ31::new(1 << 24, 0);
//! let mut output = vec![ComplexQ31::zero(); 4];
//! let shift = plan.fft(&mut input, &mut output, Scaling::Dynamic).unwrap();
//! // An impulse with headroom to spare needs no downscaling at all.
//! assert_eq!(shift, 0);
//! assert!(output.iter().all(|bin| *bin == ComplexQ31::new(1 << 24, 0)));
//! ```
//!
//! Every transform returns the total right shift it applied; the
//! mathematically unscaled result is the output times `2^shift`.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Complex FFT plans, the planner cache and the error type.
pub mod fft;

/// Q31 complex samples and the fixed-point primitives.
pub mod num;

/// Real-input transforms built on the half-size complex engine.
pub mod rfft;

/// Block-floating-point scaling policies and block exponents.
pub mod scale;

mod stages;
mod twiddle;

pub use fft::{supported_lengths, FftError, FftPlan, FftPlanner, MAX_FFT_LEN};
pub use num::ComplexQ31;
pub use rfft::{RfftPlan, RfftPlanner};
pub use scale::{block_exponent, Scaling};
