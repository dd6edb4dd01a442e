//! Block-floating-point scaling: block-exponent measurement and the
//! per-stage shift schedule.
//!
//! Every sample in a block shares one implicit exponent. A stage shifts
//! its inputs right just far enough that the butterfly cannot overflow,
//! and the driver accumulates those shifts into the value returned to
//! the caller. The dynamic policy measures how much headroom the data
//! actually has; the static policy always assumes the worst case.

use crate::fft::FftError;
use crate::num::ComplexQ31;
use crate::stages::{Position, Radix};

/// Scaling policy for one transform call.
///
/// The discriminants are the policy codes conventionally used by
/// fixed-point FFT APIs: dynamic scaling is 2, static scaling is 3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Scaling {
    /// Per-stage shifts derived from the measured block exponent.
    Dynamic = 2,
    /// Worst-case shift at every stage, no measurement.
    Static = 3,
}

impl Scaling {
    /// Resolves a numeric policy code, rejecting anything but 2 or 3.
    pub fn from_code(code: u32) -> Result<Self, FftError> {
        match code {
            2 => Ok(Scaling::Dynamic),
            3 => Ok(Scaling::Static),
            other => Err(FftError::InvalidScalingCode(other)),
        }
    }
}

/// Exponent/shift pair threaded through the stage cascade.
///
/// `bexp` is the block exponent of the block about to enter the next
/// stage; `shift` is the total right shift applied so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScaleState {
    pub bexp: u32,
    pub shift: u32,
}

/// Number of redundant sign bits shared by every word of `data`.
///
/// This is the block exponent used by dynamic scaling: each element can
/// be shifted left by the returned amount without losing information.
/// The result is clamped to 31; an empty slice reports 0.
pub fn block_exponent(data: &[i32]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    let mut lo = i32::MAX;
    let mut hi = i32::MIN;
    for &x in data {
        lo = lo.min(x);
        hi = hi.max(x);
    }
    // Folding min and max through x ^ (x >> 31) covers every value in
    // between: the fold maps both extremes onto non-negative magnitudes
    // whose leading zeros bound the whole block.
    let folded = ((hi ^ (hi >> 31)) | (lo ^ (lo >> 31))) as u32;
    bexp_from_acc(folded)
}

/// [`block_exponent`] over interleaved complex words.
pub(crate) fn block_exponent_complex(data: &[ComplexQ31]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    let mut acc = 0u32;
    for z in data {
        acc = mag_c(acc, *z);
    }
    bexp_from_acc(acc)
}

/// Folds one stored word into the OR magnitude accumulator.
#[inline(always)]
pub(crate) fn mag(acc: u32, x: i32) -> u32 {
    acc | ((x ^ (x >> 31)) as u32)
}

/// Folds both components of a stored sample into the accumulator.
#[inline(always)]
pub(crate) fn mag_c(acc: u32, z: ComplexQ31) -> u32 {
    mag(mag(acc, z.re), z.im)
}

/// Block exponent of an OR-folded magnitude accumulator.
#[inline]
pub(crate) fn bexp_from_acc(acc: u32) -> u32 {
    // The fold never sets the top bit, so there is at least one leading
    // zero and the result lands in 0..=31.
    debug_assert_eq!(acc & 0x8000_0000, 0);
    acc.leading_zeros() - 1
}

/// Worst-case bit growth guard for one stage of the given radix.
#[inline]
pub(crate) const fn min_headroom(radix: Radix) -> u32 {
    match radix {
        Radix::R2 => 2,
        Radix::R3 => 3,
        Radix::R4 => 3,
        Radix::R5 => 4,
        Radix::R8 => 4,
    }
}

/// Unconditional pre-shift of a closing radix-2 stage.
pub(crate) const RADIX2_LAST_SHIFT: u32 = 2;

/// Pre-shift for one stage, given the block exponent of its input.
///
/// Static scaling always applies the full headroom guard. Dynamic
/// scaling subtracts the measured exponent, saturating at zero, with
/// one exception: a closing radix-2 stage shifts by a fixed 2
/// regardless of the exponent.
#[inline]
pub(crate) fn stage_shift(scaling: Scaling, radix: Radix, position: Position, bexp: u32) -> u32 {
    let h = min_headroom(radix);
    match scaling {
        Scaling::Static => h,
        Scaling::Dynamic => {
            if matches!((radix, position), (Radix::R2, Position::Last)) {
                RADIX2_LAST_SHIFT
            } else {
                h.saturating_sub(bexp)
            }
        }
    }
}
