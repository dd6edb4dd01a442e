//! Butterfly stage kernels for the mixed-radix cascade.
//!
//! Stages follow the self-sorting (Stockham) decimation-in-frequency
//! layout. A stage of radix `R` at unit stride `v` with `m = n / (v*R)`
//! twiddle lanes reads `src[(r*m + i)*v + b]` for `r in 0..R` and
//! `b in 0..v`, applies the R-point butterfly, multiplies output `q >= 1`
//! by `tw[v*i*q]` and stores to `dst[(i*R + q)*v + b]`. After the stage
//! the driver grows `v` by `R`. The first stage runs at `v == 1`; the
//! last has `m == 1` and needs no twiddles at all.
//!
//! Every kernel applies the same recipe: load, pre-shift right with
//! rounding, combine, twiddle, store, and OR-fold the magnitude of each
//! stored word so the driver can derive the next block exponent.

mod radix2;
mod radix3;
mod radix4;
mod radix5;
mod radix8;

use crate::num::ComplexQ31;

/// Stage radix drawn from the kernel set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Radix {
    R2,
    R3,
    R4,
    R5,
    R8,
}

impl Radix {
    /// Butterfly width.
    #[inline]
    pub(crate) const fn width(self) -> usize {
        match self {
            Radix::R2 => 2,
            Radix::R3 => 3,
            Radix::R4 => 4,
            Radix::R5 => 5,
            Radix::R8 => 8,
        }
    }
}

/// Placement of a stage within the cascade; selects the kernel variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    First,
    Middle,
    Last,
}

/// Geometry of one stage, resolved when the plan is built.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Stage {
    pub radix: Radix,
    pub position: Position,
    /// Unit stride entering the stage; the product of preceding radices.
    pub v: usize,
    /// Twiddle lane count, `n / (v * radix)`.
    pub m: usize,
}

/// Runs one stage, returning the OR-folded magnitude of every stored
/// component.
pub(crate) fn run_stage(
    stage: Stage,
    src: &[ComplexQ31],
    dst: &mut [ComplexQ31],
    tw: &[ComplexQ31],
    shift: u32,
) -> u32 {
    let Stage { radix, position, v, m } = stage;
    match (radix, position) {
        (Radix::R2, Position::First) => radix2::first(src, dst, tw, m, shift),
        (Radix::R2, Position::Middle) => radix2::middle(src, dst, tw, v, m, shift),
        (Radix::R2, Position::Last) => radix2::last(src, dst, v, shift),
        (Radix::R3, Position::First) => radix3::first(src, dst, tw, m, shift),
        (Radix::R3, Position::Middle) => radix3::middle(src, dst, tw, v, m, shift),
        (Radix::R3, Position::Last) => radix3::last(src, dst, v, shift),
        (Radix::R4, Position::First) => radix4::first(src, dst, tw, m, shift),
        (Radix::R4, Position::Middle) => radix4::middle(src, dst, tw, v, m, shift),
        (Radix::R4, Position::Last) => radix4::last(src, dst, v, shift),
        (Radix::R5, Position::First) => radix5::first(src, dst, tw, m, shift),
        (Radix::R5, Position::Middle) => radix5::middle(src, dst, tw, v, m, shift),
        (Radix::R5, Position::Last) => radix5::last(src, dst, v, shift),
        (Radix::R8, Position::Last) => radix8::last(src, dst, v, shift),
        // The planner only ever emits radix-8 as the closing stage.
        (Radix::R8, Position::First) | (Radix::R8, Position::Middle) => unreachable!(),
    }
}
