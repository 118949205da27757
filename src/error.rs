//! Error taxonomy shared by every analyzer in this crate.
//!
//! Analyzers never panic on bad caller input or allocation failure; both are
//! surfaced as a `CoreError` and leave the analyzer in the same state as if
//! the failing call had never been made. `TerminalOctave` is deliberately
//! not a `CoreError` variant: it signals the normal end of pyramid
//! iteration, not a failure (spec §7).

use thiserror::Error;

/// Errors surfaced by analyzer constructors and entry points.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum CoreError {
  /// A parameter was out of range, dimensions were incompatible, or an
  /// input grid was degenerate (zero-sized, stride < width, ...).
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// An internal buffer could not be sized/allocated for the requested
  /// dimensions. Carries the byte size that was requested.
  #[error("allocation of {requested_bytes} bytes failed")]
  AllocationFailure { requested_bytes: usize },

  /// An accessor was queried before the corresponding `process`/`detect`
  /// call completed at least once.
  #[error("not configured: {0} was queried before process() completed")]
  NotConfigured(&'static str),
}

impl CoreError {
  pub fn invalid(msg: impl Into<String>) -> Self {
    CoreError::InvalidArgument(msg.into())
  }
}

/// Allocate a `Vec<T>` of `len` elements filled with `value`, surfacing
/// [`CoreError::AllocationFailure`] instead of aborting on OOM. The only
/// call sites that pre-size a buffer large enough to need this are the
/// pyramid/grid arena (`Grid::with_stride`) and the MSER component forest
/// (`ComponentForest::build`).
pub(crate) fn try_filled_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
  let mut v: Vec<T> = Vec::new();
  v.try_reserve_exact(len).map_err(|_| CoreError::AllocationFailure {
    requested_bytes: len.saturating_mul(std::mem::size_of::<T>()),
  })?;
  v.resize(len, value);
  Ok(v)
}

/// Returned by `Pyramid::next_octave` to signal that no further octave can
/// be built (the coarsest octave would fall below the minimum Gaussian
/// footprint). Not an error: normal control flow, per spec §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOctave;

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
