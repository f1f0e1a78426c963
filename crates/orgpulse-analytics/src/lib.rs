//! Analytics engines for organization development activity.
//!
//! Pure computations transforming filtered record views into derived
//! metrics: commit-content labels, time-bucketed series and activity
//! matrices, contributor rankings and concentration curves, and
//! cross-repository overlap. The [`filter`] module builds the filtered view
//! every engine consumes; nothing here performs I/O or holds mutable state
//! beyond the per-commit classification cache.

pub mod classify;
pub mod content;
pub mod contributors;
pub mod filter;
pub mod insights;
pub mod overlap;
pub mod repos;
pub mod temporal;

#[cfg(test)]
pub(crate) mod testutil;
