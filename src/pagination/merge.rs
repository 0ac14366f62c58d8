//! Page merging.
//!
//! Reconciles a freshly fetched page with the pages already cached for the
//! same list.

use crate::error::{CacheError, Result};
use crate::pagination::PageArgs;

// == Limits ==
/// Largest sequence a merge may produce. Holes are stored densely, so an
/// arbitrary `start` must not size the allocation.
pub const MAX_SEQUENCE_LEN: usize = 1_000_000;

/// An ordered list assembled from pages; `None` marks a position no page has
/// filled yet.
pub type Sequence<T> = Vec<Option<T>>;

// == Merge ==
/// Splices `incoming` into a copy of `existing` starting at `args.start`.
///
/// - No `args`, or `args` without `start`: `incoming` replaces everything.
/// - `start` inside the existing sequence: items from `start` on are overwritten,
///   later items are kept.
/// - `start` past the end: the gap is padded with holes.
///
/// Neither input is modified. A negative `start`, or one that would grow the
/// sequence past [`MAX_SEQUENCE_LEN`], is rejected with
/// [`CacheError::InvalidPageArgs`].
pub fn merge<T: Clone>(
    existing: Option<&[Option<T>]>,
    incoming: &[T],
    args: Option<&PageArgs>,
) -> Result<Sequence<T>> {
    let Some(start) = args.and_then(|args| args.start) else {
        return Ok(incoming.iter().cloned().map(Some).collect());
    };

    if start < 0 {
        return Err(CacheError::InvalidPageArgs(format!(
            "start must not be negative, got {start}"
        )));
    }

    let start = usize::try_from(start)
        .ok()
        .filter(|start| start.saturating_add(incoming.len()) <= MAX_SEQUENCE_LEN)
        .ok_or_else(|| {
            CacheError::InvalidPageArgs(format!(
                "page at {start} with {} items exceeds {MAX_SEQUENCE_LEN} positions",
                incoming.len()
            ))
        })?;

    let mut merged: Sequence<T> = existing.map(<[Option<T>]>::to_vec).unwrap_or_default();
    let end = start + incoming.len();
    if merged.len() < end {
        merged.resize(end, None);
    }

    for (slot, item) in merged[start..end].iter_mut().zip(incoming) {
        *slot = Some(item.clone());
    }

    Ok(merged)
}

// == Read ==
/// Read side of a field policy: the stored value, untouched.
pub fn read<S>(existing: S, _args: Option<&PageArgs>) -> S {
    existing
}
