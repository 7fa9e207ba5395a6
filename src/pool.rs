//! Fixed-size worker pool distributing the two top-level cursors described in
//! spec §4.7: one over `L[0]`'s base set (`advance` from the empty mask),
//! one over `L[1]`'s base set computed with `L[0]` already burned (`skip`).

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::ThreadPoolBuilder;

use crate::error::SolverError;
use crate::search::{self, SearchContext};

const CLAIM_CHUNK: usize = 1;

struct Cursor {
    pos: AtomicUsize,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pos: AtomicUsize::new(0),
        }
    }

    /// Claims the next `CLAIM_CHUNK` indices, or `None` once `len` is
    /// exhausted.
    fn claim(&self, len: usize) -> Option<std::ops::Range<usize>> {
        let start = self.pos.fetch_add(CLAIM_CHUNK, Ordering::Relaxed);
        if start >= len {
            return None;
        }
        Some(start..(start + CLAIM_CHUNK).min(len))
    }
}

/// Runs the search across `num_threads` workers, splitting the advance and
/// skip top-level regions across two independent atomic cursors. Every
/// worker shares one immutable `SearchContext` and its own path buffer; the
/// only shared mutation is the solution buffer's own atomic append.
pub fn solve_parallel(ctx: &SearchContext, num_threads: usize) -> Result<(), SolverError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| SolverError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    let (advance_j, advance_region) = search::step_region(ctx, 0);
    debug_assert_eq!(advance_j, 0, "the empty mask always requires L[0] first");

    let skip_mask = ctx.model_entry_mask(0);
    let (skip_j, skip_region) = search::step_region(ctx, skip_mask);
    debug_assert_eq!(skip_j, 1, "burning L[0] always requires L[1] next");

    let advance_cursor = Cursor::new();
    let skip_cursor = Cursor::new();

    pool.scope(|scope| {
        for _ in 0..num_threads {
            scope.spawn(|_| {
                let mut path = Vec::with_capacity(5);

                while let Some(range) = advance_cursor.claim(advance_region.len()) {
                    for &k in &advance_region[range] {
                        search::try_candidate(ctx, 0, k, &mut path, false);
                    }
                }

                while let Some(range) = skip_cursor.claim(skip_region.len()) {
                    for &k in &skip_region[range] {
                        search::try_candidate(ctx, skip_mask, k, &mut path, true);
                    }
                }
            });
        }
    });

    Ok(())
}
