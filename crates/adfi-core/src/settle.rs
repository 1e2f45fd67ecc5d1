//! Settle-all fan-out primitive.
//!
//! Cleanup needs to issue many independent remote deletes, wait for every
//! outcome, and count how it went — one failure must not abort the rest.
//! [`settle_all`] runs the operation over the rayon pool (bounding the
//! fan-out to the pool size) and partitions the outcomes.

use rayon::prelude::*;

/// Outcomes of a settled fan-out: every item landed in exactly one side.
#[derive(Debug)]
pub struct Settled<U, E> {
    /// Successful outcomes.
    pub succeeded: Vec<U>,
    /// Failed outcomes.
    pub failed: Vec<E>,
}

impl<U, E> Settled<U, E> {
    /// Success/failure counts.
    #[must_use]
    pub fn tally(&self) -> Tally {
        Tally {
            successful: self.succeeded.len(),
            failed: self.failed.len(),
        }
    }
}

/// Aggregate counts for one settled pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Operations that completed.
    pub successful: usize,
    /// Operations that failed.
    pub failed: usize,
}

/// Run `op` over every item concurrently, waiting for all outcomes.
///
/// No short-circuit: an item's failure never prevents the others from being
/// attempted. Outcome order is not meaningful.
pub fn settle_all<I, T, U, E, F>(items: I, op: F) -> Settled<U, E>
where
    I: IntoParallelIterator<Item = T>,
    T: Send,
    U: Send,
    E: Send,
    F: Fn(T) -> Result<U, E> + Send + Sync,
{
    let results: Vec<Result<U, E>> = items.into_par_iter().map(op).collect();

    let mut settled = Settled {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for result in results {
        match result {
            Ok(value) => settled.succeeded.push(value),
            Err(error) => settled.failed.push(error),
        }
    }
    settled
}
