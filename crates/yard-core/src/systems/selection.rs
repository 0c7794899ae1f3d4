//! Agent-pair selection
//!
//! Picks the two agents that meet in a round. The order of the pair is the
//! coin flip of the model: the first agent always pays, the second always
//! receives, so no separate gain/loss draw exists anywhere.

use rand::Rng;

use crate::SimRng;

/// Source of uniform indices.
pub trait RandomSource {
    /// Returns an index drawn uniformly from `0..bound`. `bound` is never 0.
    fn index_below(&mut self, bound: usize) -> usize;
}

impl RandomSource for SimRng {
    fn index_below(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Draw two distinct agents from a population of `count`.
///
/// Returns `(first, second)`: `first` is the designated loser, `second` the
/// designated gainer. `second` is redrawn until it differs from `first`.
pub fn pick_two_random_agents<R>(rng: &mut R, count: usize) -> (usize, usize)
where
    R: RandomSource + ?Sized,
{
    assert!(count >= 2, "pair selection needs at least two agents, got {count}");

    let first = rng.index_below(count);
    let mut second = first;
    while second == first {
        second = rng.index_below(count);
    }
    (first, second)
}
