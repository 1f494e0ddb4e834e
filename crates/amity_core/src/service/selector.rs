//! Room choice strategies for auto-allocation.
//!
//! The engine hands a strategy the rooms of one kind that still have a free
//! slot; the strategy returns the index of the room to use. Indexes past the
//! end wrap around the candidate count.

use crate::model::room::Room;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Picks one room out of a non-empty candidate list.
pub trait RoomSelector {
    fn select(&mut self, candidates: &[Room]) -> usize;
}

impl<F> RoomSelector for F
where
    F: FnMut(&[Room]) -> usize,
{
    fn select(&mut self, candidates: &[Room]) -> usize {
        self(candidates)
    }
}

/// Uniform random choice, the default policy for fair distribution.
pub struct RandomSelector {
    rng: StdRng,
}

impl fmt::Debug for RandomSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSelector").finish()
    }
}

impl RandomSelector {
    /// Creates a selector seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a selector with a fixed seed for reproducible allocation runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomSelector for RandomSelector {
    fn select(&mut self, candidates: &[Room]) -> usize {
        if candidates.len() <= 1 {
            return 0;
        }
        self.rng.gen_range(0..candidates.len())
    }
}

/// Always takes the oldest room with space. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailable;

impl RoomSelector for FirstAvailable {
    fn select(&mut self, _candidates: &[Room]) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{FirstAvailable, RandomSelector, RoomSelector};
    use crate::model::room::{Room, RoomKind};

    fn rooms(count: usize) -> Vec<Room> {
        (0..count)
            .map(|idx| Room::new(RoomKind::Office, &format!("Office {idx}")).unwrap())
            .collect()
    }

    #[test]
    fn seeded_selectors_repeat_the_same_choices() {
        let candidates = rooms(5);
        let mut first = RandomSelector::with_seed(7);
        let mut second = RandomSelector::with_seed(7);
        let left: Vec<usize> = (0..20).map(|_| first.select(&candidates)).collect();
        let right: Vec<usize> = (0..20).map(|_| second.select(&candidates)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|index| *index < candidates.len()));
    }

    #[test]
    fn first_available_and_closures_are_selectors() {
        let candidates = rooms(3);
        assert_eq!(FirstAvailable.select(&candidates), 0);

        let mut last = |candidates: &[crate::model::room::Room]| candidates.len() - 1;
        assert_eq!(last.select(&candidates), 2);
    }
}
