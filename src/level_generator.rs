use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Level Generator
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new element in the list, the element is replicated to high levels with
/// a certain probability as determined by a `LevelGenerator`.
///
/// `total()` reflects the current level ceiling, and `random()` should produce an integer in the
/// range `[1, total()]` with the desired probability distribution.  The most commonly used
/// distribution is a geometrical one, whereby the chance that an element reaches level `n+1` is
/// `p` times the chance of reaching level `n`.  Typically `p` is equal to 1/2, though other values
/// can be used which will trade speed against memory.
///
/// The generator is owned by the list, so supplying a custom implementation (or a seeded
/// [`GeometricalLevelGenerator`]) makes level selection reproducible and keeps the list away from
/// any globally shared random state.
pub trait LevelGenerator {
    /// Draw the level for a new element, in `[1, total()]`.
    fn random(&mut self) -> usize;

    /// The current level ceiling.
    fn total(&self) -> usize;

    /// Change the level ceiling.  Called when the owning list is reconfigured.
    fn set_total(&mut self, total: usize);
}

/// A level generator which will produce geometrically distributed levels: each level past the
/// first is reached with probability `p`, as decided by an independent uniform draw per level.
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: StdRng,
}

impl GeometricalLevelGenerator {
    /// Create a new `GeometricalLevelGenerator` with `total` number of levels, and `p` as the
    /// probability that a given element is present in the next level, seeded from the operating
    /// system.
    ///
    /// # Panics
    ///
    /// `p` must be between 0 and 1 and will panic otherwise.  Similarly, `total` must be greater
    /// or equal to 1.
    pub fn new(total: usize, p: f64) -> Self {
        if total == 0 {
            panic!("total must be non-zero.");
        }
        if p <= 0.0 || p >= 1.0 {
            panic!("p must be in (0, 1).");
        }
        GeometricalLevelGenerator {
            total,
            p,
            rng: StdRng::from_entropy(),
        }
    }

    /// Like [`GeometricalLevelGenerator::new`], but with a fixed seed so that the sequence of
    /// drawn levels is deterministic.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`GeometricalLevelGenerator::new`].
    pub fn from_seed(total: usize, p: f64, seed: u64) -> Self {
        let mut lg = Self::new(total, p);
        lg.rng = StdRng::seed_from_u64(seed);
        lg
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut level = 1;
        while level < self.total && self.rng.gen::<f64>() < self.p {
            level += 1;
        }
        level
    }

    fn total(&self) -> usize {
        self.total
    }

    fn set_total(&mut self, total: usize) {
        if total == 0 {
            panic!("total must be non-zero.");
        }
        self.total = total;
    }
}
