//! Initial on-screen placement for new cards.

use crate::board::{Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses where a freshly materialized card appears.
///
/// Overlap with existing cards is allowed.
pub trait Placement {
    fn place(&mut self, viewport: Size, footprint: Size) -> Point;
}

/// Uniformly random top-left corner that keeps the card footprint inside
/// the viewport when it fits, and pins to 0 on an axis where it does not.
#[derive(Debug)]
pub struct RandomPlacement {
    rng: StdRng,
}

impl RandomPlacement {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn axis(&mut self, room: f64) -> f64 {
        if room > 0.0 {
            self.rng.random_range(0.0..room)
        } else {
            0.0
        }
    }
}

impl Default for RandomPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl Placement for RandomPlacement {
    fn place(&mut self, viewport: Size, footprint: Size) -> Point {
        let x = self.axis(viewport.width - footprint.width);
        let y = self.axis(viewport.height - footprint.height);
        Point::new(x, y)
    }
}
