//! Seeded random number streams.
//!
//! A simulation draws randomness only while it is being constructed, through whatever
//! `rand::Rng` it is handed. Drivers get reproducible runs by asking for a named stream with
//! `seeded_rng`: every stream is seeded from the run's base seed combined with a stable hash
//! of the stream's name, so two streams never replay the same sequence and adding a new
//! stream does not perturb existing ones.
//!
//! ```
//! use contagion::define_rng;
//! use contagion::random::seeded_rng;
//! use rand::Rng;
//!
//! define_rng!(PlacementRng);
//!
//! let mut rng = seeded_rng::<PlacementRng>(42);
//! let x: f64 = rng.random();
//! assert!((0.0..1.0).contains(&x));
//! ```

use crate::parameters::Bounds;
use crate::vector::Point;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use xxhash_rust::xxh3::xxh3_64;

/// The generator type handed out by `seeded_rng`.
pub type SimulationRng = SmallRng;

/// Use this to define a unique type naming an independent random stream.
#[macro_export]
macro_rules! define_rng {
    ($random_id:ident) => {
        #[derive(Copy, Clone)]
        struct $random_id;

        impl $crate::random::RngId for $random_id {
            fn get_name() -> &'static str {
                stringify!($random_id)
            }
        }
    };
}
pub use define_rng;

pub trait RngId: Copy + Clone {
    fn get_name() -> &'static str;
}

/// A stable 64-bit hash of a stream name. Unlike `std`'s default hasher this does not vary
/// between processes.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

/// Creates the random stream `R` for a run with the given base seed.
#[must_use]
pub fn seeded_rng<R: RngId>(base_seed: u64) -> SimulationRng {
    let seed_offset = hash_str(R::get_name());
    SimulationRng::seed_from_u64(base_seed.wrapping_add(seed_offset))
}

/// A location drawn uniformly from the arena.
pub fn sample_location<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds) -> Point {
    let x = bounds.min_x + rng.random::<f64>() * bounds.width();
    let y = bounds.min_y + rng.random::<f64>() * bounds.height();
    Point::new(x, y)
}

/// A direction vector of magnitude `speed` at an angle drawn uniformly from the full circle.
pub fn sample_direction<R: Rng + ?Sized>(rng: &mut R, speed: f64) -> Point {
    let angle = TAU * rng.random::<f64>();
    Point::from_polar(speed, angle)
}
