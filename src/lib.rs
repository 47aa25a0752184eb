//! A particle-based epidemic simulation.
//!
//! A fixed population of point particles moves through a bounded 2-D arena. Particles bounce
//! off the walls, and whenever an infected particle comes within the contact radius of a
//! vulnerable one the infection spreads. Infected particles count up a health counter each
//! tick and become permanently immune once it exceeds the recovery period.
//!
//! The central object is the [`Simulation`]. It owns the population and is advanced one
//! discrete time step at a time with [`Simulation::tick`]:
//! * every particle moves by its direction vector and progresses its own infection;
//! * particles that left the arena are clamped onto the wall and reflected;
//! * every pair of particles closer than the contact radius is exposed to each other.
//!
//! ```
//! use contagion::{define_rng, Parameters, Simulation};
//! use contagion::random::seeded_rng;
//!
//! define_rng!(PlacementRng);
//!
//! let mut rng = seeded_rng::<PlacementRng>(42);
//! let mut simulation = Simulation::new(Parameters::default(), 200, 5.0, 3, 0, &mut rng).unwrap();
//! while !simulation.is_complete() && simulation.time() < 500 {
//!     simulation.tick();
//! }
//! for particle in simulation.population() {
//!     let _ = (particle.location(), particle.color());
//! }
//! ```
//!
//! Everything around the engine is a thin collaborator: [`runner`] is the command-line driver
//! behind the `contagion` binary, [`report`] writes a per-tick census as CSV and [`log`]
//! configures logging.
pub mod error;
pub mod log;
pub mod parameters;
pub mod particle;
#[cfg(feature = "progress_bar")]
pub mod progress;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;
pub mod vector;

pub use error::ContagionError;
pub use parameters::{Bounds, ContactPolicy, DiseaseParameters, Parameters};
pub use particle::{DisplayCategory, HealthState, Particle};
pub use simulation::{Census, Simulation};
pub use vector::Point;

// Re-exports for use by binaries and downstream crates.
pub use rand;
