//! The simulation model: a fixed population of particles advanced one tick at a time.
//!
//! Each tick runs in three strictly ordered phases:
//! 1. every particle moves and progresses its own infection (`Particle::tick`), in
//!    population order;
//! 2. each particle that left the arena is clamped back onto the boundary and its direction
//!    reflected on the offending axis;
//! 3. once every particle has reached its final position, all unordered pairs closer than
//!    the contact radius are exposed to each other.
//!
//! Randomness is only consumed by `Simulation::new`; ticking is deterministic.

use crate::error::{invalid_configuration, ContagionError};
use crate::log::{info, trace};
use crate::parameters::{Bounds, ContactPolicy, Parameters};
use crate::particle::{DisplayCategory, Particle};
use crate::random::{sample_direction, sample_location};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Counts of particles in each health state at a point in time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub time: u64,
    pub vulnerable: usize,
    pub infected: usize,
    pub immune: usize,
}

impl Census {
    #[must_use]
    pub fn total(&self) -> usize {
        self.vulnerable + self.infected + self.immune
    }
}

#[derive(Clone, Debug)]
pub struct Simulation {
    population: Vec<Particle>,
    time: u64,
    parameters: Parameters,
    initial_immune: usize,
}

impl Simulation {
    /// Creates a population of `size` particles at random locations moving at `speed` in
    /// random directions. The first `size - initial_infected` particles are vulnerable and
    /// the remaining `initial_infected` start infected.
    ///
    /// `initial_immune` is validated but only applied when `parameters.immunize_initial` is
    /// set, in which case the first `initial_immune` particles start immune. Otherwise it is
    /// only recorded and reported back by `initial_immune()`.
    ///
    /// # Errors
    ///
    /// Returns `ContagionError::InvalidConfiguration` if the parameters are invalid, if
    /// `initial_infected` is not in `(0, size)`, or if `initial_infected + initial_immune`
    /// exceeds `size`. Nothing is drawn from `rng` in that case.
    pub fn new<R: Rng + ?Sized>(
        parameters: Parameters,
        size: usize,
        speed: f64,
        initial_infected: usize,
        initial_immune: usize,
        rng: &mut R,
    ) -> Result<Self, ContagionError> {
        parameters.validate()?;
        if initial_infected == 0 {
            return Err(invalid_configuration(
                "initial infected count must be greater than 0",
            ));
        }
        if initial_infected >= size {
            return Err(invalid_configuration(format!(
                "initial infected count ({initial_infected}) must be less than the population size ({size})"
            )));
        }
        // initial_infected < size here, so the subtraction cannot underflow.
        if initial_immune > size - initial_infected {
            return Err(invalid_configuration(format!(
                "initial infected ({initial_infected}) plus initial immune ({initial_immune}) exceeds the population size ({size})"
            )));
        }
        if !speed.is_finite() {
            return Err(invalid_configuration(format!(
                "speed must be finite, got {speed}"
            )));
        }

        let disease = parameters.disease();
        let mut population = Vec::with_capacity(size);
        for index in 0..size {
            let location = sample_location(rng, &parameters.bounds);
            let direction = sample_direction(rng, speed);
            let mut particle = Particle::new(location, direction, disease);
            if index >= size - initial_infected {
                particle.contract_disease();
            } else if parameters.immunize_initial && index < initial_immune {
                particle.immunize();
            }
            population.push(particle);
        }

        info!(
            "created population of {size} ({initial_infected} infected, {initial_immune} immune requested) at speed {speed}"
        );
        Ok(Self {
            population,
            time: 0,
            parameters,
            initial_immune,
        })
    }

    /// Builds a simulation around particles placed by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ContagionError::InvalidConfiguration` if the parameters are invalid, the
    /// population is empty, or a particle was built with disease parameters other than
    /// `parameters.disease()`.
    pub fn from_particles(
        parameters: Parameters,
        population: Vec<Particle>,
    ) -> Result<Self, ContagionError> {
        parameters.validate()?;
        if population.is_empty() {
            return Err(invalid_configuration("population must not be empty"));
        }
        let disease = parameters.disease();
        if let Some(index) = population
            .iter()
            .position(|particle| *particle.disease() != disease)
        {
            return Err(invalid_configuration(format!(
                "particle {index} has disease parameters {:?}, expected {disease:?}",
                population[index].disease()
            )));
        }
        Ok(Self {
            population,
            time: 0,
            parameters,
            initial_immune: 0,
        })
    }

    /// Advances the simulation by one time step.
    pub fn tick(&mut self) {
        self.time += 1;
        let bounds = self.parameters.bounds;
        for particle in &mut self.population {
            let was_infected = particle.is_infected();
            particle.tick();
            if was_infected && particle.is_immune() {
                trace!("t={}: particle recovered", self.time);
            }
            enforce_bounds(particle, &bounds);
        }
        self.check_contacts();
    }

    /// Exposes every unordered pair of particles closer than the contact radius.
    fn check_contacts(&mut self) {
        let radius = self.parameters.contact_radius;
        match self.parameters.contact_policy {
            ContactPolicy::Snapshot => {
                let spreading: Vec<bool> =
                    self.population.iter().map(Particle::is_infected).collect();
                let mut exposed = vec![false; self.population.len()];
                for i in 0..self.population.len() {
                    for j in (i + 1)..self.population.len() {
                        if spreading[i] == spreading[j] {
                            continue;
                        }
                        let a = &self.population[i];
                        let b = &self.population[j];
                        if a.location().distance(&b.location()) < radius {
                            exposed[if spreading[i] { j } else { i }] = true;
                        }
                    }
                }
                for (particle, exposed) in self.population.iter_mut().zip(exposed) {
                    if exposed && particle.is_vulnerable() {
                        particle.contract_disease();
                        trace!("t={}: particle infected", self.time);
                    }
                }
            }
            ContactPolicy::Sequential => {
                for i in 0..self.population.len() {
                    let (head, tail) = self.population.split_at_mut(i + 1);
                    let particle = &mut head[i];
                    for other in tail {
                        if particle.location().distance(&other.location()) < radius {
                            particle.contact_with(other);
                        }
                    }
                }
            }
        }
    }

    /// True once no particle is infected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.population.iter().any(Particle::is_infected)
    }

    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census {
            time: self.time,
            ..Census::default()
        };
        for particle in &self.population {
            match particle.category() {
                Some(DisplayCategory::Vulnerable) => census.vulnerable += 1,
                Some(DisplayCategory::Infected) => census.infected += 1,
                Some(DisplayCategory::Immune) => census.immune += 1,
                None => {}
            }
        }
        census
    }

    #[must_use]
    pub fn time(&self) -> u64 {
        self.time
    }

    #[must_use]
    pub fn population(&self) -> &[Particle] {
        &self.population
    }

    #[must_use]
    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.population.get(index)
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.population.get_mut(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Always false for a constructed simulation; provided alongside `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The initial immune count requested at construction.
    #[must_use]
    pub fn initial_immune(&self) -> usize {
        self.initial_immune
    }
}

/// Clamps a particle that left the arena back onto the boundary and reflects its direction
/// on each axis it crossed.
fn enforce_bounds(particle: &mut Particle, bounds: &Bounds) {
    let mut location = particle.location();
    let mut direction = particle.direction();
    if location.x > bounds.max_x {
        location.x = bounds.max_x;
        direction.x = -direction.x;
    }
    if location.x < bounds.min_x {
        location.x = bounds.min_x;
        direction.x = -direction.x;
    }
    if location.y > bounds.max_y {
        location.y = bounds.max_y;
        direction.y = -direction.y;
    }
    if location.y < bounds.min_y {
        location.y = bounds.min_y;
        direction.y = -direction.y;
    }
    particle.set_location(location);
    particle.set_direction(direction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_rng;
    use crate::random::seeded_rng;
    use crate::vector::Point;

    define_rng!(TestRng);

    fn parameters() -> Parameters {
        Parameters {
            bounds: Bounds {
                min_x: -10.0,
                max_x: 10.0,
                min_y: -10.0,
                max_y: 10.0,
            },
            contact_radius: 1.0,
            recovery_period: 5,
            ..Parameters::default()
        }
    }

    fn particle_at(x: f64, y: f64) -> Particle {
        Particle::new(
            Point::new(x, y),
            Point::default(),
            parameters().disease(),
        )
    }

    fn infected_at(x: f64, y: f64) -> Particle {
        let mut particle = particle_at(x, y);
        particle.contract_disease();
        particle
    }

    fn build(particles: Vec<Particle>) -> Simulation {
        Simulation::from_particles(parameters(), particles).unwrap()
    }

    #[test]
    fn construction_creates_requested_population() {
        let mut rng = seeded_rng::<TestRng>(8);
        for (size, infected, immune) in [(2, 1, 0), (10, 3, 7), (50, 49, 1), (100, 1, 0)] {
            let sim =
                Simulation::new(parameters(), size, 2.0, infected, immune, &mut rng).unwrap();
            assert_eq!(sim.len(), size);
            let census = sim.census();
            assert_eq!(census.infected, infected);
            assert_eq!(census.vulnerable, size - infected);
            assert_eq!(census.immune, 0);
            assert_eq!(sim.time(), 0);
            assert_eq!(sim.initial_immune(), immune);
        }
    }

    #[test]
    fn construction_places_infected_last() {
        let mut rng = seeded_rng::<TestRng>(8);
        let sim = Simulation::new(parameters(), 5, 1.0, 2, 0, &mut rng).unwrap();
        let infected: Vec<bool> = sim.population().iter().map(Particle::is_infected).collect();
        assert_eq!(infected, vec![false, false, false, true, true]);
    }

    #[test]
    fn construction_rejects_invalid_counts() {
        let mut rng = seeded_rng::<TestRng>(8);
        for (size, infected, immune) in [
            (10, 0, 0),
            (10, 10, 0),
            (10, 11, 0),
            (10, 5, 6),
            (0, 0, 0),
            (100, 1, usize::MAX),
            (100, 99, usize::MAX - 98),
        ] {
            let result = Simulation::new(parameters(), size, 1.0, infected, immune, &mut rng);
            assert!(
                matches!(result, Err(ContagionError::InvalidConfiguration(_))),
                "({size}, {infected}, {immune}) accepted"
            );
        }
    }

    #[test]
    fn construction_rejects_invalid_parameters() {
        let mut rng = seeded_rng::<TestRng>(8);
        let bad = Parameters {
            contact_radius: 0.0,
            ..parameters()
        };
        assert!(Simulation::new(bad, 10, 1.0, 1, 0, &mut rng).is_err());
        assert!(Simulation::new(parameters(), 10, f64::NAN, 1, 0, &mut rng).is_err());
    }

    #[test]
    fn construction_is_deterministic_per_seed() {
        let a = Simulation::new(parameters(), 20, 3.0, 2, 0, &mut seeded_rng::<TestRng>(5))
            .unwrap();
        let b = Simulation::new(parameters(), 20, 3.0, 2, 0, &mut seeded_rng::<TestRng>(5))
            .unwrap();
        let c = Simulation::new(parameters(), 20, 3.0, 2, 0, &mut seeded_rng::<TestRng>(6))
            .unwrap();
        assert_eq!(a.population(), b.population());
        assert_ne!(a.population(), c.population());
    }

    #[test]
    fn initial_immune_is_not_applied_by_default() {
        let mut rng = seeded_rng::<TestRng>(8);
        let sim = Simulation::new(parameters(), 10, 1.0, 2, 5, &mut rng).unwrap();
        assert_eq!(sim.census().immune, 0);
        assert_eq!(sim.initial_immune(), 5);
    }

    #[test]
    fn initial_immune_applied_when_enabled() {
        let mut rng = seeded_rng::<TestRng>(8);
        let enabled = Parameters {
            immunize_initial: true,
            ..parameters()
        };
        let sim = Simulation::new(enabled, 10, 1.0, 2, 5, &mut rng).unwrap();
        let census = sim.census();
        assert_eq!(census.immune, 5);
        assert_eq!(census.infected, 2);
        assert_eq!(census.vulnerable, 3);
        assert!(sim.population()[..5].iter().all(Particle::is_immune));
    }

    #[test]
    fn tick_advances_time_by_one() {
        let mut sim = build(vec![particle_at(0.0, 0.0), particle_at(5.0, 5.0)]);
        for expected in 1..=3 {
            sim.tick();
            assert_eq!(sim.time(), expected);
            assert_eq!(sim.census().time, expected);
        }
    }

    #[test]
    fn bounce_off_max_x() {
        let mut particle = particle_at(9.5, 0.0);
        particle.set_direction(Point::new(2.0, 0.0));
        let mut sim = build(vec![particle]);

        sim.tick();
        let p = sim.particle(0).unwrap();
        assert_eq!(p.location().x, 10.0);
        assert_eq!(p.direction().x, -2.0);

        sim.tick();
        assert_eq!(sim.particle(0).unwrap().location().x, 8.0);
    }

    #[test]
    fn bounce_off_min_y() {
        let mut particle = particle_at(0.0, -9.0);
        particle.set_direction(Point::new(0.0, -3.0));
        let mut sim = build(vec![particle]);
        sim.tick();
        let p = sim.particle(0).unwrap();
        assert_eq!(p.location().y, -10.0);
        assert_eq!(p.direction().y, 3.0);
    }

    #[test]
    fn corner_reflects_both_axes() {
        let mut particle = particle_at(9.0, -9.0);
        particle.set_direction(Point::new(4.0, -4.0));
        let mut sim = build(vec![particle]);
        sim.tick();
        let p = sim.particle(0).unwrap();
        assert_eq!(p.location(), Point::new(10.0, -10.0));
        assert_eq!(p.direction(), Point::new(-4.0, 4.0));
        assert_eq!(p.direction().magnitude(), Point::new(4.0, -4.0).magnitude());
    }

    #[test]
    fn particles_stay_in_bounds() {
        let mut rng = seeded_rng::<TestRng>(11);
        let mut sim = Simulation::new(parameters(), 30, 7.5, 3, 0, &mut rng).unwrap();
        for _ in 0..200 {
            sim.tick();
            for p in sim.population() {
                let location = p.location();
                assert!((-10.0..=10.0).contains(&location.x));
                assert!((-10.0..=10.0).contains(&location.y));
            }
        }
    }

    #[test]
    fn contact_within_radius_transmits() {
        let mut sim = build(vec![infected_at(0.0, 0.0), particle_at(0.99, 0.0)]);
        sim.tick();
        assert!(sim.particle(1).unwrap().is_infected());
    }

    #[test]
    fn contact_at_radius_does_not_transmit() {
        let mut sim = build(vec![infected_at(0.0, 0.0), particle_at(1.0, 0.0)]);
        sim.tick();
        assert!(sim.particle(1).unwrap().is_vulnerable());
    }

    #[test]
    fn contact_uses_post_move_positions() {
        // Three units apart before the tick, touching after it.
        let mut moving = particle_at(-3.0, 0.0);
        moving.set_direction(Point::new(3.0, 0.0));
        let mut sim = build(vec![moving, infected_at(0.0, 0.0)]);
        sim.tick();
        assert!(sim.particle(0).unwrap().is_infected());
    }

    #[test]
    fn snapshot_policy_does_not_cascade() {
        // Only particle 1 is infected and it is out of range of particle 2, which is in
        // range of particle 0.
        let mut sim = build(vec![
            particle_at(0.9, 0.0),
            infected_at(0.0, 0.0),
            particle_at(1.8, 0.0),
        ]);
        sim.tick();
        assert!(sim.particle(0).unwrap().is_infected());
        assert!(sim.particle(2).unwrap().is_vulnerable());

        sim.tick();
        assert!(sim.particle(2).unwrap().is_infected());
    }

    #[test]
    fn snapshot_policy_is_order_independent() {
        let reversed = |mut particles: Vec<Particle>| {
            particles.reverse();
            particles
        };
        let particles = vec![
            infected_at(0.0, 0.0),
            particle_at(0.9, 0.0),
            particle_at(1.8, 0.0),
        ];
        let mut forward = build(particles.clone());
        let mut backward = build(reversed(particles));
        forward.tick();
        backward.tick();
        assert_eq!(forward.census(), backward.census());
    }

    #[test]
    fn sequential_policy_cascades_along_scan_order() {
        let sequential = Parameters {
            contact_policy: ContactPolicy::Sequential,
            ..parameters()
        };
        // Pair (0, 1) infects 1, then pair (1, 2) sees 1 as infected.
        let mut sim = Simulation::from_particles(
            sequential,
            vec![
                infected_at(0.0, 0.0),
                particle_at(0.9, 0.0),
                particle_at(1.8, 0.0),
            ],
        )
        .unwrap();
        sim.tick();
        assert_eq!(sim.census().infected, 3);
    }

    #[test]
    fn completion() {
        let all_vulnerable = build(vec![particle_at(0.0, 0.0), particle_at(5.0, 0.0)]);
        assert!(all_vulnerable.is_complete());

        let mut immune = particle_at(0.0, 0.0);
        immune.immunize();
        let all_immune = build(vec![immune.clone(), immune]);
        assert!(all_immune.is_complete());

        let one_infected = build(vec![particle_at(0.0, 0.0), infected_at(5.0, 0.0)]);
        assert!(!one_infected.is_complete());
    }

    #[test]
    fn epidemic_runs_to_completion() {
        let mut rng = seeded_rng::<TestRng>(3);
        let mut sim = Simulation::new(parameters(), 40, 1.5, 4, 0, &mut rng).unwrap();
        let mut steps = 0;
        while !sim.is_complete() {
            sim.tick();
            steps += 1;
            let census = sim.census();
            assert_eq!(census.total(), 40);
            assert!(steps < 10_000);
        }
        assert_eq!(sim.census().infected, 0);
        assert!(sim.census().immune >= 4);
    }

    #[test]
    fn from_particles_rejects_foreign_disease_parameters() {
        let short = Parameters {
            recovery_period: 2,
            ..parameters()
        };
        let mut foreign = Particle::new(Point::default(), Point::default(), Default::default());
        foreign.contract_disease();
        assert!(matches!(
            Simulation::from_particles(short.clone(), vec![particle_at(5.0, 5.0), foreign]),
            Err(ContagionError::InvalidConfiguration(_))
        ));

        // Particles built from the same parameters follow the simulation's recovery period.
        let mut own = Particle::new(Point::default(), Point::default(), short.disease());
        own.contract_disease();
        let mut sim = Simulation::from_particles(short, vec![own]).unwrap();
        sim.tick();
        assert!(sim.particle(0).unwrap().is_infected());
        sim.tick();
        assert!(sim.particle(0).unwrap().is_immune());
    }

    #[test]
    fn from_particles_rejects_empty_population() {
        assert!(matches!(
            Simulation::from_particles(parameters(), vec![]),
            Err(ContagionError::InvalidConfiguration(_))
        ));
    }
}
