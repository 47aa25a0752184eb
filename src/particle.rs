//! A single simulated individual.
//!
//! A particle's health is an integer counter rather than an enum. It starts at
//! `VULNERABLE` (zero), jumps to the infected sentinel on infection, counts up by one every
//! tick while infected, and is replaced by the immune sentinel once it exceeds the recovery
//! period. The predicates below compare against the sentinels exactly, so a particle whose
//! counter equals the recovery period still tests infected; it turns immune on the following
//! tick.

use crate::parameters::{DiseaseParameters, VULNERABLE};
use crate::vector::Point;
use serde::{Deserialize, Serialize};

/// The coarse position of a particle in the Vulnerable -> Infected -> Immune progression.
/// Ordered, so the one-way nature of the progression can be checked with `<=`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthState {
    Vulnerable,
    Infected,
    Immune,
}

/// What a renderer should draw a particle as. Derived from health, never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCategory {
    Infected,
    Vulnerable,
    Immune,
}

impl DisplayCategory {
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            DisplayCategory::Infected => "red",
            DisplayCategory::Vulnerable => "gray",
            DisplayCategory::Immune => "yellow",
        }
    }
}

/// A moving individual with a health counter and the disease parameters that drive it.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    location: Point,
    direction: Point,
    health: i64,
    disease: DiseaseParameters,
}

impl Particle {
    /// Creates a vulnerable particle.
    #[must_use]
    pub fn new(location: Point, direction: Point, disease: DiseaseParameters) -> Self {
        Self {
            location,
            direction,
            health: VULNERABLE,
            disease,
        }
    }

    #[must_use]
    pub fn location(&self) -> Point {
        self.location
    }

    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    #[must_use]
    pub fn direction(&self) -> Point {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Point) {
        self.direction = direction;
    }

    /// The raw health counter.
    #[must_use]
    pub fn health(&self) -> i64 {
        self.health
    }

    #[must_use]
    pub fn disease(&self) -> &DiseaseParameters {
        &self.disease
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.health >= self.disease.infected_sentinel
    }

    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.health == self.disease.immune_sentinel
    }

    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        self.health == VULNERABLE
    }

    /// Marks the particle as freshly infected. Unguarded: callers decide whether the particle
    /// was vulnerable.
    pub fn contract_disease(&mut self) {
        self.health = self.disease.infected_sentinel;
    }

    pub fn immunize(&mut self) {
        self.health = self.disease.immune_sentinel;
    }

    /// Advances the particle by one time step: move, then progress the infection, then check
    /// for recovery. The order matters for the exact tick on which recovery happens.
    pub fn tick(&mut self) {
        self.location = self.location + self.direction;
        if self.is_infected() {
            self.health += 1;
        }
        if self.health > i64::from(self.disease.recovery_period) {
            self.immunize();
        }
    }

    /// Exposes two particles to each other. Both directions are judged on the state the
    /// particles had before the call, so at most one of them can change.
    pub fn contact_with(&mut self, other: &mut Particle) {
        let self_spreads = self.is_infected() && other.is_vulnerable();
        let other_spreads = other.is_infected() && self.is_vulnerable();
        if self_spreads {
            other.contract_disease();
        }
        if other_spreads {
            self.contract_disease();
        }
    }

    /// Display category in priority order infected, vulnerable, immune. `None` only if the
    /// health counter matches none of them, which the state machine never produces.
    #[must_use]
    pub fn category(&self) -> Option<DisplayCategory> {
        if self.is_infected() {
            Some(DisplayCategory::Infected)
        } else if self.is_vulnerable() {
            Some(DisplayCategory::Vulnerable)
        } else if self.is_immune() {
            Some(DisplayCategory::Immune)
        } else {
            None
        }
    }

    #[must_use]
    pub fn color(&self) -> Option<&'static str> {
        self.category().map(DisplayCategory::color)
    }

    /// Health as an ordered state, or `None` for a counter outside the state machine.
    #[must_use]
    pub fn state(&self) -> Option<HealthState> {
        self.category().map(|category| match category {
            DisplayCategory::Vulnerable => HealthState::Vulnerable,
            DisplayCategory::Infected => HealthState::Infected,
            DisplayCategory::Immune => HealthState::Immune,
        })
    }
}
