//! Tunable parameters of a simulation run.
//!
//! Every simulation owns its own `Parameters` value, so several simulations with different
//! settings can live side by side. Parameters can be built in code, starting from
//! `Parameters::default()`, or loaded from a JSON file in which any subset of fields may be
//! given:
//!
//! ```json
//! {
//!     "bounds": { "min_x": -100.0, "max_x": 100.0, "min_y": -50.0, "max_y": 50.0 },
//!     "contact_radius": 10.0,
//!     "recovery_period": 45,
//!     "contact_policy": "sequential"
//! }
//! ```
use crate::error::{invalid_configuration, ContagionError};
use crate::log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The health value every particle starts with.
pub const VULNERABLE: i64 = 0;

/// Axis-aligned box the particles bounce around in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -200.0,
            max_x: 200.0,
            min_y: -200.0,
            max_y: 200.0,
        }
    }
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn validate(&self) -> Result<(), ContagionError> {
        let all_finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(invalid_configuration("bounds must be finite"));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(invalid_configuration(format!(
                "bounds must satisfy min < max on both axes, got x: [{}, {}], y: [{}, {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }
}

/// How a tick's contact scan sees the health of particles that change during the scan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Every pair is judged against infection status frozen at the start of the scan. A
    /// particle infected during the scan does not transmit until the next tick.
    #[default]
    Snapshot,
    /// Pairs are judged against live state, so an infection can travel along the scan order
    /// within one tick.
    Sequential,
}

/// The parts of `Parameters` a single particle needs to run its own state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiseaseParameters {
    pub infected_sentinel: i64,
    pub immune_sentinel: i64,
    pub recovery_period: u32,
}

impl Default for DiseaseParameters {
    fn default() -> Self {
        Parameters::default().disease()
    }
}

impl DiseaseParameters {
    /// Checks that the sentinels keep the three health states disjoint and that an infected
    /// counter can always take its next step.
    ///
    /// # Errors
    ///
    /// Returns `ContagionError::InvalidConfiguration` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ContagionError> {
        if self.infected_sentinel <= VULNERABLE || self.infected_sentinel == i64::MAX {
            return Err(invalid_configuration(format!(
                "infected sentinel must be > {VULNERABLE} and < {}, got {}",
                i64::MAX,
                self.infected_sentinel
            )));
        }
        // Anything >= the infected sentinel tests as infected, so immunity has to sit below it.
        if self.immune_sentinel >= self.infected_sentinel || self.immune_sentinel == VULNERABLE {
            return Err(invalid_configuration(format!(
                "immune sentinel must be below the infected sentinel ({}) and != {VULNERABLE}, got {}",
                self.infected_sentinel, self.immune_sentinel
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub bounds: Bounds,
    /// Two particles are in contact when strictly closer than this.
    pub contact_radius: f64,
    /// An infected particle becomes immune once its health counter exceeds this value.
    pub recovery_period: u32,
    /// Health value assigned on infection. Values at or above it count as infected.
    pub infected_sentinel: i64,
    /// Health value marking permanent immunity.
    pub immune_sentinel: i64,
    pub contact_policy: ContactPolicy,
    /// Immunize `initial_immune` particles at construction. Off by default: the count is
    /// only validated.
    pub immunize_initial: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            contact_radius: 15.0,
            recovery_period: 90,
            infected_sentinel: 1,
            immune_sentinel: -1,
            contact_policy: ContactPolicy::default(),
            immunize_initial: false,
        }
    }
}

impl Parameters {
    /// Loads parameters from a JSON file. Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the file cannot be read or parsed, or if the resulting
    /// parameters fail `validate`.
    pub fn from_json_file(path: &Path) -> Result<Self, ContagionError> {
        debug!("loading parameters from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let parameters: Parameters = serde_json::from_str(&contents)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Checks that the parameters describe a usable arena and a disjoint set of health states.
    ///
    /// # Errors
    ///
    /// Returns `ContagionError::InvalidConfiguration` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ContagionError> {
        self.bounds.validate()?;
        if !self.contact_radius.is_finite() || self.contact_radius <= 0.0 {
            return Err(invalid_configuration(format!(
                "contact radius must be finite and > 0, got {}",
                self.contact_radius
            )));
        }
        self.disease().validate()
    }

    #[must_use]
    pub fn disease(&self) -> DiseaseParameters {
        DiseaseParameters {
            infected_sentinel: self.infected_sentinel,
            immune_sentinel: self.immune_sentinel,
            recovery_period: self.recovery_period,
        }
    }
}
