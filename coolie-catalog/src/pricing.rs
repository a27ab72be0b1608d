use serde::{Deserialize, Serialize};

/// Fare rules: a flat base plus a per-kilogram luggage rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    /// Flat charge per booking
    #[serde(default = "default_base")]
    pub base: f64,

    /// Charge per kilogram of luggage
    #[serde(default = "default_rate_per_kg")]
    pub rate_per_kg: f64,
}

fn default_base() -> f64 { 30.0 }
fn default_rate_per_kg() -> f64 { 2.5 }

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            rate_per_kg: default_rate_per_kg(),
        }
    }
}

/// Fare calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct FareEngine {
    config: FareConfig,
}

impl FareEngine {
    pub fn new(config: FareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FareConfig {
        &self.config
    }

    /// `base + weight * rate_per_kg`.
    ///
    /// No range check: a negative weight yields a fare below the base.
    /// Callers validate the weight before pricing.
    pub fn fare(&self, luggage_weight: f64) -> f64 {
        self.config.base + luggage_weight * self.config.rate_per_kg
    }
}
