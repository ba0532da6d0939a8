use serde::{Deserialize, Serialize};

/// Unit system in which all lengths and masses handed to the engine are expressed.
/// The engine never converts values; the unit system only drives tolerances and labels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// millimetres and kilograms
    #[default]
    Metric1,
    /// centimetres and kilograms
    Metric2,
    /// inches and pounds
    Imperial,
    /// inches and pounds, US customary labels
    Us,
}

impl UnitSystem {
    pub fn length_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric1 => "mm",
            UnitSystem::Metric2 => "cm",
            UnitSystem::Imperial | UnitSystem::Us => "in",
        }
    }

    pub fn mass_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric1 | UnitSystem::Metric2 => "kg",
            UnitSystem::Imperial | UnitSystem::Us => "lb",
        }
    }

    /// Geometric tolerance used by fit and overlap checks (a micrometre, expressed in the system's length unit)
    pub fn length_tolerance(&self) -> f64 {
        match self {
            UnitSystem::Metric1 => 1e-3,
            UnitSystem::Metric2 => 1e-4,
            UnitSystem::Imperial | UnitSystem::Us => 4e-5,
        }
    }
}
