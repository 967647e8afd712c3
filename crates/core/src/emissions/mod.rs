//! Emission factor lookup, unit handling, calculation and aggregation

pub mod aggregate;
pub mod calculator;
pub mod factors;
pub mod service;
pub mod units;

pub use aggregate::EmissionsSummary;
pub use calculator::{
    fugitive_mass_balance, fugitive_screening, fuel_combustion, mass_balance, mobile_distance,
    purchased_electricity, CalculationOutcome, GwpSet, MassBalance, RefrigerantInventory,
};
pub use factors::{EmissionFactorCatalog, FactorQuery};
pub use service::{ActivityEntry, EmissionsCalculator};
