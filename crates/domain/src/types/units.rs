//! Physical units of activity data and emission factors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::VsmeError;

/// Physical dimension of a unit. Conversion is only defined inside one
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Energy,
    Volume,
    Mass,
    Distance,
}

/// Unit of an activity quantity or of an emission factor's denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum Unit {
    #[serde(rename = "Wh")]
    Wh,
    #[serde(rename = "kWh")]
    KWh,
    #[serde(rename = "MWh")]
    MWh,
    #[serde(rename = "GWh")]
    GWh,
    #[serde(rename = "J")]
    J,
    #[serde(rename = "kJ")]
    KJ,
    #[serde(rename = "MJ")]
    MJ,
    #[serde(rename = "GJ")]
    GJ,
    #[serde(rename = "TJ")]
    TJ,
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "m3")]
    CubicMetre,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "t")]
    Tonne,
    #[serde(rename = "km")]
    Kilometre,
    #[serde(rename = "mi")]
    Mile,
}

impl Unit {
    /// Dimension this unit measures
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Wh
            | Self::KWh
            | Self::MWh
            | Self::GWh
            | Self::J
            | Self::KJ
            | Self::MJ
            | Self::GJ
            | Self::TJ => Dimension::Energy,
            Self::Litre | Self::CubicMetre => Dimension::Volume,
            Self::Gram | Self::Kilogram | Self::Tonne => Dimension::Mass,
            Self::Kilometre | Self::Mile => Dimension::Distance,
        }
    }

    /// Size of one of this unit in the dimension's base unit
    /// (kWh, litre, kg, km).
    pub fn to_base_factor(self) -> f64 {
        match self {
            Self::Wh => 1e-3,
            Self::KWh => 1.0,
            Self::MWh => 1e3,
            Self::GWh => 1e6,
            Self::J => 1.0 / 3.6e6,
            Self::KJ => 1.0 / 3.6e3,
            Self::MJ => 1.0 / 3.6,
            Self::GJ => 1e3 / 3.6,
            Self::TJ => 1e6 / 3.6,
            Self::Litre => 1.0,
            Self::CubicMetre => 1e3,
            Self::Gram => 1e-3,
            Self::Kilogram => 1.0,
            Self::Tonne => 1e3,
            Self::Kilometre => 1.0,
            Self::Mile => 1.609_344,
        }
    }

    /// Canonical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Wh => "Wh",
            Self::KWh => "kWh",
            Self::MWh => "MWh",
            Self::GWh => "GWh",
            Self::J => "J",
            Self::KJ => "kJ",
            Self::MJ => "MJ",
            Self::GJ => "GJ",
            Self::TJ => "TJ",
            Self::Litre => "L",
            Self::CubicMetre => "m3",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Tonne => "t",
            Self::Kilometre => "km",
            Self::Mile => "mi",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = VsmeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let unit = match normalized.as_str() {
            "wh" => Self::Wh,
            "kwh" => Self::KWh,
            "mwh" => Self::MWh,
            "gwh" => Self::GWh,
            "j" => Self::J,
            "kj" => Self::KJ,
            "mj" => Self::MJ,
            "gj" => Self::GJ,
            "tj" => Self::TJ,
            "l" | "litre" | "litres" | "liter" | "liters" => Self::Litre,
            "m3" | "m³" | "cubic metre" | "cubic metres" | "cubic meter" | "cubic meters" => {
                Self::CubicMetre
            }
            "g" | "gram" | "grams" => Self::Gram,
            "kg" | "kilogram" | "kilograms" => Self::Kilogram,
            "t" | "tonne" | "tonnes" => Self::Tonne,
            "km" | "kilometre" | "kilometres" | "kilometer" | "kilometers" => Self::Kilometre,
            "mi" | "mile" | "miles" => Self::Mile,
            _ => return Err(VsmeError::Validation(format!("Unsupported unit: {}", s.trim()))),
        };
        Ok(unit)
    }
}
