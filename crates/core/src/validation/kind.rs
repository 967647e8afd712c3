use std::fmt;

use super::{b0, b1, b2, b3, b8, generic, ValidatorFn};

/// Closed set of module kinds with dedicated rules. Every other module id
/// maps to [`ModuleKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// General information
    B0,
    /// Basis for preparation
    B1,
    /// Practices, policies and future initiatives
    B2,
    /// Energy and greenhouse gas emissions
    B3,
    /// Workforce characteristics
    B8,
    /// Any other module: structural checks only
    Generic,
}

impl ModuleKind {
    /// Map a module id (`"b0"`, `"B3"`, ...) to its kind
    pub fn from_id(module_id: &str) -> Self {
        match module_id.trim().to_ascii_lowercase().as_str() {
            "b0" => Self::B0,
            "b1" => Self::B1,
            "b2" => Self::B2,
            "b3" => Self::B3,
            "b8" => Self::B8,
            _ => Self::Generic,
        }
    }

    /// Validator bound to this kind
    pub fn validator(self) -> ValidatorFn {
        match self {
            Self::B0 => b0::validate,
            Self::B1 => b1::validate,
            Self::B2 => b2::validate,
            Self::B3 => b3::validate,
            Self::B8 => b8::validate,
            Self::Generic => generic::validate,
        }
    }

    /// Short display name, e.g. `B3`
    pub fn label(self) -> &'static str {
        match self {
            Self::B0 => "B0",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::B3 => "B3",
            Self::B8 => "B8",
            Self::Generic => "Module",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
