//! Macro for implementing Display and FromStr for domain enums
//!
//! Status and category enums travel as lowercase strings between the UI, the
//! Report Data Store and local storage. This macro keeps the string mapping in
//! one place and accepts extra spellings on parse.
//!
//! # Example
//!
//! ```rust
//! use vsme_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Frequency {
//!     Monthly,
//!     Annual,
//! }
//!
//! impl_domain_status_conversions!(Frequency {
//!     Monthly => "monthly",
//!     Annual => "annual" | "yearly",
//! });
//!
//! assert_eq!("Yearly".parse::<Frequency>().unwrap(), Frequency::Annual);
//! assert_eq!(Frequency::Annual.to_string(), "annual");
//! ```

/// Implements Display and FromStr traits for domain enums
///
/// - Display writes the canonical (first) string of each variant
/// - FromStr is case-insensitive, trims whitespace and accepts any listed
///   alias
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
