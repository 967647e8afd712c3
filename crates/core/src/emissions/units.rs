//! Unit normalisation applied before any factor is used

use vsme_domain::{Result, Unit, VsmeError};

/// Convert `quantity` from one unit to another of the same dimension.
///
/// Energy units convert freely between the Wh and J families. Anything that
/// crosses dimensions (litres to kWh, km to kg, ...) is rejected rather than
/// guessed.
pub fn convert(quantity: f64, from: Unit, to: Unit) -> Result<f64> {
    if from == to {
        return Ok(quantity);
    }
    if from.dimension() != to.dimension() {
        return Err(VsmeError::Validation(format!(
            "Unsupported unit conversion: {from} to {to}"
        )));
    }
    Ok(quantity * from.to_base_factor() / to.to_base_factor())
}

/// Reject negative, NaN or infinite input quantities
pub fn ensure_quantity(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(VsmeError::Validation(format!("{name} must be a finite number")));
    }
    if value < 0.0 {
        return Err(VsmeError::Validation(format!("{name} must not be negative, got {value}")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use vsme_common::testing::assert_approx_eq;

    use super::*;

    #[test]
    fn converts_inside_energy_dimension() {
        assert_approx_eq(convert(1.0, Unit::MWh, Unit::KWh).unwrap(), 1000.0, 1e-9);
        assert_approx_eq(convert(3.6, Unit::MJ, Unit::KWh).unwrap(), 1.0, 1e-9);
        assert_approx_eq(convert(1.0, Unit::GJ, Unit::MJ).unwrap(), 1000.0, 1e-9);
        assert_approx_eq(convert(2.5, Unit::Tonne, Unit::Kilogram).unwrap(), 2500.0, 1e-9);
    }

    #[test]
    fn identity_conversion_is_exact() {
        assert_eq!(convert(123.456, Unit::Litre, Unit::Litre).unwrap(), 123.456);
    }

    #[test]
    fn cross_dimension_conversion_names_units() {
        let err = convert(10.0, Unit::Litre, Unit::KWh).unwrap_err();
        match err {
            VsmeError::Validation(msg) => {
                assert!(msg.contains("L"));
                assert!(msg.contains("kWh"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_and_nan_quantities_rejected() {
        assert!(ensure_quantity("quantity", -1.0).is_err());
        assert!(ensure_quantity("quantity", f64::NAN).is_err());
        assert_eq!(ensure_quantity("quantity", 0.0).unwrap(), 0.0);
    }
}
