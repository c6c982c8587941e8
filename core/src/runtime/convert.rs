// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::output::UcumError;
use crate::types::Unit;

/// Converts a measurement from one unit to another. Fails when the
/// dimensions differ, when either side is an arbitrary unit, when a
/// special function leaves its domain, or when the arithmetic leaves
/// the finite range.
pub fn convert_value(magnitude: f64, from: &Unit, to: &Unit) -> Result<f64, UcumError> {
    if !magnitude.is_finite() {
        return Err(UcumError::Overflow {
            context: from.cs_code.clone(),
        });
    }
    if from.is_arbitrary || to.is_arbitrary {
        // Arbitrary units have no defined relation to anything else.
        return Err(UcumError::IncommensurableUnits {
            from: from.cs_code.clone(),
            to: to.cs_code.clone(),
        });
    }
    if from.dimension != to.dimension {
        return Err(UcumError::IncommensurableUnits {
            from: from.cs_code.clone(),
            to: to.cs_code.clone(),
        });
    }
    // Identity conversions are exact.
    if from.magnitude == to.magnitude && from.special == to.special && from.cnv_pfx == to.cnv_pfx {
        return Ok(magnitude);
    }
    let coherent = to_coherent(magnitude, from)?;
    let out = from_coherent(coherent, to)?;
    if out.is_finite() {
        Ok(out)
    } else {
        Err(UcumError::Overflow {
            context: to.cs_code.clone(),
        })
    }
}

/// Maps a value in `unit` onto the coherent base-unit scale. For a
/// ratio unit this is a plain scaling; a special unit runs its inverse
/// function first, with the conversion prefix applied inside the
/// argument.
pub fn to_coherent(magnitude: f64, unit: &Unit) -> Result<f64, UcumError> {
    let out = match unit.special {
        Some(f) => f.from_scale(magnitude * unit.cnv_pfx)? * unit.magnitude,
        None => magnitude * unit.magnitude,
    };
    if out.is_finite() {
        Ok(out)
    } else {
        Err(UcumError::Overflow {
            context: unit.cs_code.clone(),
        })
    }
}

/// Maps a value on the coherent base-unit scale into `unit`.
pub fn from_coherent(coherent: f64, unit: &Unit) -> Result<f64, UcumError> {
    match unit.special {
        Some(f) => Ok(f.to_scale(coherent / unit.magnitude)? / unit.cnv_pfx),
        None => Ok(coherent / unit.magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dimension, SpecialFn};

    fn ratio(code: &str, magnitude: f64, dim: Dimension) -> Unit {
        let mut unit = Unit::unity();
        unit.cs_code = code.to_owned();
        unit.magnitude = magnitude;
        unit.dimension = dim;
        unit
    }

    fn celsius() -> Unit {
        let mut unit = ratio("Cel", 1.0, Dimension::base_axis(4));
        unit.special = Some(SpecialFn::Celsius);
        unit
    }

    #[test]
    fn ratio_scaling() {
        let inch = ratio("[in_i]", 0.0254, Dimension::base_axis(1));
        let foot = ratio("[ft_i]", 0.3048, Dimension::base_axis(1));
        let feet = convert_value(12.0, &inch, &foot).unwrap();
        assert!((feet - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identity_is_exact() {
        let inch = ratio("[in_i]", 0.0254, Dimension::base_axis(1));
        assert_eq!(convert_value(0.1, &inch, &inch).unwrap(), 0.1);
    }

    #[test]
    fn dimension_mismatch() {
        let meter = ratio("m", 1.0, Dimension::base_axis(1));
        let second = ratio("s", 1.0, Dimension::base_axis(2));
        assert!(matches!(
            convert_value(1.0, &meter, &second),
            Err(UcumError::IncommensurableUnits { .. })
        ));
    }

    #[test]
    fn special_to_ratio() {
        let kelvin = ratio("K", 1.0, Dimension::base_axis(4));
        let k = convert_value(37.0, &celsius(), &kelvin).unwrap();
        assert!((k - 310.15).abs() < 1e-12);
        let c = convert_value(310.15, &kelvin, &celsius()).unwrap();
        assert!((c - 37.0).abs() < 1e-12);
    }

    #[test]
    fn coherent_passthrough_for_ratio_units() {
        // A ratio unit must come back unchanged apart from its scale.
        let km = ratio("km", 1000.0, Dimension::base_axis(1));
        assert_eq!(to_coherent(2.0, &km).unwrap(), 2000.0);
        let unity = Unit::unity();
        assert_eq!(to_coherent(5.0, &unity).unwrap(), 5.0);
    }

    #[test]
    fn arbitrary_units_refuse_conversion() {
        let mut iu = ratio("[IU]", 1.0, Dimension::zero());
        iu.is_arbitrary = true;
        let one = Unit::unity();
        assert!(matches!(
            convert_value(1.0, &iu, &one),
            Err(UcumError::IncommensurableUnits { .. })
        ));
    }

    #[test]
    fn below_absolute_zero_is_out_of_domain() {
        let kelvin = ratio("K", 1.0, Dimension::base_axis(4));
        // -300 Cel is below 0 K; pH of a negative concentration is
        // likewise undefined.
        assert!(matches!(
            convert_value(-300.0, &celsius(), &kelvin),
            Err(UcumError::DomainError { .. })
        ));
        let mut ph = ratio("[pH]", 1.0, Dimension::zero());
        ph.special = Some(SpecialFn::Ph);
        let one = Unit::unity();
        assert!(matches!(
            convert_value(-1.0, &one, &ph),
            Err(UcumError::DomainError { .. })
        ));
    }
}
