// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::Serialize;

use super::{Atom, Dimension, Prefix, SpecialFn};
use crate::output::UcumError;

/// A parsed or composed unit. This is the value produced by the parser
/// and consumed by the converter; it is never a catalog entry itself,
/// and the public API treats it as immutable.
#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Human-readable composition, e.g. `kilogram.meter/second2`.
    pub name: String,
    /// Case-sensitive code, e.g. `kg.m/s2`.
    pub cs_code: String,
    /// Case-insensitive code, e.g. `KG.M/S2`.
    pub ci_code: String,
    pub print_symbol: Option<String>,
    pub property: Option<String>,
    pub class: Option<String>,
    /// Scale relative to the coherent base units. Finite and positive.
    pub magnitude: f64,
    pub dimension: Dimension,
    /// Present iff this is a special (non-ratio) unit.
    pub special: Option<SpecialFn>,
    /// Scale applied inside the special function's argument.
    pub cnv_pfx: f64,
    /// Conservatively false after any composition.
    pub is_metric: bool,
    pub is_arbitrary: bool,
}

impl Unit {
    /// The dimensionless unit 1.
    pub fn unity() -> Unit {
        Unit {
            name: "1".to_owned(),
            cs_code: "1".to_owned(),
            ci_code: "1".to_owned(),
            print_symbol: None,
            property: None,
            class: None,
            magnitude: 1.0,
            dimension: Dimension::zero(),
            special: None,
            cnv_pfx: 1.0,
            is_metric: false,
            is_arbitrary: false,
        }
    }

    /// A dimensionless numeric factor, e.g. the `2` in `2.mg`.
    pub fn factor(value: f64, text: &str) -> Result<Unit, UcumError> {
        let mut unit = Unit::unity();
        unit.magnitude = checked(value, text)?;
        unit.name = text.to_owned();
        unit.cs_code = text.to_owned();
        unit.ci_code = text.to_owned();
        Ok(unit)
    }

    pub fn from_atom(atom: &Atom) -> Unit {
        Unit {
            name: atom.name.clone(),
            cs_code: atom.code.clone(),
            ci_code: atom.ci_code.clone().unwrap_or_else(|| atom.code.clone()),
            print_symbol: atom.print_symbol.clone(),
            property: Some(atom.property.clone()),
            class: Some(atom.class.clone()),
            magnitude: atom.magnitude,
            dimension: atom.dimension,
            special: atom.special,
            cnv_pfx: atom.cnv_pfx,
            is_metric: atom.is_metric,
            is_arbitrary: atom.is_arbitrary,
        }
    }

    /// Builds a prefixed atom, e.g. `k` + `g`. On a ratio atom the
    /// prefix scales the magnitude; on a special atom it scales the
    /// conversion prefix instead, so that `mCel` converts correctly.
    /// Binary prefixes are not defined on special atoms.
    pub fn prefixed_atom(prefix: &Prefix, atom: &Atom) -> Result<Unit, UcumError> {
        let mut unit = Unit::from_atom(atom);
        if atom.is_special() {
            if prefix.is_binary() {
                return Err(UcumError::UnknownPrefix {
                    token: format!("{}{}", prefix.code, atom.code),
                    offset: 0,
                    message: format!(
                        "binary prefix '{}' cannot be applied to special unit '{}'",
                        prefix.code, atom.code
                    ),
                });
            }
            unit.cnv_pfx = checked(unit.cnv_pfx * prefix.factor, &atom.code)?;
        } else {
            unit.magnitude = checked(unit.magnitude * prefix.factor, &atom.code)?;
        }
        unit.name = format!("{}{}", prefix.name, atom.name);
        unit.cs_code = format!("{}{}", prefix.code, atom.code);
        unit.ci_code = format!(
            "{}{}",
            prefix.ci_code,
            atom.ci_code.as_deref().unwrap_or(&atom.code)
        );
        // A prefixed unit cannot take a second prefix.
        unit.is_metric = false;
        Ok(unit)
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// A special unit may only be multiplied by a dimensionless ratio
    /// value (which folds into its conversion prefix).
    fn absorbs(&self, other: &Unit) -> bool {
        self.is_special() && other.special.is_none() && other.dimension.is_zero()
    }

    pub fn multiply(&self, other: &Unit) -> Result<Unit, UcumError> {
        if self.is_special() || other.is_special() {
            if self.absorbs(other) {
                let mut out = self.clone();
                out.cnv_pfx = checked(out.cnv_pfx * other.magnitude, &out.cs_code)?;
                out.join(other, '.', true);
                return Ok(out);
            }
            if other.absorbs(self) {
                let mut out = other.clone();
                out.cnv_pfx = checked(out.cnv_pfx * self.magnitude, &out.cs_code)?;
                return Ok(out.joined_after(self, '.'));
            }
            let offender = if self.is_special() { self } else { other };
            return Err(UcumError::NonRatioOperation {
                unit: offender.cs_code.clone(),
                operation: "multiplication".to_owned(),
            });
        }
        let mut out = self.composed(other, '.');
        out.magnitude = checked(self.magnitude * other.magnitude, &out.cs_code)?;
        out.dimension = self.dimension + other.dimension;
        Ok(out)
    }

    pub fn divide(&self, other: &Unit) -> Result<Unit, UcumError> {
        if self.is_special() || other.is_special() {
            let offender = if self.is_special() { self } else { other };
            return Err(UcumError::NonRatioOperation {
                unit: offender.cs_code.clone(),
                operation: "division".to_owned(),
            });
        }
        let mut out = self.composed(other, '/');
        out.magnitude = checked(self.magnitude / other.magnitude, &out.cs_code)?;
        out.dimension = self.dimension - other.dimension;
        Ok(out)
    }

    pub fn invert(&self) -> Result<Unit, UcumError> {
        if self.is_special() {
            return Err(UcumError::NonRatioOperation {
                unit: self.cs_code.clone(),
                operation: "inversion".to_owned(),
            });
        }
        let mut out = self.clone();
        out.magnitude = checked(1.0 / self.magnitude, &self.cs_code)?;
        out.dimension = -self.dimension;
        out.name = format!("1/{}", self.name);
        out.cs_code = format!("1/{}", self.cs_code);
        out.ci_code = format!("1/{}", self.ci_code);
        out.clear_atom_fields();
        Ok(out)
    }

    pub fn power(&self, exponent: i32) -> Result<Unit, UcumError> {
        if self.is_special() {
            if exponent == 1 {
                return Ok(self.clone());
            }
            return Err(UcumError::NonRatioOperation {
                unit: self.cs_code.clone(),
                operation: "exponentiation".to_owned(),
            });
        }
        let mut out = self.clone();
        out.magnitude = checked(self.magnitude.powi(exponent), &self.cs_code)?;
        out.dimension = self.dimension.power(exponent);
        out.name = format!("{}{}", self.name, exponent);
        out.cs_code = format!("{}{}", self.cs_code, exponent);
        out.ci_code = format!("{}{}", self.ci_code, exponent);
        out.clear_atom_fields();
        Ok(out)
    }

    /// Appends an annotation to the displayed name and codes. The
    /// annotation has no semantic effect.
    pub(crate) fn annotate(&mut self, text: &str) {
        self.name = format!("{}{{{}}}", self.name, text);
        self.cs_code = format!("{}{{{}}}", self.cs_code, text);
        self.ci_code = format!("{}{{{}}}", self.ci_code, text);
    }

    /// Wraps the names in parentheses, mirroring a parenthesized source
    /// expression so that a following exponent reads correctly.
    pub(crate) fn parenthesize(&mut self) {
        self.name = format!("({})", self.name);
        self.cs_code = format!("({})", self.cs_code);
        self.ci_code = format!("({})", self.ci_code);
    }

    fn composed(&self, other: &Unit, op: char) -> Unit {
        let mut out = self.clone();
        out.join(other, op, false);
        out.special = None;
        out.cnv_pfx = 1.0;
        out.is_arbitrary = self.is_arbitrary || other.is_arbitrary;
        out.clear_atom_fields();
        out
    }

    fn join(&mut self, other: &Unit, op: char, keep_special: bool) {
        self.name = format!("{}{}{}", self.name, op, other.name);
        self.cs_code = format!("{}{}{}", self.cs_code, op, other.cs_code);
        self.ci_code = format!("{}{}{}", self.ci_code, op, other.ci_code);
        self.is_metric = false;
        if !keep_special {
            self.clear_atom_fields();
        }
    }

    fn joined_after(mut self, lhs: &Unit, op: char) -> Unit {
        self.name = format!("{}{}{}", lhs.name, op, self.name);
        self.cs_code = format!("{}{}{}", lhs.cs_code, op, self.cs_code);
        self.ci_code = format!("{}{}{}", lhs.ci_code, op, self.ci_code);
        self.is_metric = false;
        self
    }

    fn clear_atom_fields(&mut self) {
        self.print_symbol = None;
        self.property = None;
        self.class = None;
        self.is_metric = false;
    }
}

fn checked(magnitude: f64, context: &str) -> Result<f64, UcumError> {
    if magnitude.is_finite() && magnitude > 0.0 {
        Ok(magnitude)
    } else {
        Err(UcumError::Overflow {
            context: context.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        let mut u = Unit::unity();
        u.name = "meter".to_owned();
        u.cs_code = "m".to_owned();
        u.ci_code = "M".to_owned();
        u.dimension = Dimension::base_axis(1);
        u.is_metric = true;
        u
    }

    fn second() -> Unit {
        let mut u = Unit::unity();
        u.name = "second".to_owned();
        u.cs_code = "s".to_owned();
        u.ci_code = "S".to_owned();
        u.dimension = Dimension::base_axis(2);
        u.is_metric = true;
        u
    }

    fn celsius() -> Unit {
        let mut u = Unit::unity();
        u.name = "degree Celsius".to_owned();
        u.cs_code = "Cel".to_owned();
        u.ci_code = "CEL".to_owned();
        u.dimension = Dimension::base_axis(4);
        u.special = Some(SpecialFn::Celsius);
        u
    }

    #[test]
    fn multiply_sums_dimensions() {
        let speed = meter().divide(&second()).unwrap();
        assert_eq!(speed.cs_code, "m/s");
        assert_eq!(
            speed.dimension,
            Dimension::from_exponents([0, 1, -1, 0, 0, 0, 0])
        );
        let area = meter().multiply(&meter()).unwrap();
        assert_eq!(area.dimension, Dimension::base_axis(1).power(2));
        assert!(!area.is_metric);
    }

    #[test]
    fn power_applies_to_magnitude_and_name() {
        let mut km = meter();
        km.magnitude = 1000.0;
        let sq = km.power(2).unwrap();
        assert_eq!(sq.magnitude, 1e6);
        assert_eq!(sq.cs_code, "m2");
        let inv = meter().power(-1).unwrap();
        assert_eq!(inv.dimension, -Dimension::base_axis(1));
        assert_eq!(inv.cs_code, "m-1");
    }

    #[test]
    fn special_units_guard_composition() {
        assert!(matches!(
            celsius().multiply(&meter()),
            Err(UcumError::NonRatioOperation { .. })
        ));
        assert!(matches!(
            celsius().divide(&meter()),
            Err(UcumError::NonRatioOperation { .. })
        ));
        assert!(matches!(
            celsius().invert(),
            Err(UcumError::NonRatioOperation { .. })
        ));
        assert!(matches!(
            celsius().power(2),
            Err(UcumError::NonRatioOperation { .. })
        ));
        assert!(celsius().power(1).is_ok());
    }

    #[test]
    fn special_times_scalar_folds_into_cnv_pfx() {
        let two = Unit::factor(2.0, "2").unwrap();
        let scaled = celsius().multiply(&two).unwrap();
        assert_eq!(scaled.cnv_pfx, 2.0);
        assert_eq!(scaled.magnitude, 1.0);
        let scaled = two.multiply(&celsius()).unwrap();
        assert_eq!(scaled.cnv_pfx, 2.0);
        assert_eq!(scaled.cs_code, "2.Cel");
    }

    #[test]
    fn magnitude_overflow_is_reported() {
        let mut huge = meter();
        huge.magnitude = 1e308;
        assert!(matches!(
            huge.multiply(&huge),
            Err(UcumError::Overflow { .. })
        ));
    }
}
