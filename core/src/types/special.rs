// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::{Deserialize, Serialize};

use crate::output::UcumError;

/// The conversion function of a special (non-ratio) unit. Each variant
/// is a pure, invertible pair over `f64`: `from_scale` maps a value on
/// the unit's own scale to the proportional scale, `to_scale` is its
/// inverse.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpecialFn {
    Celsius,
    Fahrenheit,
    Reaumur,
    /// Neper: natural-log ratio.
    Ln,
    /// Bel of a power quantity: log10 ratio.
    Lg,
    /// Bel of a field quantity: 2·log10 ratio.
    TwoLg,
    /// Bit expressed as logarithmus dualis.
    Ld,
    Tan,
    /// Prism diopter: 100·tan.
    HundredTan,
    Ph,
}

impl SpecialFn {
    /// Resolves a dataset function identifier.
    pub fn from_ident(ident: &str) -> Option<SpecialFn> {
        match ident {
            "Cel" => Some(SpecialFn::Celsius),
            "degF" => Some(SpecialFn::Fahrenheit),
            "degRe" => Some(SpecialFn::Reaumur),
            "ln" => Some(SpecialFn::Ln),
            "lg" => Some(SpecialFn::Lg),
            "2lg" => Some(SpecialFn::TwoLg),
            "ld" => Some(SpecialFn::Ld),
            "tan" => Some(SpecialFn::Tan),
            "100tan" => Some(SpecialFn::HundredTan),
            "pH" => Some(SpecialFn::Ph),
            _ => None,
        }
    }

    pub fn ident(&self) -> &'static str {
        match self {
            SpecialFn::Celsius => "Cel",
            SpecialFn::Fahrenheit => "degF",
            SpecialFn::Reaumur => "degRe",
            SpecialFn::Ln => "ln",
            SpecialFn::Lg => "lg",
            SpecialFn::TwoLg => "2lg",
            SpecialFn::Ld => "ld",
            SpecialFn::Tan => "tan",
            SpecialFn::HundredTan => "100tan",
            SpecialFn::Ph => "pH",
        }
    }

    fn is_temperature(&self) -> bool {
        matches!(
            self,
            SpecialFn::Celsius | SpecialFn::Fahrenheit | SpecialFn::Reaumur
        )
    }

    /// Maps a value on this unit's scale to the proportional scale.
    /// Fails when the argument leaves the function's domain, including
    /// temperatures below absolute zero.
    pub fn from_scale(&self, value: f64) -> Result<f64, UcumError> {
        let out = match self {
            SpecialFn::Celsius => value + 273.15,
            // Operand is in Rankine units (5/9 K).
            SpecialFn::Fahrenheit => value + 459.67,
            SpecialFn::Reaumur => value + 218.52,
            SpecialFn::Ln => value.exp(),
            SpecialFn::Lg => 10f64.powf(value),
            SpecialFn::TwoLg => 10f64.powf(value / 2.0),
            SpecialFn::Ld => 2f64.powf(value),
            SpecialFn::Tan => value.atan(),
            SpecialFn::HundredTan => (value / 100.0).atan(),
            SpecialFn::Ph => 10f64.powf(-value),
        };
        if self.is_temperature() && out < 0.0 {
            return Err(UcumError::DomainError {
                function: self.ident().to_owned(),
                argument: value,
            });
        }
        self.check(out)
    }

    /// Maps a value on the proportional scale to this unit's scale.
    pub fn to_scale(&self, value: f64) -> Result<f64, UcumError> {
        if self.is_temperature() && value < 0.0 {
            return Err(UcumError::DomainError {
                function: self.ident().to_owned(),
                argument: value,
            });
        }
        let out = match self {
            SpecialFn::Celsius => value - 273.15,
            SpecialFn::Fahrenheit => value - 459.67,
            SpecialFn::Reaumur => value - 218.52,
            SpecialFn::Ln => self.log_arg(value)?.ln(),
            SpecialFn::Lg => self.log_arg(value)?.log10(),
            SpecialFn::TwoLg => 2.0 * self.log_arg(value)?.log10(),
            SpecialFn::Ld => self.log_arg(value)?.log2(),
            SpecialFn::Tan => value.tan(),
            SpecialFn::HundredTan => value.tan() * 100.0,
            SpecialFn::Ph => -self.log_arg(value)?.log10(),
        };
        self.check(out)
    }

    fn log_arg(&self, value: f64) -> Result<f64, UcumError> {
        if value <= 0.0 {
            Err(UcumError::DomainError {
                function: self.ident().to_owned(),
                argument: value,
            })
        } else {
            Ok(value)
        }
    }

    fn check(&self, out: f64) -> Result<f64, UcumError> {
        if out.is_finite() {
            Ok(out)
        } else {
            Err(UcumError::DomainError {
                function: self.ident().to_owned(),
                argument: out,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(f: SpecialFn, value: f64) {
        let there = f.from_scale(value).unwrap();
        let back = f.to_scale(there).unwrap();
        assert!((back - value).abs() < 1e-9, "{:?}: {} != {}", f, back, value);
    }

    #[test]
    fn inverse_pairs() {
        roundtrip(SpecialFn::Celsius, 37.0);
        roundtrip(SpecialFn::Fahrenheit, 98.6);
        roundtrip(SpecialFn::Reaumur, 80.0);
        roundtrip(SpecialFn::Ln, 1.5);
        roundtrip(SpecialFn::Lg, 3.0);
        roundtrip(SpecialFn::TwoLg, 2.0);
        roundtrip(SpecialFn::Ld, 8.0);
        roundtrip(SpecialFn::Ph, 7.4);
        roundtrip(SpecialFn::HundredTan, 20.0);
    }

    #[test]
    fn log_rejects_nonpositive() {
        assert!(matches!(
            SpecialFn::Lg.to_scale(0.0),
            Err(UcumError::DomainError { .. })
        ));
        assert!(matches!(
            SpecialFn::Ph.to_scale(-1.0),
            Err(UcumError::DomainError { .. })
        ));
    }
}
