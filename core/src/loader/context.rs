// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{load_defs, CaseMode, LoadError, Registry};
use crate::algorithms::suggest;
use crate::output::{ConversionResult, Diagnostic, UcumError, ValidationResult};
use crate::parsing;
use crate::runtime;
use crate::types::{Unit, AXIS_NAMES, DIMENSION_COUNT};

/// The entry point of the library: owns the loaded catalog and exposes
/// validation and conversion over it. Construction is the only
/// expensive step; afterwards the context is immutable and can be
/// shared freely between threads.
#[derive(Debug)]
pub struct Context {
    registry: Registry,
}

impl Context {
    /// Builds a context from a catalog dataset in the JSON schema.
    pub fn new(defs: &str) -> Result<Context, LoadError> {
        Ok(Context {
            registry: load_defs(defs)?,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parses an expression in tolerant mode. Corrective rewrites are
    /// reported as warnings and leave the result valid; any hard error
    /// clears the `unit` field.
    pub fn validate(&self, expression: &str, mode: CaseMode) -> ValidationResult {
        let parsed = parsing::parse(&self.registry, expression.trim(), mode);
        ValidationResult {
            valid: parsed.unit.is_some(),
            unit: parsed.unit,
            messages: parsed.diagnostics,
            suggestions: parsed.suggestions,
        }
    }

    /// Converts a measured quantity between two unit expressions.
    pub fn convert(
        &self,
        from: &str,
        magnitude: f64,
        to: &str,
        mode: CaseMode,
    ) -> Result<ConversionResult, UcumError> {
        let from_unit = self.parse_strict(from, mode)?;
        let to_unit = self.parse_strict(to, mode)?;
        let value = runtime::convert_value(magnitude, &from_unit, &to_unit)?;
        Ok(ConversionResult {
            value,
            from_unit,
            to_unit,
        })
    }

    /// The unit an expression denotes, if it is valid.
    pub fn get_specified_unit(&self, expression: &str, mode: CaseMode) -> Option<Unit> {
        self.validate(expression, mode).unit
    }

    /// Codes of every catalog atom commensurable with the expression,
    /// i.e. sharing its dimension. Arbitrary units are never listed.
    pub fn commensurables(&self, expression: &str, mode: CaseMode) -> Result<Vec<String>, UcumError> {
        let unit = self.parse_strict(expression, mode)?;
        if unit.is_arbitrary {
            return Ok(vec![]);
        }
        Ok(self
            .registry
            .commensurable_atoms(unit.dimension)
            .into_iter()
            .map(|atom| atom.code.clone())
            .collect())
    }

    /// Catalog terms that look like a mistyped token.
    pub fn typo_suggestions(&self, term: &str, num_results: usize) -> Vec<String> {
        suggest(self.registry.suggestion_terms(), term, num_results)
    }

    /// Renders a unit's dimension as an expression over the base
    /// atoms, e.g. `g.m2.s-2` for energy. The exponent is left off
    /// when it is 1.
    pub fn base_unit_expression(&self, unit: &Unit) -> String {
        let mut parts = vec![];
        for axis in 0..DIMENSION_COUNT {
            let e = unit.dimension.exponent(axis);
            if e == 0 {
                continue;
            }
            let code = self
                .registry
                .base_unit_for_dim(axis)
                .map(|atom| atom.code.as_str())
                .unwrap_or(AXIS_NAMES[axis]);
            if e == 1 {
                parts.push(code.to_owned());
            } else {
                parts.push(format!("{}{}", code, e));
            }
        }
        if parts.is_empty() {
            "1".to_owned()
        } else {
            parts.join(".")
        }
    }

    fn parse_strict(&self, expression: &str, mode: CaseMode) -> Result<Unit, UcumError> {
        let parsed = parsing::parse(&self.registry, expression.trim(), mode);
        match parsed.unit {
            Some(unit) => Ok(unit),
            None => {
                let err = parsed.diagnostics.into_iter().find_map(|d| match d {
                    Diagnostic::Error(err) => Some(err),
                    Diagnostic::Correction { .. } => None,
                });
                Err(err.unwrap_or(UcumError::InvalidSyntax {
                    message: "expression could not be parsed".to_owned(),
                    offset: None,
                }))
            }
        }
    }
}
