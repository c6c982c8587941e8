// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::Deserialize;

use super::Registry;
use crate::types::{Atom, Dimension, Prefix, SpecialFn, DIMENSION_COUNT, MAX_PREFIX_EXPONENT};

/// A problem in the catalog dataset. These are load-time errors; a
/// registry that loaded successfully can never produce them again.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("the catalog is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("unit code '{code}' is defined twice")]
    DuplicateUnit { code: String },

    #[error("prefix code '{code}' is defined twice")]
    DuplicatePrefix { code: String },

    #[error("unit '{code}' has a dimension vector of length {len}, expected {}", DIMENSION_COUNT)]
    BadDimension { code: String, len: usize },

    #[error("unit '{code}' names an unknown conversion function '{ident}'")]
    UnknownFunction { code: String, ident: String },

    #[error("unit '{code}' must have a finite, positive magnitude")]
    BadMagnitude { code: String },

    #[error("unit '{code}' is marked special but its conversion data is inconsistent")]
    SpecialMismatch { code: String },

    #[error("prefix '{code}' has exponent {exp}, outside ±{}", MAX_PREFIX_EXPONENT)]
    PrefixExponent { code: String, exp: i32 },

    #[error("prefix '{code}' has unsupported base {base}")]
    PrefixBase { code: String, base: u8 },

    #[error("prefix '{code}' value {value} does not match its exponent")]
    PrefixValue { code: String, value: f64 },
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CatalogDefs {
    prefixes: Vec<PrefixDef>,
    units: Vec<UnitDef>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PrefixDef {
    code: String,
    code_syn: String,
    name: String,
    value: f64,
    exp: i32,
    base: u8,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UnitDef {
    code: String,
    #[serde(default)]
    code_syn: Option<String>,
    name: String,
    property: String,
    #[serde(default)]
    print_symbol: Option<String>,
    class: String,
    #[serde(default)]
    is_metric: bool,
    #[serde(default)]
    is_special: bool,
    #[serde(default)]
    is_arbitrary: bool,
    magnitude: f64,
    dim: Vec<i32>,
    #[serde(default)]
    cnv: Option<String>,
    #[serde(default = "one")]
    cnv_pfx: f64,
    #[serde(default)]
    synonyms: Vec<String>,
}

fn one() -> f64 {
    1.0
}

/// Builds a registry from the JSON dataset described in the catalog
/// schema. Every record is validated; the first problem aborts the
/// load.
pub fn load_defs(json: &str) -> Result<Registry, LoadError> {
    let defs: CatalogDefs = serde_json::from_str(json)?;
    let mut registry = Registry::default();

    for def in defs.prefixes {
        if def.base != 10 && def.base != 2 {
            return Err(LoadError::PrefixBase {
                code: def.code,
                base: def.base,
            });
        }
        if def.base == 10 && def.exp.abs() > MAX_PREFIX_EXPONENT {
            return Err(LoadError::PrefixExponent {
                code: def.code,
                exp: def.exp,
            });
        }
        if !def.value.is_finite() || def.value <= 0.0 {
            return Err(LoadError::PrefixValue {
                code: def.code,
                value: def.value,
            });
        }
        let prefix = Prefix {
            code: def.code,
            ci_code: def.code_syn,
            name: def.name,
            factor: def.value,
            exponent: def.exp,
            base: def.base,
        };
        registry
            .insert_prefix(prefix)
            .map_err(|code| LoadError::DuplicatePrefix { code })?;
    }

    for def in defs.units {
        if def.dim.len() != DIMENSION_COUNT {
            return Err(LoadError::BadDimension {
                code: def.code,
                len: def.dim.len(),
            });
        }
        if !def.magnitude.is_finite() || def.magnitude <= 0.0 {
            return Err(LoadError::BadMagnitude { code: def.code });
        }
        let special = match def.cnv {
            Some(ref ident) => match SpecialFn::from_ident(ident) {
                Some(f) => Some(f),
                None => {
                    return Err(LoadError::UnknownFunction {
                        code: def.code,
                        ident: ident.clone(),
                    })
                }
            },
            None => None,
        };
        if special.is_some() != def.is_special {
            return Err(LoadError::SpecialMismatch { code: def.code });
        }
        let mut exponents = [0i32; DIMENSION_COUNT];
        exponents.copy_from_slice(&def.dim);
        let atom = Atom {
            code: def.code,
            ci_code: def.code_syn,
            name: def.name,
            property: def.property,
            print_symbol: def.print_symbol,
            class: def.class,
            is_metric: def.is_metric,
            is_arbitrary: def.is_arbitrary,
            magnitude: def.magnitude,
            dimension: Dimension::from_exponents(exponents),
            special,
            cnv_pfx: def.cnv_pfx,
            synonyms: def.synonyms,
        };
        registry
            .insert_atom(atom)
            .map_err(|code| LoadError::DuplicateUnit { code })?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_codes_are_rejected() {
        let json = r#"{
            "prefixes": [],
            "units": [
                {"code": "m", "name": "meter", "property": "length",
                 "class": "si", "isMetric": true, "magnitude": 1,
                 "dim": [0,1,0,0,0,0,0]},
                {"code": "m", "name": "meter again", "property": "length",
                 "class": "si", "isMetric": true, "magnitude": 1,
                 "dim": [0,1,0,0,0,0,0]}
            ]
        }"#;
        assert!(matches!(
            load_defs(json),
            Err(LoadError::DuplicateUnit { .. })
        ));
    }

    #[test]
    fn special_flag_must_match_function() {
        let json = r#"{
            "prefixes": [],
            "units": [
                {"code": "Cel", "name": "degree Celsius",
                 "property": "temperature", "class": "si",
                 "isMetric": true, "isSpecial": false, "magnitude": 1,
                 "dim": [0,0,0,0,1,0,0], "cnv": "Cel"}
            ]
        }"#;
        assert!(matches!(
            load_defs(json),
            Err(LoadError::SpecialMismatch { .. })
        ));
    }

    #[test]
    fn prefix_exponent_bound() {
        let json = r#"{
            "prefixes": [
                {"code": "X", "codeSyn": "X", "name": "exotic",
                 "value": 1e30, "exp": 30, "base": 10}
            ],
            "units": []
        }"#;
        assert!(matches!(
            load_defs(json),
            Err(LoadError::PrefixExponent { .. })
        ));
    }
}
