// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::{Deserialize, Serialize};

use super::{Dimension, SpecialFn};

/// A unit atom as defined by the catalog, e.g. `m`, `[in_i]` or `Cel`.
/// Atoms are created once at catalog load and never mutated.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Atom {
    /// Case-sensitive code, e.g. `Cel`.
    pub code: String,
    /// Case-insensitive code, e.g. `CEL`. Absent for atoms that only
    /// exist in the case-sensitive table.
    pub ci_code: Option<String>,
    pub name: String,
    /// The kind of quantity measured, e.g. "length".
    pub property: String,
    pub print_symbol: Option<String>,
    /// Classification from the standard, e.g. "si" or "dimless".
    pub class: String,
    /// Only metric atoms accept a prefix.
    pub is_metric: bool,
    /// Arbitrary units are not convertible to anything.
    pub is_arbitrary: bool,
    /// Scale relative to the coherent base units.
    pub magnitude: f64,
    pub dimension: Dimension,
    /// Present on special (non-ratio) units such as `Cel`.
    pub special: Option<SpecialFn>,
    /// Scale applied inside the special function's argument.
    pub cnv_pfx: f64,
    pub synonyms: Vec<String>,
}

impl Atom {
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }
}
