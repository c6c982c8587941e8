// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::{Deserialize, Serialize};

/// Largest base-10 exponent a prefix may carry.
pub const MAX_PREFIX_EXPONENT: i32 = 24;

/// A multiplicative prefix such as `k` (kilo) or `Ki` (kibi). Only
/// metric atoms accept one.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Prefix {
    /// Case-sensitive code, e.g. `k`.
    pub code: String,
    /// Case-insensitive code, e.g. `K`.
    pub ci_code: String,
    pub name: String,
    /// Multiplication factor, e.g. `1e3` for kilo or `1024` for kibi.
    pub factor: f64,
    /// The exponent the factor was defined with.
    pub exponent: i32,
    /// 10 for decimal prefixes, 2 for binary ones.
    pub base: u8,
}

impl Prefix {
    pub fn is_binary(&self) -> bool {
        self.base == 2
    }
}
