// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ucum_core` parses, validates and converts units written in the
//! Unified Code for Units of Measure (UCUM): expressions such as
//! `kg.m/s2`, `mm[Hg]`, `10*-6.mol/L` or `mCel`.
//!
//! The catalog of unit atoms and prefixes is loaded once into a
//! [`Context`]; everything after that is a pure function of its
//! inputs, so a context can be shared freely between threads.
//!
//! ## Example
//!
//! ```rust
//! use ucum_core::CaseMode;
//!
//! // Create a context. This loads the bundled catalog, so do it once
//! // at startup and keep it around.
//! let ctx = ucum_core::simple_context().unwrap();
//!
//! let result = ctx.validate("kg.m/s2", CaseMode::Sensitive);
//! assert!(result.valid);
//!
//! let body_temp = ctx
//!     .convert("Cel", 37.0, "[degF]", CaseMode::Sensitive)
//!     .unwrap();
//! assert!((body_temp.value - 98.6).abs() < 1e-9);
//! ```
//!
//! Validation is tolerant: common slips such as `2mg` (missing dot) or
//! `{creatine}mol` (annotation on the wrong side) are corrected and
//! reported as warnings, while hard errors come back with the
//! offending token, its offset and, for unknown codes, typo
//! suggestions.

pub mod loader;
pub mod output;
pub mod parsing;
pub mod runtime;
pub mod types;

pub(crate) mod algorithms;

pub use crate::loader::{CaseMode, Context, LoadError};
pub use crate::output::{
    ConversionResult, Diagnostic, Severity, UcumError, ValidationResult,
};
pub use crate::types::{Atom, Dimension, Prefix, SpecialFn, Unit};

/// The default catalog dataset, a subset of the UCUM table large
/// enough for everyday medical and engineering codes.
///
/// This will be Some if the `bundle-files` feature is enabled,
/// otherwise it will be None.
#[cfg(feature = "bundle-files")]
pub static DEFAULT_FILE: Option<&'static str> = Some(include_str!("../ucum.json"));
#[cfg(not(feature = "bundle-files"))]
pub static DEFAULT_FILE: Option<&'static str> = None;

/// Tries to create a context over the bundled catalog; fails if the
/// `bundle-files` feature isn't enabled. Mainly intended for unit
/// testing and small tools.
pub fn simple_context() -> Result<Context, String> {
    let defs = DEFAULT_FILE
        .ok_or_else(|| "bundle-files feature not enabled, cannot create simple context.".to_owned())?;
    Context::new(defs).map_err(|err| err.to_string())
}

/// Returns `env!("CARGO_PKG_VERSION")`, a string in `x.y.z` format.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
