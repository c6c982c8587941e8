// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::Serialize;
use std::fmt;

use crate::types::Unit;

/// An error produced while parsing, composing or converting units.
/// Errors are returned as values; the variant name is the canonical
/// error code.
#[derive(thiserror::Error, Serialize, Clone, PartialEq, Debug)]
#[serde(tag = "code")]
pub enum UcumError {
    #[error("invalid syntax at offset {offset:?}: {message}")]
    InvalidSyntax {
        message: String,
        offset: Option<usize>,
    },

    #[error("'{token}' at offset {offset} is not a known unit")]
    UnknownAtom {
        token: String,
        offset: usize,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        suggestions: Vec<String>,
    },

    #[error("'{token}' at offset {offset}: {message}")]
    UnknownPrefix {
        token: String,
        offset: usize,
        message: String,
    },

    #[error("cannot convert between '{from}' and '{to}': the units are incommensurable")]
    IncommensurableUnits { from: String, to: String },

    #[error("'{unit}' is a non-ratio unit and does not support {operation}")]
    NonRatioOperation { unit: String, operation: String },

    #[error("argument {argument} is outside the domain of the '{function}' function")]
    DomainError { function: String, argument: f64 },

    #[error("magnitude overflow or underflow while computing '{context}'")]
    Overflow { context: String },

    #[error("the expression is empty")]
    EmptyInput,

    #[error("whitespace is not allowed inside a unit expression (offset {offset})")]
    DisallowedWhitespace { offset: usize },
}

impl UcumError {
    /// The canonical error code string.
    pub fn code(&self) -> &'static str {
        match self {
            UcumError::InvalidSyntax { .. } => "InvalidSyntax",
            UcumError::UnknownAtom { .. } => "UnknownAtom",
            UcumError::UnknownPrefix { .. } => "UnknownPrefix",
            UcumError::IncommensurableUnits { .. } => "IncommensurableUnits",
            UcumError::NonRatioOperation { .. } => "NonRatioOperation",
            UcumError::DomainError { .. } => "DomainError",
            UcumError::Overflow { .. } => "Overflow",
            UcumError::EmptyInput => "EmptyInput",
            UcumError::DisallowedWhitespace { .. } => "DisallowedWhitespace",
        }
    }

    /// Source offset of the offending token, when one applies.
    pub fn offset(&self) -> Option<usize> {
        match self {
            UcumError::InvalidSyntax { offset, .. } => *offset,
            UcumError::UnknownAtom { offset, .. } => Some(*offset),
            UcumError::UnknownPrefix { offset, .. } => Some(*offset),
            UcumError::DisallowedWhitespace { offset } => Some(*offset),
            _ => None,
        }
    }
}

/// A single entry in a validation message list: either a fatal error or
/// a corrective rewrite that was applied while parsing.
#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(tag = "severity", rename_all = "camelCase")]
pub enum Diagnostic {
    Error(UcumError),
    #[serde(rename_all = "camelCase")]
    Correction {
        offset: usize,
        original: String,
        rewrite: String,
        note: String,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Error(_) => Severity::Error,
            Diagnostic::Correction { .. } => Severity::Warning,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Diagnostic::Error(err) => err.offset(),
            Diagnostic::Correction { offset, .. } => Some(*offset),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Error(err) => write!(fmt, "{}: {}", err.code(), err),
            Diagnostic::Correction {
                offset,
                original,
                rewrite,
                note,
            } => write!(
                fmt,
                "{} at offset {}: '{}' was read as '{}'",
                note, offset, original, rewrite
            ),
        }
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

/// The outcome of validating a unit expression. `valid` is true iff no
/// hard error was found; corrective rewrites alone leave the expression
/// valid. Messages are ordered by source offset.
#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    pub messages: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// The message list rendered to plain strings.
    pub fn message_strings(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.to_string()).collect()
    }
}

/// The outcome of a successful conversion.
#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub value: f64,
    pub from_unit: Unit,
    pub to_unit: Unit,
}
