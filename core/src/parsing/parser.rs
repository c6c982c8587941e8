// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::iter::Peekable;

use super::tokenizer::{describe, Spanned, Token, TokenIterator};
use crate::algorithms::suggest;
use crate::loader::{CaseMode, Registry};
use crate::output::{Diagnostic, UcumError};
use crate::types::Unit;

/// How many typo suggestions to attach to an unknown-atom error.
const MAX_SUGGESTIONS: usize = 3;

/// The outcome of a tolerant parse: the unit if no hard error occurred,
/// plus every diagnostic in source-offset order.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub unit: Option<Unit>,
    pub diagnostics: Vec<Diagnostic>,
    pub suggestions: Vec<String>,
}

/// Parses a UCUM expression against a catalog. Never panics; hard
/// errors surface as diagnostics and leave `unit` empty. Parsing keeps
/// going after lookup errors so that several problems can be reported
/// in one pass.
pub fn parse(registry: &Registry, input: &str, mode: CaseMode) -> Parsed {
    if input.is_empty() {
        return Parsed {
            unit: None,
            diagnostics: vec![Diagnostic::Error(UcumError::EmptyInput)],
            suggestions: vec![],
        };
    }
    let mut parser = Parser {
        registry,
        mode,
        iter: TokenIterator::new(input).peekable(),
        diagnostics: vec![],
        suggestions: vec![],
        failed: false,
    };
    let unit = parser.parse_expression();
    // Anything left over after a complete expression is a syntax error.
    if !parser.failed {
        if let Some(spanned) = parser.iter.peek().cloned() {
            if spanned.token != Token::Eof {
                parser.fail(UcumError::InvalidSyntax {
                    message: format!("unexpected {}", describe(&spanned.token)),
                    offset: Some(spanned.offset),
                });
            }
        }
    }
    let mut diagnostics = parser.diagnostics;
    diagnostics.sort_by_key(|d| d.offset().unwrap_or(usize::MAX));
    Parsed {
        unit: if parser.failed { None } else { unit },
        diagnostics,
        suggestions: parser.suggestions,
    }
}

struct Parser<'a> {
    registry: &'a Registry,
    mode: CaseMode,
    iter: Peekable<TokenIterator<'a>>,
    diagnostics: Vec<Diagnostic>,
    suggestions: Vec<String>,
    failed: bool,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Spanned {
        self.iter.peek().cloned().unwrap_or(Spanned {
            token: Token::Eof,
            offset: 0,
        })
    }

    fn bump(&mut self) -> Spanned {
        self.iter.next().unwrap_or(Spanned {
            token: Token::Eof,
            offset: 0,
        })
    }

    fn fail(&mut self, err: UcumError) {
        self.failed = true;
        self.diagnostics.push(Diagnostic::Error(err));
    }

    fn correct(&mut self, offset: usize, original: &str, rewrite: &str, note: &str) {
        self.diagnostics.push(Diagnostic::Correction {
            offset,
            original: original.to_owned(),
            rewrite: rewrite.to_owned(),
            note: note.to_owned(),
        });
    }

    /// expr := '/' operand (op operand)* | operand (op operand)*
    fn parse_expression(&mut self) -> Option<Unit> {
        let mut acc = if self.peek().token == Token::Slash {
            self.bump();
            let term = self.parse_operand()?;
            self.apply(Unit::unity().divide(&term), Unit::unity())
        } else {
            self.parse_operand()?
        };
        loop {
            let spanned = self.peek();
            match spanned.token {
                Token::Dot => {
                    self.bump();
                    let rhs = self.parse_operand()?;
                    acc = self.apply(acc.multiply(&rhs), acc);
                }
                Token::Slash => {
                    self.bump();
                    let rhs = self.parse_operand()?;
                    acc = self.apply(acc.divide(&rhs), acc);
                }
                Token::RPar | Token::Eof => break,
                Token::Error(err) => {
                    self.bump();
                    self.fail(err);
                    return None;
                }
                other => {
                    self.fail(UcumError::InvalidSyntax {
                        message: format!("expected '.' or '/', found {}", describe(&other)),
                        offset: Some(spanned.offset),
                    });
                    return None;
                }
            }
        }
        Some(acc)
    }

    /// One operand of a `.` or `/`: a term, plus the tolerant rewrite
    /// for `2mg`-style input. A bare numeric factor butted against a
    /// unit is missing its multiplication dot, wherever in the
    /// expression it appears (`m/2s` is read as `m/2.s`).
    fn parse_operand(&mut self) -> Option<Unit> {
        let mut unit = self.parse_term()?;
        while is_factor(&unit) {
            let spanned = self.peek();
            let Token::Atom(ref text) = spanned.token else {
                break;
            };
            self.correct(
                spanned.offset,
                &format!("{}{}", unit.cs_code, text),
                &format!("{}.{}", unit.cs_code, text),
                "inserted '.' between factor and unit",
            );
            let rhs = self.parse_term()?;
            unit = self.apply(unit.multiply(&rhs), unit);
        }
        Some(unit)
    }

    /// term := component exponent? annotation?
    fn parse_term(&mut self) -> Option<Unit> {
        let mut unit = self.parse_component()?;
        if let Token::Exponent(n) = self.peek().token {
            self.bump();
            unit = self.apply(unit.power(n), unit);
        }
        if let Token::Annotation(text) = self.peek().token {
            self.bump();
            unit.annotate(&text);
        }
        Some(unit)
    }

    /// component := '(' expr ')' | number | atom | annotation
    fn parse_component(&mut self) -> Option<Unit> {
        let spanned = self.bump();
        match spanned.token {
            Token::LPar => {
                let mut inner = self.parse_expression()?;
                let close = self.bump();
                if close.token != Token::RPar {
                    self.fail(UcumError::InvalidSyntax {
                        message: format!("expected ')', found {}", describe(&close.token)),
                        offset: Some(close.offset),
                    });
                    return None;
                }
                inner.parenthesize();
                Some(inner)
            }
            Token::Number(text) => {
                let value: f64 = text.parse().unwrap_or(f64::INFINITY);
                match Unit::factor(value, &text) {
                    Ok(unit) => Some(unit),
                    Err(err) => {
                        self.fail(err);
                        Some(Unit::unity())
                    }
                }
            }
            Token::Atom(text) => Some(self.resolve_atom(&text, spanned.offset)),
            Token::Annotation(text) => {
                // `{creatine}mol`: the annotation belongs after the unit.
                if let Token::Atom(atom_text) = self.peek().token {
                    let next = self.bump();
                    self.correct(
                        spanned.offset,
                        &format!("{{{}}}{}", text, atom_text),
                        &format!("{}{{{}}}", atom_text, text),
                        "moved annotation after the unit",
                    );
                    let mut unit = self.resolve_atom(&atom_text, next.offset);
                    if let Token::Exponent(n) = self.peek().token {
                        self.bump();
                        unit = self.apply(unit.power(n), unit);
                    }
                    unit.annotate(&text);
                    return Some(unit);
                }
                // `{degF}`: braces used where brackets were intended.
                let bracketed = format!("[{}]", text);
                if let Some(atom) = self.registry.atom_by_code(&bracketed, self.mode) {
                    self.correct(
                        spanned.offset,
                        &format!("{{{}}}", text),
                        &bracketed,
                        "braces read as brackets",
                    );
                    return Some(Unit::from_atom(atom));
                }
                // A bare annotation means the dimensionless unit 1.
                let mut unit = Unit::unity();
                unit.annotate(&text);
                Some(unit)
            }
            Token::Error(err) => {
                self.fail(err);
                None
            }
            other => {
                self.fail(UcumError::InvalidSyntax {
                    message: format!("expected a unit, found {}", describe(&other)),
                    offset: Some(spanned.offset),
                });
                None
            }
        }
    }

    /// Resolves an atom token: exact code, then prefix split, then the
    /// tolerant rewrites, and finally an error with suggestions.
    fn resolve_atom(&mut self, text: &str, offset: usize) -> Unit {
        if let Some(atom) = self.registry.atom_by_code(text, self.mode) {
            return Unit::from_atom(atom);
        }
        if let Some((prefix, atom)) = self.registry.split_prefixed(text, self.mode) {
            match Unit::prefixed_atom(prefix, atom) {
                Ok(unit) => return unit,
                Err(UcumError::UnknownPrefix { token, message, .. }) => {
                    self.fail(UcumError::UnknownPrefix {
                        token,
                        offset,
                        message,
                    });
                    return Unit::unity();
                }
                Err(err) => {
                    self.fail(err);
                    return Unit::unity();
                }
            }
        }
        // `in_i`: brackets left off a bracketed atom.
        if !text.starts_with('[') {
            let bracketed = format!("[{}]", text);
            if let Some(atom) = self.registry.atom_by_code(&bracketed, self.mode) {
                self.correct(offset, text, &bracketed, "added missing brackets");
                return Unit::from_atom(atom);
            }
        }
        // `day`: the full name was used instead of the code.
        if let Some(atom) = self.registry.atom_by_name(text) {
            self.correct(offset, text, &atom.code, "unit name used instead of its code");
            return Unit::from_atom(atom);
        }
        if let Some(atom) = self.registry.atom_by_synonym(text) {
            self.correct(offset, text, &atom.code, "unit synonym used instead of its code");
            return Unit::from_atom(atom);
        }
        // A prefix split whose remainder refuses the prefix deserves a
        // more precise message than "unknown unit".
        if let Some((prefix, atom)) = self.registry.split_nonmetric(text, self.mode) {
            self.fail(UcumError::UnknownPrefix {
                token: text.to_owned(),
                offset,
                message: format!(
                    "'{}' is not metric and cannot take the prefix '{}'",
                    atom.code, prefix.code
                ),
            });
            return Unit::unity();
        }
        let suggestions = suggest(self.registry.suggestion_terms(), text, MAX_SUGGESTIONS);
        self.suggestions.extend(suggestions.iter().cloned());
        self.fail(UcumError::UnknownAtom {
            token: text.to_owned(),
            offset,
            suggestions,
        });
        Unit::unity()
    }

    /// Records an arithmetic failure and keeps the left operand so the
    /// rest of the expression can still be checked.
    fn apply(&mut self, result: Result<Unit, UcumError>, fallback: Unit) -> Unit {
        match result {
            Ok(unit) => unit,
            Err(err) => {
                self.fail(err);
                fallback
            }
        }
    }
}

/// True for units that came from a bare numeric factor.
fn is_factor(unit: &Unit) -> bool {
    unit.special.is_none()
        && unit.dimension.is_zero()
        && unit.cs_code.chars().all(|c| c.is_ascii_digit())
}
