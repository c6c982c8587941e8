// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use crate::algorithms::TermKind;
use crate::types::{Atom, Dimension, Prefix, DIMENSION_COUNT};

/// Which code table lookups run against. In the case-insensitive mode
/// input is folded to upper case before matching, which is the
/// canonical form of the `ci` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Sensitive,
    Insensitive,
}

/// The loaded catalog: every atom and prefix, with indexes by code,
/// name and synonym. Immutable once constructed; the whole struct is
/// safe to share between threads.
#[derive(Debug, Default)]
pub struct Registry {
    atoms: Vec<Atom>,
    prefixes: Vec<Prefix>,
    cs_codes: BTreeMap<String, usize>,
    ci_codes: BTreeMap<String, usize>,
    names: BTreeMap<String, usize>,
    synonyms: BTreeMap<String, usize>,
    cs_prefixes: BTreeMap<String, usize>,
    ci_prefixes: BTreeMap<String, usize>,
    /// Index of the base atom for each dimension axis, if the dataset
    /// defines one.
    base_atoms: [Option<usize>; DIMENSION_COUNT],
}

impl Registry {
    pub(crate) fn insert_atom(&mut self, atom: Atom) -> Result<(), String> {
        let index = self.atoms.len();
        if self.cs_codes.insert(atom.code.clone(), index).is_some() {
            return Err(atom.code);
        }
        if let Some(ref ci) = atom.ci_code {
            if self.ci_codes.insert(ci.to_uppercase(), index).is_some() {
                return Err(atom.code);
            }
        }
        self.names.insert(atom.name.clone(), index);
        for synonym in &atom.synonyms {
            self.synonyms.insert(synonym.clone(), index);
        }
        // The first ratio atom sitting exactly on an axis is that
        // axis's base atom.
        for axis in 0..DIMENSION_COUNT {
            if atom.dimension == Dimension::base_axis(axis)
                && atom.special.is_none()
                && self.base_atoms[axis].is_none()
            {
                self.base_atoms[axis] = Some(index);
            }
        }
        self.atoms.push(atom);
        Ok(())
    }

    pub(crate) fn insert_prefix(&mut self, prefix: Prefix) -> Result<(), String> {
        let index = self.prefixes.len();
        if self.cs_prefixes.insert(prefix.code.clone(), index).is_some() {
            return Err(prefix.code);
        }
        if self
            .ci_prefixes
            .insert(prefix.ci_code.to_uppercase(), index)
            .is_some()
        {
            return Err(prefix.code);
        }
        self.prefixes.push(prefix);
        Ok(())
    }

    pub fn atom_by_code(&self, code: &str, mode: CaseMode) -> Option<&Atom> {
        let index = match mode {
            CaseMode::Sensitive => self.cs_codes.get(code),
            CaseMode::Insensitive => self.ci_codes.get(&code.to_uppercase()),
        }?;
        Some(&self.atoms[*index])
    }

    pub fn atom_by_name(&self, name: &str) -> Option<&Atom> {
        self.names.get(name).map(|&i| &self.atoms[i])
    }

    pub fn atom_by_synonym(&self, term: &str) -> Option<&Atom> {
        self.synonyms.get(term).map(|&i| &self.atoms[i])
    }

    pub fn prefix_by_code(&self, code: &str, mode: CaseMode) -> Option<&Prefix> {
        let index = match mode {
            CaseMode::Sensitive => self.cs_prefixes.get(code),
            CaseMode::Insensitive => self.ci_prefixes.get(&code.to_uppercase()),
        }?;
        Some(&self.prefixes[*index])
    }

    /// Splits a token into the longest leading prefix whose remainder
    /// is a metric atom, e.g. `mm[Hg]` into milli + `m[Hg]`. Call only
    /// after an exact code lookup has failed.
    pub fn split_prefixed(&self, token: &str, mode: CaseMode) -> Option<(&Prefix, &Atom)> {
        let mut best: Option<(&Prefix, &Atom)> = None;
        let mut best_len = 0;
        for prefix in &self.prefixes {
            let code = match mode {
                CaseMode::Sensitive => &prefix.code,
                CaseMode::Insensitive => &prefix.ci_code,
            };
            let matches = match mode {
                CaseMode::Sensitive => token.starts_with(code.as_str()),
                CaseMode::Insensitive => token
                    .to_uppercase()
                    .starts_with(&code.to_uppercase()),
            };
            if !matches || token.len() <= code.len() {
                continue;
            }
            if let Some(atom) = self.atom_by_code(&token[code.len()..], mode) {
                if !atom.is_metric {
                    continue;
                }
                if code.len() > best_len {
                    best_len = code.len();
                    best = Some((prefix, atom));
                }
            }
        }
        best
    }

    /// Finds a prefix split whose remainder exists but is not metric.
    /// Used for diagnostics only.
    pub fn split_nonmetric(&self, token: &str, mode: CaseMode) -> Option<(&Prefix, &Atom)> {
        for prefix in &self.prefixes {
            let code = match mode {
                CaseMode::Sensitive => &prefix.code,
                CaseMode::Insensitive => &prefix.ci_code,
            };
            let matches = match mode {
                CaseMode::Sensitive => token.starts_with(code.as_str()),
                CaseMode::Insensitive => token
                    .to_uppercase()
                    .starts_with(&code.to_uppercase()),
            };
            if matches && token.len() > code.len() {
                if let Some(atom) = self.atom_by_code(&token[code.len()..], mode) {
                    if !atom.is_metric {
                        return Some((prefix, atom));
                    }
                }
            }
        }
        None
    }

    /// The coherent base atom for a dimension axis.
    pub fn base_unit_for_dim(&self, axis: usize) -> Option<&Atom> {
        self.base_atoms[axis].map(|i| &self.atoms[i])
    }

    /// All non-arbitrary atoms whose dimension equals `dim`.
    pub fn commensurable_atoms(&self, dim: Dimension) -> Vec<&Atom> {
        self.atoms
            .iter()
            .filter(|atom| atom.dimension == dim && !atom.is_arbitrary)
            .collect()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }

    /// Candidate terms for typo suggestions, tagged with where each
    /// came from so that a code match can outrank a name match.
    pub(crate) fn suggestion_terms(&self) -> impl Iterator<Item = (&str, TermKind)> {
        self.atoms.iter().flat_map(|atom| {
            std::iter::once((atom.code.as_str(), TermKind::Code))
                .chain(std::iter::once((atom.name.as_str(), TermKind::Name)))
                .chain(
                    atom.synonyms
                        .iter()
                        .map(|s| (s.as_str(), TermKind::Synonym)),
                )
        })
    }
}
