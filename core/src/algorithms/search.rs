// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use strsim::damerau_levenshtein;

/// A suggestion qualifies only when it is within this many edits of
/// the failed token, matching the validator's contract of offering
/// near-miss codes rather than fuzzy search results.
const MAX_EDITS: usize = 1;

/// Where a candidate term came from. A catalog code is what the caller
/// actually has to type, so codes outrank names and names outrank
/// synonyms when the edit distance ties.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) enum TermKind {
    Code,
    Name,
    Synonym,
}

/// Offers replacements for a token that failed to resolve. Case slips
/// count as zero edits, so `CEL` in case-sensitive mode still suggests
/// `Cel`. Results are ordered by distance, then term kind, and carry
/// no duplicates.
pub(crate) fn suggest<'a>(
    candidates: impl Iterator<Item = (&'a str, TermKind)>,
    token: &str,
    limit: usize,
) -> Vec<String> {
    let folded = token.to_lowercase();
    let mut near: Vec<(usize, TermKind, &str)> = vec![];
    for (term, kind) in candidates {
        let distance = damerau_levenshtein(&term.to_lowercase(), &folded);
        if distance <= MAX_EDITS {
            near.push((distance, kind, term));
        }
    }
    near.sort();

    let mut out: Vec<String> = vec![];
    for (_, _, term) in near {
        if !out.iter().any(|seen| seen == term) {
            out.push(term.to_owned());
        }
        if out.len() == limit {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_edit_matches() {
        let terms = [
            ("mol", TermKind::Code),
            ("m", TermKind::Code),
            ("Cel", TermKind::Code),
        ];
        assert_eq!(suggest(terms.iter().copied(), "mool", 3), vec!["mol"]);
    }

    #[test]
    fn case_slips_count_as_zero_edits() {
        let terms = [("Cel", TermKind::Code)];
        assert_eq!(suggest(terms.iter().copied(), "CEL", 3), vec!["Cel"]);
    }

    #[test]
    fn codes_outrank_names_and_synonyms() {
        let terms = [
            ("bars", TermKind::Synonym),
            ("barn", TermKind::Name),
            ("bar", TermKind::Code),
        ];
        assert_eq!(
            suggest(terms.iter().copied(), "bar", 3),
            vec!["bar", "barn", "bars"]
        );
    }

    #[test]
    fn distant_terms_are_dropped() {
        let terms = [("mol", TermKind::Code), ("Cel", TermKind::Code)];
        assert!(suggest(terms.iter().copied(), "zzzz", 3).is_empty());
    }

    #[test]
    fn duplicate_terms_collapse() {
        // "liter" is the name of both `l` and `L`.
        let terms = [("liter", TermKind::Name), ("liter", TermKind::Name)];
        assert_eq!(suggest(terms.iter().copied(), "litre", 3), vec!["liter"]);
    }

    #[test]
    fn limit_is_respected() {
        let terms = [
            ("ms", TermKind::Code),
            ("mg", TermKind::Code),
            ("mm", TermKind::Code),
            ("ml", TermKind::Code),
        ];
        assert_eq!(suggest(terms.iter().copied(), "mx", 2).len(), 2);
    }
}
