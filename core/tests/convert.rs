// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ucum_core::{CaseMode, Context, UcumError};

thread_local! {
    static CONTEXT: Context = ucum_core::simple_context().unwrap();
}

fn convert(from: &str, magnitude: f64, to: &str) -> Result<f64, UcumError> {
    CONTEXT.with(|ctx| {
        ctx.convert(from, magnitude, to, CaseMode::Sensitive)
            .map(|r| r.value)
    })
}

fn assert_close(actual: f64, expected: f64) {
    let err = if expected == 0.0 {
        actual.abs()
    } else {
        (actual / expected - 1.0).abs()
    };
    assert!(err < 1e-12, "{} != {}", actual, expected);
}

#[test]
fn celsius_to_fahrenheit() {
    let f = convert("Cel", 37.0, "[degF]").unwrap();
    assert!((f - 98.6).abs() < 1e-9);
    let c = convert("[degF]", 98.6, "Cel").unwrap();
    assert!((c - 37.0).abs() < 1e-9);
}

#[test]
fn kelvin_to_fahrenheit() {
    let f = convert("K", 310.15, "[degF]").unwrap();
    assert!((f - 98.6).abs() < 1e-9);
}

#[test]
fn reaumur_roundtrip() {
    let k = convert("[degRe]", 80.0, "K").unwrap();
    assert_close(k, 373.15);
}

#[test]
fn moles_and_grams_are_incommensurable() {
    assert!(matches!(
        convert("mmol/L", 5.0, "g/L"),
        Err(UcumError::IncommensurableUnits { .. })
    ));
}

#[test]
fn inches_to_feet() {
    let feet = convert("[in_i]", 12.0, "[ft_i]").unwrap();
    assert_close(feet, 1.0);
}

#[test]
fn identity_conversion_is_exact() {
    assert_eq!(convert("mm[Hg]", 0.1, "mm[Hg]").unwrap(), 0.1);
    assert_eq!(convert("Cel", 37.0, "Cel").unwrap(), 37.0);
}

#[test]
fn ratio_inversion_roundtrip() {
    let there = convert("m", 3.7, "[ft_i]").unwrap();
    let back = convert("[ft_i]", there, "m").unwrap();
    assert_close(back, 3.7);
}

#[test]
fn prefixed_special_unit() {
    // 37 000 mCel is 37 Cel: the milli prefix lands on the conversion
    // prefix, not the magnitude.
    let c = convert("mCel", 37000.0, "Cel").unwrap();
    assert_close(c, 37.0);
}

#[test]
fn decibel_to_bel() {
    let bels = convert("dB", 20.0, "B").unwrap();
    assert_close(bels, 2.0);
}

#[test]
fn bel_ten_nanovolt_reference() {
    // 1 B[10.nV] is an amplitude level: 10^(1/2) x 10 nV.
    let v = convert("B[10.nV]", 1.0, "V").unwrap();
    assert_close(v, 3.1622776601683795e-8);
    // 0 on the level scale is the reference amplitude itself.
    let v = convert("B[10.nV]", 0.0, "V").unwrap();
    assert_close(v, 1e-8);
}

#[test]
fn ph_to_concentration() {
    let c = convert("[pH]", 7.0, "mol/L").unwrap();
    assert_close(c, 1e-7);
    let p = convert("mol/L", 1e-7, "[pH]").unwrap();
    assert_close(p, 7.0);
}

#[test]
fn pressure_column_units() {
    let pa = convert("mm[Hg]", 1.0, "Pa").unwrap();
    assert_close(pa, 133.322);
    let atm = convert("Pa", 101325.0, "[atm]").unwrap();
    assert_close(atm, 1.0);
}

#[test]
fn compound_expressions() {
    let kmh = convert("m/s", 1.0, "km/h").unwrap();
    assert_close(kmh, 3.6);
    let l = convert("m3", 1.0, "L").unwrap();
    assert_close(l, 1000.0);
}

#[test]
fn below_absolute_zero_is_a_domain_error() {
    assert!(matches!(
        convert("Cel", -300.0, "K"),
        Err(UcumError::DomainError { .. })
    ));
}

#[test]
fn arbitrary_units_do_not_convert() {
    assert!(matches!(
        convert("[IU]", 1.0, "10*"),
        Err(UcumError::IncommensurableUnits { .. })
    ));
}

#[test]
fn unknown_unit_surfaces_as_error() {
    assert!(matches!(
        convert("furlong", 1.0, "m"),
        Err(UcumError::UnknownAtom { .. })
    ));
}

#[test]
fn overflow_is_reported() {
    assert!(matches!(
        convert("YL", 1e300, "yL"),
        Err(UcumError::Overflow { .. })
    ));
}

#[test]
fn commensurables_by_dimension() {
    CONTEXT.with(|ctx| {
        let codes = ctx.commensurables("Pa", CaseMode::Sensitive).unwrap();
        assert!(codes.iter().any(|c| c == "bar"));
        assert!(codes.iter().any(|c| c == "m[Hg]"));
        assert!(codes.iter().any(|c| c == "[atm]"));
        assert!(!codes.iter().any(|c| c == "m"));

        // Arbitrary units never appear, and have no commensurables.
        let codes = ctx.commensurables("%", CaseMode::Sensitive).unwrap();
        assert!(!codes.iter().any(|c| c == "[IU]"));
        let codes = ctx.commensurables("[IU]", CaseMode::Sensitive).unwrap();
        assert!(codes.is_empty());
    });
}

#[test]
fn case_insensitive_conversion() {
    CONTEXT.with(|ctx| {
        let result = ctx
            .convert("CEL", 37.0, "[DEGF]", CaseMode::Insensitive)
            .unwrap();
        assert!((result.value - 98.6).abs() < 1e-9);
    });
}
