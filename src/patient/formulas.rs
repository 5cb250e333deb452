//! Patient-derived formulas
//!
//! Stateless functions turning biometrics into body surface area and renal
//! function estimates. All of them are total: invalid input degrades to `0.0`
//! instead of failing, and it is up to the caller to surface that.

use super::Sex;

/// Denominator of the Mosteller formula (cm·kg → m²)
const MOSTELLER_DIVISOR: f64 = 3600.0;

/// Cockcroft-Gault constant for serum creatinine in µmol/L
///
/// The textbook formula uses `72 × Cr[mg/dL]`; with `Cr[mg/dL] = Cr[µmol/L] / 88.4`
/// this becomes `0.814 × Cr[µmol/L]`.
const CG_CREATININE_FACTOR: f64 = 0.814;

/// Cockcroft-Gault correction for female patients
const CG_FEMALE_FACTOR: f64 = 0.85;

/// Body surface area (m²) by the Mosteller formula
///
/// Returns `0.0` if either input is not strictly positive.
///
/// ```rust
/// use oncosol::compute_bsa;
///
/// assert_eq!(compute_bsa(180.0, 80.0), 2.0);
/// assert_eq!(compute_bsa(0.0, 80.0), 0.0);
/// ```
pub fn compute_bsa(height_cm: f64, weight_kg: f64) -> f64 {
    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return 0.0;
    }
    (height_cm * weight_kg / MOSTELLER_DIVISOR).sqrt()
}

/// Creatinine clearance (mL/min) by the Cockcroft-Gault formula
///
/// `creatinine_umol_l` is serum creatinine in µmol/L. Returns `0.0` when creatinine
/// is not strictly positive. The result is not clamped: an age above 140 gives a
/// negative clearance, which callers should treat as a data-entry problem.
pub fn compute_creatinine_clearance(
    age_years: f64,
    weight_kg: f64,
    creatinine_umol_l: f64,
    sex: Sex,
) -> f64 {
    if creatinine_umol_l <= 0.0 {
        return 0.0;
    }

    let clearance = ((140.0 - age_years) * weight_kg) / (CG_CREATININE_FACTOR * creatinine_umol_l);

    match sex {
        Sex::Female => clearance * CG_FEMALE_FACTOR,
        Sex::Male => clearance,
    }
}

/// Parse a number typed by a clinician
///
/// Accepts both `,` and `.` as decimal separator and ignores surrounding whitespace.
/// Anything unparseable, including non-finite values, becomes `0.0`.
///
/// ```rust
/// use oncosol::parse_lenient_float;
///
/// assert_eq!(parse_lenient_float(" 72,5 "), 72.5);
/// assert_eq!(parse_lenient_float("abc"), 0.0);
/// ```
pub fn parse_lenient_float(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
