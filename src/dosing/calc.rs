//! Pure calculation functions for doses
//!
//! Stateless helpers used by the dose engine. Rounding is half-to-even throughout, so
//! an exact tie between two tablet multiples goes to the even multiple.

use super::DosingOptions;
use crate::protocol::DoseUnit;

/// Raw dose in mg for a dose value expressed in `unit`
///
/// - `mg/m2`: `dose_value × bsa`
/// - `mg/kg`: `dose_value × weight_kg`
/// - `AUC`: Calvert formula, `dose_value × (min(gfr, cap) + 25)`
/// - `mg` and unrecognized units: `dose_value`
#[inline]
pub fn dose_mg(
    unit: &DoseUnit,
    dose_value: f64,
    bsa: f64,
    weight_kg: f64,
    gfr: f64,
    options: &DosingOptions,
) -> f64 {
    match unit {
        DoseUnit::PerBsa => dose_value * bsa,
        DoseUnit::PerKg => dose_value * weight_kg,
        DoseUnit::Auc => calvert(dose_value, options.capped_gfr(gfr), options.calvert_offset),
        DoseUnit::Absolute | DoseUnit::Other(_) => dose_value,
    }
}

/// Calvert formula: `auc × (gfr + offset)`
#[inline]
pub fn calvert(auc: f64, gfr: f64, offset: f64) -> f64 {
    auc * (gfr + offset)
}

/// Round a dose to the nearest whole number of tablets, returned in mg
///
/// A non-positive `tablet_strength_mg` means "no tablets": the target is then
/// truncated to whole mg.
///
/// ```rust
/// use oncosol::round_to_tablet_multiple;
///
/// assert_eq!(round_to_tablet_multiple(90.0, 50.0), 100);
/// assert_eq!(round_to_tablet_multiple(70.0, 50.0), 50);
/// assert_eq!(round_to_tablet_multiple(55.5, 0.0), 55);
/// ```
pub fn round_to_tablet_multiple(target_mg: f64, tablet_strength_mg: f64) -> i64 {
    if tablet_strength_mg <= 0.0 {
        return target_mg.trunc() as i64;
    }
    ((target_mg / tablet_strength_mg).round_ties_even() * tablet_strength_mg) as i64
}

/// Round a dose to whole mg
#[inline]
pub fn round_to_mg(target_mg: f64) -> i64 {
    target_mg.round_ties_even() as i64
}

/// Leading numeric value of a tablet strength label such as `"40 mg"` or `"2,5 mg"`
///
/// Returns `None` if the label does not start with a number.
pub fn parse_tablet_strength(label: &str) -> Option<f64> {
    let label = label.trim_start();
    let end = label
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(label.len());

    label[..end]
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Number of tablets of `strength_mg` making up `amount_mg`
///
/// `None` when nothing is prescribed or the strength is unusable.
pub fn tablet_count(amount_mg: f64, strength_mg: f64) -> Option<f64> {
    if amount_mg > 0.0 && strength_mg > 0.0 {
        Some(amount_mg / strength_mg)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dose(unit: &DoseUnit, value: f64, gfr: f64, options: &DosingOptions) -> f64 {
        dose_mg(unit, value, 1.8, 70.0, gfr, options)
    }

    #[test]
    fn dose_by_unit() {
        let options = DosingOptions::default();
        assert_relative_eq!(dose(&DoseUnit::PerBsa, 375.0, 90.0, &options), 675.0, epsilon = 1e-9);
        assert_relative_eq!(dose(&DoseUnit::PerKg, 8.0, 90.0, &options), 560.0, epsilon = 1e-9);
        assert_relative_eq!(dose(&DoseUnit::Auc, 5.0, 90.0, &options), 575.0, epsilon = 1e-9);
        assert_relative_eq!(dose(&DoseUnit::Absolute, 2.0, 90.0, &options), 2.0);
        assert_relative_eq!(dose(&DoseUnit::from("IU"), 15.0, 90.0, &options), 15.0);
    }

    #[test]
    fn calvert_caps_gfr() {
        let options = DosingOptions::default();
        // 5 * (125 + 25)
        assert_relative_eq!(dose(&DoseUnit::Auc, 5.0, 180.0, &options), 750.0, epsilon = 1e-9);

        let uncapped = DosingOptions::default().without_gfr_cap();
        assert_relative_eq!(dose(&DoseUnit::Auc, 5.0, 180.0, &uncapped), 1025.0, epsilon = 1e-9);
    }

    #[test]
    fn calvert_with_missing_gfr() {
        let options = DosingOptions::default();
        assert_relative_eq!(dose(&DoseUnit::Auc, 6.0, 0.0, &options), 150.0, epsilon = 1e-9);
    }

    #[test]
    fn tablet_rounding() {
        assert_eq!(round_to_tablet_multiple(100.0, 100.0), 100);
        assert_eq!(round_to_tablet_multiple(90.0, 50.0), 100);
        assert_eq!(round_to_tablet_multiple(70.0, 50.0), 50);
        assert_eq!(round_to_tablet_multiple(55.5, 0.0), 55);
        assert_eq!(round_to_tablet_multiple(83.0, 40.0), 80);
        assert_eq!(round_to_tablet_multiple(83.0, 20.0), 80);
        assert_eq!(round_to_tablet_multiple(30.0, 40.0), 40);
        assert_eq!(round_to_tablet_multiple(30.0, 20.0), 40);
    }

    #[test]
    fn tablet_rounding_ties_go_to_even_multiple() {
        // 1.5 and 2.5 tablets
        assert_eq!(round_to_tablet_multiple(30.0, 20.0), 40);
        assert_eq!(round_to_tablet_multiple(50.0, 20.0), 40);
    }

    #[test]
    fn whole_mg_rounding() {
        assert_eq!(round_to_mg(674.6), 675);
        assert_eq!(round_to_mg(2.38), 2);
        assert_eq!(round_to_mg(0.0), 0);
    }

    #[test]
    fn strength_labels() {
        assert_eq!(parse_tablet_strength("40 mg"), Some(40.0));
        assert_eq!(parse_tablet_strength(" 2,5 mg"), Some(2.5));
        assert_eq!(parse_tablet_strength("500mg"), Some(500.0));
        assert_eq!(parse_tablet_strength("mg 40"), None);
        assert_eq!(parse_tablet_strength(""), None);
    }

    #[test]
    fn tablets() {
        assert_eq!(tablet_count(80.0, 40.0), Some(2.0));
        assert_eq!(tablet_count(0.0, 40.0), None);
        assert_eq!(tablet_count(80.0, 0.0), None);
    }
}
