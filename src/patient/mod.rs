//! Patient biometrics
//!
//! [`PatientMetrics`] is the per-calculation input to the dose engine. It is created by
//! the caller, never stored, and carries just enough to derive BSA and creatinine
//! clearance.

pub mod formulas;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use formulas::{compute_bsa, compute_creatinine_clearance, parse_lenient_float};

/// Biological sex, as used by the Cockcroft-Gault formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sex '{0}', expected male or female")]
pub struct ParseSexError(pub String);

impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

/// Biometrics of a single patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientMetrics {
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Age in years
    pub age_years: f64,
    /// Serum creatinine in µmol/L
    pub creatinine_umol_l: f64,
    pub sex: Sex,
}

impl PatientMetrics {
    pub fn new(
        height_cm: f64,
        weight_kg: f64,
        age_years: f64,
        creatinine_umol_l: f64,
        sex: Sex,
    ) -> Self {
        Self {
            height_cm,
            weight_kg,
            age_years,
            creatinine_umol_l,
            sex,
        }
    }

    /// Build metrics from raw form text
    ///
    /// Every numeric field goes through [`parse_lenient_float`], so malformed input
    /// becomes `0.0` and shows up as a zero BSA or clearance downstream.
    pub fn from_text(height: &str, weight: &str, age: &str, creatinine: &str, sex: Sex) -> Self {
        Self::new(
            parse_lenient_float(height),
            parse_lenient_float(weight),
            parse_lenient_float(age),
            parse_lenient_float(creatinine),
            sex,
        )
    }

    /// Body surface area in m²
    pub fn bsa(&self) -> f64 {
        compute_bsa(self.height_cm, self.weight_kg)
    }

    /// Creatinine clearance in mL/min
    pub fn creatinine_clearance(&self) -> f64 {
        compute_creatinine_clearance(
            self.age_years,
            self.weight_kg,
            self.creatinine_umol_l,
            self.sex,
        )
    }

    /// Data-quality problems a front-end should show next to the inputs
    pub fn warnings(&self) -> Vec<PatientWarning> {
        let mut warnings = Vec::new();

        if self.bsa() == 0.0 {
            warnings.push(PatientWarning::ZeroBsa);
        }

        let clearance = self.creatinine_clearance();
        if clearance == 0.0 {
            warnings.push(PatientWarning::ZeroClearance);
        } else if clearance < 0.0 {
            warnings.push(PatientWarning::NegativeClearance { value: clearance });
        }

        warnings
    }
}

/// Data-entry warnings derived from patient metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatientWarning {
    /// Height or weight missing or not positive
    ZeroBsa,
    /// Creatinine or weight missing or not positive
    ZeroClearance,
    /// Clearance came out negative (age above 140?)
    NegativeClearance { value: f64 },
}

impl fmt::Display for PatientWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientWarning::ZeroBsa => write!(f, "BSA is 0: check height and weight"),
            PatientWarning::ZeroClearance => write!(f, "GFR is 0: check creatinine and weight"),
            PatientWarning::NegativeClearance { value } => {
                write!(f, "GFR is negative ({:.0} ml/min): check age", value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_from_str() {
        assert_eq!("Male".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!(" f ".parse::<Sex>(), Ok(Sex::Female));
        assert_eq!("FEMALE".parse::<Sex>(), Ok(Sex::Female));
        assert!("x".parse::<Sex>().is_err());
    }

    #[test]
    fn metrics_from_text() {
        let metrics = PatientMetrics::from_text("180", "80,0", "50", "oops", Sex::Male);
        assert_eq!(metrics.bsa(), 2.0);
        assert_eq!(metrics.creatinine_umol_l, 0.0);
        assert_eq!(metrics.warnings(), vec![PatientWarning::ZeroClearance]);
    }

    #[test]
    fn zero_weight_warning_names_weight() {
        let metrics = PatientMetrics::new(170.0, 0.0, 60.0, 90.0, Sex::Male);
        let warnings = metrics.warnings();
        assert!(warnings.contains(&PatientWarning::ZeroClearance));
        assert!(PatientWarning::ZeroClearance.to_string().contains("weight"));
        assert!(PatientWarning::ZeroClearance.to_string().contains("creatinine"));
    }

    #[test]
    fn warnings_for_valid_patient_are_empty() {
        let metrics = PatientMetrics::new(170.0, 70.0, 60.0, 90.0, Sex::Female);
        assert!(metrics.warnings().is_empty());
    }

    #[test]
    fn warnings_for_implausible_age() {
        let metrics = PatientMetrics::new(170.0, 70.0, 160.0, 90.0, Sex::Female);
        let warnings = metrics.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            PatientWarning::NegativeClearance { value } if value < 0.0
        ));
    }

    #[test]
    fn missing_height_zeroes_bsa() {
        let metrics = PatientMetrics::from_text("", "80", "50", "100", Sex::Male);
        assert_eq!(metrics.warnings(), vec![PatientWarning::ZeroBsa]);
    }
}
