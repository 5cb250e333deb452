use serde::{Deserialize, Serialize};
use std::fmt;

use super::calc::{
    dose_mg, parse_tablet_strength, round_to_mg, round_to_tablet_multiple, tablet_count,
};
use super::DosingOptions;
use crate::patient::{PatientMetrics, PatientWarning};
use crate::protocol::{DoseUnit, DrugEntry, Protocol};

/// Patient-derived quantities the dose engine works from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseContext {
    /// Body surface area, m²
    pub bsa: f64,
    pub weight_kg: f64,
    /// Creatinine clearance, mL/min
    pub gfr: f64,
}

impl DoseContext {
    pub fn new(bsa: f64, weight_kg: f64, gfr: f64) -> Self {
        Self {
            bsa,
            weight_kg,
            gfr,
        }
    }
}

impl From<&PatientMetrics> for DoseContext {
    fn from(metrics: &PatientMetrics) -> Self {
        Self::new(
            metrics.bsa(),
            metrics.weight_kg,
            metrics.creatinine_clearance(),
        )
    }
}

/// Computed dose for one drug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseLine {
    pub name: String,
    pub dose_value: f64,
    pub unit: DoseUnit,
    /// Unrounded dose in mg
    pub computed_mg: f64,
    /// Dose in whole mg, rounded to whole tablets for oral drugs
    pub prescribed_mg: i64,
    /// Selected tablet strength label, e.g. `"40 mg"`
    pub strength: Option<String>,
    /// Numeric value of `strength`, if it could be read
    pub strength_mg: Option<f64>,
    pub schedule_days: String,
    pub warnings: Vec<DoseWarning>,
}

impl DoseLine {
    /// Number of tablets for the prescribed dose
    pub fn tablets(&self) -> Option<f64> {
        self.strength_mg
            .and_then(|strength| tablet_count(self.prescribed_mg as f64, strength))
    }
}

/// Problems found while computing a dose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DoseWarning {
    /// Unit not known to the engine; the value was used as flat mg
    UnrecognizedUnit { unit: String },
    /// Tablet strength label without a leading number; rounded to whole mg instead
    UnparseableStrength { strength: String },
    /// Computed dose above the drug's declared maximum (not clamped)
    ExceedsMaxDose { max_mg: f64, computed_mg: f64 },
    /// GFR above the Calvert cap
    ClearanceCapped { gfr: f64, cap: f64 },
    /// AUC dosing with a zero or negative GFR
    NonPositiveClearance { gfr: f64 },
    /// BSA dosing with a zero BSA
    ZeroBsa,
    /// Weight-based dosing with a zero weight
    ZeroWeight,
}

impl fmt::Display for DoseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseWarning::UnrecognizedUnit { unit } => {
                write!(f, "unit '{}' not recognized, dosed as mg", unit)
            }
            DoseWarning::UnparseableStrength { strength } => {
                write!(f, "tablet strength '{}' not readable", strength)
            }
            DoseWarning::ExceedsMaxDose {
                max_mg,
                computed_mg,
            } => write!(
                f,
                "computed dose {:.1} mg exceeds maximum {} mg",
                computed_mg, max_mg
            ),
            DoseWarning::ClearanceCapped { gfr, cap } => {
                write!(f, "GFR {:.0} ml/min capped at {} ml/min", gfr, cap)
            }
            DoseWarning::NonPositiveClearance { gfr } => {
                write!(f, "GFR is {:.0} ml/min, AUC dose uses offset only", gfr)
            }
            DoseWarning::ZeroBsa => write!(f, "BSA is 0"),
            DoseWarning::ZeroWeight => write!(f, "weight is 0"),
        }
    }
}

/// Compute the dose of `drug` using its first tablet strength, if any
pub fn compute_dose(drug: &DrugEntry, context: &DoseContext, options: &DosingOptions) -> DoseLine {
    compute_dose_with_strength(
        drug,
        context,
        options,
        drug.tablet_strengths.first().map(String::as_str),
    )
}

/// Compute the dose of `drug` rounded to a chosen tablet strength
///
/// `strength` is normally one of the drug's `tablet_strengths`; `None` rounds to
/// whole mg.
pub fn compute_dose_with_strength(
    drug: &DrugEntry,
    context: &DoseContext,
    options: &DosingOptions,
    strength: Option<&str>,
) -> DoseLine {
    let mut warnings = Vec::new();

    let computed_mg = dose_mg(
        &drug.dose_unit,
        drug.dose_value,
        context.bsa,
        context.weight_kg,
        context.gfr,
        options,
    );

    match &drug.dose_unit {
        DoseUnit::PerBsa if context.bsa <= 0.0 => warnings.push(DoseWarning::ZeroBsa),
        DoseUnit::PerKg if context.weight_kg <= 0.0 => warnings.push(DoseWarning::ZeroWeight),
        DoseUnit::Auc => {
            if context.gfr <= 0.0 {
                warnings.push(DoseWarning::NonPositiveClearance { gfr: context.gfr });
            } else if let Some(cap) = options.gfr_cap.filter(|cap| context.gfr > *cap) {
                warnings.push(DoseWarning::ClearanceCapped {
                    gfr: context.gfr,
                    cap,
                });
            }
        }
        DoseUnit::Other(unit) => {
            tracing::warn!(drug = %drug.name, unit = %unit, "unrecognized dose unit");
            warnings.push(DoseWarning::UnrecognizedUnit { unit: unit.clone() });
        }
        _ => {}
    }

    if options.flag_max_dose {
        if let Some(max_mg) = drug.max_dose_mg.filter(|max| computed_mg > *max) {
            tracing::warn!(
                drug = %drug.name,
                computed_mg,
                max_mg,
                "computed dose exceeds declared maximum"
            );
            warnings.push(DoseWarning::ExceedsMaxDose {
                max_mg,
                computed_mg,
            });
        }
    }

    let strength_mg = strength.and_then(parse_tablet_strength);
    let prescribed_mg = match (strength, strength_mg) {
        (_, Some(strength_mg)) => round_to_tablet_multiple(computed_mg, strength_mg),
        (Some(label), None) => {
            tracing::warn!(drug = %drug.name, strength = %label, "unreadable tablet strength");
            warnings.push(DoseWarning::UnparseableStrength {
                strength: label.to_string(),
            });
            round_to_mg(computed_mg)
        }
        (None, None) => round_to_mg(computed_mg),
    };

    DoseLine {
        name: drug.name.clone(),
        dose_value: drug.dose_value,
        unit: drug.dose_unit.clone(),
        computed_mg,
        prescribed_mg,
        strength: strength.map(str::to_string),
        strength_mg,
        schedule_days: drug.schedule_days.clone(),
        warnings,
    }
}

/// Doses for a whole protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regimen {
    pub protocol: String,
    /// Body surface area, m²
    pub bsa: f64,
    /// Creatinine clearance, mL/min
    pub gfr: f64,
    /// One line per drug, in protocol order
    pub lines: Vec<DoseLine>,
    pub patient_warnings: Vec<PatientWarning>,
}

impl Regimen {
    /// Whether any patient or drug warning was raised
    pub fn has_warnings(&self) -> bool {
        !self.patient_warnings.is_empty() || self.lines.iter().any(|l| !l.warnings.is_empty())
    }
}

/// Compute every drug of `protocol` for one patient
pub fn compute_regimen(
    protocol: &Protocol,
    metrics: &PatientMetrics,
    options: &DosingOptions,
) -> Regimen {
    let context = DoseContext::from(metrics);

    let patient_warnings = metrics.warnings();
    for warning in &patient_warnings {
        tracing::warn!(protocol = %protocol.name, "{}", warning);
    }

    let lines = protocol
        .drugs
        .iter()
        .map(|drug| compute_dose(drug, &context, options))
        .collect();

    Regimen {
        protocol: protocol.name.clone(),
        bsa: context.bsa,
        gfr: context.gfr,
        lines,
        patient_warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Sex;
    use crate::protocol::ProtocolLibrary;
    use approx::assert_relative_eq;

    fn context() -> DoseContext {
        DoseContext::new(2.0, 80.0, 88.45)
    }

    #[test]
    fn bsa_dose_rounded_to_mg() {
        let drug = DrugEntry::new("Doxorubicin", 50.0, DoseUnit::PerBsa);
        let ctx = DoseContext::new(1.75, 70.0, 90.0);
        let line = compute_dose(&drug, &ctx, &DosingOptions::default());
        assert_relative_eq!(line.computed_mg, 87.5, epsilon = 1e-9);
        // tie goes to the even mg
        assert_eq!(line.prescribed_mg, 88);
        assert!(line.strength.is_none());
        assert!(line.tablets().is_none());
        assert!(line.warnings.is_empty());
    }

    #[test]
    fn tablets_use_first_strength() {
        let drug = DrugEntry::new("Prednisolone", 40.0, DoseUnit::PerBsa)
            .with_tablet_strengths(["40 mg", "20 mg"]);
        let ctx = DoseContext::new(2.0, 80.0, 90.0);
        let line = compute_dose(&drug, &ctx, &DosingOptions::default());
        assert_eq!(line.strength.as_deref(), Some("40 mg"));
        assert_eq!(line.prescribed_mg, 80);
        assert_eq!(line.tablets(), Some(2.0));
    }

    #[test]
    fn tablets_with_selected_strength() {
        let drug = DrugEntry::new("Capecitabine", 1250.0, DoseUnit::PerBsa)
            .with_tablet_strengths(["500 mg", "150 mg"]);
        let ctx = DoseContext::new(1.75, 75.0, 90.0);
        let options = DosingOptions::default();

        // 2187.5 mg
        let coarse = compute_dose_with_strength(&drug, &ctx, &options, Some("500 mg"));
        let fine = compute_dose_with_strength(&drug, &ctx, &options, Some("150 mg"));
        assert_eq!(coarse.prescribed_mg, 2000);
        assert_eq!(fine.prescribed_mg, 2250);
        assert_eq!(fine.tablets(), Some(15.0));
    }

    #[test]
    fn unreadable_strength_falls_back_to_mg() {
        let drug = DrugEntry::new("Temozolomide", 150.0, DoseUnit::PerBsa)
            .with_tablet_strengths(["large"]);
        let ctx = DoseContext::new(2.0, 75.0, 90.0);
        let line = compute_dose(&drug, &ctx, &DosingOptions::default());
        assert_eq!(line.prescribed_mg, 300);
        assert_eq!(line.strength_mg, None);
        assert_eq!(
            line.warnings,
            vec![DoseWarning::UnparseableStrength {
                strength: "large".to_string()
            }]
        );
    }

    #[test]
    fn auc_dose_flags_capped_clearance() {
        let drug = DrugEntry::new("Carboplatin", 5.0, DoseUnit::Auc);
        let ctx = DoseContext::new(2.0, 80.0, 140.0);
        let line = compute_dose(&drug, &ctx, &DosingOptions::default());
        assert_relative_eq!(line.computed_mg, 750.0, epsilon = 1e-9);
        assert_eq!(
            line.warnings,
            vec![DoseWarning::ClearanceCapped {
                gfr: 140.0,
                cap: 125.0
            }]
        );
    }

    #[test]
    fn auc_dose_with_zero_clearance() {
        let drug = DrugEntry::new("Carboplatin", 5.0, DoseUnit::Auc);
        let ctx = DoseContext::new(2.0, 80.0, 0.0);
        let line = compute_dose(&drug, &ctx, &DosingOptions::default());
        assert_eq!(line.prescribed_mg, 125);
        assert_eq!(
            line.warnings,
            vec![DoseWarning::NonPositiveClearance { gfr: 0.0 }]
        );
    }

    #[test]
    fn unknown_unit_is_flat_dose() {
        let drug = DrugEntry::new("Bleomycin", 15.0, DoseUnit::from("IU"));
        let line = compute_dose(&drug, &context(), &DosingOptions::default());
        assert_eq!(line.prescribed_mg, 15);
        assert_eq!(
            line.warnings,
            vec![DoseWarning::UnrecognizedUnit {
                unit: "IU".to_string()
            }]
        );
    }

    #[test]
    fn max_dose_is_flagged_not_clamped() {
        let drug = DrugEntry::new("Vincristine", 1.4, DoseUnit::PerBsa).with_max_dose(2.0);
        let line = compute_dose(&drug, &context(), &DosingOptions::default());
        assert_relative_eq!(line.computed_mg, 2.8, epsilon = 1e-9);
        assert_eq!(line.prescribed_mg, 3);
        assert!(matches!(
            line.warnings.as_slice(),
            [DoseWarning::ExceedsMaxDose { max_mg, .. }] if *max_mg == 2.0
        ));

        let quiet = DosingOptions::default().with_max_dose_flag(false);
        assert!(compute_dose(&drug, &context(), &quiet).warnings.is_empty());
    }

    #[test]
    fn r_chop_regimen() {
        let library = ProtocolLibrary::seed();
        let protocol = library.get("R-CHOP (NHL)").unwrap();
        let patient = PatientMetrics::new(180.0, 80.0, 50.0, 100.0, Sex::Male);

        let regimen = compute_regimen(protocol, &patient, &DosingOptions::default());
        assert_eq!(regimen.bsa, 2.0);

        let prescribed: Vec<i64> = regimen.lines.iter().map(|l| l.prescribed_mg).collect();
        assert_eq!(prescribed, vec![750, 1500, 100, 3, 80]);
        assert_eq!(regimen.lines[4].tablets(), Some(2.0));
        assert!(regimen.has_warnings());
        assert!(regimen.patient_warnings.is_empty());
    }
}
