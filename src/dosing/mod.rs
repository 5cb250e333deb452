//! Dose calculation
//!
//! Converts a protocol's drug list into milligram amounts for one patient.
//!
//! | Unit | Dose |
//! |------|------|
//! | mg/m2 | `dose_value × BSA` |
//! | mg/kg | `dose_value × weight` |
//! | AUC | `dose_value × (min(GFR, 125) + 25)` (Calvert) |
//! | mg | `dose_value` |
//!
//! Oral drugs are rounded to whole tablets of the selected strength, everything else
//! to whole mg. The engine holds no state: computing the same protocol for the same
//! patient always gives the same [`Regimen`].
//!
//! ```rust
//! use oncosol::prelude::*;
//!
//! let library = ProtocolLibrary::seed();
//! let protocol = library.require("R-CHOP (NHL)").unwrap();
//! let patient = PatientMetrics::from_text("180", "80", "50", "100", Sex::Male);
//!
//! let regimen = compute_regimen(protocol, &patient, &DosingOptions::default());
//! let report = PrescriptionReport::new(protocol, &regimen).with_override(3, 2.0);
//!
//! println!("{}", report);
//! ```

pub mod calc;
pub mod cohort;
mod engine;
mod options;
mod report;

pub use cohort::{
    dose_cohort, dose_cohort_file, read_cohort, read_cohort_from, write_cohort, CohortDoses,
    CohortError, CohortPatient,
};
pub use engine::{
    compute_dose, compute_dose_with_strength, compute_regimen, DoseContext, DoseLine,
    DoseWarning, Regimen,
};
pub use options::DosingOptions;
pub use report::{PrescriptionReport, ReportLine};
