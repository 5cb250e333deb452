//! Oncology dosing and cancer staging.
//!
//! The crate is split along the lines of the clinical workflow:
//!
//! - [`patient`]: biometrics, body surface area and creatinine clearance
//! - [`protocol`]: the chemotherapy protocol data model and its JSON store
//! - [`dosing`]: per-drug dose calculation, tablet rounding and prescription reports
//! - [`staging`]: staging reference tables, the breast cancer stage classifier
//!   and the treatment-plan advisor
//!
//! Every calculation is a pure function of its inputs. The only shared state is a
//! [`ProtocolLibrary`], which is loaded once and then read from.
//!
//! ```rust
//! use oncosol::prelude::*;
//!
//! let library = ProtocolLibrary::seed();
//! let protocol = library.get("R-CHOP (NHL)").unwrap();
//!
//! let patient = PatientMetrics::new(180.0, 80.0, 50.0, 100.0, Sex::Male);
//! let regimen = compute_regimen(protocol, &patient, &DosingOptions::default());
//!
//! assert_eq!(regimen.lines.len(), 5);
//! assert_eq!(regimen.lines[0].prescribed_mg, 750);
//! ```

pub mod cli;
pub mod dosing;
pub mod error;
pub mod patient;
pub mod protocol;
pub mod staging;

pub use error::OncosolError;

// Pure calculation boundary consumed by front-ends
pub use crate::dosing::calc::round_to_tablet_multiple;
pub use crate::patient::formulas::{
    compute_bsa, compute_creatinine_clearance, parse_lenient_float,
};
pub use crate::staging::advisor::{build_breast_treatment_plan, recommend_breast_setting};
pub use crate::staging::breast::classify_breast_stage;

pub mod prelude {
    pub use crate::dosing::{
        compute_dose, compute_regimen, DoseLine, DoseWarning, DosingOptions,
        PrescriptionReport, Regimen,
    };
    pub use crate::patient::{PatientMetrics, PatientWarning, Sex};
    pub use crate::protocol::{DoseUnit, DrugEntry, Protocol, ProtocolError, ProtocolLibrary};
    pub use crate::staging::{
        BreastPlan, BreastStage, CancerType, Ki67, ReceptorStatus, Setting, StagingStatement,
        StagingTable, Subtype, TreatmentPlan,
    };
    pub use crate::{
        build_breast_treatment_plan, classify_breast_stage, compute_bsa,
        compute_creatinine_clearance, parse_lenient_float, recommend_breast_setting,
        round_to_tablet_multiple,
    };
}
