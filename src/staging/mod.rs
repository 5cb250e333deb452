//! Cancer staging
//!
//! Reference tables for breast, prostate and lung TNM staging and Ann Arbor lymphoma
//! staging, the breast stage group classifier and the breast treatment advisor.
//!
//! ```rust
//! use oncosol::staging::*;
//!
//! let statement = StagingStatement::new(CancerType::Breast)
//!     .with_selections(Some("T1c"), Some("N0"), Some("M0"));
//!
//! assert_eq!(statement.breast_stage(), Some(BreastStage::IA));
//! println!("{}", statement);
//! ```

pub mod advisor;
mod ann_arbor;
pub mod breast;
mod statement;
mod tables;

pub use advisor::{
    build_breast_treatment_plan, recommend_breast_setting, Biomarkers, BreastPlan, Ki67,
    ParseBiomarkerError, ParseSettingError, ReceptorStatus, Setting, Subtype, TreatmentPlan,
};
pub use ann_arbor::compose_ann_arbor;
pub use breast::{
    classify_breast_stage, classify_breast_stage_checked, BreastClassification, BreastStage,
    StagingDiagnostic, TnmCodes,
};
pub use statement::StagingStatement;
pub use tables::{
    option_code, CancerType, ParseCancerTypeError, StagingAxis, StagingKind, StagingTable,
};
