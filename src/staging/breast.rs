//! Breast cancer anatomic stage groups
//!
//! Stage grouping is an ordered rule chain over the T, N and M codes. Rules are
//! evaluated top to bottom and the first match wins. Codes are matched as substrings
//! (`"T1"` matches `"T1c"`), so the order also resolves overlaps such as `"N1"` being
//! part of `"N1mi"`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tables::CancerType;

/// Anatomic stage group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreastStage {
    Stage0,
    IA,
    IB,
    IIA,
    IIB,
    IIIA,
    IIIB,
    IIIC,
    IV,
    /// No rule matched
    Undeterminable,
}

impl BreastStage {
    pub fn label(&self) -> &'static str {
        match self {
            BreastStage::Stage0 => "Stage 0",
            BreastStage::IA => "Stage IA",
            BreastStage::IB => "Stage IB",
            BreastStage::IIA => "Stage IIA",
            BreastStage::IIB => "Stage IIB",
            BreastStage::IIIA => "Stage IIIA",
            BreastStage::IIIB => "Stage IIIB",
            BreastStage::IIIC => "Stage IIIC",
            BreastStage::IV => "Stage IV",
            BreastStage::Undeterminable => "undeterminable",
        }
    }

    pub fn is_determined(&self) -> bool {
        *self != BreastStage::Undeterminable
    }
}

impl fmt::Display for BreastStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// T, N and M codes as selected by the clinician, e.g. `("T1c", "N0", "M0")`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TnmCodes<'a> {
    pub t: &'a str,
    pub n: &'a str,
    pub m: &'a str,
}

impl<'a> TnmCodes<'a> {
    pub fn new(t: &'a str, n: &'a str, m: &'a str) -> Self {
        Self { t, n, m }
    }

    pub(crate) fn t_has(&self, code: &str) -> bool {
        self.t.contains(code)
    }

    pub(crate) fn n_has(&self, code: &str) -> bool {
        self.n.contains(code)
    }

    pub(crate) fn m_has(&self, code: &str) -> bool {
        self.m.contains(code)
    }

    /// Coarse tumour size: T0/T1 → 1, T2 → 2, T3 → 3, anything else → 0
    fn t_level(&self) -> u8 {
        if self.t_has("T1") || self.t_has("T0") {
            1
        } else if self.t_has("T2") {
            2
        } else if self.t_has("T3") {
            3
        } else {
            0
        }
    }

    fn t0_or_t1(&self) -> bool {
        self.t_has("T0") || self.t_has("T1")
    }
}

type Rule = (fn(&TnmCodes) -> bool, BreastStage);

/// Stage rules in priority order
const RULES: &[Rule] = &[
    (|c| c.m_has("M1"), BreastStage::IV),
    (|c| c.n_has("N3"), BreastStage::IIIC),
    (|c| c.t_has("T4"), BreastStage::IIIB),
    (|c| c.n_has("N2") && c.t_level() <= 3, BreastStage::IIIA),
    (
        |c| c.t_has("T3") && (c.n_has("N1") || c.n_has("N2")),
        BreastStage::IIIA,
    ),
    (|c| c.t_has("T3") && c.n_has("N0"), BreastStage::IIB),
    (|c| c.t_has("T2") && c.n_has("N1"), BreastStage::IIB),
    // before the plain N1 rule: "N1" is a substring of "N1mi"
    (|c| c.t0_or_t1() && c.n_has("N1mi"), BreastStage::IB),
    (|c| c.t0_or_t1() && c.n_has("N1"), BreastStage::IIA),
    (|c| c.t_has("T2") && c.n_has("N0"), BreastStage::IIA),
    (|c| c.t_has("T1") && c.n_has("N0"), BreastStage::IA),
    (|c| c.t_has("Tis") && c.n_has("N0"), BreastStage::Stage0),
];

impl TnmCodes<'_> {
    /// First matching stage group
    pub fn stage(&self) -> BreastStage {
        RULES
            .iter()
            .find(|(applies, _)| applies(self))
            .map(|(_, stage)| *stage)
            .unwrap_or(BreastStage::Undeterminable)
    }
}

/// Anatomic stage group of a breast cancer
///
/// ```rust
/// use oncosol::staging::BreastStage;
/// use oncosol::classify_breast_stage;
///
/// assert_eq!(classify_breast_stage("T1c", "N1mi", "M0"), BreastStage::IB);
/// assert_eq!(classify_breast_stage("T1c", "N1mi", "M0").label(), "Stage IB");
/// ```
pub fn classify_breast_stage(t: &str, n: &str, m: &str) -> BreastStage {
    TnmCodes::new(t, n, m).stage()
}

/// A stage group together with what was wrong with the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreastClassification {
    pub stage: BreastStage,
    pub diagnostics: Vec<StagingDiagnostic>,
}

/// Problems found in staging input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagingDiagnostic {
    /// Code not listed on the axis
    UnrecognizedCode { axis: String, code: String },
    /// No stage rule matched
    Undeterminable,
}

impl fmt::Display for StagingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingDiagnostic::UnrecognizedCode { axis, code } => {
                write!(f, "unrecognized {} code '{}'", axis, code)
            }
            StagingDiagnostic::Undeterminable => write!(f, "stage group undeterminable"),
        }
    }
}

/// [`classify_breast_stage`], also reporting codes that are not in the breast table
pub fn classify_breast_stage_checked(t: &str, n: &str, m: &str) -> BreastClassification {
    let table = CancerType::Breast.table();
    let mut diagnostics = Vec::new();

    for (axis, code) in table.axes.iter().zip([t, n, m]) {
        if !axis.contains_code(code) {
            tracing::warn!(axis = axis.label, code, "unrecognized TNM code");
            diagnostics.push(StagingDiagnostic::UnrecognizedCode {
                axis: axis.label.to_string(),
                code: code.to_string(),
            });
        }
    }

    let stage = classify_breast_stage(t, n, m);
    if !stage.is_determined() {
        tracing::warn!(t, n, m, "breast stage group undeterminable");
        diagnostics.push(StagingDiagnostic::Undeterminable);
    }

    BreastClassification { stage, diagnostics }
}
