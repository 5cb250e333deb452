//! Breast cancer treatment advisor
//!
//! Derives the biological subtype from receptor status, decides between neoadjuvant
//! and adjuvant treatment and lists the drug classes to consider. The clinician may
//! override the setting; the plan then follows the chosen setting and notes what the
//! optimal one would have been.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::breast::TnmCodes;

const PALLIATIVE_SETTING: &str = "Treatment is palliative (metastatic disease).";
const NEOADJUVANT_SETTING: &str =
    "Neoadjuvant therapy recommended (locally advanced disease or large tumour).";
const ADJUVANT_SETTING: &str = "Primary surgery and adjuvant therapy recommended.";

const PALLIATIVE_PLAN: &str = "Metastatic breast cancer: treatment is palliative. \
Choice of therapy is based on the patient's performance status and biological subtype (ER/HER2).";

const DC_OR_EC_DOC: &str = "Chemotherapy: Docetaxel-Cyclophosphamide (D-C) x 6 or EC -> Docetaxel";

// ═══════════════════════════════════════════════════════════════════════════════
// Biomarkers
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBiomarkerError {
    #[error("Unknown receptor status '{0}', expected positive or negative")]
    ReceptorStatus(String),
    #[error("Unknown Ki-67 level '{0}', expected low or high")]
    Ki67(String),
}

/// ER or HER2 status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceptorStatus {
    Positive,
    Negative,
}

impl ReceptorStatus {
    pub fn is_positive(&self) -> bool {
        *self == ReceptorStatus::Positive
    }
}

impl fmt::Display for ReceptorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceptorStatus::Positive => write!(f, "Positive"),
            ReceptorStatus::Negative => write!(f, "Negative"),
        }
    }
}

impl FromStr for ReceptorStatus {
    type Err = ParseBiomarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(ReceptorStatus::Positive),
            "negative" | "neg" | "-" => Ok(ReceptorStatus::Negative),
            _ => Err(ParseBiomarkerError::ReceptorStatus(s.to_string())),
        }
    }
}

/// Ki-67 proliferation index, split at 20%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ki67 {
    Low,
    High,
}

impl fmt::Display for Ki67 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ki67::Low => write!(f, "Low (<20%)"),
            Ki67::High => write!(f, "High (>=20%)"),
        }
    }
}

impl FromStr for Ki67 {
    type Err = ParseBiomarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Ki67::Low),
            "high" => Ok(Ki67::High),
            _ => Err(ParseBiomarkerError::Ki67(s.to_string())),
        }
    }
}

/// Receptor status of a breast tumour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biomarkers {
    pub er: ReceptorStatus,
    pub her2: ReceptorStatus,
    pub ki67: Ki67,
}

impl Default for Biomarkers {
    /// ER-positive, HER2-negative, low Ki-67
    fn default() -> Self {
        Self {
            er: ReceptorStatus::Positive,
            her2: ReceptorStatus::Negative,
            ki67: Ki67::Low,
        }
    }
}

impl Biomarkers {
    pub fn new(er: ReceptorStatus, her2: ReceptorStatus, ki67: Ki67) -> Self {
        Self { er, her2, ki67 }
    }

    pub fn subtype(&self) -> Subtype {
        match (self.her2, self.er, self.ki67) {
            (ReceptorStatus::Positive, ReceptorStatus::Positive, _) => Subtype::Her2LuminalB,
            (ReceptorStatus::Positive, ReceptorStatus::Negative, _) => Subtype::Her2NonLuminal,
            (ReceptorStatus::Negative, ReceptorStatus::Positive, Ki67::High) => Subtype::LuminalB,
            (ReceptorStatus::Negative, ReceptorStatus::Positive, Ki67::Low) => Subtype::LuminalA,
            (ReceptorStatus::Negative, ReceptorStatus::Negative, _) => Subtype::TripleNegative,
        }
    }
}

/// Biological (surrogate molecular) subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    Her2LuminalB,
    Her2NonLuminal,
    LuminalB,
    LuminalA,
    TripleNegative,
}

impl Subtype {
    pub fn label(&self) -> &'static str {
        match self {
            Subtype::Her2LuminalB => "HER2-positive (Luminal B-like)",
            Subtype::Her2NonLuminal => "HER2-positive (Non-Luminal)",
            Subtype::LuminalB => "Luminal B-like (HER2-)",
            Subtype::LuminalA => "Luminal A-like",
            Subtype::TripleNegative => "Triple-negative (TNBC)",
        }
    }

    pub fn is_her2_positive(&self) -> bool {
        matches!(self, Subtype::Her2LuminalB | Subtype::Her2NonLuminal)
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Setting
// ═══════════════════════════════════════════════════════════════════════════════

/// Timing of systemic therapy relative to surgery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    Neoadjuvant,
    Adjuvant,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Neoadjuvant => write!(f, "Neoadjuvant"),
            Setting::Adjuvant => write!(f, "Adjuvant"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown treatment setting '{0}', expected neoadjuvant or adjuvant")]
pub struct ParseSettingError(pub String);

impl FromStr for Setting {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neoadjuvant" | "neo" => Ok(Setting::Neoadjuvant),
            "adjuvant" | "adj" => Ok(Setting::Adjuvant),
            _ => Err(ParseSettingError(s.to_string())),
        }
    }
}

impl Setting {
    /// Parse a manual setting selection, where `-` or an empty string means none
    ///
    /// An unknown selection is logged and also yields `None`, so the plan follows the
    /// optimal setting. Use [`str::parse`] for strict parsing.
    pub fn parse_override(s: &str) -> Option<Setting> {
        match s.trim() {
            "" | "-" => None,
            other => match other.parse() {
                Ok(setting) => Some(setting),
                Err(e) => {
                    tracing::warn!(selection = other, "{}, using the optimal setting", e);
                    None
                }
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Plans
// ═══════════════════════════════════════════════════════════════════════════════

/// Curative treatment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub subtype: Subtype,
    /// Setting the plan follows
    pub setting: Setting,
    /// Setting the advisor would pick on its own
    pub optimal_setting: Setting,
    pub recommendations: Vec<String>,
}

impl TreatmentPlan {
    /// Whether a manual selection overrode the optimal setting
    pub fn is_overridden(&self) -> bool {
        self.setting != self.optimal_setting
    }
}

impl fmt::Display for TreatmentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Biological subtype: {}", self.subtype)?;
        write!(f, "Treatment setting: {}", self.setting)?;
        if self.is_overridden() {
            write!(
                f,
                " (Note: optimal recommendation would be {})",
                self.optimal_setting
            )?;
        }
        write!(f, "\n\nDrug therapy recommendation:")?;
        for line in &self.recommendations {
            write!(f, "\n• {}", line)?;
        }
        Ok(())
    }
}

/// Advisor outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreastPlan {
    /// Metastatic disease
    Palliative,
    Curative(TreatmentPlan),
}

impl BreastPlan {
    pub fn treatment_plan(&self) -> Option<&TreatmentPlan> {
        match self {
            BreastPlan::Palliative => None,
            BreastPlan::Curative(plan) => Some(plan),
        }
    }
}

impl fmt::Display for BreastPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreastPlan::Palliative => f.write_str(PALLIATIVE_PLAN),
            BreastPlan::Curative(plan) => write!(f, "{}", plan),
        }
    }
}

fn is_metastatic(stage: &str, tnm: &TnmCodes) -> bool {
    stage.contains("Stage IV") || tnm.m_has("M1")
}

fn is_locally_advanced(stage: &str, tnm: &TnmCodes) -> bool {
    stage.contains("Stage III")
        || tnm.t_has("T3")
        || tnm.t_has("T4")
        || tnm.n_has("N2")
        || tnm.n_has("N3")
}

/// Setting recommendation from stage alone
///
/// ```rust
/// use oncosol::recommend_breast_setting;
///
/// let text = recommend_breast_setting("Stage IV", "T1", "N0", "M1");
/// assert!(text.contains("palliative"));
/// ```
pub fn recommend_breast_setting(stage: &str, t: &str, n: &str, m: &str) -> &'static str {
    let tnm = TnmCodes::new(t, n, m);
    if is_metastatic(stage, &tnm) {
        PALLIATIVE_SETTING
    } else if is_locally_advanced(stage, &tnm) {
        NEOADJUVANT_SETTING
    } else {
        ADJUVANT_SETTING
    }
}

/// Full treatment plan from stage, TNM codes and biomarkers
///
/// `stage` is a stage group label such as `"Stage IIB"`. When `selected` is given it
/// replaces the optimal setting.
pub fn build_breast_treatment_plan(
    stage: &str,
    tnm: &TnmCodes,
    biomarkers: &Biomarkers,
    selected: Option<Setting>,
) -> BreastPlan {
    if is_metastatic(stage, tnm) {
        return BreastPlan::Palliative;
    }

    let subtype = biomarkers.subtype();

    // TNBC and HER2+ are treated upfront from T2 or N1
    let aggressive = (subtype == Subtype::TripleNegative || subtype.is_her2_positive())
        && (tnm.t_has("T2") || tnm.n_has("N1"));
    let optimal_setting = if is_locally_advanced(stage, tnm) || aggressive {
        Setting::Neoadjuvant
    } else {
        Setting::Adjuvant
    };
    let setting = selected.unwrap_or(optimal_setting);
    if setting != optimal_setting {
        tracing::debug!(%setting, %optimal_setting, "treatment setting overridden");
    }

    BreastPlan::Curative(TreatmentPlan {
        subtype,
        setting,
        optimal_setting,
        recommendations: recommendations(subtype, setting, tnm, biomarkers),
    })
}

fn recommendations(
    subtype: Subtype,
    setting: Setting,
    tnm: &TnmCodes,
    biomarkers: &Biomarkers,
) -> Vec<String> {
    let neoadjuvant = setting == Setting::Neoadjuvant;
    let mut lines: Vec<String> = Vec::new();

    match subtype {
        Subtype::Her2LuminalB | Subtype::Her2NonLuminal => {
            let (chemo, anti_her2) = if neoadjuvant {
                ("Docetaxel-Carboplatin", "Trastuzumab + Pertuzumab")
            } else {
                ("Docetaxel-Cyclophosphamide (D-C) or T-FEC", "Trastuzumab")
            };
            lines.push(format!("Chemotherapy: {}", chemo));
            lines.push(format!("Targeted therapy: {}", anti_her2));
            if biomarkers.er.is_positive() {
                lines.push(
                    "Endocrine therapy: Tamoxifen or aromatase inhibitor (after chemotherapy)"
                        .to_string(),
                );
            }
        }
        Subtype::TripleNegative if neoadjuvant => {
            lines.push(
                "Chemotherapy: Paclitaxel/Docetaxel + Carboplatin -> EC (Epirubicin-Cyclophosphamide)"
                    .to_string(),
            );
            lines.push(
                "Immunotherapy: Pembrolizumab (at discretion in high-risk disease)".to_string(),
            );
        }
        Subtype::TripleNegative => lines.push(DC_OR_EC_DOC.to_string()),
        Subtype::LuminalA if tnm.n_has("N0") => {
            lines.push("Endocrine therapy first-line (Tamoxifen or AI).".to_string());
            lines.push(
                "Chemotherapy not routinely recommended unless high risk (e.g. genomic test)."
                    .to_string(),
            );
        }
        Subtype::LuminalA => {
            lines.push("Endocrine therapy (Tamoxifen or AI).".to_string());
            lines.push(
                "Chemotherapy (e.g. D-C x 6 or EC-Doc) at discretion (node-positive).".to_string(),
            );
        }
        Subtype::LuminalB => {
            lines.push(DC_OR_EC_DOC.to_string());
            lines.push("Endocrine therapy: Tamoxifen or aromatase inhibitor.".to_string());
            if tnm.n_has("N2") || tnm.n_has("N3") {
                lines.push("Consider adjuvant abemaciclib (high recurrence risk).".to_string());
            }
        }
    }

    lines
}
