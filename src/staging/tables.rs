//! Staging reference data
//!
//! One compiled-in [`StagingTable`] per [`CancerType`]. Every table has three axes
//! (T/N/M, or Ann Arbor regions/symptoms/modifiers) whose options read
//! `"CODE: description"`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// How the three axes of a table are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagingKind {
    /// Tumour / node / metastasis
    Tnm,
    /// Lymphoma: involved regions, systemic symptoms, modifiers
    AnnArbor,
}

/// One classification axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingAxis {
    pub label: &'static str,
    pub options: &'static [&'static str],
}

impl StagingAxis {
    /// Codes of all options, in display order
    pub fn codes(&self) -> impl Iterator<Item = &'static str> {
        self.options.iter().map(|option| option_code(option))
    }

    /// Whether `code` is one of the axis codes
    pub fn contains_code(&self, code: &str) -> bool {
        self.codes().any(|c| c == code.trim())
    }

    /// The full option for `code`
    pub fn option(&self, code: &str) -> Option<&'static str> {
        self.options
            .iter()
            .copied()
            .find(|option| option_code(option) == code.trim())
    }
}

/// Staging reference table of one cancer type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingTable {
    pub kind: StagingKind,
    pub axes: [StagingAxis; 3],
}

/// Code part of a `"CODE: description"` option
///
/// ```rust
/// use oncosol::staging::option_code;
///
/// assert_eq!(option_code("T1c: >10-20 mm"), "T1c");
/// assert_eq!(option_code("N0"), "N0");
/// ```
pub fn option_code(option: &str) -> &str {
    option.split(':').next().unwrap_or_default().trim()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cancer types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancerType {
    Breast,
    Lymphoma,
    Prostate,
    Lung,
}

impl CancerType {
    pub const ALL: [CancerType; 4] = [
        CancerType::Breast,
        CancerType::Lymphoma,
        CancerType::Prostate,
        CancerType::Lung,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CancerType::Breast => "Breast cancer",
            CancerType::Lymphoma => "Lymphoma (Ann Arbor)",
            CancerType::Prostate => "Prostate cancer",
            CancerType::Lung => "Lung cancer (NSCLC)",
        }
    }

    pub fn table(&self) -> &'static StagingTable {
        match self {
            CancerType::Breast => &BREAST,
            CancerType::Lymphoma => &LYMPHOMA,
            CancerType::Prostate => &PROSTATE,
            CancerType::Lung => &LUNG,
        }
    }
}

impl fmt::Display for CancerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown cancer type '{0}', expected breast, lymphoma, prostate or lung")]
pub struct ParseCancerTypeError(pub String);

impl FromStr for CancerType {
    type Err = ParseCancerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breast" => Ok(CancerType::Breast),
            "lymphoma" | "ann-arbor" | "annarbor" => Ok(CancerType::Lymphoma),
            "prostate" => Ok(CancerType::Prostate),
            "lung" | "nsclc" => Ok(CancerType::Lung),
            _ => Err(ParseCancerTypeError(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════════════════════════

const T_LABEL: &str = "T (Tumour)";
const N_LABEL: &str = "N (Nodes)";
const M_LABEL: &str = "M (Metastases)";

static BREAST: StagingTable = StagingTable {
    kind: StagingKind::Tnm,
    axes: [
        StagingAxis {
            label: T_LABEL,
            options: &[
                "Tx: Cannot be assessed",
                "T0: No primary tumour",
                "Tis: In situ (DCIS/LCIS)",
                "T1mi: ≤ 1 mm",
                "T1a: >1-5 mm",
                "T1b: >5-10 mm",
                "T1c: >10-20 mm",
                "T2: >20-50 mm",
                "T3: >50 mm",
                "T4a: Chest wall",
                "T4b: Skin ulceration/oedema",
                "T4c: T4a+T4b",
                "T4d: Inflammatory",
            ],
        },
        StagingAxis {
            label: N_LABEL,
            options: &[
                "Nx: Cannot be assessed",
                "N0: No regional spread",
                "N1mi: Micrometastases",
                "N1: 1-3 axillary nodes",
                "N2a: 4-9 axillary nodes",
                "N2b: Internal mammary nodes",
                "N3a: ≥10 axillary nodes",
                "N3b: Internal mammary + axillary",
                "N3c: Supraclavicular",
            ],
        },
        StagingAxis {
            label: M_LABEL,
            options: &["M0: No distant metastases", "M1: Distant metastasis present"],
        },
    ],
};

static LYMPHOMA: StagingTable = StagingTable {
    kind: StagingKind::AnnArbor,
    axes: [
        StagingAxis {
            label: "Involved regions",
            options: &[
                "I: Single lymph node region OR single localized extranodal site (IE)",
                "II: Two or more regions on the same side of the diaphragm",
                "III: Lymph node regions on both sides of the diaphragm",
                "IV: Diffuse or disseminated involvement of one or more extralymphatic organs",
            ],
        },
        StagingAxis {
            label: "Symptoms (A/B)",
            options: &[
                "A: No systemic symptoms",
                "B: Systemic symptoms (fever >38°C, night sweats, weight loss >10%)",
            ],
        },
        StagingAxis {
            label: "Modifiers",
            options: &[
                "-: No modifiers",
                "E: Localized extranodal extension",
                "S: Splenic involvement",
                "X: Bulky disease (e.g. >10 cm or >1/3 of chest diameter)",
            ],
        },
    ],
};

static PROSTATE: StagingTable = StagingTable {
    kind: StagingKind::Tnm,
    axes: [
        StagingAxis {
            label: T_LABEL,
            options: &[
                "T1c: Needle biopsy (PSA)",
                "T2a: ≤50% of one lobe",
                "T2b: >50% of one lobe",
                "T2c: Both lobes",
                "T3a: Extracapsular extension",
                "T3b: Seminal vesicle",
                "T4: Invasion of adjacent structures",
            ],
        },
        StagingAxis {
            label: N_LABEL,
            options: &["N0: No regional nodes", "N1: Regional lymph node"],
        },
        StagingAxis {
            label: M_LABEL,
            options: &[
                "M0: No distant metastases",
                "M1a: Non-regional lymph nodes",
                "M1b: Bone",
                "M1c: Other organ",
            ],
        },
    ],
};

static LUNG: StagingTable = StagingTable {
    kind: StagingKind::Tnm,
    axes: [
        StagingAxis {
            label: T_LABEL,
            options: &[
                "T1a: ≤1cm",
                "T1b: >1-2cm",
                "T1c: >2-3cm",
                "T2a: >3-4cm",
                "T2b: >4-5cm",
                "T3: >5-7cm",
                "T4: >7cm or invasion",
            ],
        },
        StagingAxis {
            label: N_LABEL,
            options: &[
                "N0: No regional spread",
                "N1: Hilar/peribronchial",
                "N2: Mediastinal (ipsilateral)",
                "N3: Contralateral/supraclavicular",
            ],
        },
        StagingAxis {
            label: M_LABEL,
            options: &[
                "M0: No distant metastases",
                "M1a: Pleura/pericardium",
                "M1b: Single metastasis",
                "M1c: Multiple metastases",
            ],
        },
    ],
};
