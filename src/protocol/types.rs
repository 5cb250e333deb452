//! Protocol data model
//!
//! A [`Protocol`] is one chemotherapy regimen as stored in the protocol store: supportive
//! care text, monitoring labs, cycle length and an ordered list of [`DrugEntry`] records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ProtocolError;

// ═══════════════════════════════════════════════════════════════════════════════
// Dose units
// ═══════════════════════════════════════════════════════════════════════════════

/// How a drug's `dose_value` is converted to milligrams
///
/// Serialized as the unit string used in the store (`"mg/m2"`, `"mg/kg"`, `"AUC"`,
/// `"mg"`). Unknown strings survive a round trip as [`DoseUnit::Other`] and are dosed
/// as absolute milligrams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DoseUnit {
    /// mg per m² of body surface area
    #[default]
    PerBsa,
    /// mg per kg of body weight
    PerKg,
    /// Target area under the curve (Calvert formula)
    Auc,
    /// Flat dose in mg
    Absolute,
    /// Anything else found in the store
    Other(String),
}

impl DoseUnit {
    /// Units offered to the user when editing a drug row
    pub const KNOWN: [DoseUnit; 4] = [
        DoseUnit::PerBsa,
        DoseUnit::PerKg,
        DoseUnit::Auc,
        DoseUnit::Absolute,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DoseUnit::PerBsa => "mg/m2",
            DoseUnit::PerKg => "mg/kg",
            DoseUnit::Auc => "AUC",
            DoseUnit::Absolute => "mg",
            DoseUnit::Other(unit) => unit,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DoseUnit::Other(_))
    }
}

impl From<String> for DoseUnit {
    fn from(value: String) -> Self {
        match value.trim() {
            "mg/m2" | "mg/m²" => DoseUnit::PerBsa,
            "mg/kg" => DoseUnit::PerKg,
            "AUC" | "auc" => DoseUnit::Auc,
            "mg" => DoseUnit::Absolute,
            _ => DoseUnit::Other(value),
        }
    }
}

impl From<&str> for DoseUnit {
    fn from(value: &str) -> Self {
        DoseUnit::from(value.to_string())
    }
}

impl From<DoseUnit> for String {
    fn from(unit: DoseUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drugs and protocols
// ═══════════════════════════════════════════════════════════════════════════════

/// A single drug of a protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugEntry {
    pub name: String,
    /// Dose per [`DoseUnit`]
    pub dose_value: f64,
    /// Defaults to mg/m2 when absent
    #[serde(default)]
    pub dose_unit: DoseUnit,
    /// Available tablet strengths, e.g. `["40 mg", "20 mg"]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tablet_strengths: Vec<String>,
    /// Cap on a single administration
    ///
    /// Reported by the dose engine when exceeded, never applied.
    #[serde(default)]
    pub max_dose_mg: Option<f64>,
    /// Days of the cycle the drug is given on, e.g. `"d1-5"`
    #[serde(default)]
    pub schedule_days: String,
    /// Route and administration note, e.g. `"iv (slow infusion)"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl DrugEntry {
    pub fn new(name: impl Into<String>, dose_value: f64, dose_unit: DoseUnit) -> Self {
        Self {
            name: name.into(),
            dose_value,
            dose_unit,
            tablet_strengths: Vec::new(),
            max_dose_mg: None,
            schedule_days: String::new(),
            instructions: None,
        }
    }

    pub fn with_tablet_strengths<S: Into<String>>(
        mut self,
        strengths: impl IntoIterator<Item = S>,
    ) -> Self {
        self.tablet_strengths = strengths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_dose(mut self, max_dose_mg: f64) -> Self {
        self.max_dose_mg = Some(max_dose_mg);
        self
    }

    pub fn with_schedule(mut self, schedule_days: impl Into<String>) -> Self {
        self.schedule_days = schedule_days.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Whether the drug is dispensed as tablets
    pub fn is_oral(&self) -> bool {
        !self.tablet_strengths.is_empty()
    }
}

/// A chemotherapy protocol
///
/// The name is the key in the store and is filled in by the library on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub cycle_length: String,
    #[serde(default)]
    pub monitoring_labs: String,
    #[serde(default)]
    pub premedication: String,
    pub drugs: Vec<DrugEntry>,
}

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cycle_length: String::new(),
            monitoring_labs: String::new(),
            premedication: String::new(),
            drugs: Vec::new(),
        }
    }

    pub fn with_cycle_length(mut self, cycle_length: impl Into<String>) -> Self {
        self.cycle_length = cycle_length.into();
        self
    }

    pub fn with_monitoring_labs(mut self, labs: impl Into<String>) -> Self {
        self.monitoring_labs = labs.into();
        self
    }

    pub fn with_premedication(mut self, premedication: impl Into<String>) -> Self {
        self.premedication = premedication.into();
        self
    }

    pub fn with_drug(mut self, drug: DrugEntry) -> Self {
        self.drugs.push(drug);
        self
    }

    /// Check the invariants the dose engine relies on
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.drugs.is_empty() {
            return Err(ProtocolError::EmptyDrugList(self.name.clone()));
        }
        Ok(())
    }
}
