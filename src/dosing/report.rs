//! Prescription report
//!
//! Turns a computed [`Regimen`] into the copyable text block handed to the pharmacy.
//! Clinicians may overwrite any computed amount before the report is rendered; the
//! override is taken as given and not checked against the computed dose.

use std::collections::BTreeMap;
use std::fmt;

use super::calc::tablet_count;
use super::Regimen;
use crate::protocol::Protocol;

const SEPARATOR_WIDTH: usize = 40;

/// One drug row of a [`PrescriptionReport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    /// Amount to give, mg
    pub amount_mg: f64,
    /// Whether `amount_mg` was entered by hand
    pub overridden: bool,
    pub strength: Option<String>,
    pub tablets: Option<f64>,
    pub schedule_days: String,
}

/// Text report of a protocol prescription
#[derive(Debug, Clone)]
pub struct PrescriptionReport<'a> {
    protocol: &'a Protocol,
    regimen: &'a Regimen,
    labs: Option<String>,
    overrides: BTreeMap<usize, f64>,
}

impl<'a> PrescriptionReport<'a> {
    pub fn new(protocol: &'a Protocol, regimen: &'a Regimen) -> Self {
        Self {
            protocol,
            regimen,
            labs: None,
            overrides: BTreeMap::new(),
        }
    }

    /// Replace the protocol's monitoring labs
    pub fn with_labs(mut self, labs: impl Into<String>) -> Self {
        self.labs = Some(labs.into());
        self
    }

    /// Use a hand-entered amount for the drug at `index`
    ///
    /// Indices past the end of the regimen are ignored.
    pub fn with_override(mut self, index: usize, amount_mg: f64) -> Self {
        if index < self.regimen.lines.len() {
            self.overrides.insert(index, amount_mg);
        } else {
            tracing::warn!(index, "dose override for a drug that is not in the regimen");
        }
        self
    }

    pub fn labs(&self) -> &str {
        self.labs
            .as_deref()
            .unwrap_or(self.protocol.monitoring_labs.as_str())
    }

    /// Drug rows with overrides applied
    pub fn lines(&self) -> Vec<ReportLine> {
        self.regimen
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let overridden = self.overrides.get(&i).copied();
                let amount_mg = overridden.unwrap_or(line.prescribed_mg as f64);
                ReportLine {
                    name: line.name.clone(),
                    amount_mg,
                    overridden: overridden.is_some(),
                    strength: line.strength.clone(),
                    tablets: line
                        .strength_mg
                        .and_then(|strength| tablet_count(amount_mg, strength)),
                    schedule_days: line.schedule_days.clone(),
                }
            })
            .collect()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PrescriptionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(SEPARATOR_WIDTH);

        writeln!(f, "PROTOCOL: {}", self.protocol.name)?;
        if !self.protocol.cycle_length.is_empty() {
            writeln!(f, "Cycle: {}", self.protocol.cycle_length)?;
        }
        writeln!(f, "Labs: {}", self.labs())?;
        writeln!(f, "{}", separator)?;

        for line in self.lines() {
            writeln!(f, "• {}: {} mg", line.name, line.amount_mg)?;
            if let (Some(tablets), Some(strength)) = (line.tablets, &line.strength) {
                writeln!(f, "    -> {:.1} tablets ({})", tablets, strength)?;
            }
            if !line.schedule_days.is_empty() {
                writeln!(f, "   Schedule: {}", line.schedule_days)?;
            }
        }

        writeln!(f, "{}", separator)?;
        let premedication = if self.protocol.premedication.is_empty() {
            "-"
        } else {
            self.protocol.premedication.as_str()
        };
        write!(f, "SUPPORTIVE CARE:\n{}", premedication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dosing::{compute_regimen, DosingOptions};
    use crate::patient::{PatientMetrics, Sex};
    use crate::protocol::ProtocolLibrary;

    fn r_chop_report_parts() -> (Protocol, Regimen) {
        let protocol = ProtocolLibrary::seed()
            .require("R-CHOP (NHL)")
            .unwrap()
            .clone();
        let patient = PatientMetrics::new(180.0, 80.0, 50.0, 100.0, Sex::Male);
        let regimen = compute_regimen(&protocol, &patient, &DosingOptions::default());
        (protocol, regimen)
    }

    #[test]
    fn renders_full_report() {
        let (protocol, regimen) = r_chop_report_parts();
        let text = PrescriptionReport::new(&protocol, &regimen).render();

        let expected = "\
PROTOCOL: R-CHOP (NHL)
Cycle: 21 days
Labs: Blood count, Creatinine, ALT, ALP, ECG (pre-phase if needed)
----------------------------------------
• Rituximab: 750 mg
   Schedule: d1
• Cyclophosphamide: 1500 mg
   Schedule: d1
• Doxorubicin: 100 mg
   Schedule: d1
• Vincristine: 3 mg
   Schedule: d1
• Prednisolone: 80 mg
    -> 2.0 tablets (40 mg)
   Schedule: d1-5
----------------------------------------
SUPPORTIVE CARE:
Corticosteroid iv/po, Antihistamine, Paracetamol. G-CSF support if needed.";

        assert_eq!(text, expected);
    }

    #[test]
    fn overrides_replace_amounts_and_tablets() {
        let (protocol, regimen) = r_chop_report_parts();
        let report = PrescriptionReport::new(&protocol, &regimen)
            .with_labs("Blood count")
            .with_override(3, 2.0)
            .with_override(4, 100.0)
            .with_override(9, 1.0);

        let lines = report.lines();
        assert_eq!(lines[3].amount_mg, 2.0);
        assert!(lines[3].overridden);
        assert_eq!(lines[4].tablets, Some(2.5));
        assert!(!lines[0].overridden);

        let text = report.render();
        assert!(text.contains("Labs: Blood count\n"));
        assert!(text.contains("• Vincristine: 2 mg\n"));
        assert!(text.contains("    -> 2.5 tablets (40 mg)\n"));
    }

    #[test]
    fn zero_override_drops_tablet_count() {
        let (protocol, regimen) = r_chop_report_parts();
        let report = PrescriptionReport::new(&protocol, &regimen).with_override(4, 0.0);
        assert_eq!(report.lines()[4].tablets, None);
        assert!(!report.render().contains("tablets"));
    }
}
