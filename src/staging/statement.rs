//! Staging statement
//!
//! Text summary of the selections made for one cancer type: the compound stage, the
//! breast stage group and treatment plan where they apply, and the selected options.

use std::fmt;

use super::advisor::{build_breast_treatment_plan, Biomarkers, BreastPlan, Setting};
use super::ann_arbor::compose_ann_arbor;
use super::breast::{BreastStage, TnmCodes};
use super::tables::{option_code, CancerType, StagingKind};

const SEPARATOR_WIDTH: usize = 40;
const UNSELECTED: &str = "?";

/// Bullet labels of the Ann Arbor axes
const ANN_ARBOR_BULLETS: [&str; 3] = ["Extent", "Symptoms", "Modifier"];

/// Selections for one cancer type and the statement derived from them
///
/// A selection is either a code (`"T1c"`) or a full option (`"T1c: >10-20 mm"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingStatement {
    cancer: CancerType,
    selections: [Option<String>; 3],
    biomarkers: Biomarkers,
    setting: Option<Setting>,
}

impl StagingStatement {
    pub fn new(cancer: CancerType) -> Self {
        Self {
            cancer,
            selections: [None, None, None],
            biomarkers: Biomarkers::default(),
            setting: None,
        }
    }

    /// Select an option on axis `axis` (0, 1 or 2)
    ///
    /// Empty selections and axes past the third are ignored.
    pub fn with_selection(mut self, axis: usize, option: impl Into<String>) -> Self {
        let option = option.into();
        match self.selections.get_mut(axis) {
            Some(slot) if !option.trim().is_empty() => *slot = Some(option),
            Some(_) => {}
            None => tracing::warn!(axis, "staging tables have three axes"),
        }
        self
    }

    pub fn with_selections(
        self,
        first: Option<&str>,
        second: Option<&str>,
        third: Option<&str>,
    ) -> Self {
        [first, second, third]
            .into_iter()
            .enumerate()
            .fold(self, |statement, (axis, option)| match option {
                Some(option) => statement.with_selection(axis, option),
                None => statement,
            })
    }

    pub fn with_biomarkers(mut self, biomarkers: Biomarkers) -> Self {
        self.biomarkers = biomarkers;
        self
    }

    /// Manually selected treatment setting
    pub fn with_setting(mut self, setting: Option<Setting>) -> Self {
        self.setting = setting;
        self
    }

    pub fn cancer(&self) -> CancerType {
        self.cancer
    }

    /// Selected codes, `?` for unselected axes
    pub fn codes(&self) -> [&str; 3] {
        [self.code(0), self.code(1), self.code(2)]
    }

    fn code(&self, axis: usize) -> &str {
        self.selections[axis]
            .as_deref()
            .map(option_code)
            .unwrap_or(UNSELECTED)
    }

    fn is_complete(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    /// Full option text of a selection, as listed in the table when the code is known
    fn option_text(&self, axis: usize) -> Option<&str> {
        let selected = self.selections[axis].as_deref()?;
        let table_axis = &self.cancer.table().axes[axis];
        Some(table_axis.option(option_code(selected)).unwrap_or(selected))
    }

    /// Compound Ann Arbor stage, for lymphoma
    pub fn ann_arbor(&self) -> Option<String> {
        if self.cancer.table().kind != StagingKind::AnnArbor {
            return None;
        }
        let [stage, symptoms, modifier] = self.codes();
        Some(compose_ann_arbor(stage, symptoms, modifier))
    }

    /// Breast stage group, once all three axes are selected
    pub fn breast_stage(&self) -> Option<BreastStage> {
        if self.cancer != CancerType::Breast || !self.is_complete() {
            return None;
        }
        let [t, n, m] = self.codes();
        Some(TnmCodes::new(t, n, m).stage())
    }

    /// Breast treatment plan, once all three axes are selected
    pub fn breast_plan(&self) -> Option<BreastPlan> {
        let stage = self.breast_stage()?;
        let [t, n, m] = self.codes();
        Some(build_breast_treatment_plan(
            stage.label(),
            &TnmCodes::new(t, n, m),
            &self.biomarkers,
            self.setting,
        ))
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StagingStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        let table = self.cancer.table();

        writeln!(f, "Diagnosis: {}", self.cancer)?;

        if let Some(stage) = self.ann_arbor() {
            writeln!(f, "Ann Arbor stage: {}", stage)?;
            writeln!(f, "{}", separator)?;
            for (axis, label) in ANN_ARBOR_BULLETS.iter().enumerate() {
                if let Some(option) = self.option_text(axis) {
                    if axis == 2 && option_code(option) == "-" {
                        continue;
                    }
                    writeln!(f, "• {}: {}", label, option)?;
                }
            }
            return Ok(());
        }

        let [t, n, m] = self.codes();
        write!(f, "Clinical stage (cTNM): {}{}{}", t, n, m)?;
        if let (Some(stage), Some(plan)) = (self.breast_stage(), self.breast_plan()) {
            write!(f, "\nAnatomic stage group: {}", stage)?;
            write!(f, "\n\n--- TREATMENT PLAN ---\n{}", plan)?;
        }
        write!(f, "\n{}\n", separator)?;
        for (axis, table_axis) in table.axes.iter().enumerate() {
            if let Some(option) = self.option_text(axis) {
                writeln!(f, "• {}: {}", table_axis.label, option)?;
            }
        }
        Ok(())
    }
}
