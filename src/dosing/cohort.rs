//! Batch dosing for a cohort of patients
//!
//! Reads patients from CSV, computes one [`Regimen`] per patient and writes the
//! per-drug results back out as CSV. Patients are independent, so the regimens are
//! computed in parallel; output order follows input order.

use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::{compute_regimen, DosingOptions, Regimen};
use crate::error::OncosolError;
use crate::patient::{formulas::parse_lenient_float, PatientMetrics, Sex};
use crate::protocol::{Protocol, ProtocolLibrary};

/// Errors reading or writing cohort files
#[derive(Error, Debug, Clone)]
pub enum CohortError {
    /// Error encountered when reading or writing CSV data
    #[error("CSV error: {0}")]
    CSVError(String),
    /// A row could not be turned into a patient
    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// One patient of a cohort file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortPatient {
    pub id: String,
    pub metrics: PatientMetrics,
}

/// Raw CSV row; numeric columns accept comma decimals
#[derive(Debug, Deserialize)]
struct Row {
    id: String,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    height_cm: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    weight_kg: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    age_years: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    creatinine_umol_l: f64,
    sex: String,
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(parse_lenient_float(&s))
}

/// Read a cohort CSV file
///
/// Expected headers (case-insensitive): `id,height_cm,weight_kg,age_years,
/// creatinine_umol_l,sex`. Lines starting with `#` are skipped.
pub fn read_cohort(path: impl AsRef<Path>) -> Result<Vec<CohortPatient>, CohortError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(|e| CohortError::CSVError(e.to_string()))?;
    parse_cohort(reader)
}

/// Read a cohort from any CSV source
pub fn read_cohort_from<R: std::io::Read>(source: R) -> Result<Vec<CohortPatient>, CohortError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    parse_cohort(reader)
}

fn parse_cohort<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<CohortPatient>, CohortError> {
    // Convert headers to lowercase
    let headers = reader
        .headers()
        .map_err(|e| CohortError::CSVError(e.to_string()))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();
    reader.set_headers(csv::StringRecord::from(headers));

    let mut patients = Vec::new();
    for (i, row_result) in reader.deserialize().enumerate() {
        let row: Row = row_result.map_err(|e| CohortError::CSVError(e.to_string()))?;
        let sex: Sex = row.sex.parse().map_err(|e: crate::patient::ParseSexError| {
            CohortError::InvalidRow {
                row: i + 1,
                message: e.to_string(),
            }
        })?;

        patients.push(CohortPatient {
            id: row.id,
            metrics: PatientMetrics::new(
                row.height_cm,
                row.weight_kg,
                row.age_years,
                row.creatinine_umol_l,
                sex,
            ),
        });
    }

    Ok(patients)
}

/// Regimen of one cohort patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortDoses {
    pub id: String,
    pub regimen: Regimen,
}

/// Compute `protocol` for every patient
pub fn dose_cohort(
    protocol: &Protocol,
    patients: &[CohortPatient],
    options: &DosingOptions,
) -> Vec<CohortDoses> {
    patients
        .par_iter()
        .map(|patient| CohortDoses {
            id: patient.id.clone(),
            regimen: compute_regimen(protocol, &patient.metrics, options),
        })
        .collect()
}

/// Read the cohort at `path` and dose every patient with the named protocol
pub fn dose_cohort_file(
    library: &ProtocolLibrary,
    protocol: &str,
    path: impl AsRef<Path>,
    options: &DosingOptions,
) -> Result<Vec<CohortDoses>, OncosolError> {
    let protocol = library.require(protocol)?;
    let patients = read_cohort(path)?;
    tracing::info!(
        patients = patients.len(),
        protocol = %protocol.name,
        "dosing cohort"
    );
    Ok(dose_cohort(protocol, &patients, options))
}

/// Write cohort results as CSV, one row per patient and drug
pub fn write_cohort<W: Write>(writer: W, results: &[CohortDoses]) -> Result<(), CohortError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    writer
        .write_record([
            "id",
            "drug",
            "computed_mg",
            "prescribed_mg",
            "tablets",
            "warnings",
        ])
        .map_err(|e| CohortError::CSVError(e.to_string()))?;

    for result in results {
        for line in &result.regimen.lines {
            let warnings = result
                .regimen
                .patient_warnings
                .iter()
                .map(|w| w.to_string())
                .chain(line.warnings.iter().map(|w| w.to_string()))
                .collect::<Vec<_>>()
                .join("; ");

            writer
                .write_record([
                    result.id.as_str(),
                    line.name.as_str(),
                    &format!("{:.2}", line.computed_mg),
                    &line.prescribed_mg.to_string(),
                    &line
                        .tablets()
                        .map(|t| format!("{:.1}", t))
                        .unwrap_or_else(|| ".".to_string()),
                    &warnings,
                ])
                .map_err(|e| CohortError::CSVError(e.to_string()))?;
        }
    }

    writer
        .flush()
        .map_err(|e| CohortError::CSVError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COHORT: &str = "\
ID,Height_cm,Weight_kg,Age_years,Creatinine_umol_l,Sex
# comment line
p1,180,80,50,100,male
p2, 165 ,\"60,5\",72,85,F
";

    #[test]
    fn reads_cohort_with_lenient_numbers() {
        let patients = read_cohort_from(COHORT.as_bytes()).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].id, "p1");
        assert_eq!(patients[0].metrics.sex, Sex::Male);
        assert_eq!(patients[1].metrics.height_cm, 165.0);
        assert_eq!(patients[1].metrics.weight_kg, 60.5);
        assert_eq!(patients[1].metrics.sex, Sex::Female);
    }

    #[test]
    fn rejects_unknown_sex() {
        let csv = "id,height_cm,weight_kg,age_years,creatinine_umol_l,sex\np1,180,80,50,100,x\n";
        assert!(matches!(
            read_cohort_from(csv.as_bytes()),
            Err(CohortError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn doses_keep_input_order() {
        let library = ProtocolLibrary::seed();
        let protocol = library.require("R-CHOP (NHL)").unwrap();
        let patients = read_cohort_from(COHORT.as_bytes()).unwrap();

        let results = dose_cohort(protocol, &patients, &DosingOptions::default());
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(results[0].regimen.lines[0].prescribed_mg, 750);
    }

    #[test]
    fn cohort_file_errors_name_their_source() {
        let library = ProtocolLibrary::seed();
        let options = DosingOptions::default();

        assert!(matches!(
            dose_cohort_file(&library, "FOLFOX", "missing.csv", &options),
            Err(OncosolError::ProtocolError(_))
        ));
        assert!(matches!(
            dose_cohort_file(&library, "R-CHOP (NHL)", "/nonexistent/cohort.csv", &options),
            Err(OncosolError::CohortError(CohortError::CSVError(_)))
        ));
    }

    #[test]
    fn writes_one_row_per_drug() {
        let library = ProtocolLibrary::seed();
        let protocol = library.require("R-CHOP (NHL)").unwrap();
        let patients = read_cohort_from(COHORT.as_bytes()).unwrap();
        let results = dose_cohort(protocol, &patients, &DosingOptions::default());

        let mut out = Vec::new();
        write_cohort(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 1 + 2 * 5);
        assert_eq!(rows[0], "id,drug,computed_mg,prescribed_mg,tablets,warnings");
        assert_eq!(rows[1], "p1,Rituximab,750.00,750,.,");
        assert!(rows[5].starts_with("p1,Prednisolone,80.00,80,2.0,"));
    }
}
