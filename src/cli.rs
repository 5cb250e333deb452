use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::patient::{PatientMetrics, Sex};
use crate::staging::{CancerType, Ki67, ReceptorStatus};

#[derive(Debug, Parser)]
#[command(name = "oncosol", version, about = "Oncology dose calculation and cancer staging")]
pub struct Cli {
    /// Protocol store, created with the built-in protocols if missing
    #[arg(long, global = true, default_value = "protocols.json")]
    pub protocols: PathBuf,

    /// Dose engine options (JSON)
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Body surface area and creatinine clearance
    Metrics(PatientArgs),
    /// List the protocols of the store
    Protocols(ProtocolsArgs),
    /// Prescription report for one patient
    Dose(DoseArgs),
    /// Dose a protocol for every patient of a CSV file
    Cohort(CohortArgs),
    /// Staging statement and breast treatment plan
    Stage(StageArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PatientArgs {
    #[arg(long, help = "Height (cm)")]
    pub height: String,

    #[arg(long, help = "Weight (kg)")]
    pub weight: String,

    #[arg(long, help = "Age (years)")]
    pub age: String,

    #[arg(long, help = "Serum creatinine (µmol/L)")]
    pub creatinine: String,

    #[arg(long, default_value = "male")]
    pub sex: Sex,
}

impl PatientArgs {
    /// Numbers are parsed leniently: comma decimals are accepted, anything else is 0
    pub fn metrics(&self) -> PatientMetrics {
        PatientMetrics::from_text(
            &self.height,
            &self.weight,
            &self.age,
            &self.creatinine,
            self.sex,
        )
    }
}

#[derive(Debug, Args)]
pub struct ProtocolsArgs {
    #[arg(long, help = "Only protocols whose name contains this text")]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct DoseArgs {
    #[arg(long)]
    pub protocol: String,

    #[command(flatten)]
    pub patient: PatientArgs,

    #[arg(
        long = "override",
        value_parser = parse_override,
        help = "Hand-entered amount for a drug, as <index>=<mg> (repeatable)"
    )]
    pub overrides: Vec<(usize, f64)>,

    #[arg(long, help = "Monitoring labs to print instead of the protocol's")]
    pub labs: Option<String>,

    #[arg(long, default_value_t = false, help = "Print the regimen as JSON")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CohortArgs {
    #[arg(long)]
    pub protocol: String,

    #[arg(long, help = "Cohort CSV (id,height_cm,weight_kg,age_years,creatinine_umol_l,sex)")]
    pub input: PathBuf,

    #[arg(long, help = "Output CSV (default: stdout)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StageArgs {
    #[arg(long, help = "breast, lymphoma, prostate or lung")]
    pub cancer: CancerType,

    #[arg(long, help = "First axis (T, or Ann Arbor region stage)")]
    pub l1: Option<String>,

    #[arg(long, help = "Second axis (N, or symptoms A/B)")]
    pub l2: Option<String>,

    #[arg(long, help = "Third axis (M, or modifier)")]
    pub l3: Option<String>,

    #[arg(long, default_value = "positive")]
    pub er: ReceptorStatus,

    #[arg(long, default_value = "negative")]
    pub her2: ReceptorStatus,

    #[arg(long, default_value = "low")]
    pub ki67: Ki67,

    #[arg(
        long,
        help = "Treatment setting override: neoadjuvant, adjuvant or -. Unknown values use the optimal setting"
    )]
    pub setting: Option<String>,
}

/// Parse `<index>=<mg>`
pub fn parse_override(s: &str) -> Result<(usize, f64), String> {
    let (index, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <index>=<mg>, got '{}'", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid drug index '{}': {}", index, e))?;
    let amount = amount.trim().replace(',', ".");
    let amount = amount
        .parse::<f64>()
        .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;
    Ok((index, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        assert_eq!(parse_override("3=2"), Ok((3, 2.0)));
        assert_eq!(parse_override(" 0 = 1,5 "), Ok((0, 1.5)));
        assert!(parse_override("3").is_err());
        assert!(parse_override("x=2").is_err());
    }

    #[test]
    fn parses_dose_command() {
        let cli = Cli::try_parse_from([
            "oncosol",
            "dose",
            "--protocol",
            "R-CHOP (NHL)",
            "--height",
            "180",
            "--weight",
            "80,5",
            "--age",
            "50",
            "--creatinine",
            "100",
            "--sex",
            "F",
            "--override",
            "3=2",
        ])
        .unwrap();

        assert_eq!(cli.protocols, PathBuf::from("protocols.json"));
        match cli.command {
            Commands::Dose(args) => {
                assert_eq!(args.overrides, vec![(3, 2.0)]);
                let metrics = args.patient.metrics();
                assert_eq!(metrics.weight_kg, 80.5);
                assert_eq!(metrics.sex, Sex::Female);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_stage_command() {
        let cli = Cli::try_parse_from([
            "oncosol", "stage", "--cancer", "breast", "--l1", "T2", "--her2", "positive",
        ])
        .unwrap();

        match cli.command {
            Commands::Stage(args) => {
                assert_eq!(args.cancer, CancerType::Breast);
                assert_eq!(args.her2, ReceptorStatus::Positive);
                assert_eq!(args.ki67, Ki67::Low);
                assert_eq!(args.l2, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
