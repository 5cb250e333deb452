use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use oncosol::cli::{Cli, CohortArgs, Commands, DoseArgs, PatientArgs, ProtocolsArgs, StageArgs};
use oncosol::dosing::{dose_cohort_file, write_cohort};
use oncosol::prelude::*;
use oncosol::staging::{classify_breast_stage_checked, Biomarkers};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = load_options(cli.options.as_deref())?;

    match cli.command {
        Commands::Metrics(args) => print_metrics(&args),
        Commands::Protocols(args) => {
            let library = load_library(&cli.protocols)?;
            print_protocols(&library, &args);
        }
        Commands::Dose(args) => {
            let library = load_library(&cli.protocols)?;
            print_dose(&library, &options, args)?;
        }
        Commands::Cohort(args) => {
            let library = load_library(&cli.protocols)?;
            run_cohort(&library, &options, &args)?;
        }
        Commands::Stage(args) => print_stage(args)?,
    }

    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<DosingOptions> {
    let Some(path) = path else {
        return Ok(DosingOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading options {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("parsing options {}", path.display()))?;
    tracing::debug!(?options, "dose engine options loaded");
    Ok(options)
}

fn load_library(path: &Path) -> Result<ProtocolLibrary> {
    let library = ProtocolLibrary::load_or_seed(path)
        .with_context(|| format!("loading protocol store {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        protocols = library.len(),
        "protocol store loaded"
    );
    Ok(library)
}

fn print_metrics(args: &PatientArgs) {
    let metrics = args.metrics();
    println!("BSA: {:.2} m²", metrics.bsa());
    println!("Creatinine clearance: {:.0} mL/min", metrics.creatinine_clearance());
    for warning in metrics.warnings() {
        println!("warning: {}", warning);
    }
}

fn print_protocols(library: &ProtocolLibrary, args: &ProtocolsArgs) {
    match &args.search {
        Some(query) => {
            for protocol in library.search(query) {
                println!("{}", protocol.name);
            }
        }
        None => {
            for name in library.list() {
                println!("{}", name);
            }
        }
    }
}

fn print_dose(library: &ProtocolLibrary, options: &DosingOptions, args: DoseArgs) -> Result<()> {
    let protocol = library.require(&args.protocol)?;
    let metrics = args.patient.metrics();
    let regimen = compute_regimen(protocol, &metrics, options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&regimen)?);
        return Ok(());
    }

    println!(
        "BSA: {:.2} m² | CrCl: {:.0} mL/min",
        regimen.bsa, regimen.gfr
    );

    let mut report = PrescriptionReport::new(protocol, &regimen);
    if let Some(labs) = args.labs {
        report = report.with_labs(labs);
    }
    for (index, amount_mg) in args.overrides {
        report = report.with_override(index, amount_mg);
    }
    println!("{}", report);

    for warning in &regimen.patient_warnings {
        println!("warning: {}", warning);
    }
    for line in &regimen.lines {
        for warning in &line.warnings {
            println!("warning: {}: {}", line.name, warning);
        }
    }
    Ok(())
}

fn run_cohort(library: &ProtocolLibrary, options: &DosingOptions, args: &CohortArgs) -> Result<()> {
    let results = dose_cohort_file(library, &args.protocol, &args.input, options)?;
    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_cohort(BufWriter::new(file), &results)?;
            tracing::info!(path = %path.display(), "cohort doses written");
        }
        None => write_cohort(io::stdout().lock(), &results)?,
    }
    Ok(())
}

fn print_stage(args: StageArgs) -> Result<()> {
    let setting = args.setting.as_deref().and_then(Setting::parse_override);

    let statement = StagingStatement::new(args.cancer)
        .with_selections(args.l1.as_deref(), args.l2.as_deref(), args.l3.as_deref())
        .with_biomarkers(Biomarkers::new(args.er, args.her2, args.ki67))
        .with_setting(setting);

    print!("{}", statement);

    if statement.breast_stage().is_some() {
        let [t, n, m] = statement.codes();
        for diagnostic in classify_breast_stage_checked(t, n, m).diagnostics {
            println!("note: {}", diagnostic);
        }
    }
    Ok(())
}
