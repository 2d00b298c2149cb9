//! earthvol: cut/fill volume surveys from the command line.

use clap::Parser;
use earthvol_cli::{registry, Cli, Command, SurveyArgs};
use earthvol_core::{run_survey, SurveyConfig, SurveyError, SurveyOutcome};
use earthvol_engine::EngineError;
use earthvol_qgis::QgisProcessEngine;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let result = match cli.command {
        Command::Survey(args) => survey(&args),
        Command::Algorithms => {
            list_algorithms();
            Ok(())
        }
        Command::Run { id, args } => match registry::find(&id) {
            Some(_) => survey(&args),
            None => {
                let known: Vec<&str> = registry::ALGORITHMS.iter().map(|a| a.id).collect();
                Err(SurveyError::Config(format!(
                    "unknown algorithm '{id}' (known: {})",
                    known.join(", ")
                )))
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn survey(args: &SurveyArgs) -> Result<(), SurveyError> {
    let engine =
        QgisProcessEngine::discover(args.qgis_process.clone()).map_err(|err| match err {
            EngineError::Unavailable(reason) => SurveyError::EngineUnavailable(reason),
            other => SurveyError::EngineUnavailable(other.to_string()),
        })?;

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!(error = %err, "could not install ctrl-c handler");
    }

    // The clipped raster is scratch unless the caller asked to keep it.
    let mut scratch = None;
    let clipped = if args.keep_clipped {
        args.output.with_extension("clipped.tif")
    } else {
        let dir = tempfile::tempdir().map_err(|err| {
            SurveyError::Config(format!("cannot create scratch directory: {err}"))
        })?;
        let path = dir.path().join("clipped_dem.tif");
        scratch = Some(dir);
        path
    };

    let config = args.survey_config(clipped);
    let outcome = run_survey(&engine, &config, Some(&cancel))?;
    report(&config, &outcome);
    drop(scratch);
    Ok(())
}

fn report(config: &SurveyConfig, outcome: &SurveyOutcome) {
    println!(
        "Swept {} levels from {} m to {} m (step {} m)",
        outcome.levels, outcome.range.minimum, outcome.range.maximum, outcome.step
    );
    println!("Volume data saved to: {}", config.output.display());

    if !outcome.skipped.is_empty() {
        eprintln!("{} level(s) skipped:", outcome.skipped.len());
        for skip in &outcome.skipped {
            eprintln!("  {} m: {}", skip.level, skip.reason);
        }
    }
}

fn list_algorithms() {
    for algorithm in registry::ALGORITHMS {
        println!("{}  ({})", algorithm.id, algorithm.display_name);
        println!("    {}", algorithm.summary);
    }
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Exit codes: 2 for usage/configuration mistakes, 130 for an interrupted
/// run, 1 for everything else.
fn exit_code(err: &SurveyError) -> u8 {
    match err {
        SurveyError::Config(_) | SurveyError::Level(_) => 2,
        SurveyError::Cancelled => 130,
        _ => 1,
    }
}
