use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use deadmap_qa::pipeline::{DeadMapObject, DeadMapQa, QaOutcome, RunTiming};
use deadmap_qa::qa::QaReport;
use deadmap_qa::sanity::check_lookup;
use deadmap_qa::{QaConfig, Topology};

const USAGE: &str = "usage: deadmap_qa <object.json> [--config <config.json>] \
[--timing <timing.json>] [--stop-object <object.json>] [--output <report.json>] [--products]";

#[derive(Debug, Default)]
struct Options {
    object: Option<PathBuf>,
    config: Option<PathBuf>,
    timing: Option<PathBuf>,
    stop_object: Option<PathBuf>,
    output: Option<PathBuf>,
    products: bool,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    verdict: deadmap_qa::Severity,
    report: &'a QaReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<&'a QaReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a QaOutcome>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--config" => options.config = Some(value("--config")?),
            "--timing" => options.timing = Some(value("--timing")?),
            "--stop-object" => options.stop_object = Some(value("--stop-object")?),
            "--output" => options.output = Some(value("--output")?),
            "--products" => options.products = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => options.object = Some(PathBuf::from(&arg)),
        }
    }
    if options.object.is_none() {
        return Err("no object file given".to_string());
    }
    Ok(options)
}

fn run(options: &Options) -> Result<(), String> {
    let config = match &options.config {
        Some(path) => QaConfig::from_json_str(&read(path)?)
            .map_err(|err| format!("{}: {err}", path.display()))?,
        None => QaConfig::default(),
    };
    let object: Option<DeadMapObject> = match &options.object {
        Some(path) => load(path)?,
        None => None,
    };
    let timing: Option<RunTiming> = match &options.timing {
        Some(path) => Some(load(path)?),
        None => None,
    };

    let lookup = match (&options.stop_object, &object, &timing) {
        (Some(path), Some(at_start), Some(timing)) => {
            let at_stop: DeadMapObject = load(path)?;
            let report = check_lookup(at_start, &at_stop, timing, &config);
            info!(verdict = %report.global_verdict(), "lookup check finished");
            Some(report)
        }
        (Some(_), _, _) => return Err("--stop-object needs an object and --timing".to_string()),
        _ => None,
    };

    let qa = DeadMapQa::new(config, Topology::its()).map_err(|err| err.to_string())?;
    let outcome = qa.run(object.as_ref(), timing.as_ref());
    for line in outcome.report().summary().lines() {
        info!("{line}");
    }

    let summary = RunSummary {
        verdict: outcome.verdict(),
        report: outcome.report(),
        lookup: lookup.as_ref(),
        outcome: options.products.then_some(&outcome),
    };
    let json = serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())?;
    match &options.output {
        Some(path) => fs::write(path, json).map_err(|err| format!("{}: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    serde_json::from_str(&read(path)?).map_err(|err| format!("{}: {err}", path.display()))
}
