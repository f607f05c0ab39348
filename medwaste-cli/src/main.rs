//! Batch runner that evaluates every scenario × facility × process cell and
//! prints the resulting inventory exchanges as CSV.

mod app;
mod args;
mod report;

use std::{env, fs, io, sync::Arc};

use anyhow::{Context, Result};
use chrono::Local;
use medwaste_core::{
    FlowCatalog, ProcessKind, RunConfig, plugin::ProcessRegistry, service::EmissionService,
};
use medwaste_process_landfill as landfill;
use medwaste_process_nonburn::{autoclave, chemical, microwave};
use medwaste_process_thermal::{incineration, pyrolysis};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::args::Command;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config_path = match args::parse(env::args().skip(1))? {
        Command::Help => {
            args::write_usage(&mut io::stdout().lock())?;
            return Ok(());
        }
        Command::Run { config } => config,
    };

    let config = match &config_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            RunConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RunConfig::reference(),
    };
    tracing::info!(
        facilities = config.facilities.len(),
        scenarios = config.scenarios.len(),
        source = config_path.as_ref().map_or_else(|| "reference".into(), |path| path.display().to_string()),
        "configuration loaded"
    );

    // Registry + service setup
    let plugins = vec![
        incineration::plugin(config.factor_table(ProcessKind::Incineration)),
        landfill::plugin(config.factor_table(ProcessKind::Landfill)),
        pyrolysis::plugin(config.factor_table(ProcessKind::Pyrolysis)),
        chemical::plugin(config.factor_table(ProcessKind::ChemicalDisinfection)),
        autoclave::plugin(config.factor_table(ProcessKind::Autoclave)),
        microwave::plugin(config.factor_table(ProcessKind::Microwave)),
    ];
    let registry = Arc::new(ProcessRegistry::new(plugins));
    let service = Arc::new(EmissionService::new(registry));

    let app = App::new(service, Arc::new(config));
    let batch = app.run().await?;
    tracing::info!(
        cells = batch.cells.len(),
        failures = batch.failures(),
        "batch finished"
    );

    let mut stdout = io::stdout().lock();
    report::write_csv(&mut stdout, &batch, &FlowCatalog::biosphere3(), Local::now())?;

    Ok(())
}
