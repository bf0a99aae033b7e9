use anyhow::{bail, Context};
use clap::Parser;
use generator::dataset::{build_dataset, export_csv, GeneratorConfig};
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::VisualizationModel;
use log::{error, info};
use rangercore::dataset::AirportSource;
use rangercore::search::SearchRequest;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{RangerConfig, SchemaPreset};
use workflow::report::{render_text, summary_line};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Find every airport within reach of a departure airport"
)]
struct Args {
    /// ICAO code of the departure airport (case-insensitive)
    #[arg(long)]
    icao: Option<String>,
    /// Time to fly in minutes
    #[arg(long, default_value_t = 60)]
    minutes: u32,
    /// Speed in knots true airspeed; overrides --speed-mach when non-zero
    #[arg(long, default_value_t = 0)]
    speed_kts: u32,
    /// Speed in Mach, used when --speed-kts is 0
    #[arg(long, default_value_t = 0.0)]
    speed_mach: f64,
    /// Airport CSV to search
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Column layout of the dataset
    #[arg(long, value_enum)]
    schema: Option<SchemaPreset>,
    /// Load settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address for the GUI bridge
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Print the outcome as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Append a one-line summary of the search to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the GUI bridge alive for searches from the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Search a generated dataset of this many airports instead of a file
    #[arg(long)]
    synthetic: Option<usize>,
    /// Seed for --synthetic
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write the generated dataset to CSV and exit
    #[arg(long)]
    export_synthetic: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RangerConfig::load(path)?,
        None => RangerConfig::default(),
    }
    .with_overrides(args.dataset.clone(), args.schema, args.bind);

    let generator_config = GeneratorConfig {
        count: args.synthetic.unwrap_or(GeneratorConfig::default().count),
        seed: args.seed,
        ..Default::default()
    };

    if let Some(path) = &args.export_synthetic {
        let written = export_csv(&generator_config, path)?;
        println!("Wrote {} synthetic airports to {}", written, path.display());
        return Ok(());
    }

    if args.icao.is_none() && !args.serve {
        bail!("nothing to do: pass --icao to search or --serve to host the GUI bridge");
    }

    let source: Arc<dyn AirportSource + Send + Sync> = if args.synthetic.is_some() {
        Arc::new(build_dataset(&generator_config))
    } else {
        Arc::new(config.to_source())
    };
    info!("searching {}", source.describe());

    let runner = Arc::new(Runner::new(source));
    let gui_bridge = if args.serve {
        Some(GuiBridge::new(runner.clone(), config.bind))
    } else {
        None
    };

    if let Some(icao) = &args.icao {
        let request = SearchRequest::new(icao, args.minutes, args.speed_kts, args.speed_mach);
        let result = search_and_report(
            &runner,
            &request,
            args.json,
            args.report.as_deref(),
            gui_bridge.as_ref(),
        );
        settle_startup_search(result, gui_bridge.is_some())?;
    }

    if let Some(bridge) = &gui_bridge {
        bridge.publish_status(&format!(
            "HTTP bridge on http://{} (Ctrl+C to stop)...",
            config.bind
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let metrics = runner.metrics();
        info!(
            "bridge stopped after {} searches ({} failed)",
            metrics.completed, metrics.failed
        );
    }

    Ok(())
}

fn search_and_report(
    runner: &Runner,
    request: &SearchRequest,
    json: bool,
    report: Option<&Path>,
    bridge: Option<&GuiBridge>,
) -> anyhow::Result<()> {
    let outcome = runner.execute(request)?;

    if json {
        println!("{}", outcome.to_json().context("encoding search outcome")?);
    } else {
        print!("{}", render_text(&outcome));
    }

    if let Some(bridge) = bridge {
        bridge.publish(&VisualizationModel::from_outcome(request, &outcome));
    }

    if let Some(report_path) = report {
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(summary_line(&outcome).as_bytes())?;
    }
    Ok(())
}

/// A failed command-line search is fatal unless the bridge is hosting the GUI.
fn settle_startup_search(result: anyhow::Result<()>, serving: bool) -> anyhow::Result<()> {
    match result {
        Err(err) if serving => {
            error!("{:#}; bridge stays up for searches from the visualizer", err);
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn failed_startup_search_is_fatal_without_bridge() {
        assert!(settle_startup_search(Err(anyhow!("airport 'ZZZZ' not found")), false).is_err());
        assert!(settle_startup_search(Ok(()), false).is_ok());
    }

    #[test]
    fn failed_startup_search_keeps_bridge_running() {
        assert!(settle_startup_search(Err(anyhow!("airport 'ZZZZ' not found")), true).is_ok());
    }
}
