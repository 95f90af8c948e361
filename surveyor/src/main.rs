use anyhow::{bail, Context};
use bridge::bridge::ReportBridge;
use bridge::model::ReportModel;
use clap::Parser;
use log::info;
use meshcore::report::ScanListing;
use meshcore::House;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{ProviderKind, SurveyConfig};
use workflow::house_file::{load_house, parse_layout, save_house};
use workflow::runner::Runner;

mod bridge;
mod scan;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Survey a house's Wi-Fi channels room by room")]
struct Args {
    /// Load a saved house (JSON)
    #[arg(long, conflicts_with = "new_house")]
    house: Option<PathBuf>,
    /// Start a new house with this name
    #[arg(long)]
    new_house: Option<String>,
    /// Rooms per floor for a new house, e.g. "Kitchen,Lounge;Bedroom"
    #[arg(long, default_value = "", requires = "new_house")]
    layout: String,
    /// Load a survey config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,
    #[arg(long)]
    interface: Option<String>,
    /// Seed for the synthetic provider
    #[arg(long)]
    seed: Option<u64>,
    /// Scan every room before reporting
    #[arg(long, default_value_t = false)]
    scan: bool,
    /// Print the per-room scan results
    #[arg(long, default_value_t = false)]
    results: bool,
    /// Print the per-floor channel report
    #[arg(long, default_value_t = false)]
    report: bool,
    /// Print the channel overlap heatmap
    #[arg(long, default_value_t = false)]
    heatmap: bool,
    /// Write the house to this file
    #[arg(long)]
    save: Option<PathBuf>,
    /// Keep the report bridge alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let survey_config = match &args.config {
        Some(path) => SurveyConfig::load(path)?,
        None => SurveyConfig::default(),
    }
    .with_overrides(args.provider, args.interface.clone(), args.seed, args.bind.clone());

    let mut house = if let Some(path) = &args.house {
        load_house(path)?
    } else if let Some(name) = &args.new_house {
        House::with_layout(name.as_str(), parse_layout(&args.layout))
    } else {
        bail!("nothing to survey: pass --house <file> or --new-house <name>");
    };

    let runner = Runner::new(survey_config.clone());
    let provider = scan::build_provider(runner.config());

    if args.scan {
        let summary = runner.scan_house(&mut house, provider.as_ref());
        info!(
            "scanned {} rooms ({} failed), {} access points",
            summary.rooms_scanned, summary.rooms_failed, summary.access_points
        );
    }

    let report = runner.report(&house, provider.as_ref());
    let model = ReportModel::from_report(&report, survey_config.heatmap_width);

    if args.results {
        println!("{}", ScanListing(&house));
    }
    if args.report || !(args.results || args.heatmap || args.serve) {
        println!("{}", report);
    }
    if args.heatmap {
        print!("{}", model.heatmap_text());
    }

    if let Some(path) = &args.save {
        let written = save_house(&house, path)?;
        println!("Saved {} to {}", house.display_name(), written.display());
    }

    if args.serve {
        let addr: SocketAddr = survey_config
            .bind
            .parse()
            .with_context(|| format!("parsing bind address {}", survey_config.bind))?;
        let bridge = ReportBridge::new();
        bridge.publish(model);
        let bound = bridge.serve(addr)?;
        println!("Report bridge on http://{} (Ctrl+C to stop)...", bound);

        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
