use anyhow::Context;
use clap::Parser;
use generator::template::intercept_scenario;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::ScenarioConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Scenario driver for the Sneaker track and alert engine")]
struct Args {
    /// Replay the scenario against a simulated clock and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a scenario from YAML instead of the built-in intercept
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long)]
    steps: Option<u32>,
    #[arg(long)]
    num_previous_pings: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Write the final dashboard of an offline run as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Run the feed in real time and serve the dashboard over HTTP
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::load(path)?
    } else {
        intercept_scenario()
    };
    let scenario = scenario.with_overrides(args.num_previous_pings, args.steps, args.seed);
    let runner = Runner::new(scenario);

    if args.offline {
        let result = runner.execute(runner.config().steps)?;

        println!(
            "Offline run -> steps {}, passes {}, raised {}, cleared {}, threat cues {}, active {}",
            result.steps,
            result.passes,
            result.alerts_raised,
            result.alerts_cleared,
            result.threat_cues,
            result.dashboard.alerts.len()
        );
        for alert in &result.dashboard.alerts {
            match &alert.braa {
                Some(braa) => println!(
                    "  {} {} -> {}: {:03.0}/{:.1}nm {}",
                    alert.kind, alert.owner, alert.target, braa.bearing, braa.range_nm, braa.cardinal
                ),
                None => println!("  {} {} -> {}", alert.kind, alert.owner, alert.target),
            }
        }

        if let Some(report_path) = &args.report {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let report = serde_json::to_string_pretty(&result.dashboard)?;
            fs::write(report_path, report)
                .with_context(|| format!("writing report {}", report_path.display()))?;
        }
    }

    if args.serve {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the live feed")?;
        runtime.block_on(runner.serve(args.bind))?;
    }

    Ok(())
}
