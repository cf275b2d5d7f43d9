use anyhow::Context;
use clap::Parser;
use feed::bridge::DeviceFeed;
use log::info;
use navcore::model::StreamLocator;
use scenario::config::ScenarioConfig;
use scenario::walker::TrackWalker;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::time;

mod feed;
mod scenario;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Synthetic device feed for the assistive-nav dashboard"
)]
struct Args {
    /// Load a walk scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Port for the feed endpoints
    #[arg(long, default_value_t = 9000)]
    port: u16,
    /// Milliseconds between published GPS snapshots
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
    /// Camera stream locator to publish (overrides the scenario)
    #[arg(long)]
    camera_link: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::default()
    };
    if let Some(link) = args.camera_link {
        config.camera_link = Some(link);
    }

    let device_feed = DeviceFeed::serve(args.port);
    if let Some(link) = config.camera_link.clone() {
        device_feed.publish_camera_link(StreamLocator::new(link));
    }
    if let Some(description) = config.description.as_deref() {
        info!("scenario: {description}");
    }

    let interval = Duration::from_millis(args.interval_ms.max(1));
    let mut walker = TrackWalker::new(config);

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating simulator runtime")?;
    runtime.block_on(async {
        info!(
            "publishing snapshots every {}ms (Ctrl+C to stop)",
            interval.as_millis()
        );
        let mut ticker = time::interval(interval);
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    device_feed.publish_gps(walker.step(interval.as_secs_f64()));
                }
                result = &mut ctrl_c => {
                    result.context("awaiting Ctrl+C to exit")?;
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
