use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};
use orus_capture::{
    config::{CaptureConfig, DEFAULT_BUCKET, UploadConfig},
    init_logger,
    naming::ArtifactKind,
    pipeline::{ArtifactStatus, CapturePipeline, RunReport},
    scheduler::LoopScheduler,
};
use std::{path::PathBuf, sync::Arc, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "orus-capture", version, about)]
struct Cli {
    /// Node number encoded into artifact names (1-99)
    #[arg(long)]
    node: Option<u8>,

    /// Directory the artifact tree is written under
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// 1-based monitor index to capture
    #[arg(long)]
    monitor: Option<usize>,

    /// Upload artifacts to the object store
    #[arg(long, requires = "endpoint")]
    upload: bool,

    /// Object-store endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Object-store bucket
    #[arg(long, default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Repeat the capture every N seconds until Ctrl-C
    #[arg(long)]
    interval: Option<u64>,

    /// TOML config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// List available monitors and exit
    #[arg(long)]
    list_monitors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    if cli.list_monitors {
        return list_monitors();
    }

    let config = build_config(&cli)?;

    let monitors = capture::available_monitors().context("failed to enumerate monitors")?;
    config.validate(monitors.len())?;

    let interval_secs = config.interval_secs;
    let pipeline = Arc::new(CapturePipeline::new(config));

    match interval_secs {
        None => {
            let report = pipeline.run().await?;
            render_report(&report);
            if !report.success {
                bail!("capture session finished with failures");
            }
            Ok(())
        }
        Some(secs) => run_loop(pipeline, Duration::from_secs(secs)).await,
    }
}

fn build_config(cli: &Cli) -> Result<CaptureConfig> {
    let file = cli
        .config
        .as_deref()
        .map(CaptureConfig::load)
        .transpose()?;

    let node_number = cli
        .node
        .or(file.as_ref().map(|c| c.node_number))
        .context("--node is required (or set node_number in the config file)")?;

    let save_dir = cli
        .save_dir
        .clone()
        .or(file.as_ref().map(|c| c.save_dir.clone()))
        .context("--save-dir is required (or set save_dir in the config file)")?;

    let monitor_index = cli
        .monitor
        .or(file.as_ref().map(|c| c.monitor_index))
        .unwrap_or(1);

    let interval_secs = cli
        .interval
        .or(file.as_ref().and_then(|c| c.interval_secs));

    let upload = if cli.upload {
        let endpoint = cli
            .endpoint
            .clone()
            .expect("clap enforces --endpoint with --upload");
        Some(UploadConfig {
            endpoint,
            bucket: cli.bucket.clone(),
        })
    } else {
        file.as_ref().and_then(|c| c.upload.clone())
    };

    Ok(CaptureConfig {
        save_dir,
        node_number,
        monitor_index,
        interval_secs,
        upload,
    })
}

fn list_monitors() -> Result<()> {
    let monitors = capture::available_monitors().context("failed to enumerate monitors")?;

    for monitor in monitors {
        println!(
            "{}: {} ({}x{} at {},{}){}",
            monitor.index,
            monitor.name,
            monitor.width,
            monitor.height,
            monitor.x,
            monitor.y,
            if monitor.is_primary { " [primary]" } else { "" },
        );
    }

    Ok(())
}

async fn run_loop(pipeline: Arc<CapturePipeline>, interval: Duration) -> Result<()> {
    let scheduler = LoopScheduler::new();
    info!("capturing every {}s, Ctrl-C to stop", interval.as_secs());

    let handle = scheduler
        .start(interval, move || {
            let pipeline = pipeline.clone();
            async move {
                match pipeline.run().await {
                    Ok(report) => render_report(&report),
                    Err(e) => error!("capture run failed: {e}"),
                }
            }
        })
        .expect("no other loop is active");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("stopping after the current run");
    scheduler.stop();
    handle.await?;

    Ok(())
}

fn render_report(report: &RunReport) {
    for outcome in &report.outcomes {
        let label = match outcome.artifact.kind {
            ArtifactKind::Main => "main".to_string(),
            ArtifactKind::Tile(i) => format!("tile {i}"),
        };

        match &outcome.status {
            ArtifactStatus::Uploaded => {
                info!(
                    "{label}: written and uploaded ({})",
                    outcome.artifact.local_path.display()
                );
            }
            ArtifactStatus::Written => {
                info!("{label}: written ({})", outcome.artifact.local_path.display());
            }
            ArtifactStatus::WriteFailed(e) => error!("{label}: write failed: {e}"),
            ArtifactStatus::UploadFailed(e) => warn!("{label}: written but upload failed: {e}"),
        }
    }

    if report.success {
        info!(
            "session {} completed for {}",
            report.timestamp, report.node_name
        );
    } else {
        error!("session {} completed with failures", report.timestamp);
    }
}
