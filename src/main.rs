use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use guess_collect::{server, CollectConfig};

mod load_generator;

use load_generator::Endpoint;

/// Synthetic latency workload exported as distributions and a Guesstimate model
#[derive(Parser)]
#[command(name = "guess-collect")]
#[command(version)]
struct Cli {
    /// Architecture name; prefixes every metric and names the model
    #[arg(long, default_value = "demo")]
    arch: String,

    /// JSON collection config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable collection regardless of the config file
    #[arg(long)]
    collect: bool,

    /// Debug listener port (serves /debug/vars on localhost)
    #[arg(long, default_value = "8123")]
    port: u16,

    /// Number of concurrent workers
    #[arg(long, default_value = "4")]
    concurrency: u32,

    /// How long the workload runs (seconds)
    #[arg(long, default_value = "5")]
    duration_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Services in the demo architecture and their typical response time (ns).
const SERVICES: [(&str, u64); 4] = [
    ("frontend", 400_000),
    ("store", 150_000),
    ("cache", 20_000),
    ("auth", 90_000),
];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    // ── 1. Load config ───────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => CollectConfig::load(path).unwrap_or_else(|e| {
            error!(error = %e, "cannot load config");
            std::process::exit(1);
        }),
        None => CollectConfig::default(),
    };
    config.collect |= cli.collect;

    if config.collect {
        for dir in [&config.csv_dir, &config.json_dir] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                error!(dir = %dir.display(), error = %e, "cannot create output directory");
                std::process::exit(1);
            }
        }
    }
    let collector = guess_collect::init(config);
    info!(collect = collector.is_enabled(), arch = %cli.arch, "collector ready");

    // ── 2. Debug listener ────────────────────────────────────────
    server::serve(cli.port);

    // ── 3. Run the workload ──────────────────────────────────────
    let endpoints: Arc<Vec<Endpoint>> = Arc::new(
        SERVICES
            .iter()
            .map(|(svc, base_ns)| {
                Endpoint::new(collector, format!("{}.{svc}.{svc}00", cli.arch), *base_ns)
            })
            .collect(),
    );
    let loop_name = format!("{}.worker.loop", cli.arch);
    let loop_hist = collector.new_histogram(&loop_name);

    info!(
        workers = cli.concurrency,
        secs = cli.duration_secs,
        "running workload"
    );
    load_generator::run(
        collector,
        endpoints.clone(),
        loop_hist.clone(),
        cli.concurrency,
        cli.duration_secs,
    )
    .await;
    info!(
        observations = collector.vars().get_counter("observations").unwrap_or(0),
        "workload finished"
    );

    // ── 4. Export ────────────────────────────────────────────────
    for ep in endpoints.iter() {
        collector.save_distribution(ep.histogram.as_ref(), &ep.name, "");
    }
    collector.save_distribution(loop_hist.as_ref(), &loop_name, "");
    collector.save_all_samples(&cli.arch);

    info!("done");
}
