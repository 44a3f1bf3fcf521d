use std::path::PathBuf;

use clap::Parser;
use sort_animator_core::{collect_snapshots, random_values, AppConfig, BarScale, FrameEncoder};
use tracing_subscriber::EnvFilter;

fn main() -> sort_animator_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    config.validate()?;

    let values = match cli.values {
        Some(values) => values,
        None => random_values(&config.input)?,
    };
    config.encoder.render.check_bar_count(values.len())?;
    tracing::info!(?values, "sorting input");

    let snapshots = collect_snapshots(&values);
    tracing::info!(snapshots = snapshots.len(), "bubble sort finished");

    let summary = FrameEncoder::new(config.encoder).encode(&snapshots)?;
    match &summary.animation_path {
        Some(path) => tracing::info!(
            frames = summary.frame_count,
            animation = %path.display(),
            "done"
        ),
        None => tracing::info!("no exchanges; nothing to animate"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Renders every step of a bubble sort and packs the frames into a looping GIF.
/// With no arguments, sorts 10 random integers in [1, 50) into `frames/`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory receiving the PNG frames and the GIF.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// File name prefix for frames and the animation.
    #[arg(short, long)]
    prefix: Option<String>,
    /// Number of random values to sort.
    #[arg(short = 'n', long)]
    len: Option<usize>,
    /// Seed for reproducible input.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Display time of each frame in milliseconds.
    #[arg(long)]
    frame_duration_ms: Option<u32>,
    /// Scale every frame to the largest value across all snapshots.
    #[arg(long)]
    global_scale: bool,
    /// Sort these values instead of a random array, e.g. `--values 5,3,1`.
    #[arg(long, value_delimiter = ',')]
    values: Option<Vec<u32>>,
}

impl Cli {
    fn resolve_config(&self) -> sort_animator_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!(?path, "loading configuration");
                AppConfig::from_json_file(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.out_dir {
            config.encoder.output_dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.encoder.prefix = prefix.clone();
        }
        if let Some(len) = self.len {
            config.input.len = len;
        }
        if let Some(seed) = self.seed {
            config.input.seed = Some(seed);
        }
        if let Some(duration) = self.frame_duration_ms {
            config.encoder.frame_duration_ms = duration;
        }
        if self.global_scale {
            config.encoder.render.scale = BarScale::Global;
        }
        Ok(config)
    }
}
