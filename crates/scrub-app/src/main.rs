//! FrameScrub - find where the picture changes in a frame sequence.

mod sequence;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scrub_core::{FrameClock, FrameRate};
use scrub_diff::{ScanStop, SearchHit};
use scrub_session::{ManualPlayback, Player, PlayerConfig};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::sequence::{save_highlight, ImageSequenceSource};

type SequencePlayer = Player<ImageSequenceSource, ManualPlayback>;

#[derive(Parser)]
#[command(name = "framescrub", version)]
#[command(about = "Step through an image sequence by picture changes", long_about = None)]
struct Cli {
    /// Frame rate of the sequence
    #[arg(long, default_value_t = 24.0, global = true)]
    fps: f64,

    /// Player config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the next frame whose picture differs
    Next {
        /// Directory of frame images
        dir: PathBuf,

        /// Frame to search from
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Write the changed-pixel highlight to this image
        #[arg(long)]
        highlight: Option<PathBuf>,
    },

    /// Find the previous frame whose picture differs
    Prev {
        /// Directory of frame images
        dir: PathBuf,

        /// Frame to search from
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Write the changed-pixel highlight to this image
        #[arg(long)]
        highlight: Option<PathBuf>,
    },

    /// List every frame where the picture changes
    Scan {
        /// Directory of frame images
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(cli.config.as_deref())?;
    let rate = FrameRate::from_fps_f64(cli.fps);
    info!(%rate, "FrameScrub v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Next {
            dir,
            from,
            highlight,
        } => {
            let mut player = open_player(&dir, config, rate)?;
            player.seek_frame(from);
            let hit = player
                .find_next_difference()?
                .context("no video open")?;
            report(&player.clock(), &hit);
            write_highlight(&player, highlight.as_deref())?;
        }
        Commands::Prev {
            dir,
            from,
            highlight,
        } => {
            let mut player = open_player(&dir, config, rate)?;
            player.seek_frame(from);
            let hit = player
                .find_previous_difference()?
                .context("no video open")?;
            report(&player.clock(), &hit);
            write_highlight(&player, highlight.as_deref())?;
        }
        Commands::Scan { dir } => {
            let mut player = open_player(&dir, config, rate)?;
            let changes = scan(&mut player)?;
            info!(changes, "Scan complete");
        }
    }

    Ok(())
}

/// Explicit `--config`, else the per-user config file, else defaults.
fn load_config(path: Option<&Path>) -> Result<PlayerConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir() {
            Some(dir) => dir.join("framescrub").join("config.json"),
            None => return Ok(PlayerConfig::default()),
        },
    };
    PlayerConfig::load_or_default(&path)
        .with_context(|| format!("loading config {}", path.display()))
}

fn open_player(dir: &Path, config: PlayerConfig, rate: FrameRate) -> Result<SequencePlayer> {
    let source = ImageSequenceSource::open(dir)
        .with_context(|| format!("reading frames from {}", dir.display()))?;
    let mut player = Player::new(config);
    player.open(source, ManualPlayback::new(), rate, None);
    Ok(player)
}

fn report(clock: &FrameClock, hit: &SearchHit) {
    let timecode = clock.timecode(hit.frame);
    match hit.stop {
        ScanStop::Found => println!("{}\t{}\tchanged", hit.frame, timecode),
        ScanStop::Exhausted => println!("{}\t{}\tno change", hit.frame, timecode),
        ScanStop::DecodeMiss => println!("{}\t{}\tstopped at unreadable frame", hit.frame, timecode),
        ScanStop::Cancelled => println!("{}\t{}\tcancelled", hit.frame, timecode),
        ScanStop::NoAnchor => println!("{}\t{}\tstart frame unreadable", hit.frame, timecode),
        ScanStop::NoOp => println!("{}\t{}\tnothing to search", hit.frame, timecode),
    }
}

fn write_highlight(player: &SequencePlayer, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    match player.highlight() {
        Some(buffer) => {
            save_highlight(buffer, path)
                .with_context(|| format!("writing highlight {}", path.display()))?;
            info!(path = %path.display(), "Highlight written");
        }
        None => warn!("No highlight to write"),
    }
    Ok(())
}

/// Walk forward difference by difference from frame 0, printing every
/// change. Returns the number of changes found.
fn scan(player: &mut SequencePlayer) -> Result<usize> {
    let clock = player.clock();
    player.seek_frame(0);
    let mut changes = 0;
    loop {
        let hit = player
            .find_next_difference()?
            .context("no video open")?;
        if !hit.found() {
            if hit.stop != ScanStop::Exhausted {
                report(&clock, &hit);
            }
            return Ok(changes);
        }
        report(&clock, &hit);
        changes += 1;
    }
}
