use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use easescroll_core::{AppConfig, Point, TimingCurve};

mod commands;

#[derive(Parser)]
#[command(name = "easescroll")]
#[command(author, version, about = "Curve-driven scroll animations in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this configuration file instead of ~/.config/easescroll/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file (or the built-in sample) in the animated pager
    Run {
        /// Text file to page through
        file: Option<PathBuf>,
    },
    /// Print a timing curve as a table of t and eased value
    Sample {
        /// Preset name, "cubic-bezier(x1, y1, x2, y2)" or "x1,y1,x2,y2"
        #[arg(long)]
        curve: Option<TimingCurve>,
        /// Number of intervals between t = 0 and t = 1
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },
    /// Drive an animation with synthetic frame times and print every frame
    Simulate {
        /// Starting offset as "x,y"
        #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
        from: Point,
        /// Target offset as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        to: Point,
        #[arg(long)]
        curve: Option<TimingCurve>,
        /// Duration in seconds (configured default when omitted)
        #[arg(long, allow_hyphen_values = true)]
        duration: Option<f64>,
        /// Frames per second (configured frame rate when omitted)
        #[arg(long)]
        fps: Option<u32>,
        /// Start a second animation this many milliseconds in
        #[arg(long, requires = "retarget_to")]
        retarget_ms: Option<u64>,
        /// Target of the second animation as "x,y"
        #[arg(long, requires = "retarget_ms", allow_hyphen_values = true)]
        retarget_to: Option<Point>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands work even when the existing file is broken
    if let Some(Commands::Config { action }) = &cli.command {
        let custom = cli.config.as_deref();
        return match action {
            ConfigAction::Path => commands::config::path(custom),
            ConfigAction::Init { force } => commands::config::init(custom, *force),
        };
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let interactive = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Run { file }) => commands::run::run(config, file),
        None => commands::run::run(config, None),
        Some(Commands::Sample { curve, steps }) => {
            commands::sample::run(curve.unwrap_or(config.animation.curve), steps)
        }
        Some(Commands::Simulate {
            from,
            to,
            curve,
            duration,
            fps,
            retarget_ms,
            retarget_to,
        }) => {
            let options = commands::simulate::SimulateOptions {
                from,
                to,
                curve: curve.unwrap_or(config.animation.curve),
                duration_secs: duration,
                fps: fps.unwrap_or(config.animation.frame_rate),
                retarget: retarget_ms.zip(retarget_to),
            };
            commands::simulate::run(&config, &options)
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Log to stderr, or to a file while the pager owns the terminal
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
