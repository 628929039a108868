use std::error::Error;
use std::process::ExitCode;

use aruco_card::{render_card, CardConfig};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Render the ArUco business card to `aruco_business_card.pdf`.
///
/// Reads the logo from `FSLlogo.png` in the working directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Show the composited card in a window before exporting.
    #[arg(long)]
    preview: bool,

    /// Log verbosity on stderr (with the `tracing` feature, only used when
    /// `RUST_LOG` is unset).
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) {
    aruco_card::core::init_tracing(false, level);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) {
    if let Err(err) = aruco_card::core::init_with_level(level) {
        eprintln!("logger already installed: {err}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.into());

    let cfg = CardConfig {
        preview: cli.preview,
        ..CardConfig::default()
    };
    match render_card(&cfg) {
        Ok(out) => {
            println!("Image saved as {}", out.output_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error during {}: {err}", err.stage());
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
