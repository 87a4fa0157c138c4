use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use streamfs::locale::{self, LocaleConfig};

/// Check that localization files share the same keys and that source code
/// uses only (and all of) the reference keys.
#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// JSON config; built-in defaults are used for anything it leaves out.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Override the directory holding the localization files.
    #[arg(long, value_hint = ValueHint::DirPath)]
    locales_dir: Option<PathBuf>,

    /// Override the root of the scanned source tree.
    #[arg(long, value_hint = ValueHint::DirPath)]
    source_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match LocaleConfig::load(path) {
            Ok(config) => config,
            Err(e) => return fail(&e),
        },
        None => LocaleConfig::default(),
    };
    if let Some(dir) = args.locales_dir {
        config.locales_dir = dir;
    }
    if let Some(dir) = args.source_path {
        config.source_path = dir;
    }

    match locale::check(&config).await {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(error: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::FAILURE
}
