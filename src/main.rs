mod cli;
mod config;
mod errors;
mod faces;
mod output;
mod pipeline;
mod storage;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;
use crate::config::Settings;
use crate::faces::RekognitionBackend;
use crate::output::render_error;
use crate::storage::S3Store;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = cli.output_mode();
    init_tracing(cli.verbose);

    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    let aws = settings.aws_config().await;
    let store = S3Store::new(&aws);
    let backend = RekognitionBackend::new(&aws);

    match pipeline::run_pipeline(&settings, &store, &backend, &cli.images_dir, mode).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            render_error(&err, mode);
            err.exit_code()
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(fmt_layer);
    if tracing::subscriber::set_global_default(registry).is_err() {
        // Already initialised (tests).
    }
}
