mod app;
mod cli;
mod gemini;
mod locale;
mod markdown;
mod monitor;
mod news;
mod report;

pub const USER_AGENT: &str = concat!("media-monitor/", env!("CARGO_PKG_VERSION"));

use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("media_monitor=info".parse()?),
        )
        .init();

    let args = cli::Args::parse();

    if let Err(e) = app::execute(args).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
    Ok(())
}
