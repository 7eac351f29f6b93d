use blog2pdf_app::{platform, AppConfig, Cli};
use clap::Parser;
use engine_logging::engine_info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;
    let log_settings = config.log_settings()?;
    engine_logging::initialize(&log_settings);
    engine_info!("backend {} output {:?}", config.backend_url, config.output_dir);

    match cli.url.as_deref() {
        Some(url) => platform::run_once(&config, url),
        None => platform::run_interactive(&config),
    }
}
