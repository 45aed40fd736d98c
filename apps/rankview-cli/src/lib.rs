//! Shared setup for the rankview developer binaries.
use rankview_client::HttpSearchService;
use rankview_core::config::{Config, Settings};

/// Installs a stderr `tracing` subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Loads layered settings; `--base-url` on the command line wins over config.
pub fn load_settings(base_url: Option<String>) -> anyhow::Result<Settings> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    if let Some(url) = base_url { settings.api.base_url = url; }
    Ok(settings)
}

pub fn service(settings: &Settings) -> anyhow::Result<HttpSearchService> { Ok(HttpSearchService::from_settings(settings)?) }

/// Removes `--base-url <url>` from `args` and returns the url.
pub fn take_base_url(args: &mut Vec<String>) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == "--base-url") else { return Ok(None) };
    args.remove(pos);
    if pos >= args.len() || args[pos].starts_with("--") { anyhow::bail!("--base-url requires a URL"); }
    Ok(Some(args.remove(pos)))
}
