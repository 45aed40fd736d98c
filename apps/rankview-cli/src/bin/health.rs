use std::env;

use rankview_cli::{init_tracing, load_settings, service, take_base_url};
use rankview_core::traits::SearchService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args: Vec<String> = env::args().skip(1).collect();
    let settings = load_settings(take_base_url(&mut args)?)?;
    let service = service(&settings)?;
    println!("🩺 rankview-health\n=================");
    println!("Service: {}", service.base_url());
    let health = service.health().await;
    if health.is_healthy() {
        println!("✅ {}", health.status);
    } else {
        println!("❌ {} {}", health.status, health.error.as_deref().unwrap_or(""));
        std::process::exit(1);
    }
    for (key, value) in &health.details { println!("  {}: {}", key, value); }
    Ok(())
}
