use std::env;

use rankview_cli::{init_tracing, load_settings, service, take_base_url};
use rankview_core::traits::SearchService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args: Vec<String> = env::args().skip(1).collect();
    let settings = load_settings(take_base_url(&mut args)?)?;
    let personas = service(&settings)?.personas().await?;
    println!("👥 {} personas", personas.len());
    for p in &personas {
        let w = &p.preferences;
        println!("\n  {} {}  id={}  type={}", p.avatar, p.name, p.id, p.kind);
        println!("     price={:.2}  quality={:.2}  brand={:.2}", w.price_weight, w.quality_weight, w.brand_weight);
        if !w.description.is_empty() { println!("     {}", w.description); }
    }
    Ok(())
}
