use std::env;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rankview_cli::{init_tracing, load_settings, service, take_base_url};
use rankview_core::wire::SearchOptions;
use rankview_diff::RankChange;
use rankview_orchestrator::{Phase, SearchOrchestrator};
use rankview_reconcile::{Direction, ReconcileConfig, StackedLayout};
use rankview_store::ResultStore;

const ROW_HEIGHT: f64 = 120.0;

fn parse_args(args: Vec<String>) -> (String, String, SearchOptions) {
    let mut options = SearchOptions::default();
    let mut positional = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vector" => options.vector_search_enabled = false,
            "--no-reranker" => options.reranker_enabled = false,
            "--no-reasoning" => options.reasoning_enabled = false,
            "--model" => { i += 1; match args.get(i) { Some(m) => options.model = Some(m.clone()), None => { eprintln!("Error: --model requires a name"); std::process::exit(1); } } }
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }
    if positional.len() < 2 {
        eprintln!("Usage: rankview-search [--base-url URL] [--no-vector] [--no-reranker] [--no-reasoning] [--model NAME] <customer> <query...>");
        eprintln!("Example: rankview-search budget-shopper 'waterproof hiking boots'");
        std::process::exit(1);
    }
    let customer = positional.remove(0);
    (customer, positional.join(" "), options)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args: Vec<String> = env::args().skip(1).collect();
    let settings = load_settings(take_base_url(&mut args)?)?;
    let (customer, query, options) = parse_args(args);

    let service = Arc::new(service(&settings)?);
    let store = Arc::new(ResultStore::new(ReconcileConfig::from(&settings.reconcile)));
    let orchestrator = SearchOrchestrator::with_poll_interval(service.clone(), store.clone(), settings.poll_interval());

    println!("🔍 rankview-search\n==================");
    println!("Service: {}", service.base_url()); println!("Customer: {}", customer); println!("Query: {}", query);

    let pb = ProgressBar::new(100);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?.progress_chars("#>-"));
    let mut rx = orchestrator.subscribe();
    let job_id = orchestrator.submit(&query, &customer, &options).await?;
    pb.println(format!("Job: {}", job_id));

    let state = loop {
        let state = rx.borrow_and_update().clone();
        if let Some(job) = &state.job {
            pb.set_position(job.percentage as u64);
            pb.set_message(if job.message.is_empty() { job.status.display_name().to_string() } else { format!("{} · {}", job.status.display_name(), job.message) });
        }
        if !state.is_loading() { break state; }
        rx.changed().await?;
    };

    if state.phase == Phase::Failed {
        let error = state.error.map(|e| e.to_string()).unwrap_or_else(|| "unknown error".to_string());
        pb.abandon_with_message(format!("❌ {}", error));
        anyhow::bail!(error);
    }
    pb.finish_with_message("✅ Search complete");

    let s = store.summary();
    println!("\n📊 Comparison");
    println!("  products: {}  improved: {}  new: {}  removed: {}  avg improvement: {:.2}", s.total_product_count, s.improved_rank_count, s.new_product_count, s.removed_product_count, s.average_rank_improvement);

    println!("\n📈 Rank changes");
    for d in store.rank_deltas() {
        let change = match d.change() {
            RankChange::Improved(n) => format!("▲ {}", n),
            RankChange::Declined(n) => format!("▼ {}", n),
            RankChange::Unchanged => "=".to_string(),
            RankChange::New => "new".to_string(),
            RankChange::Removed => "removed".to_string(),
        };
        let rank = |r: Option<usize>| r.map(|r| (r + 1).to_string()).unwrap_or_else(|| "-".to_string());
        println!("  {:<24} {:>3} → {:<3} {}", d.id, rank(d.baseline_rank), rank(d.enhanced_rank), change);
    }

    let cycle = store.toggle_mode(&StackedLayout::for_set(&store.visible_set(), ROW_HEIGHT));
    let movements = store.complete_toggle(cycle, &StackedLayout::for_set(&store.visible_set(), ROW_HEIGHT));
    println!("\n🎞️  Switch to {:?} ({} rows animated)", store.mode(), store.animations().frame().active.len());
    for m in movements.iter().filter(|m| m.moved) {
        let arrow = match m.direction { Direction::Up => "↑", Direction::Down => "↓" };
        println!("  {:<24} {} {} units ({:+.0}px)", m.id, arrow, m.distance_units, m.delta_y);
    }
    Ok(())
}
