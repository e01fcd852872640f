mod cli_args;
mod prompts;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli_args::{Args, Command, PlanArgs};
use et_core::configuration::AppConfiguration;
use et_core::esi_client::EsiClient;
use et_core::market_precache::cache_all_regions;
use et_core::pathfinder::{find_path, RouteEvent, UniverseGraph};
use et_core::reqwest_helpers::create_client;
use et_core::route_scanner::{prepare_market_cache, rank_items_between, scan_route, ScanEvent, TradeConstraints};
use et_store::{FileCachedMarketOrderBmc, OrderType, StaticData};
use lazy_static::lazy_static;
use prompts::{resolve_plan_inputs, PlanInputs};
use std::sync::Arc;
use time::format_description;
use tracing::{event, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, registry::Registry, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing()?;

    let args = Args::parse();
    let cfg = args.app_configuration();

    match args.command {
        Command::Plan(plan_args) => plan(&cfg, &plan_args).await,
    }
}

fn log_route_events(events: &[RouteEvent]) {
    for route_event in events {
        match route_event {
            RouteEvent::UnknownStartSystem { name } => event!(Level::WARN, "Unknown origin system {}", name),
            RouteEvent::UnknownDestinationSystem { name } => event!(Level::WARN, "Unknown destination system {}", name),
            RouteEvent::SkippedUnsafeSystem { name, security, .. } => {
                event!(Level::DEBUG, "Not entering {} with security {:.2}", name, security)
            }
            RouteEvent::RouteFound { jumps } => event!(Level::INFO, "Found a route with {} jumps", jumps),
            RouteEvent::NoRouteFound => event!(Level::WARN, "No route found"),
        }
    }
}

fn log_scan_events(events: &[ScanEvent]) {
    for scan_event in events {
        match scan_event {
            ScanEvent::UnknownSystem { name } => event!(Level::WARN, "System {} is not part of the universe", name),
            ScanEvent::MarketUnavailable { region_id, reason } => {
                event!(Level::ERROR, "Market orders of region {} are unavailable: {}", region_id, reason)
            }
            ScanEvent::UnresolvedOrderLocations { system, count } => {
                event!(Level::DEBUG, "{} orders in the region of {} have an unknown location", count, system)
            }
            ScanEvent::UnknownItem { type_id } => event!(Level::DEBUG, "Item {} is not in the item catalog", type_id),
            ScanEvent::InvalidItemVolume { type_id, volume } => {
                event!(Level::WARN, "Item {} has an invalid volume of {} m³, skipping it", type_id, volume)
            }
        }
    }
}

async fn plan(cfg: &AppConfiguration, args: &PlanArgs) -> Result<()> {
    let static_data = StaticData::load_from_dir(&cfg.cache_dir).context("Failed to load static data")?;

    let client = create_client(cfg.requests_per_second)?;
    let esi_client = Arc::new(EsiClient::new(client, &cfg.esi_base_url, &cfg.datasource));
    let bmc = FileCachedMarketOrderBmc::new(&cfg.cache_dir, cfg.market_cache_ttl, esi_client);

    if !args.skip_precache {
        let summary = cache_all_regions(&static_data.universe, &bmc, cfg.precache_regions.as_slice(), OrderType::All).await;
        event!(
            Level::INFO,
            "Pre-cached {} regions, {} failed, {} unknown",
            summary.cached.len(),
            summary.failed.len(),
            summary.unknown_regions.len()
        );
    }

    let PlanInputs {
        from,
        to,
        cargo_capacity,
        budget,
    } = resolve_plan_inputs(args)?;

    println!("Origin:      {from}");
    println!("Destination: {to}");
    println!("Cargo:       {} m³", report::format_decimal(cargo_capacity));
    println!("Budget:      {} ISK", report::format_isk(budget));

    let graph = UniverseGraph::from_universe(&static_data.universe);
    if !graph.dangling_connections.is_empty() {
        event!(Level::DEBUG, "Dropped {} connections to unknown systems", graph.dangling_connections.len());
    }

    let search = find_path(&graph, &from, &to, !args.allow_unsafe);
    log_route_events(&search.events);

    let Some(route) = search.route else {
        println!("No route found from {from} to {to}");
        return Ok(());
    };
    println!("\nRoute: {}", report::route_line(&route));

    let constraints = TradeConstraints { cargo_capacity, budget };

    let (markets, load_events) = prepare_market_cache(&route, &graph, &bmc).await;
    event!(Level::DEBUG, "Market orders of {} regions loaded", markets.len());
    log_scan_events(&load_events);

    let (ranked, rank_events) = rank_items_between(&from, &to, &graph, &markets, &static_data.items, &static_data.stations, constraints);
    log_scan_events(&rank_events);
    println!("\nBest items from {from} to {to}\n{}", report::items_table(&ranked, args.top));

    let scan = scan_route(&route, &graph, &markets, &static_data.items, &static_data.stations, constraints);
    log_scan_events(&scan.events);
    println!("\nBest trades along the route\n{}", report::opportunities_table(&scan.opportunities, args.top));

    Ok(())
}

lazy_static! {
    static ref GUARD: std::sync::Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> = std::sync::Mutex::new(None);
}

fn setup_tracing() -> Result<()> {
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "./logs/cli", "et-cli.log.ndjson");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let time_format = format_description::parse("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]Z").context("Invalid time format")?;
    let timer = UtcTime::new(time_format);

    // console output goes to stderr so that the report tables stay clean on stdout
    let console_layer = fmt::layer()
        .with_timer(timer.clone())
        .with_ansi(true)
        .with_target(true)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_timer(timer)
        .with_ansi(false)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(non_blocking_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Ok(mut g) = GUARD.lock() {
        *g = Some(guard);
    }
    Ok(())
}
