use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use et_core::configuration::{AppConfiguration, DEFAULT_DATASOURCE, DEFAULT_ESI_BASE_URL, DEFAULT_MARKET_CACHE_TTL_MINUTES, DEFAULT_REQUESTS_PER_SECOND, EMPIRE_REGIONS};
use std::path::PathBuf;

/// EVE trade route planner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the static data and market order caches
    #[arg(long, env = "ET_CACHE_DIR", default_value = "cache", global = true)]
    pub cache_dir: PathBuf,

    #[arg(long, env = "ET_ESI_BASE_URL", default_value = DEFAULT_ESI_BASE_URL, global = true)]
    pub esi_base_url: String,

    #[arg(long, env = "ET_DATASOURCE", default_value = DEFAULT_DATASOURCE, global = true)]
    pub datasource: String,

    /// Market order cache files younger than this are not refetched
    #[arg(long, env = "ET_MARKET_CACHE_TTL_MINUTES", default_value_t = DEFAULT_MARKET_CACHE_TTL_MINUTES, global = true)]
    pub market_cache_ttl_minutes: i64,

    #[arg(long, env = "ET_REQUESTS_PER_SECOND", default_value_t = DEFAULT_REQUESTS_PER_SECOND, global = true)]
    pub requests_per_second: u32,

    /// Regions to pre-cache, comma separated. Defaults to the empire regions.
    #[arg(long, env = "ET_PRECACHE_REGIONS", value_delimiter = ',', global = true)]
    pub precache_regions: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find a route and the trades along it
    Plan(PlanArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Origin system, prompted for when missing
    #[arg(long)]
    pub from: Option<String>,

    /// Destination system, prompted for when missing
    #[arg(long)]
    pub to: Option<String>,

    /// Cargo capacity in m³
    #[arg(long, env = "ET_CARGO_CAPACITY")]
    pub cargo: Option<f64>,

    /// Budget in ISK
    #[arg(long, env = "ET_BUDGET")]
    pub budget: Option<f64>,

    /// Also route through systems below 0.5 security
    #[arg(long)]
    pub allow_unsafe: bool,

    /// Number of rows per table
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[arg(long)]
    pub skip_precache: bool,
}

impl Args {
    pub fn app_configuration(&self) -> AppConfiguration {
        let precache_regions = if self.precache_regions.is_empty() {
            EMPIRE_REGIONS.iter().map(|r| r.to_string()).collect()
        } else {
            self.precache_regions.clone()
        };

        AppConfiguration {
            cache_dir: self.cache_dir.clone(),
            esi_base_url: self.esi_base_url.clone(),
            datasource: self.datasource.clone(),
            market_cache_ttl: TimeDelta::minutes(self.market_cache_ttl_minutes),
            requests_per_second: self.requests_per_second,
            precache_regions,
        }
    }
}
