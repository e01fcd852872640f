use chrono::TimeDelta;
use et_store::{ITEM_CACHE_FILE, STATION_CACHE_FILE, UNIVERSE_CACHE_FILE};
use std::path::PathBuf;

pub const DEFAULT_ESI_BASE_URL: &str = "https://esi.evetech.net/latest";
pub const DEFAULT_DATASOURCE: &str = "tranquility";
pub const DEFAULT_MARKET_CACHE_TTL_MINUTES: i64 = 30;
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 20;
pub const DEFAULT_CARGO_CAPACITY: f64 = 10_000.0;
pub const DEFAULT_BUDGET: f64 = 100_000_000.0;

/// Regions whose markets are warmed up before planning.
pub const EMPIRE_REGIONS: [&str; 22] = [
    "aridia",
    "derelik",
    "devoid",
    "domain",
    "genesis",
    "kador",
    "khanid",
    "kor-azor",
    "tash-murkon",
    "thebleaklands",
    "lonetrek",
    "thecitadel",
    "theforge",
    "essence",
    "everyshore",
    "placid",
    "sinqlaison",
    "solitude",
    "vergevendor",
    "metropolis",
    "heimatar",
    "moldenheath",
];

#[derive(Clone, Debug)]
pub struct AppConfiguration {
    pub cache_dir: PathBuf,
    pub esi_base_url: String,
    pub datasource: String,
    pub market_cache_ttl: TimeDelta,
    pub requests_per_second: u32,
    pub precache_regions: Vec<String>,
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            esi_base_url: DEFAULT_ESI_BASE_URL.to_string(),
            datasource: DEFAULT_DATASOURCE.to_string(),
            market_cache_ttl: TimeDelta::minutes(DEFAULT_MARKET_CACHE_TTL_MINUTES),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            precache_regions: EMPIRE_REGIONS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl AppConfiguration {
    pub fn universe_cache_path(&self) -> PathBuf {
        self.cache_dir.join(UNIVERSE_CACHE_FILE)
    }

    pub fn item_cache_path(&self) -> PathBuf {
        self.cache_dir.join(ITEM_CACHE_FILE)
    }

    pub fn station_cache_path(&self) -> PathBuf {
        self.cache_dir.join(STATION_CACHE_FILE)
    }
}
