use anyhow::{Context, Result};
use et_domain::{ItemCatalog, StationCatalog, Universe};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{event, Level};

pub const UNIVERSE_CACHE_FILE: &str = "universe_sde_cache.json";
pub const ITEM_CACHE_FILE: &str = "item_cache.json";
pub const STATION_CACHE_FILE: &str = "station_cache.json";

/// The pre-built static data the planner needs besides market orders.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    pub universe: Universe,
    pub items: ItemCatalog,
    pub stations: StationCatalog,
}

impl StaticData {
    /// Loads all three static caches from `cache_dir`.
    pub fn load_from_dir<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        Ok(StaticData {
            universe: load_universe(cache_dir.join(UNIVERSE_CACHE_FILE))?,
            items: load_item_catalog(cache_dir.join(ITEM_CACHE_FILE))?,
            stations: load_station_catalog(cache_dir.join(STATION_CACHE_FILE))?,
        })
    }
}

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(value)
}

pub fn load_universe<P: AsRef<Path>>(path: P) -> Result<Universe> {
    let universe: Universe = load_json(path)?;
    event!(Level::DEBUG, "Loaded universe with {} regions and {} systems", universe.0.len(), universe.systems().count());
    Ok(universe)
}

pub fn load_item_catalog<P: AsRef<Path>>(path: P) -> Result<ItemCatalog> {
    let items: ItemCatalog = load_json(path)?;
    event!(Level::DEBUG, "Loaded {} items", items.by_id.len());
    Ok(items)
}

pub fn load_station_catalog<P: AsRef<Path>>(path: P) -> Result<StationCatalog> {
    let stations: StationCatalog = load_json(path)?;
    event!(Level::DEBUG, "Loaded {} stations", stations.by_id.len());
    Ok(stations)
}
