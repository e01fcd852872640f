pub mod configuration;
pub mod esi_client;
pub mod market_precache;
pub mod pagination;
pub mod pathfinder;
pub mod region_market_cache;
pub mod reqwest_helpers;
pub mod route_scanner;

#[cfg(test)]
pub mod test_objects;
