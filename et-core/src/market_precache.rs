use et_domain::{RegionId, Universe};
use et_store::{MarketOrderBmcTrait, OrderType};
use futures::future::join_all;
use itertools::Itertools;
use tracing::{event, Level};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecacheSummary {
    pub cached: Vec<RegionId>,
    pub failed: Vec<(RegionId, String)>,
    pub unknown_regions: Vec<String>,
}

/// Warms up the market order cache for the named regions, all regions concurrently.
/// Failures are logged and collected, never propagated.
pub async fn cache_all_regions<S: AsRef<str>>(
    universe: &Universe,
    bmc: &dyn MarketOrderBmcTrait,
    region_names: &[S],
    order_type: OrderType,
) -> PrecacheSummary {
    let region_ids = universe.region_ids_by_name(region_names);

    let unknown_regions = region_names
        .iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| universe.0.keys().all(|known| known.to_lowercase() != *name))
        .collect_vec();
    for name in unknown_regions.iter() {
        event!(Level::WARN, "Region {} is not part of the universe, not caching it", name);
    }

    let results = join_all(region_ids.iter().map(|region_id| async move {
        let result = bmc.get_market_orders(*region_id, order_type).await;
        (*region_id, result)
    }))
    .await;

    let mut summary = PrecacheSummary {
        unknown_regions,
        ..Default::default()
    };
    for (region_id, result) in results {
        match result {
            Ok(orders) => {
                event!(Level::INFO, "Cached {} {} orders of region {}", orders.len(), order_type, region_id);
                summary.cached.push(region_id);
            }
            Err(err) => {
                event!(Level::ERROR, "Failed to cache market orders of region {}: {:#}", region_id, err);
                summary.failed.push((region_id, format!("{err:#}")));
            }
        }
    }

    summary
}
