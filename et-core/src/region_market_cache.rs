use et_domain::{MarketOrder, RegionId};
use et_store::{MarketOrderBmcTrait, OrderType};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionLoadFailure {
    pub region_id: RegionId,
    pub reason: String,
}

/// Market orders per region, fetched at most once for the lifetime of the cache.
/// Create one per scan and hand it to the scanner.
#[derive(Debug, Clone, Default)]
pub struct RegionMarketCache {
    orders: HashMap<RegionId, Vec<MarketOrder>>,
}

impl RegionMarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region_id: RegionId, orders: Vec<MarketOrder>) {
        self.orders.insert(region_id, orders);
    }

    pub fn get(&self, region_id: &RegionId) -> Option<&[MarketOrder]> {
        self.orders.get(region_id).map(Vec::as_slice)
    }

    pub fn contains(&self, region_id: &RegionId) -> bool {
        self.orders.contains_key(region_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Loads every region that is not cached yet. A region that fails to load stays absent and is reported.
    pub async fn load_regions<I>(&mut self, bmc: &dyn MarketOrderBmcTrait, region_ids: I) -> Vec<RegionLoadFailure>
    where
        I: IntoIterator<Item = RegionId>,
    {
        let mut failures = Vec::new();

        for region_id in region_ids {
            if self.contains(&region_id) || failures.iter().any(|f: &RegionLoadFailure| f.region_id == region_id) {
                continue;
            }
            match bmc.get_market_orders(region_id, OrderType::All).await {
                Ok(orders) => self.insert(region_id, orders),
                Err(err) => failures.push(RegionLoadFailure {
                    region_id,
                    reason: format!("{err:#}"),
                }),
            }
        }

        failures
    }
}
