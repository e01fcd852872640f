use crate::pathfinder::UniverseGraph;
use crate::region_market_cache::RegionMarketCache;
use et_domain::{
    leg_order_books, match_orders, partition_orders, Isk, ItemCatalog, ItemProfitability, MarketPartition, RegionId, StationLookup, TradeOpportunity, TypeId,
};
use et_store::MarketOrderBmcTrait;
use itertools::Itertools;

/// Diagnostics collected while scanning. None of them aborts a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    UnknownSystem { name: String },
    MarketUnavailable { region_id: RegionId, reason: String },
    UnresolvedOrderLocations { system: String, count: usize },
    UnknownItem { type_id: TypeId },
    InvalidItemVolume { type_id: TypeId, volume: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeConstraints {
    pub cargo_capacity: f64,
    pub budget: Isk,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Sorted by total profit, highest first.
    pub opportunities: Vec<TradeOpportunity>,
    pub events: Vec<ScanEvent>,
}

fn push_unique(events: &mut Vec<ScanEvent>, event: ScanEvent) {
    if !events.contains(&event) {
        events.push(event);
    }
}

/// Fills a fresh market cache with the regions of all systems on `route`.
pub async fn prepare_market_cache(route: &[String], graph: &UniverseGraph, bmc: &dyn MarketOrderBmcTrait) -> (RegionMarketCache, Vec<ScanEvent>) {
    let mut events = Vec::new();

    let region_ids = route
        .iter()
        .filter_map(|name| match graph.locate(name) {
            Some((region_id, _)) => Some(region_id),
            None => {
                push_unique(&mut events, ScanEvent::UnknownSystem { name: name.clone() });
                None
            }
        })
        .unique()
        .collect_vec();

    let mut cache = RegionMarketCache::new();
    let failures = cache.load_regions(bmc, region_ids).await;

    events.extend(failures.into_iter().map(|f| ScanEvent::MarketUnavailable {
        region_id: f.region_id,
        reason: f.reason,
    }));

    (cache, events)
}

fn system_partition(
    name: &str,
    graph: &UniverseGraph,
    markets: &RegionMarketCache,
    stations: &impl StationLookup,
    events: &mut Vec<ScanEvent>,
) -> Option<MarketPartition> {
    let Some((region_id, system_id)) = graph.locate(name) else {
        push_unique(events, ScanEvent::UnknownSystem { name: name.to_string() });
        return None;
    };
    // a region missing from the cache has already been reported when loading
    let orders = markets.get(&region_id)?;

    let partition = partition_orders(orders, system_id, stations);
    if partition.unresolved_locations > 0 {
        push_unique(
            events,
            ScanEvent::UnresolvedOrderLocations {
                system: name.to_string(),
                count: partition.unresolved_locations,
            },
        );
    }
    Some(partition)
}

/// Runs the matching engine for every item that is sold at `origin` and bought at `destination`.
pub fn evaluate_leg(
    origin: &MarketPartition,
    destination: &MarketPartition,
    items: &ItemCatalog,
    constraints: TradeConstraints,
    events: &mut Vec<ScanEvent>,
) -> Vec<ItemProfitability> {
    leg_order_books(origin, destination)
        .into_iter()
        .filter_map(|(type_id, book)| {
            let Some(item) = items.get(&type_id) else {
                push_unique(events, ScanEvent::UnknownItem { type_id });
                return None;
            };
            if !item.volume.is_finite() || item.volume <= 0.0 {
                push_unique(events, ScanEvent::InvalidItemVolume { type_id, volume: item.volume });
                return None;
            }

            let outcome = match_orders(&book.sell, &book.buy, item.volume, constraints.budget, constraints.cargo_capacity);
            outcome.is_trade().then(|| ItemProfitability::from_outcome(type_id, &item.name, &outcome))
        })
        .sorted_by(|a, b| b.total_profit.cmp(&a.total_profit))
        .collect_vec()
}

/// Ranks the items worth buying at `origin` and selling at `destination`.
pub fn rank_items_between(
    origin: &str,
    destination: &str,
    graph: &UniverseGraph,
    markets: &RegionMarketCache,
    items: &ItemCatalog,
    stations: &impl StationLookup,
    constraints: TradeConstraints,
) -> (Vec<ItemProfitability>, Vec<ScanEvent>) {
    let mut events = Vec::new();
    let origin_partition = system_partition(origin, graph, markets, stations, &mut events);
    let destination_partition = system_partition(destination, graph, markets, stations, &mut events);

    let ranked = match (origin_partition, destination_partition) {
        (Some(origin), Some(destination)) => evaluate_leg(&origin, &destination, items, constraints, &mut events),
        _ => Vec::new(),
    };
    (ranked, events)
}

/// Every forward leg `(i, j)` with `i < j` along the route, all items, pooled and sorted by total profit.
pub fn scan_route(
    route: &[String],
    graph: &UniverseGraph,
    markets: &RegionMarketCache,
    items: &ItemCatalog,
    stations: &impl StationLookup,
    constraints: TradeConstraints,
) -> ScanReport {
    let mut events = Vec::new();

    let partitions = route
        .iter()
        .map(|name| system_partition(name, graph, markets, stations, &mut events))
        .collect_vec();

    let mut opportunities = Vec::new();
    for (i, j) in (0..route.len()).tuple_combinations() {
        let (Some(origin), Some(destination)) = (&partitions[i], &partitions[j]) else {
            continue;
        };
        opportunities.extend(
            evaluate_leg(origin, destination, items, constraints, &mut events)
                .into_iter()
                .map(|item| TradeOpportunity::new(&route[i], &route[j], item)),
        );
    }

    opportunities.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));

    ScanReport { opportunities, events }
}
