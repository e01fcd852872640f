use crate::{Isk, MarketOrder, StationId, StationLookup, SystemId, TypeId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;

/// Sell and buy offers for one item in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    pub sell: Vec<MarketOrder>,
    pub buy: Vec<MarketOrder>,
}

/// The orders of one system, bucketed per item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketPartition {
    pub system_id: Option<SystemId>,
    pub books: BTreeMap<TypeId, OrderBook>,
    pub unresolved_locations: usize,
    pub other_systems: usize,
    pub empty_orders: usize,
}

/// Buckets the orders located in `system_id`. Orders whose location is unknown to `stations` are out of scope.
pub fn partition_orders(orders: &[MarketOrder], system_id: SystemId, stations: &impl StationLookup) -> MarketPartition {
    let mut partition = MarketPartition {
        system_id: Some(system_id),
        ..Default::default()
    };

    for order in orders {
        match stations.system_of(&order.location_id) {
            None => partition.unresolved_locations += 1,
            Some(order_system) if order_system != system_id => partition.other_systems += 1,
            Some(_) if order.volume_remain == 0 => partition.empty_orders += 1,
            Some(_) => {
                let book = partition.books.entry(order.type_id).or_default();
                if order.is_buy_order {
                    book.buy.push(*order);
                } else {
                    book.sell.push(*order);
                }
            }
        }
    }

    partition
}

/// Pairs the sell offers at the origin with the buy offers at the destination, for every item that has both.
/// Sell books come out sorted cheapest first, buy books highest bid first.
pub fn leg_order_books(origin: &MarketPartition, destination: &MarketPartition) -> BTreeMap<TypeId, OrderBook> {
    origin
        .books
        .iter()
        .filter_map(|(type_id, origin_book)| {
            let destination_book = destination.books.get(type_id)?;
            if origin_book.sell.is_empty() || destination_book.buy.is_empty() {
                return None;
            }
            let sell = origin_book.sell.iter().copied().sorted_by_key(|o| o.price).collect_vec();
            let buy = destination_book.buy.iter().copied().sorted_by_key(|o| -o.price).collect_vec();
            Some((*type_id, OrderBook { sell, buy }))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum StopReason {
    PriceCrossed,
    BudgetExhausted,
    CargoFull,
    EmptyOrder,
    SellBookExhausted,
    BuyBookExhausted,
    InvalidUnitVolume,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub sell_location: StationId,
    pub buy_location: StationId,
    pub sell_price: Isk,
    pub buy_price: Isk,
    pub units: u64,
}

impl Fill {
    pub fn profit(&self) -> Isk {
        (self.buy_price - self.sell_price) * self.units
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub unit_volume: f64,
    pub units: u64,
    pub total_profit: Isk,
    pub total_cost: Isk,
    pub fills: Vec<Fill>,
    pub remaining_sell: Vec<MarketOrder>,
    pub remaining_buy: Vec<MarketOrder>,
    pub stop_reason: StopReason,
}

impl MatchOutcome {
    pub fn is_trade(&self) -> bool {
        self.units > 0
    }

    pub fn volume(&self) -> f64 {
        self.units as f64 * self.unit_volume
    }

    pub fn unit_profit(&self) -> f64 {
        if self.units == 0 {
            return 0.0;
        }
        self.total_profit.as_f64() / self.units as f64
    }

    pub fn profit_per_volume(&self) -> f64 {
        let volume = self.volume();
        if volume <= 0.0 {
            return 0.0;
        }
        self.total_profit.as_f64() / volume
    }
}

fn storable_units(available_volume: f64, unit_volume: f64) -> u64 {
    if available_volume <= 0.0 {
        return 0;
    }
    let units = (available_volume / unit_volume).floor() as u64;
    if units > 0 && units as f64 * unit_volume > available_volume {
        units - 1
    } else {
        units
    }
}

/// Greedy two-pointer sweep: the cheapest remaining sell offer is matched against the highest remaining bid
/// as long as that is profitable and budget and cargo allow at least one more unit.
///
/// `sell_orders` must be sorted by ascending price, `buy_orders` by descending price.
/// The inputs are never modified; the partially consumed books are returned in the outcome.
pub fn match_orders(sell_orders: &[MarketOrder], buy_orders: &[MarketOrder], unit_volume: f64, budget: Isk, cargo_capacity: f64) -> MatchOutcome {
    let mut remaining_sell = sell_orders.to_vec();
    let mut remaining_buy = buy_orders.to_vec();
    let mut fills: Vec<Fill> = Vec::new();

    let mut available_budget = budget;
    let mut available_volume = cargo_capacity;
    let mut si = 0;
    let mut bi = 0;

    let stop_reason = if !unit_volume.is_finite() || unit_volume <= 0.0 {
        StopReason::InvalidUnitVolume
    } else {
        loop {
            let (sell, buy) = match (remaining_sell.get(si), remaining_buy.get(bi)) {
                (None, _) => break StopReason::SellBookExhausted,
                (_, None) => break StopReason::BuyBookExhausted,
                (Some(sell), Some(buy)) => (*sell, *buy),
            };

            if sell.price >= buy.price {
                break StopReason::PriceCrossed;
            }

            let affordable = available_budget.affordable_units(sell.price);
            let storable = storable_units(available_volume, unit_volume);
            let units = sell.volume_remain.min(buy.volume_remain).min(affordable).min(storable);

            if units == 0 {
                break if affordable == 0 {
                    StopReason::BudgetExhausted
                } else if storable == 0 {
                    StopReason::CargoFull
                } else {
                    StopReason::EmptyOrder
                };
            }

            fills.push(Fill {
                sell_location: sell.location_id,
                buy_location: buy.location_id,
                sell_price: sell.price,
                buy_price: buy.price,
                units,
            });
            available_budget -= sell.price * units;
            available_volume -= units as f64 * unit_volume;

            remaining_sell[si] = sell.with_volume_remain(sell.volume_remain - units);
            remaining_buy[bi] = buy.with_volume_remain(buy.volume_remain - units);

            if remaining_sell[si].volume_remain == 0 {
                si += 1;
            }
            if remaining_buy[bi].volume_remain == 0 {
                bi += 1;
            }
        }
    };

    MatchOutcome {
        unit_volume,
        units: fills.iter().map(|f| f.units).sum(),
        total_profit: fills.iter().map(Fill::profit).sum(),
        total_cost: fills.iter().map(|f| f.sell_price * f.units).sum(),
        fills,
        remaining_sell: remaining_sell.split_off(si.min(remaining_sell.len())),
        remaining_buy: remaining_buy.split_off(bi.min(remaining_buy.len())),
        stop_reason,
    }
}

/// Per-item result of trading between two fixed systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProfitability {
    pub type_id: TypeId,
    pub name: String,
    pub units: u64,
    pub unit_volume: f64,
    pub total_profit: Isk,
    pub unit_profit: f64,
    pub profit_per_volume: f64,
}

impl ItemProfitability {
    pub fn from_outcome(type_id: TypeId, name: &str, outcome: &MatchOutcome) -> Self {
        ItemProfitability {
            type_id,
            name: name.to_string(),
            units: outcome.units,
            unit_volume: outcome.unit_volume,
            total_profit: outcome.total_profit,
            unit_profit: outcome.unit_profit(),
            profit_per_volume: outcome.profit_per_volume(),
        }
    }
}

/// A trade along one leg of a route: buy at `origin`, sell at `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOpportunity {
    pub origin: String,
    pub destination: String,
    pub type_id: TypeId,
    pub item_name: String,
    pub units: u64,
    pub unit_volume: f64,
    pub total_profit: Isk,
    pub unit_profit: f64,
    pub profit_per_volume: f64,
}

impl TradeOpportunity {
    pub fn new(origin: &str, destination: &str, item: ItemProfitability) -> Self {
        TradeOpportunity {
            origin: origin.to_string(),
            destination: destination.to_string(),
            type_id: item.type_id,
            item_name: item.name,
            units: item.units,
            unit_volume: item.unit_volume,
            total_profit: item.total_profit,
            unit_profit: item.unit_profit,
            profit_per_volume: item.profit_per_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sell(price: f64, qty: u64) -> MarketOrder {
        MarketOrder {
            type_id: TypeId(34),
            price: Isk::from_f64(price),
            volume_remain: qty,
            is_buy_order: false,
            location_id: StationId(1),
        }
    }

    fn buy(price: f64, qty: u64) -> MarketOrder {
        MarketOrder {
            type_id: TypeId(34),
            price: Isk::from_f64(price),
            volume_remain: qty,
            is_buy_order: true,
            location_id: StationId(2),
        }
    }

    fn assert_resource_invariants(outcome: &MatchOutcome, budget: Isk, cargo_capacity: f64) {
        assert!(outcome.total_cost <= budget, "spent {} of {}", outcome.total_cost, budget);
        assert!(outcome.volume() <= cargo_capacity + 1e-9, "loaded {} of {}", outcome.volume(), cargo_capacity);
        for fill in &outcome.fills {
            assert!(fill.sell_price < fill.buy_price);
        }
        if outcome.is_trade() {
            assert!(outcome.unit_profit() > 0.0);
        }
    }

    #[test]
    fn matches_cheapest_sell_against_highest_bid_until_prices_cross() {
        let sell_book = vec![sell(10.0, 5), sell(12.0, 10)];
        let buy_book = vec![buy(20.0, 3), buy(15.0, 20)];
        let budget = Isk::from_f64(1000.0);

        let outcome = match_orders(&sell_book, &buy_book, 1.0, budget, 1000.0);

        let steps = outcome.fills.iter().map(|f| (f.sell_price.as_f64(), f.buy_price.as_f64(), f.units, f.profit().as_f64())).collect_vec();
        assert_eq!(steps, vec![(10.0, 20.0, 3, 30.0), (10.0, 15.0, 2, 10.0), (12.0, 15.0, 10, 30.0)]);
        assert_eq!(outcome.units, 15);
        assert_eq!(outcome.total_profit, Isk::from_f64(70.0));
        assert_eq!(outcome.total_cost, Isk::from_f64(170.0));
        assert_eq!(outcome.stop_reason, StopReason::SellBookExhausted);
        assert_eq!(outcome.remaining_buy, vec![buy(15.0, 8)]);
        assert!(outcome.remaining_sell.is_empty());
        assert_resource_invariants(&outcome, budget, 1000.0);
    }

    #[test]
    fn stops_when_budget_cannot_buy_another_unit() {
        let sell_book = vec![sell(10.0, 5), sell(12.0, 10)];
        let buy_book = vec![buy(20.0, 3), buy(15.0, 20)];
        let budget = Isk::from_f64(40.0);

        let outcome = match_orders(&sell_book, &buy_book, 1.0, budget, 1000.0);

        assert_eq!(outcome.units, 4);
        assert_eq!(outcome.total_profit, Isk::from_f64(35.0));
        assert_eq!(outcome.total_cost, budget);
        assert_eq!(outcome.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(outcome.remaining_sell, vec![sell(10.0, 1), sell(12.0, 10)]);
        assert_resource_invariants(&outcome, budget, 1000.0);
    }

    #[test]
    fn stops_when_cargo_is_full() {
        let sell_book = vec![sell(10.0, 100)];
        let buy_book = vec![buy(20.0, 100)];

        let outcome = match_orders(&sell_book, &buy_book, 2.5, Isk::from_f64(1_000_000.0), 26.0);

        assert_eq!(outcome.units, 10);
        assert_eq!(outcome.volume(), 25.0);
        assert_eq!(outcome.profit_per_volume(), 4.0);
        assert_eq!(outcome.stop_reason, StopReason::CargoFull);
        assert_resource_invariants(&outcome, Isk::from_f64(1_000_000.0), 26.0);
    }

    #[test]
    fn no_trade_when_prices_do_not_overlap() {
        let outcome = match_orders(&[sell(15.0, 5)], &[buy(15.0, 5)], 1.0, Isk::from_f64(1000.0), 1000.0);

        assert!(!outcome.is_trade());
        assert_eq!(outcome.stop_reason, StopReason::PriceCrossed);
        assert_eq!(outcome.unit_profit(), 0.0);
    }

    #[test]
    fn empty_books_yield_no_trade() {
        let no_buyers = match_orders(&[sell(1.0, 5)], &[], 1.0, Isk::from_f64(1000.0), 1000.0);
        let no_sellers = match_orders(&[], &[buy(5.0, 5)], 1.0, Isk::from_f64(1000.0), 1000.0);

        assert!(!no_buyers.is_trade());
        assert_eq!(no_buyers.stop_reason, StopReason::BuyBookExhausted);
        assert!(!no_sellers.is_trade());
        assert_eq!(no_sellers.stop_reason, StopReason::SellBookExhausted);
    }

    #[test]
    fn zero_budget_or_cargo_yield_no_trade() {
        let zero_budget = match_orders(&[sell(1.0, 5)], &[buy(5.0, 5)], 1.0, Isk::ZERO, 1000.0);
        let zero_cargo = match_orders(&[sell(1.0, 5)], &[buy(5.0, 5)], 1.0, Isk::from_f64(1000.0), 0.0);
        let invalid_volume = match_orders(&[sell(1.0, 5)], &[buy(5.0, 5)], 0.0, Isk::from_f64(1000.0), 1000.0);

        assert_eq!(zero_budget.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(zero_cargo.stop_reason, StopReason::CargoFull);
        assert_eq!(invalid_volume.stop_reason, StopReason::InvalidUnitVolume);
        assert!(!zero_budget.is_trade() && !zero_cargo.is_trade() && !invalid_volume.is_trade());
    }

    #[test]
    fn matching_does_not_mutate_its_input_and_is_repeatable() {
        let sell_book = vec![sell(10.0, 5), sell(12.0, 10)];
        let buy_book = vec![buy(20.0, 3), buy(15.0, 20)];

        let first = match_orders(&sell_book, &buy_book, 0.5, Isk::from_f64(95.0), 4.0);
        let second = match_orders(&sell_book, &buy_book, 0.5, Isk::from_f64(95.0), 4.0);

        assert_eq!(sell_book, vec![sell(10.0, 5), sell(12.0, 10)]);
        assert_eq!(buy_book, vec![buy(20.0, 3), buy(15.0, 20)]);
        assert_eq!(first, second);
        assert_resource_invariants(&first, Isk::from_f64(95.0), 4.0);
    }

    #[test]
    fn resource_invariants_hold_for_a_grid_of_constraints() {
        let sell_book = vec![sell(3.33, 7), sell(4.1, 13), sell(9.99, 50)];
        let buy_book = vec![buy(11.5, 4), buy(10.0, 30), buy(4.0, 100)];

        for budget in [0.0, 1.0, 17.5, 99.99, 250.0, 10_000.0] {
            for cargo in [0.0, 0.3, 1.0, 7.77, 100.0] {
                let budget = Isk::from_f64(budget);
                let outcome = match_orders(&sell_book, &buy_book, 0.1, budget, cargo);
                assert_resource_invariants(&outcome, budget, cargo);
            }
        }
    }

    #[test]
    fn partition_keeps_only_orders_of_the_system() {
        let stations: HashMap<StationId, SystemId> = HashMap::from([(StationId(1), SystemId(100)), (StationId(2), SystemId(100)), (StationId(3), SystemId(200))]);

        let mut other_item = sell(7.0, 1);
        other_item.type_id = TypeId(35);
        let mut elsewhere = buy(9.0, 1);
        elsewhere.location_id = StationId(3);
        let mut unknown_location = sell(1.0, 1);
        unknown_location.location_id = StationId(99);

        let orders = vec![sell(10.0, 5), buy(20.0, 3), other_item, elsewhere, unknown_location, sell(11.0, 0)];

        let partition = partition_orders(&orders, SystemId(100), &stations);

        assert_eq!(partition.books.len(), 2);
        assert_eq!(
            partition.books.get(&TypeId(34)),
            Some(&OrderBook {
                sell: vec![sell(10.0, 5)],
                buy: vec![buy(20.0, 3)],
            })
        );
        assert_eq!(partition.books.get(&TypeId(35)).map(|b| b.sell.len()), Some(1));
        assert_eq!(partition.unresolved_locations, 1);
        assert_eq!(partition.other_systems, 1);
        assert_eq!(partition.empty_orders, 1);
    }

    #[test]
    fn leg_books_pair_origin_sells_with_destination_bids_sorted() {
        let origin = MarketPartition {
            books: BTreeMap::from([
                (TypeId(34), OrderBook { sell: vec![sell(12.0, 1), sell(10.0, 1)], buy: vec![buy(99.0, 1)] }),
                (TypeId(35), OrderBook { sell: vec![sell(1.0, 1)], buy: vec![] }),
            ]),
            ..Default::default()
        };
        let destination = MarketPartition {
            books: BTreeMap::from([(TypeId(34), OrderBook { sell: vec![sell(0.5, 1)], buy: vec![buy(15.0, 1), buy(20.0, 1)] })]),
            ..Default::default()
        };

        let books = leg_order_books(&origin, &destination);

        assert_eq!(books.keys().copied().collect_vec(), vec![TypeId(34)]);
        let book = &books[&TypeId(34)];
        assert_eq!(book.sell, vec![sell(10.0, 1), sell(12.0, 1)]);
        assert_eq!(book.buy, vec![buy(20.0, 1), buy(15.0, 1)]);
    }
}
