use crate::{Isk, StationId, TypeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An open market order. Records are immutable; matching produces reduced copies via [`MarketOrder::with_volume_remain`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketOrder {
    pub type_id: TypeId,
    pub price: Isk,
    pub volume_remain: u64,
    pub is_buy_order: bool,
    pub location_id: StationId,
}

impl MarketOrder {
    pub fn with_volume_remain(&self, volume_remain: u64) -> Self {
        MarketOrder { volume_remain, ..*self }
    }

    pub fn is_sell_order(&self) -> bool {
        !self.is_buy_order
    }
}

/// A market order as the market API delivers it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RawMarketOrder {
    pub type_id: i64,
    pub price: f64,
    pub volume_remain: i64,
    pub is_buy_order: bool,
    pub location_id: i64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedOrder {
    #[error("order could not be decoded: {0}")]
    Undecodable(String),
    #[error("negative remaining volume {0}")]
    NegativeVolume(i64),
    #[error("non-positive or non-finite price {0}")]
    InvalidPrice(f64),
}

impl TryFrom<RawMarketOrder> for MarketOrder {
    type Error = MalformedOrder;

    fn try_from(raw: RawMarketOrder) -> Result<Self, Self::Error> {
        if raw.volume_remain < 0 {
            return Err(MalformedOrder::NegativeVolume(raw.volume_remain));
        }
        // checked after rounding so that sub-cent prices are rejected too
        let price = Isk::from_f64(raw.price);
        if !raw.price.is_finite() || !price.is_positive() {
            return Err(MalformedOrder::InvalidPrice(raw.price));
        }
        Ok(MarketOrder {
            type_id: TypeId(raw.type_id),
            price,
            volume_remain: raw.volume_remain as u64,
            is_buy_order: raw.is_buy_order,
            location_id: StationId(raw.location_id),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOrder {
    pub index: usize,
    pub reason: MalformedOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedMarketOrders {
    pub orders: Vec<MarketOrder>,
    pub skipped: Vec<SkippedOrder>,
}

/// Decodes raw order records one by one. A malformed record is skipped and reported, the rest survive.
pub fn decode_market_orders(records: Vec<Value>) -> DecodedMarketOrders {
    let mut decoded = DecodedMarketOrders::default();

    for (index, record) in records.into_iter().enumerate() {
        let result = serde_json::from_value::<RawMarketOrder>(record)
            .map_err(|e| MalformedOrder::Undecodable(e.to_string()))
            .and_then(MarketOrder::try_from);

        match result {
            Ok(order) => decoded.orders.push(order),
            Err(reason) => decoded.skipped.push(SkippedOrder { index, reason }),
        }
    }

    decoded
}
