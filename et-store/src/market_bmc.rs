use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::TimeDelta;
use et_domain::{decode_market_orders, MarketOrder, RegionId};
use itertools::Itertools;
use mockall::automock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use strum::{Display, EnumString};
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OrderType {
    All,
    Buy,
    Sell,
}

impl OrderType {
    pub fn accepts(&self, order: &MarketOrder) -> bool {
        match self {
            OrderType::All => true,
            OrderType::Buy => order.is_buy_order,
            OrderType::Sell => order.is_sell_order(),
        }
    }
}

/// The remote side: delivers the raw order records of a region.
#[automock]
#[async_trait]
pub trait MarketOrderSource: Send + Sync + Debug {
    async fn fetch_market_orders(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<Value>>;
}

#[automock]
#[async_trait]
pub trait MarketOrderBmcTrait: Send + Sync + Debug {
    async fn get_market_orders(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<MarketOrder>>;
}

/// Serves market orders from `region_{id}_{order_type}.json` files while they are younger than `ttl`
/// and refreshes them from the remote source otherwise.
#[derive(Debug)]
pub struct FileCachedMarketOrderBmc {
    cache_dir: PathBuf,
    ttl: TimeDelta,
    source: Arc<dyn MarketOrderSource>,
}

impl FileCachedMarketOrderBmc {
    pub fn new<P: AsRef<Path>>(cache_dir: P, ttl: TimeDelta, source: Arc<dyn MarketOrderSource>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            ttl,
            source,
        }
    }

    pub fn cache_file(&self, region_id: RegionId, order_type: OrderType) -> PathBuf {
        self.cache_dir.join(format!("region_{}_{}.json", region_id.0, order_type))
    }

    async fn cache_age(path: &Path) -> Option<TimeDelta> {
        let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        TimeDelta::from_std(age).ok()
    }

    async fn read_cache_file(path: &Path) -> Result<Vec<Value>> {
        let bytes = tokio::fs::read(path).await.with_context(|| format!("Failed to read {}", path.display()))?;
        let records = serde_json::from_slice(&bytes).with_context(|| format!("Failed to decode {}", path.display()))?;
        Ok(records)
    }

    async fn write_cache_file(&self, path: &Path, records: &[Value]) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .with_context(|| format!("Failed to create cache dir {}", self.cache_dir.display()))?;
        let bytes = serde_json::to_vec(records)?;
        tokio::fs::write(path, bytes).await.with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    async fn load_records(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<Value>> {
        let cache_file = self.cache_file(region_id, order_type);

        match Self::cache_age(&cache_file).await {
            Some(age) if age < self.ttl => {
                event!(
                    Level::INFO,
                    "Market data of region {} is {} minutes old. Using local cache {}",
                    region_id,
                    age.num_minutes(),
                    cache_file.display()
                );
                match Self::read_cache_file(&cache_file).await {
                    Ok(records) => return Ok(records),
                    Err(err) => event!(Level::WARN, "Ignoring unreadable market cache: {err:#}"),
                }
            }
            Some(age) => event!(
                Level::INFO,
                "Market data of region {} is older than {} minutes ({} min). Fetching fresh orders",
                region_id,
                self.ttl.num_minutes(),
                age.num_minutes()
            ),
            None => event!(Level::INFO, "No market cache for region {}. Fetching orders", region_id),
        }

        let records = self.source.fetch_market_orders(region_id, order_type).await?;
        self.write_cache_file(&cache_file, &records).await?;
        Ok(records)
    }
}

#[async_trait]
impl MarketOrderBmcTrait for FileCachedMarketOrderBmc {
    async fn get_market_orders(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<MarketOrder>> {
        let records = self.load_records(region_id, order_type).await?;
        let decoded = decode_market_orders(records);

        if !decoded.skipped.is_empty() {
            event!(
                Level::WARN,
                "Skipped {} malformed orders of region {}. First problem: {}",
                decoded.skipped.len(),
                region_id,
                decoded.skipped[0].reason
            );
        }

        Ok(decoded.orders.into_iter().filter(|o| order_type.accepts(o)).collect_vec())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMarketOrderBmc {
    orders: HashMap<RegionId, Vec<MarketOrder>>,
}

impl InMemoryMarketOrderBmc {
    pub fn new(orders: HashMap<RegionId, Vec<MarketOrder>>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl MarketOrderBmcTrait for InMemoryMarketOrderBmc {
    async fn get_market_orders(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<MarketOrder>> {
        Ok(self
            .orders
            .get(&region_id)
            .map(|orders| orders.iter().filter(|o| order_type.accepts(o)).copied().collect_vec())
            .unwrap_or_default())
    }
}
