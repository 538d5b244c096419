use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use sawaari_core::{Error, Result};

use crate::inventory::Deck;

/// Route-level pricing override: blanket per-deck base prices and a surge
/// multiplier, valid inside a date window. At most one active override
/// should apply per travel date; overlapping windows are a data-quality
/// concern and resolution picks the latest effective date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePrice {
    pub id: Uuid,
    pub route_id: Uuid,
    pub departure_time: String,
    pub base_price_upper: i32,
    pub base_price_lower: i32,
    pub surge_multiplier: f64,
    pub effective_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RoutePrice {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_active && self.effective_date <= date && date <= self.expiry_date
    }

    pub fn base_for(&self, deck: Deck) -> i32 {
        match deck {
            Deck::Upper => self.base_price_upper,
            Deck::Lower => self.base_price_lower,
        }
    }
}

/// Repository trait for route-price overrides
#[async_trait]
pub trait RoutePriceRepository: Send + Sync {
    async fn insert(&self, price: &RoutePrice) -> Result<()>;

    /// The active override covering `date`, if any. With overlapping
    /// windows the latest effective date wins.
    async fn find_active(
        &self,
        route_id: Uuid,
        departure_time: &str,
        date: NaiveDate,
    ) -> Result<Option<RoutePrice>>;

    async fn list_for_route(&self, route_id: Uuid) -> Result<Vec<RoutePrice>>;

    /// `NotFound` if the override does not exist.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Input for creating a pricing override.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoutePrice {
    pub route_id: Uuid,
    pub departure_time: String,
    pub base_price_upper: i32,
    pub base_price_lower: i32,
    pub surge_multiplier: f64,
    pub effective_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

/// Resolves the price a seat sells for on a given travel date.
///
/// Two independent pricing paths exist: route-level overrides (blanket
/// replacement with surge) and per-seat current prices (fine-grained admin
/// edits). An active override whose window contains the travel date wins;
/// otherwise the stored per-seat price applies. The stored price is passed
/// in explicitly and evaluated per request, never cached at startup.
pub struct PricingEngine {
    prices: Arc<dyn RoutePriceRepository>,
}

impl PricingEngine {
    pub fn new(prices: Arc<dyn RoutePriceRepository>) -> Self {
        Self { prices }
    }

    pub async fn resolve(
        &self,
        route_id: Uuid,
        departure_time: &str,
        deck: Deck,
        travel_date: NaiveDate,
        stored_current_price: i32,
    ) -> Result<i32> {
        match self
            .prices
            .find_active(route_id, departure_time, travel_date)
            .await?
        {
            Some(override_price) => {
                let surged =
                    (override_price.base_for(deck) as f64 * override_price.surge_multiplier)
                        .round() as i32;
                Ok(surged)
            }
            None => Ok(stored_current_price),
        }
    }

    pub async fn create_override(&self, input: NewRoutePrice) -> Result<RoutePrice> {
        if input.base_price_upper <= 0 || input.base_price_lower <= 0 {
            return Err(Error::InvalidInput(
                "Deck base prices must be positive".to_owned(),
            ));
        }
        if input.surge_multiplier <= 0.0 {
            return Err(Error::InvalidInput(
                "Surge multiplier must be positive".to_owned(),
            ));
        }
        if input.effective_date > input.expiry_date {
            return Err(Error::InvalidInput(
                "Effective date must not be after expiry date".to_owned(),
            ));
        }

        let price = RoutePrice {
            id: Uuid::new_v4(),
            route_id: input.route_id,
            departure_time: input.departure_time,
            base_price_upper: input.base_price_upper,
            base_price_lower: input.base_price_lower,
            surge_multiplier: input.surge_multiplier,
            effective_date: input.effective_date,
            expiry_date: input.expiry_date,
            is_active: true,
            created_at: Utc::now(),
        };
        self.prices.insert(&price).await?;
        Ok(price)
    }

    pub async fn list_for_route(&self, route_id: Uuid) -> Result<Vec<RoutePrice>> {
        self.prices.list_for_route(route_id).await
    }

    pub async fn remove_override(&self, id: Uuid) -> Result<()> {
        self.prices.delete(id).await
    }
}
