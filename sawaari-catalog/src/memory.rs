//! HashMap-backed repository implementations. Used by unit and
//! integration tests and as a stand-in while no database is configured.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use sawaari_core::{Error, Result};

use crate::inventory::{Seat, SeatRepository};
use crate::pricing::{RoutePrice, RoutePriceRepository};
use crate::routes::{Route, RouteRepository};

#[derive(Default)]
pub struct InMemoryRouteRepository {
    routes: RwLock<HashMap<Uuid, Route>>,
}

impl InMemoryRouteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RouteRepository for InMemoryRouteRepository {
    async fn insert(&self, route: &Route) -> Result<()> {
        let mut routes = self.routes.write().await;
        let duplicate = routes.values().any(|r| {
            r.is_active
                && r.departure == route.departure
                && r.destination == route.destination
        });
        if duplicate {
            return Err(Error::Conflict("This route already exists".to_owned()));
        }
        routes.insert(route.id, route.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Route>> {
        Ok(self.routes.read().await.get(&id).cloned())
    }

    async fn find_active_pair(
        &self,
        departure: &str,
        destination: &str,
    ) -> Result<Option<Route>> {
        Ok(self
            .routes
            .read()
            .await
            .values()
            .find(|r| r.is_active && r.departure == departure && r.destination == destination)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Route>> {
        let mut active: Vec<Route> = self
            .routes
            .read()
            .await
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            (a.departure.as_str(), a.destination.as_str())
                .cmp(&(b.departure.as_str(), b.destination.as_str()))
        });
        Ok(active)
    }

    async fn save(&self, route: &Route) -> Result<()> {
        let mut routes = self.routes.write().await;
        if !routes.contains_key(&route.id) {
            return Err(Error::NotFound("Route not found".to_owned()));
        }
        routes.insert(route.id, route.clone());
        Ok(())
    }
}

type SeatKey = (Uuid, String, String);

#[derive(Default)]
pub struct InMemorySeatRepository {
    seats: RwLock<HashMap<SeatKey, Seat>>,
}

impl InMemorySeatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn seat_key(route_id: Uuid, departure_time: &str, seat_id: &str) -> SeatKey {
    (route_id, departure_time.to_owned(), seat_id.to_owned())
}

#[async_trait]
impl SeatRepository for InMemorySeatRepository {
    async fn insert(&self, seat: &Seat) -> Result<()> {
        let key = seat_key(seat.route_id, &seat.departure_time, &seat.seat_id);
        let mut seats = self.seats.write().await;
        if seats.contains_key(&key) {
            return Err(Error::Conflict(format!(
                "Seat already exists: {}",
                seat.seat_id
            )));
        }
        seats.insert(key, seat.clone());
        Ok(())
    }

    async fn find(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
    ) -> Result<Option<Seat>> {
        Ok(self
            .seats
            .read()
            .await
            .get(&seat_key(route_id, departure_time, seat_id))
            .cloned())
    }

    async fn list_slot(&self, route_id: Uuid, departure_time: &str) -> Result<Vec<Seat>> {
        let mut slot: Vec<Seat> = self
            .seats
            .read()
            .await
            .values()
            .filter(|s| s.route_id == route_id && s.departure_time == departure_time)
            .cloned()
            .collect();
        slot.sort_by(|a, b| {
            (a.deck.as_str(), a.row, a.column.as_str())
                .cmp(&(b.deck.as_str(), b.row, b.column.as_str()))
        });
        Ok(slot)
    }

    async fn save(&self, seat: &Seat) -> Result<()> {
        let key = seat_key(seat.route_id, &seat.departure_time, &seat.seat_id);
        let mut seats = self.seats.write().await;
        if !seats.contains_key(&key) {
            return Err(Error::NotFound(format!("Seat not found: {}", seat.seat_id)));
        }
        seats.insert(key, seat.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRoutePriceRepository {
    prices: RwLock<HashMap<Uuid, RoutePrice>>,
}

impl InMemoryRoutePriceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoutePriceRepository for InMemoryRoutePriceRepository {
    async fn insert(&self, price: &RoutePrice) -> Result<()> {
        self.prices.write().await.insert(price.id, price.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        route_id: Uuid,
        departure_time: &str,
        date: NaiveDate,
    ) -> Result<Option<RoutePrice>> {
        let prices = self.prices.read().await;
        let mut matching: Vec<&RoutePrice> = prices
            .values()
            .filter(|p| {
                p.route_id == route_id
                    && p.departure_time == departure_time
                    && p.covers(date)
            })
            .collect();
        matching.sort_by_key(|p| (p.effective_date, p.created_at));
        Ok(matching.last().map(|p| (*p).clone()))
    }

    async fn list_for_route(&self, route_id: Uuid) -> Result<Vec<RoutePrice>> {
        let mut list: Vec<RoutePrice> = self
            .prices
            .read()
            .await
            .values()
            .filter(|p| p.route_id == route_id)
            .cloned()
            .collect();
        list.sort_by_key(|p| (p.departure_time.clone(), p.effective_date));
        Ok(list)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        match self.prices.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound("Pricing record not found".to_owned())),
        }
    }
}
