use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use sawaari_core::{Error, Result};

/// A serviced city pair with its departure-time labels. Routes are never
/// hard-deleted; deactivation hides them from customers while historical
/// bookings keep referring to the cities by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub departure: String,
    pub destination: String,
    pub available_times: Vec<String>,
    pub is_active: bool,
}

/// Repository trait for route data access
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Fails with `Conflict` when an active route with the same
    /// (departure, destination) pair already exists.
    async fn insert(&self, route: &Route) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<Route>>;

    async fn find_active_pair(&self, departure: &str, destination: &str)
        -> Result<Option<Route>>;

    async fn list_active(&self) -> Result<Vec<Route>>;

    /// Full-row update keyed by id. Fails with `NotFound` if missing.
    async fn save(&self, route: &Route) -> Result<()>;
}

/// Active routes plus the derived city lists the search form consumes.
#[derive(Debug, Clone, Serialize)]
pub struct RouteListing {
    pub routes: Vec<Route>,
    pub departure_cities: Vec<String>,
    pub destination_cities: Vec<String>,
}

/// Admin-facing route catalog operations.
pub struct RouteCatalog {
    routes: Arc<dyn RouteRepository>,
}

impl RouteCatalog {
    pub fn new(routes: Arc<dyn RouteRepository>) -> Self {
        Self { routes }
    }

    /// Active routes with sorted, de-duplicated departure/destination city
    /// lists (case as stored).
    pub async fn list_active(&self) -> Result<RouteListing> {
        let routes = self.routes.list_active().await?;

        let mut departure_cities: Vec<String> =
            routes.iter().map(|r| r.departure.clone()).collect();
        departure_cities.sort();
        departure_cities.dedup();

        let mut destination_cities: Vec<String> =
            routes.iter().map(|r| r.destination.clone()).collect();
        destination_cities.sort();
        destination_cities.dedup();

        Ok(RouteListing {
            routes,
            departure_cities,
            destination_cities,
        })
    }

    pub async fn add_route(
        &self,
        departure: &str,
        destination: &str,
        times: Vec<String>,
    ) -> Result<Route> {
        let departure = departure.trim();
        let destination = destination.trim();

        if departure.is_empty() || destination.is_empty() {
            return Err(Error::InvalidInput(
                "Departure and destination cities are required".to_owned(),
            ));
        }
        validate_times(&times)?;

        if self
            .routes
            .find_active_pair(departure, destination)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("This route already exists".to_owned()));
        }

        let route = Route {
            id: Uuid::new_v4(),
            departure: departure.to_owned(),
            destination: destination.to_owned(),
            available_times: times,
            is_active: true,
        };
        self.routes.insert(&route).await?;

        tracing::info!(
            route_id = %route.id,
            departure = %route.departure,
            destination = %route.destination,
            "Route added"
        );
        Ok(route)
    }

    /// Replace the full departure-time list. No partial merge.
    pub async fn update_times(&self, route_id: Uuid, times: Vec<String>) -> Result<Route> {
        validate_times(&times)?;

        let mut route = self
            .routes
            .find(route_id)
            .await?
            .ok_or_else(|| Error::NotFound("Route not found".to_owned()))?;

        route.available_times = times;
        self.routes.save(&route).await?;
        Ok(route)
    }

    /// Soft delete. Reapplying to an already-inactive route is a no-op.
    pub async fn deactivate(&self, route_id: Uuid) -> Result<()> {
        let mut route = self
            .routes
            .find(route_id)
            .await?
            .ok_or_else(|| Error::NotFound("Route not found".to_owned()))?;

        if route.is_active {
            route.is_active = false;
            self.routes.save(&route).await?;
            tracing::info!(route_id = %route.id, "Route deactivated");
        }
        Ok(())
    }
}

fn validate_times(times: &[String]) -> Result<()> {
    if times.is_empty() || times.iter().any(|t| t.trim().is_empty()) {
        return Err(Error::InvalidInput(
            "Available time must be a non-empty list of time labels".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRouteRepository;

    fn catalog() -> RouteCatalog {
        RouteCatalog::new(Arc::new(InMemoryRouteRepository::new()))
    }

    #[tokio::test]
    async fn add_route_rejects_duplicate_pair() {
        let catalog = catalog();
        catalog
            .add_route("A", "B", vec!["07:00 AM".to_owned()])
            .await
            .unwrap();

        let err = catalog
            .add_route("A", "B", vec!["07:00 AM".to_owned()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        // Route count unchanged by the failed insert.
        assert_eq!(catalog.list_active().await.unwrap().routes.len(), 1);
    }

    #[tokio::test]
    async fn listing_derives_sorted_distinct_cities() {
        let catalog = catalog();
        catalog
            .add_route("Dehradun", "Jaipur", vec!["07:00 AM".to_owned()])
            .await
            .unwrap();
        catalog
            .add_route("Dehradun", "Delhi", vec!["11:00 AM".to_owned()])
            .await
            .unwrap();
        catalog
            .add_route("Agra", "Jaipur", vec!["03:00 PM".to_owned()])
            .await
            .unwrap();

        let listing = catalog.list_active().await.unwrap();
        assert_eq!(listing.departure_cities, vec!["Agra", "Dehradun"]);
        assert_eq!(listing.destination_cities, vec!["Delhi", "Jaipur"]);
    }

    #[tokio::test]
    async fn update_times_replaces_whole_list() {
        let catalog = catalog();
        let route = catalog
            .add_route("A", "B", vec!["07:00 AM".to_owned(), "11:00 AM".to_owned()])
            .await
            .unwrap();

        let updated = catalog
            .update_times(route.id, vec!["09:30 PM".to_owned()])
            .await
            .unwrap();
        assert_eq!(updated.available_times, vec!["09:30 PM"]);

        let err = catalog.update_times(route.id, vec![]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = catalog
            .update_times(Uuid::new_v4(), vec!["07:00 AM".to_owned()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let catalog = catalog();
        let route = catalog
            .add_route("A", "B", vec!["07:00 AM".to_owned()])
            .await
            .unwrap();

        catalog.deactivate(route.id).await.unwrap();
        catalog.deactivate(route.id).await.unwrap();

        assert!(catalog.list_active().await.unwrap().routes.is_empty());
    }

    #[tokio::test]
    async fn pair_frees_up_after_deactivation() {
        let catalog = catalog();
        let route = catalog
            .add_route("A", "B", vec!["07:00 AM".to_owned()])
            .await
            .unwrap();
        catalog.deactivate(route.id).await.unwrap();

        // Uniqueness applies among active routes only.
        catalog
            .add_route("A", "B", vec!["11:00 AM".to_owned()])
            .await
            .unwrap();
    }
}
