use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sawaari_catalog::routes::{Route, RouteRepository};
use sawaari_core::{Error, Result};

use crate::{map_insert_err, storage_err};

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    departure: String,
    destination: String,
    available_times: Vec<String>,
    is_active: bool,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: row.id,
            departure: row.departure,
            destination: row.destination,
            available_times: row.available_times,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn insert(&self, route: &Route) -> Result<()> {
        sqlx::query(
            "INSERT INTO routes (id, departure, destination, available_times, is_active)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(route.id)
        .bind(&route.departure)
        .bind(&route.destination)
        .bind(&route.available_times)
        .bind(route.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "This route already exists"))?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>(
            "SELECT id, departure, destination, available_times, is_active
             FROM routes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(Route::from))
    }

    async fn find_active_pair(
        &self,
        departure: &str,
        destination: &str,
    ) -> Result<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>(
            "SELECT id, departure, destination, available_times, is_active
             FROM routes WHERE departure = $1 AND destination = $2 AND is_active",
        )
        .bind(departure)
        .bind(destination)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(Route::from))
    }

    async fn list_active(&self) -> Result<Vec<Route>> {
        let rows = sqlx::query_as::<_, RouteRow>(
            "SELECT id, departure, destination, available_times, is_active
             FROM routes WHERE is_active ORDER BY departure, destination",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(Route::from).collect())
    }

    async fn save(&self, route: &Route) -> Result<()> {
        let result = sqlx::query(
            "UPDATE routes
             SET departure = $2, destination = $3, available_times = $4, is_active = $5
             WHERE id = $1",
        )
        .bind(route.id)
        .bind(&route.departure)
        .bind(&route.destination)
        .bind(&route.available_times)
        .bind(route.is_active)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Route not found".to_owned()));
        }
        Ok(())
    }
}
