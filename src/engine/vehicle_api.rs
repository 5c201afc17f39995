use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};
use uuid::Uuid;

use crate::{
    api::VehicleAPI,
    entities::{NewVehicle, Vehicle, VehicleFilter},
    error::{not_found_error, Error},
};

#[async_trait]
impl VehicleAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, Error> {
        let mut conn = self.pool.acquire().await?;

        // type and rate narrow the scan; free-text search runs on the documents
        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM vehicles WHERE ($1::VARCHAR IS NULL OR vehicle_type = $1) AND ($2::INT8 IS NULL OR daily_rate <= $2)",
                )
                .bind(filter.vehicle_type.map(|t| t.name()))
                .bind(filter.max_daily_rate),
            )
            .await?;

        let mut vehicles = Vec::with_capacity(rows.len());
        for row in rows {
            let Json(vehicle): Json<Vehicle> = row.try_get("data")?;
            vehicles.push(vehicle);
        }

        Ok(filter.apply(vehicles))
    }

    #[tracing::instrument(skip(self))]
    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM vehicles WHERE id = $1").bind(&id))
            .await?;

        let result = maybe_result.ok_or_else(not_found_error)?;
        let Json(vehicle) = result.try_get("data")?;

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn create_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, Error> {
        let vehicle = Vehicle::new(vehicle);

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO vehicles (id, vehicle_type, daily_rate, data) VALUES ($1, $2, $3, $4)")
                .bind(&vehicle.id)
                .bind(vehicle.vehicle_type.name())
                .bind(vehicle.daily_rate)
                .bind(Json(&vehicle)),
        )
        .await?;

        Ok(vehicle)
    }
}
