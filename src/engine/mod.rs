mod booking_api;
mod helpers;
mod vehicle_api;

use sqlx::{types::Json, Executor, Pool, Postgres, Row};

use crate::{
    api::{FareAPI, API},
    entities::Vehicle,
    error::Error,
    fare::FareEstimator,
    fleet::default_fleet,
};

type Database = Postgres;

/// Postgres-backed engine. Bookings and vehicles are stored as JSONB
/// documents next to the few columns that are queried directly.
pub struct Engine {
    pool: Pool<Database>,
    estimator: FareEstimator,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, estimator: FareEstimator) -> Result<Self, Error> {
        pool.execute("CREATE TABLE IF NOT EXISTS bookings (id UUID PRIMARY KEY, reference VARCHAR NOT NULL UNIQUE, status VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS vehicles (id UUID PRIMARY KEY, vehicle_type VARCHAR NOT NULL, daily_rate INT8 NOT NULL, data JSONB NOT NULL)")
            .await?;

        let engine = Self { pool, estimator };
        engine.seed_vehicles().await?;

        Ok(engine)
    }

    #[tracing::instrument(skip(self))]
    async fn seed_vehicles(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let count: i64 = conn
            .fetch_one(sqlx::query("SELECT COUNT(*) AS count FROM vehicles"))
            .await?
            .try_get("count")?;

        if count > 0 {
            return Ok(());
        }

        tracing::info!("seeding default fleet");

        for vehicle in default_fleet().into_iter().map(Vehicle::new) {
            conn.execute(
                sqlx::query("INSERT INTO vehicles (id, vehicle_type, daily_rate, data) VALUES ($1, $2, $3, $4)")
                    .bind(&vehicle.id)
                    .bind(vehicle.vehicle_type.name())
                    .bind(vehicle.daily_rate)
                    .bind(Json(&vehicle)),
            )
            .await?;
        }

        Ok(())
    }
}

impl FareAPI for Engine {
    fn estimator(&self) -> &FareEstimator {
        &self.estimator
    }
}

impl API for Engine {}
