use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::error::Error;

#[tracing::instrument(skip(db_uri))]
pub async fn connect(db_uri: &str, max_connections: u32) -> Result<Pool<Postgres>, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_uri)
        .await?;

    tracing::info!("connected to postgres");

    Ok(pool)
}
