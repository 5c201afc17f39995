use super::helpers::{fetch_booking_for_update, is_reference_conflict, save_booking};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::BookingAPI,
    booking::{prepare_booking, revise_booking, MAX_REFERENCE_ATTEMPTS},
    entities::{Booking, BookingDraft, BookingPatch},
    error::{not_found_error, reference_exhausted_error, Error},
    validation::now_ist,
};

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error> {
        let mut booking = prepare_booking(draft, &self.estimator, now_ist())?;

        let mut conn = self.pool.acquire().await?;

        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let inserted = conn
                .execute(
                    sqlx::query("INSERT INTO bookings (id, reference, status, data) VALUES ($1, $2, $3, $4)")
                        .bind(&booking.id)
                        .bind(&booking.reference)
                        .bind(booking.status.name())
                        .bind(Json(&booking)),
                )
                .await;

            match inserted {
                Ok(_) => {
                    tracing::info!(id = %booking.id, reference = %booking.reference, "booking created");
                    return Ok(booking);
                }
                Err(err) if is_reference_conflict(&err) => {
                    tracing::warn!(reference = %booking.reference, "booking reference taken, redrawing");
                    booking.reissue_reference();
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(reference_exhausted_error())
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, id: Uuid) -> Result<Booking, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM bookings WHERE id = $1").bind(&id))
            .await?;

        let result = maybe_result.ok_or_else(not_found_error)?;
        let Json(booking) = result.try_get("data")?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn update_booking(&self, id: Uuid, patch: BookingPatch) -> Result<Booking, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut booking = fetch_booking_for_update(&mut tx, &id).await?;

        revise_booking(&mut booking, patch, &self.estimator, now_ist())?;

        save_booking(&mut tx, &booking).await?;

        tx.commit().await?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(sqlx::query("DELETE FROM bookings WHERE id = $1").bind(&id))
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error());
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn confirm_booking(&self, id: Uuid) -> Result<Booking, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut booking = fetch_booking_for_update(&mut tx, &id).await?;

        booking.confirm()?;

        save_booking(&mut tx, &booking).await?;

        tx.commit().await?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut booking = fetch_booking_for_update(&mut tx, &id).await?;

        booking.cancel()?;

        save_booking(&mut tx, &booking).await?;

        tx.commit().await?;

        Ok(booking)
    }
}
