use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::{BookingAPI, FareAPI, VehicleAPI, API},
    booking::{assign_unique_reference, prepare_booking, revise_booking},
    entities::{Booking, BookingDraft, BookingPatch, NewVehicle, Vehicle, VehicleFilter},
    error::{not_found_error, simulated_failure_error, Error},
    fare::FareEstimator,
    fleet::default_fleet,
    validation::now_ist,
};

/// In-memory backend standing in for the booking service. Every call waits a
/// fixed latency first, and queued failures make the next calls fail the way
/// an unreachable backend would.
pub struct MockEngine {
    bookings: Mutex<HashMap<Uuid, Booking>>,
    vehicles: Mutex<HashMap<Uuid, Vehicle>>,
    estimator: FareEstimator,
    latency: Duration,
    pending_failures: AtomicUsize,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new(FareEstimator::default(), Duration::ZERO)
    }
}

impl MockEngine {
    #[tracing::instrument(name = "MockEngine::new", skip(estimator))]
    pub fn new(estimator: FareEstimator, latency: Duration) -> Self {
        let vehicles = default_fleet()
            .into_iter()
            .map(Vehicle::new)
            .map(|vehicle| (vehicle.id, vehicle))
            .collect();

        Self {
            bookings: Mutex::new(HashMap::new()),
            vehicles: Mutex::new(vehicles),
            estimator,
            latency,
            pending_failures: AtomicUsize::new(0),
        }
    }

    /// Makes the next `count` calls fail with an internal error.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.fetch_add(count, Ordering::SeqCst);
    }

    async fn simulate_call(&self) -> Result<(), Error> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failed = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if failed {
            tracing::warn!("simulating backend failure");
            return Err(simulated_failure_error());
        }

        Ok(())
    }

    async fn with_booking<F>(&self, id: Uuid, f: F) -> Result<Booking, Error>
    where
        F: FnOnce(&mut Booking) -> Result<(), Error> + Send,
    {
        self.simulate_call().await?;

        let mut bookings = self.bookings.lock().await;
        let booking = bookings.get_mut(&id).ok_or_else(not_found_error)?;

        // work on a copy so a rejected change leaves the stored booking as is
        let mut updated = booking.clone();
        f(&mut updated)?;
        *booking = updated.clone();

        Ok(updated)
    }
}

#[async_trait]
impl BookingAPI for MockEngine {
    #[tracing::instrument(skip(self))]
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error> {
        self.simulate_call().await?;

        let mut booking = prepare_booking(draft, &self.estimator, now_ist())?;

        let mut bookings = self.bookings.lock().await;
        assign_unique_reference(&mut booking, |reference| {
            bookings.values().any(|stored| stored.reference == reference)
        })?;
        bookings.insert(booking.id, booking.clone());
        drop(bookings);

        tracing::info!(id = %booking.id, reference = %booking.reference, "booking created");

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, id: Uuid) -> Result<Booking, Error> {
        self.simulate_call().await?;

        self.bookings
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    async fn update_booking(&self, id: Uuid, patch: BookingPatch) -> Result<Booking, Error> {
        let estimator = &self.estimator;

        self.with_booking(id, |booking| {
            revise_booking(booking, patch, estimator, now_ist())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, id: Uuid) -> Result<(), Error> {
        self.simulate_call().await?;

        self.bookings
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    async fn confirm_booking(&self, id: Uuid) -> Result<Booking, Error> {
        self.with_booking(id, Booking::confirm).await
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, Error> {
        self.with_booking(id, Booking::cancel).await
    }
}

#[async_trait]
impl VehicleAPI for MockEngine {
    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, Error> {
        self.simulate_call().await?;

        let vehicles = self.vehicles.lock().await;

        Ok(filter.apply(vehicles.values().cloned()))
    }

    #[tracing::instrument(skip(self))]
    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, Error> {
        self.simulate_call().await?;

        self.vehicles
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    async fn create_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, Error> {
        self.simulate_call().await?;

        let vehicle = Vehicle::new(vehicle);
        self.vehicles
            .lock()
            .await
            .insert(vehicle.id, vehicle.clone());

        Ok(vehicle)
    }
}

impl FareAPI for MockEngine {
    fn estimator(&self) -> &FareEstimator {
        &self.estimator
    }
}

impl API for MockEngine {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BookingStatus, PaymentMethod, TripType, VehicleClass};
    use chrono::Duration as ChronoDuration;
    use tokio_test::{assert_err, assert_ok};

    fn draft() -> BookingDraft {
        let date = (now_ist().date() + ChronoDuration::days(3))
            .format("%Y-%m-%d")
            .to_string();

        BookingDraft {
            trip_type: TripType::OneWay,
            pickup: Some("Delhi".into()),
            dropoff: Some("Agra".into()),
            date: Some(date),
            time: Some("07:00".into()),
            vehicle_class: Some(VehicleClass::Suv),
            name: Some("Vikram Singh".into()),
            phone: Some("9812345678".into()),
            email: Some("vikram@example.com".into()),
            payment_method: Some(PaymentMethod::Upi),
            ..BookingDraft::default()
        }
    }

    #[tokio::test]
    async fn booking_crud_round_trip() {
        let engine = MockEngine::default();

        let created = assert_ok!(engine.create_booking(draft()).await);
        assert_eq!(created.quote.distance_km, 230.0);

        let found = assert_ok!(engine.find_booking(created.id).await);
        assert_eq!(found.reference, created.reference);

        let patch = BookingPatch {
            vehicle_class: Some(VehicleClass::Sedan),
            ..BookingPatch::default()
        };
        let updated = assert_ok!(engine.update_booking(created.id, patch).await);
        assert_eq!(updated.quote.base_fare, 3680);
        assert!(updated.updated_at >= created.updated_at);

        assert_ok!(engine.delete_booking(created.id).await);
        let err = assert_err!(engine.find_booking(created.id).await);
        assert!(err.is_not_found_error());
    }

    #[tokio::test]
    async fn colliding_reference_is_redrawn() {
        let engine = MockEngine::default();
        let first = assert_ok!(engine.create_booking(draft()).await);

        // a copy of the stored booking starts out with a reference in use
        let mut colliding = first.clone();
        colliding.id = Uuid::new_v4();
        let mut bookings = engine.bookings.lock().await;
        assert_ok!(assign_unique_reference(&mut colliding, |reference| {
            bookings.values().any(|stored| stored.reference == reference)
        }));
        assert_ne!(colliding.reference, first.reference);

        let mut references = std::collections::HashSet::new();
        references.insert(colliding.reference.clone());
        bookings.insert(colliding.id, colliding);
        drop(bookings);

        for _ in 0..3000 {
            let booking = assert_ok!(engine.create_booking(draft()).await);
            references.insert(booking.reference);
        }
        references.insert(first.reference);

        assert_eq!(references.len(), engine.bookings.lock().await.len());
    }

    #[tokio::test]
    async fn confirmed_booking_cannot_be_updated() {
        let engine = MockEngine::default();
        let created = assert_ok!(engine.create_booking(draft()).await);

        let confirmed = assert_ok!(engine.confirm_booking(created.id).await);
        assert_eq!(confirmed.status.name(), "confirmed");

        let patch = BookingPatch {
            name: Some("Vikram S".into()),
            ..BookingPatch::default()
        };
        let err = assert_err!(engine.update_booking(created.id, patch).await);
        assert_eq!(err.code, 100);

        let cancelled = assert_ok!(engine.cancel_booking(created.id).await);
        assert!(matches!(cancelled.status, BookingStatus::Cancelled { .. }));
    }

    #[tokio::test]
    async fn rejected_transition_keeps_stored_state() {
        let engine = MockEngine::default();
        let created = assert_ok!(engine.create_booking(draft()).await);

        assert_ok!(engine.cancel_booking(created.id).await);
        assert_err!(engine.confirm_booking(created.id).await);

        let stored = assert_ok!(engine.find_booking(created.id).await);
        assert_eq!(stored.status.name(), "cancelled");
    }

    #[tokio::test]
    async fn invalid_draft_is_not_stored() {
        let engine = MockEngine::default();
        let draft = BookingDraft {
            dropoff: Some("Delhi".into()),
            ..draft()
        };

        let err = assert_err!(engine.create_booking(draft).await);
        assert_eq!(err.code, 102);
        assert!(engine.bookings.lock().await.is_empty());
    }

    #[tokio::test]
    async fn queued_failures_fail_next_calls_only() {
        let engine = MockEngine::default();
        engine.fail_next(2);

        assert_err!(engine.create_booking(draft()).await);
        assert_err!(engine.list_vehicles(VehicleFilter::default()).await);
        assert_ok!(engine.create_booking(draft()).await);
    }

    #[tokio::test]
    async fn latency_is_applied() {
        let engine = MockEngine::new(FareEstimator::default(), Duration::from_millis(20));

        let started = std::time::Instant::now();
        assert_ok!(engine.list_vehicles(VehicleFilter::default()).await);

        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn vehicles_are_seeded_and_filterable() {
        let engine = MockEngine::default();

        let all = assert_ok!(engine.list_vehicles(VehicleFilter::default()).await);
        assert_eq!(all.len(), default_fleet().len());

        let luxury = assert_ok!(
            engine
                .list_vehicles(VehicleFilter {
                    vehicle_type: Some(VehicleClass::Luxury),
                    ..VehicleFilter::default()
                })
                .await
        );
        assert_eq!(luxury.len(), 2);

        let found = assert_ok!(engine.find_vehicle(luxury[0].id).await);
        assert_eq!(found, luxury[0]);
    }
}
