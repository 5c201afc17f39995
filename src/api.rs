use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Booking, BookingDraft, BookingPatch, NewVehicle, Vehicle, VehicleFilter};
use crate::error::Error;
use crate::fare::FareEstimator;

#[async_trait]
pub trait BookingAPI {
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error>;
    async fn find_booking(&self, id: Uuid) -> Result<Booking, Error>;
    async fn update_booking(&self, id: Uuid, patch: BookingPatch) -> Result<Booking, Error>;
    async fn delete_booking(&self, id: Uuid) -> Result<(), Error>;
    async fn confirm_booking(&self, id: Uuid) -> Result<Booking, Error>;
    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn list_vehicles(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, Error>;
    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, Error>;
    async fn create_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, Error>;
}

pub trait FareAPI {
    fn estimator(&self) -> &FareEstimator;
}

pub trait API: BookingAPI + VehicleAPI + FareAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
