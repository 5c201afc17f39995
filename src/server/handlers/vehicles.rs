use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use uuid::Uuid;

use super::accepted;
use crate::api::DynAPI;
use crate::entities::{NewVehicle, Vehicle, VehicleFilter};
use crate::error::Error;

pub async fn list(
    Extension(api): Extension<DynAPI>,
    filter: Result<Query<VehicleFilter>, QueryRejection>,
) -> Result<Json<Vec<Vehicle>>, Error> {
    let Query(filter) = accepted(filter)?;
    let vehicles = api.list_vehicles(filter).await?;

    Ok(vehicles.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vehicle>, Error> {
    let Path(id) = accepted(id)?;
    let vehicle = api.find_vehicle(id).await?;

    Ok(vehicle.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    vehicle: Result<Json<NewVehicle>, JsonRejection>,
) -> Result<(StatusCode, Json<Vehicle>), Error> {
    let Json(vehicle) = accepted(vehicle)?;
    let vehicle = api.create_vehicle(vehicle).await?;

    Ok((StatusCode::CREATED, vehicle.into()))
}
