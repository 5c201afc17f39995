use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Json, Query};
use serde::Deserialize;

use super::accepted;
use crate::api::DynAPI;
use crate::entities::{FareQuote, RentalPackage, TripType, VehicleClass};
use crate::error::{invalid_input_error, Error};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateParams {
    origin: String,
    destination: String,
    vehicle_class: VehicleClass,
    #[serde(default)]
    trip_type: TripType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalParams {
    #[serde(default)]
    pickup: String,
    vehicle_class: VehicleClass,
    package: RentalPackage,
}

pub async fn estimate(
    Extension(api): Extension<DynAPI>,
    params: Result<Query<EstimateParams>, QueryRejection>,
) -> Result<Json<FareQuote>, Error> {
    let Query(params) = accepted(params)?;

    // hourly rentals are priced by package, see `rental`
    if params.trip_type == TripType::Hourly {
        return Err(invalid_input_error());
    }

    let quote = api.estimator().estimate(
        &params.origin,
        &params.destination,
        params.vehicle_class,
        params.trip_type.is_one_way(),
    );

    Ok(quote.into())
}

pub async fn rental(
    Extension(api): Extension<DynAPI>,
    params: Result<Query<RentalParams>, QueryRejection>,
) -> Result<Json<FareQuote>, Error> {
    let Query(params) = accepted(params)?;

    let quote = api
        .estimator()
        .estimate_rental(&params.pickup, params.vehicle_class, params.package);

    Ok(quote.into())
}
