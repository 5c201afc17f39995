use axum::extract::{Extension, Json};
use serde::Serialize;

use crate::api::DynAPI;
use crate::entities::Route;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    routes: Vec<Route>,
    default_distance_km: f64,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<RoutesResponse> {
    let estimator = api.estimator();

    Json(RoutesResponse {
        routes: estimator.popular_routes().to_vec(),
        default_distance_km: estimator.default_distance_km(),
    })
}
