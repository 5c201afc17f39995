mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::DynAPI;
use crate::error::{server_error, Error};
use crate::server::handlers::{bookings, fares, routes, vehicles};

pub fn router(api: DynAPI) -> Router {
    let api_routes = Router::new()
        .route("/routes", get(routes::list))
        .route("/fares/estimate", get(fares::estimate))
        .route("/fares/rental", get(fares::rental))
        .route("/bookings", post(bookings::create))
        .route("/bookings/validate", post(bookings::validate_draft))
        .route(
            "/bookings/:id",
            get(bookings::find)
                .patch(bookings::update)
                .delete(bookings::delete),
        )
        .route("/bookings/:id/confirm", patch(bookings::confirm))
        .route("/bookings/:id/cancel", patch(bookings::cancel))
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route("/vehicles/:id", get(vehicles::find));

    Router::new()
        .nest("/api", api_routes)
        .layer(Extension(api))
}

pub async fn serve(api: DynAPI, addr: SocketAddr) -> Result<(), Error> {
    let server = axum::Server::try_bind(&addr)
        .map_err(server_error)?
        .serve(router(api).into_make_service());

    tracing::info!("listening on {}", server.local_addr());

    server.await.map_err(server_error)
}
