use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accepted;
use crate::api::DynAPI;
use crate::entities::{Booking, BookingDraft, BookingPatch};
use crate::error::Error;
use crate::validation::{now_ist, validate, validate_step, ValidationErrors, ValidationPolicy};
use crate::wizard::WizardStep;

#[derive(Deserialize)]
pub struct ValidateParams {
    step: Option<WizardStep>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    valid: bool,
    errors: ValidationErrors,
}

/// Without a step the draft is checked the way the quick booking form checks
/// it. With a step only that wizard step's fields are checked.
pub async fn validate_draft(
    params: Result<Query<ValidateParams>, QueryRejection>,
    draft: Result<Json<BookingDraft>, JsonRejection>,
) -> Result<Json<ValidateResponse>, Error> {
    let Query(params) = accepted(params)?;
    let Json(draft) = accepted(draft)?;

    let errors = match params.step {
        Some(step) => validate_step(&draft, step, now_ist(), &ValidationPolicy::wizard()),
        None => validate(&draft),
    };

    Ok(Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    draft: Result<Json<BookingDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), Error> {
    let Json(draft) = accepted(draft)?;
    let booking = api.create_booking(draft).await?;

    Ok((StatusCode::CREATED, booking.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, Error> {
    let Path(id) = accepted(id)?;
    let booking = api.find_booking(id).await?;

    Ok(booking.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
    patch: Result<Json<BookingPatch>, JsonRejection>,
) -> Result<Json<Booking>, Error> {
    let Path(id) = accepted(id)?;
    let Json(patch) = accepted(patch)?;
    let booking = api.update_booking(id, patch).await?;

    Ok(booking.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(id) = accepted(id)?;
    api.delete_booking(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, Error> {
    let Path(id) = accepted(id)?;
    let booking = api.confirm_booking(id).await?;

    Ok(booking.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, Error> {
    let Path(id) = accepted(id)?;
    let booking = api.cancel_booking(id).await?;

    Ok(booking.into())
}
