pub mod bookings;
pub mod fares;
pub mod routes;
pub mod vehicles;

use std::fmt::Display;

use crate::error::{invalid_input_error, Error};

/// Turns an extractor rejection (malformed JSON, unknown enum value, bad id)
/// into the usual error body.
pub fn accepted<T, R: Display>(extracted: Result<T, R>) -> Result<T, Error> {
    extracted.map_err(|rejection| {
        tracing::debug!(%rejection, "request rejected");
        invalid_input_error()
    })
}
