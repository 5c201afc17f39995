use serde::{Deserialize, Serialize};

use crate::entities::{RentalPackage, TripType, VehicleClass};

/// Price breakdown in whole rupees. For round trips the components stay at
/// their one-way values and only `total` carries the round-trip multiplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub vehicle_class: VehicleClass,
    pub trip_type: TripType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<RentalPackage>,
    pub base_fare: i64,
    pub toll_estimate: i64,
    pub gst: i64,
    pub total: i64,
}
