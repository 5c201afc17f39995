use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, distance_km: f64) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            distance_km,
        }
    }
}
