use serde::{Deserialize, Serialize};

/// The booking tab a draft was filled in on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
    Hourly,
}

impl TripType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OneWay => "one_way",
            Self::RoundTrip => "round_trip",
            Self::Hourly => "hourly",
        }
    }

    pub fn is_one_way(&self) -> bool {
        matches!(self, Self::OneWay)
    }

    /// Hourly rentals start and end at the pickup point.
    pub fn needs_dropoff(&self) -> bool {
        !matches!(self, Self::Hourly)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentalPackage {
    #[serde(rename = "4hr_40km")]
    FourHours,
    #[serde(rename = "8hr_80km")]
    EightHours,
    #[serde(rename = "12hr_120km")]
    TwelveHours,
}

impl RentalPackage {
    pub fn hours(&self) -> u32 {
        match self {
            Self::FourHours => 4,
            Self::EightHours => 8,
            Self::TwelveHours => 12,
        }
    }

    pub fn included_km(&self) -> u32 {
        self.hours() * 10
    }
}
