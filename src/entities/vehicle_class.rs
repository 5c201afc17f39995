use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Hatchback,
    Sedan,
    Suv,
    TempoTraveller,
    Luxury,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 5] = [
        Self::Hatchback,
        Self::Sedan,
        Self::Suv,
        Self::TempoTraveller,
        Self::Luxury,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hatchback => "hatchback",
            Self::Sedan => "sedan",
            Self::Suv => "suv",
            Self::TempoTraveller => "tempo_traveller",
            Self::Luxury => "luxury",
        }
    }

    /// Per-kilometre rate in rupees used when a rate card has no override.
    pub fn default_rate(&self) -> u32 {
        match self {
            Self::Hatchback => 12,
            Self::Sedan => 16,
            Self::Suv => 20,
            Self::TempoTraveller => 26,
            Self::Luxury => 35,
        }
    }
}
