use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::VehicleClass;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: u16,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleClass,
    pub daily_rate: i64,
    pub image_url: String,
}

/// Listing payload without an id; the engine assigns one on insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: u16,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleClass,
    pub daily_rate: i64,
    pub image_url: String,
}

impl Vehicle {
    pub fn new(vehicle: NewVehicle) -> Self {
        Self {
            id: Uuid::new_v4(),
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type,
            daily_rate: vehicle.daily_rate,
            image_url: vehicle.image_url,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleFilter {
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleClass>,
    /// Case-insensitive search over make and model.
    pub q: Option<String>,
    pub max_daily_rate: Option<i64>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(vehicle_type) = self.vehicle_type {
            if vehicle.vehicle_type != vehicle_type {
                return false;
            }
        }

        if let Some(max_daily_rate) = self.max_daily_rate {
            if vehicle.daily_rate > max_daily_rate {
                return false;
            }
        }

        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                let haystack = format!("{} {}", vehicle.make, vehicle.model).to_lowercase();
                q.split_whitespace().all(|term| haystack.contains(term))
            }
            _ => true,
        }
    }

    /// Applies the filter and orders the result cheapest first.
    pub fn apply(&self, vehicles: impl IntoIterator<Item = Vehicle>) -> Vec<Vehicle> {
        let mut matched: Vec<Vehicle> = vehicles.into_iter().filter(|v| self.matches(v)).collect();
        matched.sort_by(|a, b| {
            a.daily_rate
                .cmp(&b.daily_rate)
                .then_with(|| a.make.cmp(&b.make))
                .then_with(|| a.model.cmp(&b.model))
        });
        matched
    }
}

#[cfg(test)]
fn vehicle(make: &str, model: &str, vehicle_type: VehicleClass, daily_rate: i64) -> Vehicle {
    Vehicle::new(NewVehicle {
        make: make.into(),
        model: model.into(),
        year: 2022,
        vehicle_type,
        daily_rate,
        image_url: String::new(),
    })
}

#[test]
fn serializes_listing_shape() {
    let value = serde_json::to_value(vehicle("Toyota", "Innova Crysta", VehicleClass::Suv, 4200)).unwrap();

    assert!(value.get("_id").is_some());
    assert_eq!(value["type"], "suv");
    assert_eq!(value["dailyRate"], 4200);
    assert!(value.get("imageUrl").is_some());
}

#[test]
fn filter_combines_type_search_and_rate() {
    let fleet = vec![
        vehicle("Toyota", "Innova Crysta", VehicleClass::Suv, 4200),
        vehicle("Maruti Suzuki", "Ertiga", VehicleClass::Suv, 3000),
        vehicle("Honda", "City", VehicleClass::Sedan, 2800),
    ];

    let filter = VehicleFilter {
        vehicle_type: Some(VehicleClass::Suv),
        q: None,
        max_daily_rate: Some(3500),
    };
    let result = filter.apply(fleet.clone());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].model, "Ertiga");

    let filter = VehicleFilter {
        q: Some("  toyota INNOVA ".into()),
        ..VehicleFilter::default()
    };
    let result = filter.apply(fleet.clone());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].make, "Toyota");

    let result = VehicleFilter::default().apply(fleet);
    let rates: Vec<i64> = result.iter().map(|v| v.daily_rate).collect();
    assert_eq!(rates, vec![2800, 3000, 4200]);
}
