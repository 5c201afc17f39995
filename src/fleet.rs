use crate::entities::{NewVehicle, VehicleClass};

const FLEET: &[(&str, &str, u16, VehicleClass, i64, &str)] = &[
    ("Maruti Suzuki", "WagonR", 2022, VehicleClass::Hatchback, 1800, "/images/fleet/wagonr.jpg"),
    ("Hyundai", "i20", 2023, VehicleClass::Hatchback, 2000, "/images/fleet/i20.jpg"),
    ("Maruti Suzuki", "Swift Dzire", 2023, VehicleClass::Sedan, 2500, "/images/fleet/dzire.jpg"),
    ("Toyota", "Etios", 2021, VehicleClass::Sedan, 2400, "/images/fleet/etios.jpg"),
    ("Honda", "City", 2023, VehicleClass::Sedan, 2800, "/images/fleet/city.jpg"),
    ("Maruti Suzuki", "Ertiga", 2022, VehicleClass::Suv, 3000, "/images/fleet/ertiga.jpg"),
    ("Toyota", "Innova Crysta", 2023, VehicleClass::Suv, 4200, "/images/fleet/innova-crysta.jpg"),
    ("Mahindra", "XUV700", 2024, VehicleClass::Suv, 4500, "/images/fleet/xuv700.jpg"),
    ("Force", "Tempo Traveller 12 Seater", 2022, VehicleClass::TempoTraveller, 6500, "/images/fleet/tempo-traveller.jpg"),
    ("Mercedes-Benz", "E-Class", 2023, VehicleClass::Luxury, 12000, "/images/fleet/e-class.jpg"),
    ("BMW", "5 Series", 2023, VehicleClass::Luxury, 12500, "/images/fleet/5-series.jpg"),
];

/// Vehicles every fresh store starts with.
pub fn default_fleet() -> Vec<NewVehicle> {
    FLEET
        .iter()
        .map(|&(make, model, year, vehicle_type, daily_rate, image_url)| NewVehicle {
            make: make.into(),
            model: model.into(),
            year,
            vehicle_type,
            daily_rate,
            image_url: image_url.into(),
        })
        .collect()
}
