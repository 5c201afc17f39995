mod distance;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::entities::{FareQuote, RentalPackage, Route, TripType, VehicleClass};

pub use distance::{DistanceTable, DEFAULT_DISTANCE_KM};

pub const TOLL_RATE: f64 = 0.05;
pub const GST_RATE: f64 = 0.05;
pub const ROUND_TRIP_MULTIPLIER: f64 = 1.8;

static DEFAULT_ESTIMATOR: Lazy<FareEstimator> = Lazy::new(FareEstimator::default);

/// Quotes a trip with the built-in rate card and distance table.
pub fn estimate(
    origin: &str,
    destination: &str,
    vehicle_class: VehicleClass,
    is_one_way: bool,
) -> FareQuote {
    DEFAULT_ESTIMATOR.estimate(origin, destination, vehicle_class, is_one_way)
}

/// Per-kilometre rates in rupees.
#[derive(Clone, Debug, Default)]
pub struct RateCard {
    overrides: BTreeMap<VehicleClass, u32>,
}

impl RateCard {
    pub fn with_rate(mut self, class: VehicleClass, per_km: u32) -> Self {
        self.overrides.insert(class, per_km);
        self
    }

    pub fn per_km(&self, class: VehicleClass) -> u32 {
        self.overrides
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_rate())
    }
}

#[derive(Clone, Debug, Default)]
pub struct FareEstimator {
    rates: RateCard,
    distances: DistanceTable,
}

struct Breakdown {
    base_fare: i64,
    toll_estimate: i64,
    gst: i64,
    total: i64,
}

impl FareEstimator {
    pub fn new(rates: RateCard, distances: DistanceTable) -> Self {
        Self { rates, distances }
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    pub fn popular_routes(&self) -> &[Route] {
        self.distances.routes()
    }

    /// Distance assumed for pairs missing from the route table.
    pub fn default_distance_km(&self) -> f64 {
        self.distances.default_km()
    }

    pub fn route(&self, origin: &str, destination: &str) -> Route {
        Route::new(
            origin.trim(),
            destination.trim(),
            self.distances.distance_km(origin, destination),
        )
    }

    pub fn estimate(
        &self,
        origin: &str,
        destination: &str,
        vehicle_class: VehicleClass,
        is_one_way: bool,
    ) -> FareQuote {
        let route = self.route(origin, destination);
        let breakdown = self.one_way_breakdown(vehicle_class, route.distance_km);

        let (trip_type, total) = if is_one_way {
            (TripType::OneWay, breakdown.total)
        } else {
            (TripType::RoundTrip, round_rupees(breakdown.total as f64 * ROUND_TRIP_MULTIPLIER))
        };

        FareQuote {
            origin: route.origin,
            destination: route.destination,
            distance_km: route.distance_km,
            vehicle_class,
            trip_type,
            package: None,
            base_fare: breakdown.base_fare,
            toll_estimate: breakdown.toll_estimate,
            gst: breakdown.gst,
            total,
        }
    }

    /// Local hourly rental: the package's included kilometres at the class
    /// rate, plus GST. Rentals carry no toll estimate.
    pub fn estimate_rental(
        &self,
        pickup: &str,
        vehicle_class: VehicleClass,
        package: RentalPackage,
    ) -> FareQuote {
        let distance_km = package.included_km() as f64;
        let base_fare = round_rupees(self.rates.per_km(vehicle_class) as f64 * distance_km);
        let gst = round_rupees(base_fare as f64 * GST_RATE);

        FareQuote {
            origin: pickup.trim().to_string(),
            destination: pickup.trim().to_string(),
            distance_km,
            vehicle_class,
            trip_type: TripType::Hourly,
            package: Some(package),
            base_fare,
            toll_estimate: 0,
            gst,
            total: base_fare + gst,
        }
    }

    fn one_way_breakdown(&self, vehicle_class: VehicleClass, distance_km: f64) -> Breakdown {
        let base_fare = round_rupees(self.rates.per_km(vehicle_class) as f64 * distance_km);
        let toll_estimate = round_rupees(base_fare as f64 * TOLL_RATE);
        let gst = round_rupees((base_fare + toll_estimate) as f64 * GST_RATE);

        Breakdown {
            base_fare,
            toll_estimate,
            gst,
            total: base_fare + toll_estimate + gst,
        }
    }
}

fn round_rupees(amount: f64) -> i64 {
    amount.round() as i64
}

#[test]
fn mumbai_pune_sedan_one_way() {
    let quote = estimate("Mumbai", "Pune", VehicleClass::Sedan, true);

    assert_eq!(quote.distance_km, 150.0);
    assert_eq!(quote.base_fare, 2400);
    assert_eq!(quote.toll_estimate, 120);
    assert_eq!(quote.gst, 126);
    assert_eq!(quote.total, 2646);
    assert_eq!(quote.trip_type, TripType::OneWay);
}

#[test]
fn round_trip_applies_multiplier_to_total_only() {
    let one_way = estimate("Mumbai", "Pune", VehicleClass::Sedan, true);
    let round_trip = estimate("Mumbai", "Pune", VehicleClass::Sedan, false);

    assert_eq!(round_trip.trip_type, TripType::RoundTrip);
    assert_eq!(round_trip.base_fare, one_way.base_fare);
    assert_eq!(round_trip.toll_estimate, one_way.toll_estimate);
    assert_eq!(round_trip.gst, one_way.gst);
    assert_eq!(round_trip.total, 4763);
}

#[test]
fn estimate_is_symmetric_for_every_known_route() {
    let estimator = FareEstimator::default();

    for route in estimator.popular_routes() {
        for class in VehicleClass::ALL {
            for is_one_way in [true, false] {
                let forward = estimator.estimate(&route.origin, &route.destination, class, is_one_way);
                let reverse = estimator.estimate(&route.destination, &route.origin, class, is_one_way);

                assert_eq!(forward.distance_km, reverse.distance_km);
                assert_eq!(forward.base_fare, reverse.base_fare);
                assert_eq!(forward.toll_estimate, reverse.toll_estimate);
                assert_eq!(forward.gst, reverse.gst);
                assert_eq!(forward.total, reverse.total);
            }
        }
    }
}

#[test]
fn round_trip_total_tracks_one_way_total() {
    let estimator = FareEstimator::default();

    for route in estimator.popular_routes() {
        for class in VehicleClass::ALL {
            let one_way = estimator.estimate(&route.origin, &route.destination, class, true);
            let round_trip = estimator.estimate(&route.origin, &route.destination, class, false);

            assert_eq!(
                round_trip.total,
                (one_way.total as f64 * ROUND_TRIP_MULTIPLIER).round() as i64
            );
        }
    }
}

#[test]
fn unknown_cities_use_default_distance() {
    let quote = estimate("Surat", "Indore", VehicleClass::Hatchback, true);

    assert_eq!(quote.distance_km, DEFAULT_DISTANCE_KM);
    assert_eq!(quote.base_fare, 2400);
    assert_eq!(quote.toll_estimate, 120);
    assert_eq!(quote.gst, 126);
    assert_eq!(quote.total, 2646);
}

#[test]
fn rate_card_override_changes_base() {
    let estimator = FareEstimator::new(
        RateCard::default().with_rate(VehicleClass::Sedan, 14),
        DistanceTable::default(),
    );

    let quote = estimator.estimate("Delhi", "Agra", VehicleClass::Sedan, true);
    assert_eq!(quote.base_fare, 3220);
    assert_eq!(estimator.rates().per_km(VehicleClass::Suv), 20);
}

#[test]
fn rental_quote_has_no_toll() {
    let quote = FareEstimator::default().estimate_rental(
        "Bangalore",
        VehicleClass::Suv,
        RentalPackage::EightHours,
    );

    assert_eq!(quote.distance_km, 80.0);
    assert_eq!(quote.base_fare, 1600);
    assert_eq!(quote.toll_estimate, 0);
    assert_eq!(quote.gst, 80);
    assert_eq!(quote.total, 1680);
    assert_eq!(quote.package, Some(RentalPackage::EightHours));
}
