use std::collections::HashMap;

use crate::entities::Route;

/// Distance used for any pair missing from the table.
pub const DEFAULT_DISTANCE_KM: f64 = 200.0;

const POPULAR_ROUTES: &[(&str, &str, f64)] = &[
    ("Mumbai", "Pune", 150.0),
    ("Mumbai", "Nashik", 170.0),
    ("Mumbai", "Lonavala", 83.0),
    ("Mumbai", "Goa", 590.0),
    ("Pune", "Mahabaleshwar", 120.0),
    ("Delhi", "Agra", 230.0),
    ("Delhi", "Jaipur", 280.0),
    ("Delhi", "Chandigarh", 250.0),
    ("Delhi", "Dehradun", 250.0),
    ("Delhi", "Rishikesh", 240.0),
    ("Agra", "Jaipur", 240.0),
    ("Bangalore", "Mysore", 145.0),
    ("Bangalore", "Coorg", 265.0),
    ("Bangalore", "Chennai", 350.0),
    ("Chennai", "Pondicherry", 150.0),
    ("Hyderabad", "Vijayawada", 275.0),
    ("Kolkata", "Digha", 185.0),
    ("Ahmedabad", "Vadodara", 110.0),
];

/// Static route distances keyed by place-name pair. Lookups accept either
/// direction and compare place names trimmed and case-insensitively.
#[derive(Clone, Debug)]
pub struct DistanceTable {
    routes: Vec<Route>,
    index: HashMap<RouteKey, usize>,
    default_km: f64,
}

impl Default for DistanceTable {
    fn default() -> Self {
        Self::new(
            POPULAR_ROUTES
                .iter()
                .map(|&(origin, destination, km)| Route::new(origin, destination, km)),
            DEFAULT_DISTANCE_KM,
        )
    }
}

impl DistanceTable {
    pub fn new(routes: impl IntoIterator<Item = Route>, default_km: f64) -> Self {
        let mut table = Self {
            routes: Vec::new(),
            index: HashMap::new(),
            default_km,
        };

        for route in routes {
            table.insert(route);
        }

        table
    }

    /// Adds or replaces the distance for a pair.
    pub fn insert(&mut self, route: Route) {
        let key = route_key(&route.origin, &route.destination);
        let reverse = route_key(&route.destination, &route.origin);

        let existing = self
            .index
            .get(&key)
            .or_else(|| self.index.get(&reverse))
            .copied();

        match existing {
            Some(position) => {
                self.index.remove(&route_key(
                    &self.routes[position].origin,
                    &self.routes[position].destination,
                ));
                self.index.insert(key, position);
                self.routes[position] = route;
            }
            None => {
                self.index.insert(key, self.routes.len());
                self.routes.push(route);
            }
        }
    }

    pub fn lookup(&self, origin: &str, destination: &str) -> Option<f64> {
        self.index
            .get(&route_key(origin, destination))
            .or_else(|| self.index.get(&route_key(destination, origin)))
            .map(|&position| self.routes[position].distance_km)
    }

    pub fn distance_km(&self, origin: &str, destination: &str) -> f64 {
        self.lookup(origin, destination).unwrap_or(self.default_km)
    }

    pub fn default_km(&self) -> f64 {
        self.default_km
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

type RouteKey = (String, String);

fn route_key(origin: &str, destination: &str) -> RouteKey {
    (
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
    )
}

#[test]
fn lookup_matches_either_direction() {
    let table = DistanceTable::default();

    assert_eq!(table.lookup("Mumbai", "Pune"), Some(150.0));
    assert_eq!(table.lookup("Pune", "Mumbai"), Some(150.0));
    assert_eq!(table.lookup(" pune ", "MUMBAI"), Some(150.0));
}

#[test]
fn unknown_pair_falls_back_to_default() {
    let table = DistanceTable::default();

    assert_eq!(table.lookup("Surat", "Indore"), None);
    assert_eq!(table.distance_km("Surat", "Indore"), DEFAULT_DISTANCE_KM);
}

#[test]
fn insert_replaces_reverse_entry() {
    let mut table = DistanceTable::default();
    let count = table.routes().len();

    table.insert(Route::new("Pune", "Mumbai", 148.0));

    assert_eq!(table.routes().len(), count);
    assert_eq!(table.lookup("Mumbai", "Pune"), Some(148.0));
}

#[test]
fn hyphenated_names_do_not_collide() {
    let mut table = DistanceTable::new(Vec::new(), DEFAULT_DISTANCE_KM);

    table.insert(Route::new("Navi-Mumbai", "Pune", 120.0));
    table.insert(Route::new("Navi", "Mumbai-Pune", 40.0));

    assert_eq!(table.routes().len(), 2);
    assert_eq!(table.lookup("Pune", "navi-mumbai"), Some(120.0));
    assert_eq!(table.lookup("Navi", "Mumbai-Pune"), Some(40.0));
    assert_eq!(table.lookup("Navi-Mumbai", "Navi"), None);
}
