use serde::{Deserialize, Serialize};

use crate::entities::{RentalPackage, TripType, VehicleClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
}

/// In-progress booking form state. Free-text inputs are kept exactly as the
/// form submitted them; an empty input is stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub trip_type: TripType,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub return_date: Option<String>,
    pub package: Option<RentalPackage>,
    pub vehicle_class: Option<VehicleClass>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// A single field change on a draft.
#[derive(Clone, Debug, PartialEq)]
pub enum DraftEdit {
    TripType(TripType),
    Pickup(String),
    Dropoff(String),
    Date(String),
    Time(String),
    ReturnDate(String),
    Package(RentalPackage),
    VehicleClass(VehicleClass),
    Name(String),
    Phone(String),
    Email(String),
    PaymentMethod(PaymentMethod),
}

impl BookingDraft {
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::TripType(trip_type) => self.switch_trip_type(trip_type),
            DraftEdit::Pickup(value) => self.pickup = non_empty(value),
            DraftEdit::Dropoff(value) => self.dropoff = non_empty(value),
            DraftEdit::Date(value) => self.date = non_empty(value),
            DraftEdit::Time(value) => self.time = non_empty(value),
            DraftEdit::ReturnDate(value) => self.return_date = non_empty(value),
            DraftEdit::Package(package) => self.package = Some(package),
            DraftEdit::VehicleClass(class) => self.vehicle_class = Some(class),
            DraftEdit::Name(value) => self.name = non_empty(value),
            DraftEdit::Phone(value) => self.phone = non_empty(value),
            DraftEdit::Email(value) => self.email = non_empty(value),
            DraftEdit::PaymentMethod(method) => self.payment_method = Some(method),
        }
    }

    fn switch_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        self.clear_other_tabs();
    }

    /// Drops fields that belong to another trip type, so a stale return date
    /// or package never reaches a stored booking.
    pub fn clear_other_tabs(&mut self) {
        match self.trip_type {
            TripType::OneWay => {
                self.return_date = None;
                self.package = None;
            }
            TripType::RoundTrip => {
                self.package = None;
            }
            TripType::Hourly => {
                self.dropoff = None;
                self.return_date = None;
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Partial update for a stored booking; only present fields are applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPatch {
    pub trip_type: Option<TripType>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub return_date: Option<String>,
    pub package: Option<RentalPackage>,
    pub vehicle_class: Option<VehicleClass>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl BookingPatch {
    /// Edits in application order. The trip type goes first since switching
    /// tabs clears fields the rest of the patch may set again.
    pub fn into_edits(self) -> Vec<DraftEdit> {
        let mut edits = Vec::new();

        edits.extend(self.trip_type.map(DraftEdit::TripType));
        edits.extend(self.pickup.map(DraftEdit::Pickup));
        edits.extend(self.dropoff.map(DraftEdit::Dropoff));
        edits.extend(self.date.map(DraftEdit::Date));
        edits.extend(self.time.map(DraftEdit::Time));
        edits.extend(self.return_date.map(DraftEdit::ReturnDate));
        edits.extend(self.package.map(DraftEdit::Package));
        edits.extend(self.vehicle_class.map(DraftEdit::VehicleClass));
        edits.extend(self.name.map(DraftEdit::Name));
        edits.extend(self.phone.map(DraftEdit::Phone));
        edits.extend(self.email.map(DraftEdit::Email));
        edits.extend(self.payment_method.map(DraftEdit::PaymentMethod));

        edits
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[test]
fn switching_to_hourly_clears_dropoff_and_return_date() {
    let mut draft = BookingDraft {
        trip_type: TripType::RoundTrip,
        pickup: Some("Pune".into()),
        dropoff: Some("Mumbai".into()),
        return_date: Some("2030-01-02".into()),
        ..BookingDraft::default()
    };

    draft.apply(DraftEdit::TripType(TripType::Hourly));

    assert_eq!(draft.trip_type, TripType::Hourly);
    assert_eq!(draft.pickup.as_deref(), Some("Pune"));
    assert!(draft.dropoff.is_none());
    assert!(draft.return_date.is_none());
}

#[test]
fn blank_input_clears_field() {
    let mut draft = BookingDraft::default();

    draft.apply(DraftEdit::Pickup("Delhi".into()));
    assert_eq!(draft.pickup.as_deref(), Some("Delhi"));

    draft.apply(DraftEdit::Pickup("   ".into()));
    assert!(draft.pickup.is_none());
}

#[test]
fn patch_applies_trip_type_before_fields() {
    let patch = BookingPatch {
        trip_type: Some(TripType::RoundTrip),
        return_date: Some("2030-01-05".into()),
        ..BookingPatch::default()
    };

    let mut draft = BookingDraft::default();
    for edit in patch.into_edits() {
        draft.apply(edit);
    }

    assert_eq!(draft.trip_type, TripType::RoundTrip);
    assert_eq!(draft.return_date.as_deref(), Some("2030-01-05"));
}
