use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entities::{BookingDraft, TripType};
use crate::wizard::WizardStep;

const IST_OFFSET_MINUTES: i64 = 5 * 60 + 30;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+91|0)?[6-9]\d{9}$").expect("phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Pickup,
    Dropoff,
    Date,
    Time,
    ReturnDate,
    Package,
    VehicleClass,
    Name,
    Phone,
    Email,
    PaymentMethod,
}

/// Field-keyed error messages. An empty map means the draft passed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    /// Keeps the first message recorded for a field.
    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Date/time rules that differ between the quick booking form and the wizard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// How far ahead a travel date may be; `None` disables the check.
    pub max_advance_months: Option<u32>,
    pub min_lead_time: Duration,
}

impl ValidationPolicy {
    pub fn quick_form() -> Self {
        Self {
            max_advance_months: None,
            min_lead_time: Duration::hours(1),
        }
    }

    pub fn wizard() -> Self {
        Self {
            max_advance_months: Some(3),
            min_lead_time: Duration::hours(1),
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::quick_form()
    }
}

/// Current wall-clock time in India Standard Time.
pub fn now_ist() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::minutes(IST_OFFSET_MINUTES)
}

/// Validates the quick booking form (route, schedule and contact fields) as of
/// the current IST time.
pub fn validate(draft: &BookingDraft) -> ValidationErrors {
    validate_at(draft, now_ist(), &ValidationPolicy::quick_form())
}

pub fn validate_at(
    draft: &BookingDraft,
    now: NaiveDateTime,
    policy: &ValidationPolicy,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    check_route(draft, now, policy, &mut errors);
    check_passenger(draft, &mut errors);

    errors
}

/// Validates only what the given wizard step collects. The review and confirm
/// steps re-check everything, including vehicle and payment selection.
pub fn validate_step(
    draft: &BookingDraft,
    step: WizardStep,
    now: NaiveDateTime,
    policy: &ValidationPolicy,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    match step {
        WizardStep::Route => {
            check_route(draft, now, policy, &mut errors);
            check_vehicle(draft, &mut errors);
        }
        WizardStep::Passenger => check_passenger(draft, &mut errors),
        WizardStep::Review | WizardStep::Confirm => {
            check_route(draft, now, policy, &mut errors);
            check_vehicle(draft, &mut errors);
            check_passenger(draft, &mut errors);
            check_payment(draft, &mut errors);
        }
    }

    errors
}

fn check_route(
    draft: &BookingDraft,
    now: NaiveDateTime,
    policy: &ValidationPolicy,
    errors: &mut ValidationErrors,
) {
    let pickup = present(&draft.pickup);
    let dropoff = present(&draft.dropoff);

    if pickup.is_none() {
        errors.insert(Field::Pickup, "Pickup location is required");
    }

    if draft.trip_type.needs_dropoff() && dropoff.is_none() {
        errors.insert(Field::Dropoff, "Drop-off location is required");
    }

    if let (Some(pickup), Some(dropoff)) = (pickup, dropoff) {
        if same_place(pickup, dropoff) {
            errors.insert(
                Field::Dropoff,
                "Pickup and drop-off locations cannot be the same",
            );
        }
    }

    let travel_date = check_travel_date(draft, now, policy, errors);
    check_pickup_time(draft, travel_date, now, policy, errors);

    match draft.trip_type {
        TripType::RoundTrip => check_return_date(draft, travel_date, errors),
        TripType::Hourly => {
            if draft.package.is_none() {
                errors.insert(Field::Package, "Select a rental package");
            }
        }
        TripType::OneWay => (),
    }
}

/// Returns the parsed travel date when it is usable for the dependent time
/// and return-date checks, even if it failed the advance-booking window.
fn check_travel_date(
    draft: &BookingDraft,
    now: NaiveDateTime,
    policy: &ValidationPolicy,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let today = now.date();

    let raw = match present(&draft.date) {
        Some(raw) => raw,
        None => {
            errors.insert(Field::Date, "Travel date is required");
            return None;
        }
    };

    let date = match parse_date(raw) {
        Some(date) => date,
        None => {
            errors.insert(Field::Date, "Enter a valid travel date (YYYY-MM-DD)");
            return None;
        }
    };

    if date < today {
        errors.insert(Field::Date, "Travel date cannot be in the past");
        return None;
    }

    if let Some(months) = policy.max_advance_months {
        let too_far = today
            .checked_add_months(Months::new(months))
            .map_or(false, |limit| date > limit);

        if too_far {
            errors.insert(
                Field::Date,
                format!("Bookings can only be made up to {} months in advance", months),
            );
        }
    }

    Some(date)
}

fn check_pickup_time(
    draft: &BookingDraft,
    travel_date: Option<NaiveDate>,
    now: NaiveDateTime,
    policy: &ValidationPolicy,
    errors: &mut ValidationErrors,
) {
    let raw = match present(&draft.time) {
        Some(raw) => raw,
        None => {
            errors.insert(Field::Time, "Pickup time is required");
            return;
        }
    };

    let time = match parse_time(raw) {
        Some(time) => time,
        None => {
            errors.insert(Field::Time, "Enter a valid pickup time (HH:MM)");
            return;
        }
    };

    if let Some(date) = travel_date {
        if date.and_time(time) < now + policy.min_lead_time {
            errors.insert(
                Field::Time,
                format!(
                    "Pickup time must be at least {} from now",
                    describe_lead_time(policy.min_lead_time)
                ),
            );
        }
    }
}

fn check_return_date(
    draft: &BookingDraft,
    travel_date: Option<NaiveDate>,
    errors: &mut ValidationErrors,
) {
    let raw = match present(&draft.return_date) {
        Some(raw) => raw,
        None => {
            errors.insert(Field::ReturnDate, "Return date is required");
            return;
        }
    };

    match parse_date(raw) {
        None => errors.insert(Field::ReturnDate, "Enter a valid return date (YYYY-MM-DD)"),
        Some(return_date) => {
            if let Some(travel_date) = travel_date {
                if return_date < travel_date {
                    errors.insert(
                        Field::ReturnDate,
                        "Return date cannot be before the travel date",
                    );
                }
            }
        }
    }
}

fn check_vehicle(draft: &BookingDraft, errors: &mut ValidationErrors) {
    if draft.vehicle_class.is_none() {
        errors.insert(Field::VehicleClass, "Select a vehicle");
    }
}

fn check_passenger(draft: &BookingDraft, errors: &mut ValidationErrors) {
    match present(&draft.name) {
        None => errors.insert(Field::Name, "Full name is required"),
        Some(name) if name.chars().count() < 2 => {
            errors.insert(Field::Name, "Name must be at least 2 characters")
        }
        Some(_) => (),
    }

    match present(&draft.phone) {
        None => errors.insert(Field::Phone, "Phone number is required"),
        Some(phone) if !PHONE_RE.is_match(&normalize_phone(phone)) => {
            errors.insert(Field::Phone, "Enter a valid 10-digit mobile number")
        }
        Some(_) => (),
    }

    match present(&draft.email) {
        None => errors.insert(Field::Email, "Email address is required"),
        Some(email) if !EMAIL_RE.is_match(email) => {
            errors.insert(Field::Email, "Enter a valid email address")
        }
        Some(_) => (),
    }
}

fn check_payment(draft: &BookingDraft, errors: &mut ValidationErrors) {
    if draft.payment_method.is_none() {
        errors.insert(Field::PaymentMethod, "Select a payment method");
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn same_place(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

fn describe_lead_time(lead: Duration) -> String {
    let minutes = lead.num_minutes();

    match minutes {
        60 => "1 hour".into(),
        m if m > 0 && m % 60 == 0 => format!("{} hours", m / 60),
        m => format!("{} minutes", m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PaymentMethod, RentalPackage, VehicleClass};

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_date(date).unwrap().and_time(parse_time(time).unwrap())
    }

    fn complete_draft() -> BookingDraft {
        BookingDraft {
            trip_type: TripType::OneWay,
            pickup: Some("Mumbai".into()),
            dropoff: Some("Pune".into()),
            date: Some("2030-03-10".into()),
            time: Some("09:30".into()),
            return_date: None,
            package: None,
            vehicle_class: Some(VehicleClass::Sedan),
            name: Some("Asha Rao".into()),
            phone: Some("+91 98765 43210".into()),
            email: Some("asha@example.com".into()),
            payment_method: Some(PaymentMethod::Upi),
        }
    }

    #[test]
    fn complete_draft_passes() {
        let now = at("2030-03-01", "12:00");
        let errors = validate_at(&complete_draft(), now, &ValidationPolicy::wizard());

        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn same_pickup_and_dropoff_is_rejected_on_dropoff() {
        let draft = BookingDraft {
            pickup: Some("Delhi".into()),
            dropoff: Some("Delhi".into()),
            date: Some("2099-01-01".into()),
            time: Some("10:00".into()),
            ..BookingDraft::default()
        };

        let errors = validate(&draft);

        assert_eq!(
            errors.get(Field::Dropoff),
            Some("Pickup and drop-off locations cannot be the same")
        );
        assert!(!errors.contains(Field::Date));
        assert!(!errors.contains(Field::Pickup));
    }

    #[test]
    fn same_place_ignores_case_and_whitespace() {
        let draft = BookingDraft {
            pickup: Some(" delhi".into()),
            dropoff: Some("DELHI ".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "12:00"), &ValidationPolicy::quick_form());
        assert!(errors.contains(Field::Dropoff));
    }

    #[test]
    fn same_place_rejected_even_on_hourly_tab() {
        let draft = BookingDraft {
            trip_type: TripType::Hourly,
            package: Some(RentalPackage::FourHours),
            dropoff: Some("Mumbai".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "12:00"), &ValidationPolicy::quick_form());
        assert!(errors.contains(Field::Dropoff));
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = validate_at(
            &BookingDraft::default(),
            at("2030-03-01", "12:00"),
            &ValidationPolicy::quick_form(),
        );

        for field in [
            Field::Pickup,
            Field::Dropoff,
            Field::Date,
            Field::Time,
            Field::Name,
            Field::Phone,
            Field::Email,
        ] {
            assert!(errors.contains(field), "expected error on {:?}", field);
        }
        assert!(!errors.contains(Field::ReturnDate));
        assert!(!errors.contains(Field::PaymentMethod));
    }

    #[test]
    fn past_date_is_rejected() {
        let draft = BookingDraft {
            date: Some("2030-02-28".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "08:00"), &ValidationPolicy::quick_form());
        assert_eq!(errors.get(Field::Date), Some("Travel date cannot be in the past"));
        assert!(!errors.contains(Field::Time));
    }

    #[test]
    fn same_day_requires_one_hour_lead() {
        let now = at("2030-03-01", "08:00");

        let draft = BookingDraft {
            date: Some("2030-03-01".into()),
            time: Some("08:59".into()),
            ..complete_draft()
        };
        let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
        assert_eq!(
            errors.get(Field::Time),
            Some("Pickup time must be at least 1 hour from now")
        );

        let draft = BookingDraft {
            time: Some("09:00".into()),
            ..draft
        };
        let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
        assert!(!errors.contains(Field::Time));
    }

    #[test]
    fn lead_time_spans_midnight() {
        let draft = BookingDraft {
            date: Some("2030-03-02".into()),
            time: Some("00:15".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "23:50"), &ValidationPolicy::quick_form());
        assert!(errors.contains(Field::Time));
    }

    #[test]
    fn wizard_limits_advance_window() {
        let now = at("2030-03-01", "12:00");
        let draft = BookingDraft {
            date: Some("2030-06-02".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, now, &ValidationPolicy::wizard());
        assert_eq!(
            errors.get(Field::Date),
            Some("Bookings can only be made up to 3 months in advance")
        );

        let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
        assert!(!errors.contains(Field::Date));

        let draft = BookingDraft {
            date: Some("2030-06-01".into()),
            ..draft
        };
        let errors = validate_at(&draft, now, &ValidationPolicy::wizard());
        assert!(!errors.contains(Field::Date));
    }

    #[test]
    fn round_trip_return_must_not_precede_travel() {
        let now = at("2030-03-01", "12:00");
        let draft = BookingDraft {
            trip_type: TripType::RoundTrip,
            return_date: Some("2030-03-09".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
        assert_eq!(
            errors.get(Field::ReturnDate),
            Some("Return date cannot be before the travel date")
        );

        let draft = BookingDraft {
            return_date: Some("2030-03-10".into()),
            ..draft
        };
        assert!(validate_at(&draft, now, &ValidationPolicy::quick_form()).is_empty());

        let draft = BookingDraft {
            return_date: None,
            ..draft
        };
        let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
        assert_eq!(errors.get(Field::ReturnDate), Some("Return date is required"));
    }

    #[test]
    fn hourly_needs_package_not_dropoff() {
        let draft = BookingDraft {
            trip_type: TripType::Hourly,
            dropoff: None,
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "12:00"), &ValidationPolicy::quick_form());
        assert!(!errors.contains(Field::Dropoff));
        assert_eq!(errors.get(Field::Package), Some("Select a rental package"));
    }

    #[test]
    fn malformed_inputs_are_reported() {
        let draft = BookingDraft {
            date: Some("10/03/2030".into()),
            time: Some("9.30am".into()),
            name: Some("A".into()),
            phone: Some("12345".into()),
            email: Some("asha.example.com".into()),
            ..complete_draft()
        };

        let errors = validate_at(&draft, at("2030-03-01", "12:00"), &ValidationPolicy::quick_form());
        assert_eq!(errors.get(Field::Date), Some("Enter a valid travel date (YYYY-MM-DD)"));
        assert_eq!(errors.get(Field::Time), Some("Enter a valid pickup time (HH:MM)"));
        assert_eq!(errors.get(Field::Name), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get(Field::Phone), Some("Enter a valid 10-digit mobile number"));
        assert_eq!(errors.get(Field::Email), Some("Enter a valid email address"));
    }

    #[test]
    fn phone_accepts_common_indian_formats() {
        let now = at("2030-03-01", "12:00");

        for phone in ["9876543210", "+919876543210", "09876543210", "98765-43210"] {
            let draft = BookingDraft {
                phone: Some(phone.into()),
                ..complete_draft()
            };
            let errors = validate_at(&draft, now, &ValidationPolicy::quick_form());
            assert!(!errors.contains(Field::Phone), "{} rejected", phone);
        }

        let draft = BookingDraft {
            phone: Some("5876543210".into()),
            ..complete_draft()
        };
        assert!(validate_at(&draft, now, &ValidationPolicy::quick_form()).contains(Field::Phone));
    }

    #[test]
    fn steps_check_only_their_fields() {
        let now = at("2030-03-01", "12:00");
        let policy = ValidationPolicy::wizard();

        let route_only = BookingDraft {
            name: None,
            phone: None,
            email: None,
            payment_method: None,
            ..complete_draft()
        };
        assert!(validate_step(&route_only, WizardStep::Route, now, &policy).is_empty());

        let errors = validate_step(&route_only, WizardStep::Passenger, now, &policy);
        assert_eq!(errors.len(), 3);

        let errors = validate_step(&route_only, WizardStep::Review, now, &policy);
        assert!(errors.contains(Field::PaymentMethod));
        assert!(errors.contains(Field::Email));

        let no_vehicle = BookingDraft {
            vehicle_class: None,
            ..complete_draft()
        };
        let errors = validate_step(&no_vehicle, WizardStep::Route, now, &policy);
        assert_eq!(errors.get(Field::VehicleClass), Some("Select a vehicle"));
    }

    #[test]
    fn errors_serialize_as_camel_case_map() {
        let draft = BookingDraft {
            trip_type: TripType::RoundTrip,
            ..complete_draft()
        };
        let errors = validate_at(&draft, at("2030-03-01", "12:00"), &ValidationPolicy::quick_form());

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, serde_json::json!({ "returnDate": "Return date is required" }));
    }
}
