use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{BookingDraft, FareQuote};
use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub reference: String,
    pub status: Status,
    pub draft: BookingDraft,
    pub quote: FareQuote,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Pending,
    Confirmed { confirmed_at: DateTime<Utc> },
    Cancelled { cancelled_at: DateTime<Utc> },
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Confirmed { confirmed_at: _ } => "confirmed".into(),
            Self::Cancelled { cancelled_at: _ } => "cancelled".into(),
        }
    }
}

impl Booking {
    pub fn new(draft: BookingDraft, quote: FareQuote) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            reference: new_reference(),
            status: Status::Pending,
            draft,
            quote,
            created_at: now,
            updated_at: now,
        }
    }

    /// Draws a fresh reference, used when the current one is already taken.
    pub fn reissue_reference(&mut self) {
        self.reference = new_reference();
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending)
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn revise(&mut self, draft: BookingDraft, quote: FareQuote) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.draft = draft;
                self.quote = quote;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn confirm(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                let now = Utc::now();
                self.status = Status::Confirmed { confirmed_at: now };
                self.updated_at = now;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending | Status::Confirmed { confirmed_at: _ } => {
                let now = Utc::now();
                self.status = Status::Cancelled { cancelled_at: now };
                self.updated_at = now;
                Ok(())
            }
            Status::Cancelled { cancelled_at: _ } => Err(invalid_state_error()),
        }
    }
}

fn new_reference() -> String {
    let number: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("ICB{:06}", number)
}

#[cfg(test)]
fn sample_booking() -> Booking {
    use crate::entities::{TripType, VehicleClass};

    let quote = FareQuote {
        origin: "Mumbai".into(),
        destination: "Pune".into(),
        distance_km: 150.0,
        vehicle_class: VehicleClass::Sedan,
        trip_type: TripType::OneWay,
        package: None,
        base_fare: 2400,
        toll_estimate: 120,
        gst: 126,
        total: 2646,
    };

    Booking::new(BookingDraft::default(), quote)
}

#[test]
fn reference_has_prefix_and_six_digits() {
    let booking = sample_booking();

    assert!(booking.reference.starts_with("ICB"));
    assert_eq!(booking.reference.len(), 9);
    assert!(booking.reference[3..].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn confirmed_booking_can_be_cancelled_but_not_revised() {
    let mut booking = sample_booking();
    booking.confirm().unwrap();

    let quote = booking.quote.clone();
    let err = booking.revise(BookingDraft::default(), quote).unwrap_err();
    assert_eq!(err.code, 100);

    booking.cancel().unwrap();
    assert_eq!(booking.status.name(), "cancelled");
}

#[test]
fn cancelled_booking_rejects_further_transitions() {
    let mut booking = sample_booking();
    booking.cancel().unwrap();

    assert!(booking.confirm().is_err());
    assert!(booking.cancel().is_err());
}

#[test]
fn status_serializes_with_name_tag() {
    let value = serde_json::to_value(Status::Pending).unwrap();
    assert_eq!(value, serde_json::json!({ "name": "pending" }));
}
