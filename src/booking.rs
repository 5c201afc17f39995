use chrono::NaiveDateTime;

use crate::entities::{Booking, BookingDraft, BookingPatch, FareQuote, TripType};
use crate::error::{invalid_input_error, invalid_state_error, reference_exhausted_error, Error};
use crate::fare::FareEstimator;
use crate::validation::{validate_step, ValidationPolicy};
use crate::wizard::WizardStep;

/// Prices a draft once it has enough to go on: pickup and vehicle, plus the
/// drop-off for point-to-point trips or the package for hourly rentals.
pub fn quote_draft(draft: &BookingDraft, estimator: &FareEstimator) -> Option<FareQuote> {
    let pickup = draft.pickup.as_deref()?;
    let vehicle_class = draft.vehicle_class?;

    match draft.trip_type {
        TripType::Hourly => {
            let package = draft.package?;
            Some(estimator.estimate_rental(pickup, vehicle_class, package))
        }
        trip_type => {
            let dropoff = draft.dropoff.as_deref()?;
            Some(estimator.estimate(pickup, dropoff, vehicle_class, trip_type.is_one_way()))
        }
    }
}

/// Validates a submitted draft as the wizard would at review and attaches a
/// fresh quote.
#[tracing::instrument(skip(estimator))]
pub fn prepare_booking(
    mut draft: BookingDraft,
    estimator: &FareEstimator,
    now: NaiveDateTime,
) -> Result<Booking, Error> {
    draft.clear_other_tabs();

    let quote = checked_quote(&draft, estimator, now)?;

    Ok(Booking::new(draft, quote))
}

/// How many references a store draws for one booking before giving up.
pub const MAX_REFERENCE_ATTEMPTS: usize = 8;

/// Redraws the booking reference while `taken` reports it in use.
pub fn assign_unique_reference<F>(booking: &mut Booking, mut taken: F) -> Result<(), Error>
where
    F: FnMut(&str) -> bool,
{
    for _ in 0..MAX_REFERENCE_ATTEMPTS {
        if !taken(&booking.reference) {
            return Ok(());
        }

        tracing::warn!(reference = %booking.reference, "booking reference taken, redrawing");
        booking.reissue_reference();
    }

    Err(reference_exhausted_error())
}

/// Applies a patch to a pending booking, re-validating and re-quoting the
/// result. The booking is left untouched when the patched draft is invalid.
#[tracing::instrument(skip(booking, estimator), fields(id = %booking.id))]
pub fn revise_booking(
    booking: &mut Booking,
    patch: BookingPatch,
    estimator: &FareEstimator,
    now: NaiveDateTime,
) -> Result<(), Error> {
    if !booking.is_pending() {
        return Err(invalid_state_error());
    }

    if patch.is_empty() {
        return Err(invalid_input_error());
    }

    let mut draft = booking.draft.clone();
    for edit in patch.into_edits() {
        draft.apply(edit);
    }

    let quote = checked_quote(&draft, estimator, now)?;

    booking.revise(draft, quote)
}

fn checked_quote(
    draft: &BookingDraft,
    estimator: &FareEstimator,
    now: NaiveDateTime,
) -> Result<FareQuote, Error> {
    let errors = validate_step(draft, WizardStep::Review, now, &ValidationPolicy::wizard());

    if !errors.is_empty() {
        tracing::info!(fields = errors.len(), "draft failed validation");
        return Err(errors.into());
    }

    quote_draft(draft, estimator).ok_or_else(invalid_input_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PaymentMethod, RentalPackage, VehicleClass};
    use crate::validation::{parse_date, parse_time, Field};

    fn now() -> NaiveDateTime {
        parse_date("2030-03-01")
            .unwrap()
            .and_time(parse_time("12:00").unwrap())
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            trip_type: TripType::OneWay,
            pickup: Some("Mumbai".into()),
            dropoff: Some("Pune".into()),
            date: Some("2030-03-10".into()),
            time: Some("09:30".into()),
            vehicle_class: Some(VehicleClass::Sedan),
            name: Some("Asha Rao".into()),
            phone: Some("9876543210".into()),
            email: Some("asha@example.com".into()),
            payment_method: Some(PaymentMethod::Cash),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn prepares_pending_booking_with_quote() {
        let booking = prepare_booking(draft(), &FareEstimator::default(), now()).unwrap();

        assert!(booking.is_pending());
        assert_eq!(booking.quote.total, 2646);
    }

    #[test]
    fn invalid_draft_is_rejected_with_fields() {
        let draft = BookingDraft {
            dropoff: Some("mumbai".into()),
            payment_method: None,
            ..draft()
        };

        let err = prepare_booking(draft, &FareEstimator::default(), now()).unwrap_err();
        let fields = err.fields.unwrap();

        assert_eq!(err.code, 102);
        assert!(fields.contains(Field::Dropoff));
        assert!(fields.contains(Field::PaymentMethod));
    }

    #[test]
    fn revise_switches_to_round_trip_and_requotes() {
        let estimator = FareEstimator::default();
        let mut booking = prepare_booking(draft(), &estimator, now()).unwrap();

        let patch = BookingPatch {
            trip_type: Some(TripType::RoundTrip),
            return_date: Some("2030-03-12".into()),
            ..BookingPatch::default()
        };
        revise_booking(&mut booking, patch, &estimator, now()).unwrap();

        assert_eq!(booking.quote.trip_type, TripType::RoundTrip);
        assert_eq!(booking.quote.total, 4763);
    }

    #[test]
    fn revise_keeps_booking_when_patch_is_invalid() {
        let estimator = FareEstimator::default();
        let mut booking = prepare_booking(draft(), &estimator, now()).unwrap();

        let patch = BookingPatch {
            dropoff: Some("Mumbai".into()),
            ..BookingPatch::default()
        };
        let err = revise_booking(&mut booking, patch, &estimator, now()).unwrap_err();

        assert_eq!(err.code, 102);
        assert_eq!(booking.draft.dropoff.as_deref(), Some("Pune"));
    }

    #[test]
    fn taken_reference_is_redrawn() {
        let mut booking = prepare_booking(draft(), &FareEstimator::default(), now()).unwrap();
        let first = booking.reference.clone();

        let mut seen = Vec::new();
        assign_unique_reference(&mut booking, |reference| {
            seen.push(reference.to_string());
            seen.len() == 1
        })
        .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], first);
        assert_eq!(booking.reference, seen[1]);
    }

    #[test]
    fn reference_attempts_are_bounded() {
        let mut booking = prepare_booking(draft(), &FareEstimator::default(), now()).unwrap();

        let mut attempts = 0;
        let err = assign_unique_reference(&mut booking, |_| {
            attempts += 1;
            true
        })
        .unwrap_err();

        assert_eq!(attempts, MAX_REFERENCE_ATTEMPTS);
        assert!(err.is_internal());
    }

    #[test]
    fn submitted_hourly_draft_drops_trip_fields() {
        let draft = BookingDraft {
            trip_type: TripType::Hourly,
            dropoff: Some("Pune".into()),
            return_date: Some("2030-03-12".into()),
            package: Some(RentalPackage::EightHours),
            ..draft()
        };

        let booking = prepare_booking(draft, &FareEstimator::default(), now()).unwrap();

        assert_eq!(booking.draft.dropoff, None);
        assert_eq!(booking.draft.return_date, None);
        assert_eq!(booking.draft.package, Some(RentalPackage::EightHours));
        assert_eq!(booking.quote.trip_type, TripType::Hourly);
    }

    #[test]
    fn hourly_draft_quotes_rental() {
        let draft = BookingDraft {
            trip_type: TripType::Hourly,
            dropoff: None,
            package: Some(RentalPackage::FourHours),
            ..draft()
        };

        let quote = quote_draft(&draft, &FareEstimator::default()).unwrap();
        assert_eq!(quote.trip_type, TripType::Hourly);
        assert_eq!(quote.base_fare, 640);
    }
}
