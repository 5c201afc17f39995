use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::BookingAPI;
use crate::booking::quote_draft;
use crate::entities::{Booking, BookingDraft, DraftEdit, FareQuote};
use crate::error::{invalid_state_error, Error, GENERIC_FAILURE_MESSAGE};
use crate::fare::FareEstimator;
use crate::validation::{validate_step, Field, ValidationErrors, ValidationPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Route,
    Passenger,
    Review,
    Confirm,
}

impl WizardStep {
    /// The step `Next` leads to. Review is left only by submitting.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Route => Some(Self::Passenger),
            Self::Passenger => Some(Self::Review),
            Self::Review | Self::Confirm => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Route | Self::Confirm => None,
            Self::Passenger => Some(Self::Route),
            Self::Review => Some(Self::Passenger),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    Edit(DraftEdit),
    Next,
    Back,
    Reset,
}

/// Booking wizard state: the draft being filled in, the active step and the
/// errors from the last gate check.
#[derive(Clone, Debug)]
pub struct Wizard {
    draft: BookingDraft,
    step: WizardStep,
    errors: ValidationErrors,
    policy: ValidationPolicy,
    booking: Option<Booking>,
    submit_error: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::with_policy(ValidationPolicy::wizard())
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            draft: BookingDraft::default(),
            step: WizardStep::Route,
            errors: ValidationErrors::default(),
            policy,
            booking: None,
            submit_error: None,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Live price for the review panel.
    pub fn quote(&self, estimator: &FareEstimator) -> Option<FareQuote> {
        quote_draft(&self.draft, estimator)
    }

    pub fn dispatch(&mut self, action: WizardAction, now: NaiveDateTime) {
        match action {
            WizardAction::Edit(edit) => {
                if self.step == WizardStep::Confirm {
                    return;
                }

                match edited_field(&edit) {
                    Some(field) => self.errors.remove(field),
                    None => self.errors = ValidationErrors::default(),
                }
                self.submit_error = None;
                self.draft.apply(edit);
            }
            WizardAction::Next => {
                if self.step == WizardStep::Confirm {
                    return;
                }

                self.errors = validate_step(&self.draft, self.step, now, &self.policy);

                if self.errors.is_empty() {
                    if let Some(next) = self.step.next() {
                        self.step = next;
                    }
                }
            }
            WizardAction::Back => {
                if let Some(previous) = self.step.previous() {
                    self.step = previous;
                    self.errors = ValidationErrors::default();
                }
            }
            WizardAction::Reset => {
                *self = Self::with_policy(self.policy.clone());
            }
        }
    }

    /// Submits the reviewed draft. On success the wizard moves to the confirm
    /// step and keeps the stored booking; on failure it stays on review with
    /// either field errors or a generic message.
    pub async fn submit<A>(&mut self, api: &A, now: NaiveDateTime) -> Result<Booking, Error>
    where
        A: BookingAPI + ?Sized,
    {
        if self.step != WizardStep::Review {
            return Err(invalid_state_error());
        }

        self.errors = validate_step(&self.draft, WizardStep::Review, now, &self.policy);
        if !self.errors.is_empty() {
            return Err(self.errors.clone().into());
        }

        self.submit_error = None;

        match api.create_booking(self.draft.clone()).await {
            Ok(booking) => {
                tracing::info!(reference = %booking.reference, "booking submitted");
                self.booking = Some(booking.clone());
                self.draft = BookingDraft::default();
                self.step = WizardStep::Confirm;
                Ok(booking)
            }
            Err(err) => {
                match &err.fields {
                    Some(fields) => self.errors = fields.clone(),
                    None => self.submit_error = Some(GENERIC_FAILURE_MESSAGE.into()),
                }
                tracing::warn!(code = err.code, "booking submission failed");
                Err(err)
            }
        }
    }
}

fn edited_field(edit: &DraftEdit) -> Option<Field> {
    match edit {
        DraftEdit::TripType(_) => None,
        DraftEdit::Pickup(_) => Some(Field::Pickup),
        DraftEdit::Dropoff(_) => Some(Field::Dropoff),
        DraftEdit::Date(_) => Some(Field::Date),
        DraftEdit::Time(_) => Some(Field::Time),
        DraftEdit::ReturnDate(_) => Some(Field::ReturnDate),
        DraftEdit::Package(_) => Some(Field::Package),
        DraftEdit::VehicleClass(_) => Some(Field::VehicleClass),
        DraftEdit::Name(_) => Some(Field::Name),
        DraftEdit::Phone(_) => Some(Field::Phone),
        DraftEdit::Email(_) => Some(Field::Email),
        DraftEdit::PaymentMethod(_) => Some(Field::PaymentMethod),
    }
}
