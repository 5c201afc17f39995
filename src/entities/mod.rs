mod booking;
mod draft;
mod quote;
mod route;
mod trip_type;
mod vehicle;
mod vehicle_class;

pub use booking::{Booking, Status as BookingStatus};
pub use draft::{BookingDraft, BookingPatch, DraftEdit, PaymentMethod};
pub use quote::FareQuote;
pub use route::Route;
pub use trip_type::{RentalPackage, TripType};
pub use vehicle::{NewVehicle, Vehicle, VehicleFilter};
pub use vehicle_class::VehicleClass;
