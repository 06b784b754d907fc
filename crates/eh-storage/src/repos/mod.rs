//! Repositories run the explicit entity pipelines, then commit.
//!
//! Uniqueness is enforced by the unique indexes; a violation at commit time is
//! reported as a conflict for the offending entity.

mod bookings;
mod events;

pub use bookings::BookingRepo;
pub use events::EventRepo;
