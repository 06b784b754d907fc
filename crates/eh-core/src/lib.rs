//! Event and Booking entities with their pre-save validation pipelines.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use utoipa::ToSchema;

pub mod booking;
pub mod event;
pub mod normalize;
pub mod validation;

pub use booking::{Booking, BookingDraft, BookingInput, BookingPatch, ValidBooking};
pub use event::{Event, EventDetails, EventDraft, EventInput, EventPatch, EventSummary};
pub use validation::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct EventId(pub Uuid);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct BookingId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
