use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::normalize::normalize_email;
use crate::{BookingId, EventId, ValidationError};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub event_id: EventId,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingPatch {
    pub event_id: Option<EventId>,
    pub email: Option<String>,
}

/// A persisted reservation against an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

/// Booking content awaiting validation before a save.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    event_id: EventId,
    email: String,
    event_changed: bool,
}

/// Output of the booking pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub event_id: EventId,
    pub email: String,
    /// Whether the referenced event must be looked up before committing.
    pub check_event: bool,
}

impl BookingDraft {
    pub fn new(input: BookingInput) -> Self {
        Self {
            event_id: input.event_id,
            email: input.email,
            event_changed: true,
        }
    }

    pub fn for_update(current: &Booking, patch: BookingPatch) -> Self {
        let event_id = patch.event_id.unwrap_or(current.event_id);
        Self {
            event_id,
            email: patch.email.unwrap_or_else(|| current.email.clone()),
            event_changed: event_id != current.event_id,
        }
    }

    /// Validate the email on every save. The event reference is only flagged
    /// for checking when it is new or changed.
    pub fn validate_and_normalize(self) -> Result<ValidBooking, ValidationError> {
        Ok(ValidBooking {
            event_id: self.event_id,
            email: normalize_email(&self.email)?,
            check_event: self.event_changed,
        })
    }
}
