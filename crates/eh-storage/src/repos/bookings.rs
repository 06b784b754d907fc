use eh_core::{Booking, BookingDraft, BookingId, BookingInput, BookingPatch, EventId, ValidBooking};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::is_unique_violation;
use crate::repos::EventRepo;
use crate::{StoreError, StoreResult};

#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    email: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: BookingId(row.id),
            event_id: EventId(row.event_id),
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct BookingRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookingRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate the email, check the referenced event exists, then insert.
    pub async fn create(&self, input: BookingInput) -> StoreResult<Booking> {
        let valid = BookingDraft::new(input).validate_and_normalize()?;
        self.check_reference(&valid).await?;

        let now = OffsetDateTime::now_utc();
        let booking = Booking {
            id: BookingId::new(),
            event_id: valid.event_id,
            email: valid.email,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO bookings (id, event_id, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id.0)
        .bind(booking.event_id.0)
        .bind(&booking.email)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| booking_conflict(e, booking.event_id, &booking.email))?;

        info!(booking_id = %booking.id, event_id = %booking.event_id, "Booking created");
        Ok(booking)
    }

    /// Apply `patch` to a stored booking. The event lookup only happens when
    /// the booking moves to a different event.
    pub async fn update(&self, id: BookingId, patch: BookingPatch) -> StoreResult<Booking> {
        let current = self.get(id).await?;
        let valid = BookingDraft::for_update(&current, patch).validate_and_normalize()?;
        self.check_reference(&valid).await?;

        let updated_at = OffsetDateTime::now_utc();
        sqlx::query("UPDATE bookings SET event_id = ?, email = ?, updated_at = ? WHERE id = ?")
            .bind(valid.event_id.0)
            .bind(&valid.email)
            .bind(updated_at)
            .bind(id.0)
            .execute(self.pool)
            .await
            .map_err(|e| booking_conflict(e, valid.event_id, &valid.email))?;

        info!(booking_id = %id, event_id = %valid.event_id, "Booking updated");
        Ok(Booking {
            event_id: valid.event_id,
            email: valid.email,
            updated_at,
            ..current
        })
    }

    pub async fn get(&self, id: BookingId) -> StoreResult<Booking> {
        sqlx::query_as::<_, BookingRow>(
            "SELECT id, event_id, email, created_at, updated_at FROM bookings WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(self.pool)
        .await?
        .map(Booking::from)
        .ok_or_else(|| StoreError::not_found("booking", id))
    }

    /// Bookings for one event in the order they were made.
    pub async fn list_for_event(&self, event_id: EventId) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE event_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(event_id.0)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn check_reference(&self, valid: &ValidBooking) -> StoreResult<()> {
        if !valid.check_event {
            return Ok(());
        }
        if !EventRepo::new(self.pool).exists(valid.event_id).await? {
            warn!(event_id = %valid.event_id, "Rejected booking for missing event");
            return Err(StoreError::DanglingReference(valid.event_id));
        }
        Ok(())
    }
}

fn booking_conflict(err: sqlx::Error, event_id: EventId, email: &str) -> StoreError {
    if is_unique_violation(&err) {
        warn!(event_id = %event_id, "Rejected duplicate booking");
        StoreError::DuplicateBooking {
            event_id,
            email: email.to_owned(),
        }
    } else {
        StoreError::Database(err)
    }
}
