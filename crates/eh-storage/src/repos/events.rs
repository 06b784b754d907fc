use eh_core::{Event, EventDetails, EventDraft, EventId, EventInput, EventPatch, EventSummary};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::is_unique_violation;
use crate::{StoreError, StoreResult};

const EVENT_COLUMNS: &str = "id, title, slug, description, overview, image, venue, location, \
     date, time, mode, audience, agenda, organizer, tags, created_at, updated_at";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    slug: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: String,
    audience: String,
    agenda: Json<Vec<String>>,
    organizer: String,
    tags: Json<Vec<String>>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: EventId(row.id),
            details: EventDetails {
                title: row.title,
                slug: row.slug,
                description: row.description,
                overview: row.overview,
                image: row.image,
                venue: row.venue,
                location: row.location,
                date: row.date,
                time: row.time,
                mode: row.mode,
                audience: row.audience,
                agenda: row.agenda.0,
                organizer: row.organizer,
                tags: row.tags.0,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct EventRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate, normalize and insert a new event.
    pub async fn create(&self, input: EventInput) -> StoreResult<Event> {
        let details = EventDraft::new(input).validate_and_normalize()?;
        let now = OffsetDateTime::now_utc();
        let event = Event {
            id: EventId::new(),
            details,
            created_at: now,
            updated_at: now,
        };

        let d = &event.details;
        sqlx::query(
            r#"
            INSERT INTO events (id, title, slug, description, overview, image, venue, location,
                                date, time, mode, audience, agenda, organizer, tags,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.0)
        .bind(&d.title)
        .bind(&d.slug)
        .bind(&d.description)
        .bind(&d.overview)
        .bind(&d.image)
        .bind(&d.venue)
        .bind(&d.location)
        .bind(&d.date)
        .bind(&d.time)
        .bind(&d.mode)
        .bind(&d.audience)
        .bind(Json(&d.agenda))
        .bind(&d.organizer)
        .bind(Json(&d.tags))
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| slug_conflict(e, &d.slug))?;

        info!(event_id = %event.id, slug = %d.slug, "Event created");
        Ok(event)
    }

    /// Apply `patch` to the event stored under `slug`.
    ///
    /// The slug is derived again only when the title actually changes; date
    /// and time are normalized on every save.
    pub async fn update(&self, slug: &str, patch: EventPatch) -> StoreResult<Event> {
        let current = self.get_by_slug(slug).await?;
        let details = EventDraft::for_update(&current.details, patch).validate_and_normalize()?;
        let updated_at = OffsetDateTime::now_utc();

        let d = &details;
        sqlx::query(
            r#"
            UPDATE events
            SET title = ?, slug = ?, description = ?, overview = ?, image = ?, venue = ?,
                location = ?, date = ?, time = ?, mode = ?, audience = ?, agenda = ?,
                organizer = ?, tags = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&d.title)
        .bind(&d.slug)
        .bind(&d.description)
        .bind(&d.overview)
        .bind(&d.image)
        .bind(&d.venue)
        .bind(&d.location)
        .bind(&d.date)
        .bind(&d.time)
        .bind(&d.mode)
        .bind(&d.audience)
        .bind(Json(&d.agenda))
        .bind(&d.organizer)
        .bind(Json(&d.tags))
        .bind(updated_at)
        .bind(current.id.0)
        .execute(self.pool)
        .await
        .map_err(|e| slug_conflict(e, &d.slug))?;

        info!(event_id = %current.id, slug = %d.slug, "Event updated");
        Ok(Event {
            details,
            updated_at,
            ..current
        })
    }

    pub async fn get(&self, id: EventId) -> StoreResult<Event> {
        let sql = format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS);
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id.0)
            .fetch_optional(self.pool)
            .await?
            .map(Event::from)
            .ok_or_else(|| StoreError::not_found("event", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> StoreResult<Event> {
        let sql = format!("SELECT {} FROM events WHERE slug = ?", EVENT_COLUMNS);
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .map(Event::from)
            .ok_or_else(|| StoreError::not_found("event", slug))
    }

    pub async fn exists(&self, id: EventId) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM events WHERE id = ? LIMIT 1")
            .bind(id.0)
            .fetch_optional(self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// All events, newest first (insertion order).
    pub async fn list(&self) -> StoreResult<Vec<Event>> {
        let sql = format!("SELECT {} FROM events ORDER BY rowid DESC", EVENT_COLUMNS);
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Listing cards, newest first (insertion order).
    pub async fn list_summaries(&self) -> StoreResult<Vec<EventSummary>> {
        let rows: Vec<(String, String, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT title, image, slug, location, date, time
            FROM events
            ORDER BY rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(title, image, slug, location, date, time)| EventSummary {
                title,
                image,
                slug,
                location,
                date,
                time,
            })
            .collect())
    }
}

fn slug_conflict(err: sqlx::Error, slug: &str) -> StoreError {
    if is_unique_violation(&err) {
        warn!(slug = %slug, "Rejected event with duplicate slug");
        StoreError::DuplicateSlug(slug.to_owned())
    } else {
        StoreError::Database(err)
    }
}
