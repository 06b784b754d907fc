use eh_core::{EventId, ValidationError};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot book: referenced event {0} does not exist")]
    DanglingReference(EventId),

    #[error("an event with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("'{email}' has already booked event {event_id}")]
    DuplicateBooking { event_id: EventId, email: String },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// True when the storage layer rejected a write on a unique index.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
