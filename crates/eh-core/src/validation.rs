//! Validation errors raised by the entity pipelines.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must contain at least one non-empty entry")]
    EmptyList { field: &'static str },

    #[error("{field}[{index}] cannot be empty")]
    BlankListItem { field: &'static str, index: usize },

    #[error("slug cannot be empty: title has no letters or digits")]
    EmptySlug,

    #[error("invalid event date '{0}'")]
    InvalidDate(String),

    #[error("invalid event time '{0}'; expected HH:MM or H:MM AM/PM")]
    InvalidTime(String),

    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::EmptyList { field } | Self::BlankListItem { field, .. } => {
                *field
            }
            Self::EmptySlug => "slug",
            Self::InvalidDate(_) => "date",
            Self::InvalidTime(_) => "time",
            Self::InvalidEmail(_) => "email",
        }
    }
}

/// Trim a required string, rejecting blank values.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

/// Trim every entry of a required list, rejecting an empty list or blank entries.
pub fn required_list(field: &'static str, values: &[String]) -> Result<Vec<String>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyList { field });
    }
    values
        .iter()
        .enumerate()
        .map(|(index, v)| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Err(ValidationError::BlankListItem { field, index })
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect()
}
