use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::normalize::{normalize_date, normalize_time, slugify};
use crate::validation::{required, required_list};
use crate::{EventId, ValidationError};

/// Raw event fields as submitted by a caller.
///
/// Missing fields deserialize as empty and are reported by the pipeline with
/// the offending field name.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Any common calendar date form, e.g. `2026-06-12` or `June 12, 2026`.
    pub date: String,
    /// `HH:MM` or `H:MM AM/PM`.
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Partial update of an existing event. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated, normalized event content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// 24h `HH:MM`
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

/// The listing shape read by event cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    pub title: String,
    pub image: String,
    pub slug: String,
    pub location: String,
    pub date: String,
    pub time: String,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        let d = &event.details;
        Self {
            title: d.title.clone(),
            image: d.image.clone(),
            slug: d.slug.clone(),
            location: d.location.clone(),
            date: d.date.clone(),
            time: d.time.clone(),
        }
    }
}

/// Event content awaiting validation before a save.
#[derive(Debug, Clone)]
pub struct EventDraft {
    fields: EventInput,
    /// Slug carried over from the stored event. `None` when the title is new
    /// or changed and the slug has to be derived again.
    kept_slug: Option<String>,
}

impl EventDraft {
    /// Draft for a brand new event.
    pub fn new(input: EventInput) -> Self {
        Self {
            fields: input,
            kept_slug: None,
        }
    }

    /// Draft for updating `current` with `patch`.
    pub fn for_update(current: &EventDetails, patch: EventPatch) -> Self {
        let title_changed = patch
            .title
            .as_deref()
            .is_some_and(|t| t.trim() != current.title);
        let kept_slug = (!title_changed).then(|| current.slug.clone());

        let fields = EventInput {
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            description: patch.description.unwrap_or_else(|| current.description.clone()),
            overview: patch.overview.unwrap_or_else(|| current.overview.clone()),
            image: patch.image.unwrap_or_else(|| current.image.clone()),
            venue: patch.venue.unwrap_or_else(|| current.venue.clone()),
            location: patch.location.unwrap_or_else(|| current.location.clone()),
            date: patch.date.unwrap_or_else(|| current.date.clone()),
            time: patch.time.unwrap_or_else(|| current.time.clone()),
            mode: patch.mode.unwrap_or_else(|| current.mode.clone()),
            audience: patch.audience.unwrap_or_else(|| current.audience.clone()),
            agenda: patch.agenda.unwrap_or_else(|| current.agenda.clone()),
            organizer: patch.organizer.unwrap_or_else(|| current.organizer.clone()),
            tags: patch.tags.unwrap_or_else(|| current.tags.clone()),
        };

        Self { fields, kept_slug }
    }

    pub fn title_changed(&self) -> bool {
        self.kept_slug.is_none()
    }

    /// Run the pre-save pipeline: slug, date, time, then required fields.
    ///
    /// Slug uniqueness is left to the store's unique index.
    pub fn validate_and_normalize(self) -> Result<EventDetails, ValidationError> {
        let f = self.fields;

        let title = required("title", &f.title)?;
        let slug = match self.kept_slug {
            Some(slug) => slug,
            None => {
                let slug = slugify(&title);
                if slug.is_empty() {
                    return Err(ValidationError::EmptySlug);
                }
                slug
            }
        };

        let date = normalize_date(&required("date", &f.date)?)?;
        let time = normalize_time(&required("time", &f.time)?)?;

        Ok(EventDetails {
            title,
            slug,
            description: required("description", &f.description)?,
            overview: required("overview", &f.overview)?,
            image: required("image", &f.image)?,
            venue: required("venue", &f.venue)?,
            location: required("location", &f.location)?,
            date,
            time,
            mode: required("mode", &f.mode)?,
            audience: required("audience", &f.audience)?,
            agenda: required_list("agenda", &f.agenda)?,
            organizer: required("organizer", &f.organizer)?,
            tags: required_list("tags", &f.tags)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> EventInput {
        EventInput {
            title: "React Summit 2026".into(),
            description: "The biggest React conference worldwide.".into(),
            overview: "Two days of talks and workshops.".into(),
            image: "/images/event1.png".into(),
            venue: "Kromhouthal".into(),
            location: "Amsterdam, NL".into(),
            date: "June 12, 2026".into(),
            time: "9:00 AM".into(),
            mode: "hybrid".into(),
            audience: "Frontend developers".into(),
            agenda: vec!["Keynote".into(), " Lightning talks ".into()],
            organizer: "GitNation".into(),
            tags: vec!["react".into(), "frontend".into()],
        }
    }

    #[test]
    fn new_event_is_normalized() {
        let details = EventDraft::new(sample_input()).validate_and_normalize().unwrap();
        assert_eq!(details.slug, "react-summit-2026");
        assert_eq!(details.date, "2026-06-12");
        assert_eq!(details.time, "09:00");
        assert_eq!(details.agenda, vec!["Keynote", "Lightning talks"]);
    }

    #[test]
    fn symbol_only_title_has_no_slug() {
        let mut input = sample_input();
        input.title = "+++ !!!".into();
        assert_eq!(
            EventDraft::new(input).validate_and_normalize().unwrap_err(),
            ValidationError::EmptySlug
        );
    }

    #[test]
    fn bad_date_and_time_are_hard_errors() {
        let mut input = sample_input();
        input.date = "not-a-date".into();
        assert!(matches!(
            EventDraft::new(input).validate_and_normalize(),
            Err(ValidationError::InvalidDate(_))
        ));

        let mut input = sample_input();
        input.time = "25:00".into();
        assert!(matches!(
            EventDraft::new(input).validate_and_normalize(),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    #[test]
    fn blank_required_fields_are_named() {
        let mut input = sample_input();
        input.venue = "   ".into();
        let err = EventDraft::new(input).validate_and_normalize().unwrap_err();
        assert_eq!(err.field(), "venue");

        let mut input = sample_input();
        input.tags = vec![];
        let err = EventDraft::new(input).validate_and_normalize().unwrap_err();
        assert_eq!(err, ValidationError::EmptyList { field: "tags" });

        let err = EventDraft::new(EventInput::default())
            .validate_and_normalize()
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
    }

    #[test]
    fn resaving_is_idempotent() {
        let first = EventDraft::new(sample_input()).validate_and_normalize().unwrap();
        let second = EventDraft::for_update(&first, EventPatch::default())
            .validate_and_normalize()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn slug_follows_title_changes_only() {
        let mut current = EventDraft::new(sample_input()).validate_and_normalize().unwrap();
        // A stored slug that no longer matches the title is left alone
        // unless the title itself changes.
        current.slug = "react-summit".into();

        let draft = EventDraft::for_update(
            &current,
            EventPatch {
                title: Some("  React Summit 2026 ".into()),
                venue: Some("Zuiderkerk".into()),
                ..Default::default()
            },
        );
        assert!(!draft.title_changed());
        let updated = draft.validate_and_normalize().unwrap();
        assert_eq!(updated.slug, "react-summit");
        assert_eq!(updated.venue, "Zuiderkerk");

        let draft = EventDraft::for_update(
            &current,
            EventPatch {
                title: Some("React Summit Amsterdam".into()),
                ..Default::default()
            },
        );
        assert!(draft.title_changed());
        assert_eq!(draft.validate_and_normalize().unwrap().slug, "react-summit-amsterdam");
    }

    #[test]
    fn update_renormalizes_date_and_time() {
        let current = EventDraft::new(sample_input()).validate_and_normalize().unwrap();
        let updated = EventDraft::for_update(
            &current,
            EventPatch {
                date: Some("2026/07/01".into()),
                time: Some("6:45 pm".into()),
                ..Default::default()
            },
        )
        .validate_and_normalize()
        .unwrap();
        assert_eq!(updated.date, "2026-07-01");
        assert_eq!(updated.time, "18:45");
        assert_eq!(updated.slug, current.slug);
    }
}
