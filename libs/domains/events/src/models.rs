//! Event domain models

use axum_helpers::extractors::trim::{
    trim_option_string, trim_option_string_vec, trim_string, trim_string_vec,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
pub const MAX_TAG_LEN: usize = 30;

/// Largest skip the database driver accepts
const MAX_OFFSET: u64 = i64::MAX as u64;

/// 24h `H:MM` or `HH:MM`
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap());

/// Event categories
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
pub enum EventCategory {
    Conference,
    Workshop,
    Seminar,
    Networking,
    Social,
    Sports,
    Cultural,
    #[default]
    Other,
}

/// Event lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// Organizer summary stored on each event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(rename = "_id", with = "bson::serde_helpers::uuid_1_as_binary")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Event entity as stored in the `events` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", with = "bson::serde_helpers::uuid_1_as_binary")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i64>,
    #[serde(default)]
    pub price: f64,
    pub organizer: Organizer,
    #[serde(default, with = "uuid_vec_as_binary")]
    pub attendees: Vec<Uuid>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Stores a list of UUIDs as BSON binary subtype 4
mod uuid_vec_as_binary {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(ids: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        let ids: Vec<bson::Uuid> = ids.iter().map(|id| bson::Uuid::from(*id)).collect();
        ids.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        let ids = Vec::<bson::Uuid>::deserialize(deserializer)?;
        Ok(ids.into_iter().map(Uuid::from).collect())
    }
}

impl Event {
    /// Build a new event from validated input.
    ///
    /// Returns `None` when the date cannot be parsed.
    pub fn new(input: CreateEvent, organizer: Organizer) -> Option<Self> {
        let date = parse_event_date(&input.date)?;
        let category = EventCategory::from_str(&input.category).unwrap_or_default();
        let now = Utc::now();

        Some(Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            date,
            time: input.time,
            location: input.location,
            category,
            max_attendees: input.max_attendees,
            price: input.price.unwrap_or(0.0),
            organizer,
            attendees: Vec::new(),
            status: input.status.unwrap_or_default(),
            tags: input.tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a validated update. Returns `None` when a supplied date cannot be parsed.
    pub fn apply_update(&mut self, update: UpdateEvent) -> Option<()> {
        if let Some(date) = update.date {
            self.date = parse_event_date(&date)?;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(category) = update.category {
            self.category = EventCategory::from_str(&category).unwrap_or(self.category);
        }
        if let Some(max_attendees) = update.max_attendees {
            self.max_attendees = Some(max_attendees);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
        Some(())
    }

    pub fn is_organized_by(&self, user_id: Uuid) -> bool {
        self.organizer.id == user_id
    }
}

/// Organizer as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizerResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Event as returned by the API, with derived attendance fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[schema(example = "18:30")]
    pub time: String,
    pub location: String,
    pub category: EventCategory,
    pub max_attendees: Option<i64>,
    pub price: f64,
    pub organizer: OrganizerResponse,
    pub attendees: Vec<Uuid>,
    pub status: EventStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attendee_count: usize,
    /// `null` when there is no attendee cap
    pub spots_remaining: Option<i64>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let attendee_count = event.attendees.len();
        let spots_remaining = event.max_attendees.map(|max| max - attendee_count as i64);

        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            category: event.category,
            max_attendees: event.max_attendees,
            price: event.price,
            organizer: OrganizerResponse {
                id: event.organizer.id,
                name: event.organizer.name,
                email: event.organizer.email,
            },
            attendees: event.attendees,
            status: event.status,
            tags: event.tags,
            created_at: event.created_at,
            updated_at: event.updated_at,
            attendee_count,
            spots_remaining,
        }
    }
}

/// DTO for creating an event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[serde(default, deserialize_with = "trim_string")]
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    #[schema(example = "Rust Meetup")]
    pub title: String,

    #[serde(default, deserialize_with = "trim_string")]
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters"
    ))]
    pub description: String,

    /// RFC 3339 timestamp or `YYYY-MM-DD`; must be in the future
    #[serde(default)]
    #[validate(custom(function = "validate_event_date"))]
    #[schema(example = "2030-05-01T18:30:00Z")]
    pub date: String,

    #[serde(default)]
    #[validate(custom(function = "validate_time"))]
    #[schema(example = "18:30")]
    pub time: String,

    #[serde(default, deserialize_with = "trim_string")]
    #[validate(length(min = 3, max = 200, message = "Location must be between 3 and 200 characters"))]
    pub location: String,

    #[serde(default = "default_category")]
    #[validate(custom(function = "validate_category"))]
    #[schema(example = "Workshop")]
    pub category: String,

    #[validate(range(min = 1, max = 10000, message = "Maximum attendees must be between 1 and 10,000"))]
    pub max_attendees: Option<i64>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub status: Option<EventStatus>,

    #[serde(default, deserialize_with = "trim_string_vec")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

/// DTO for updating an event; every field is optional and checked with the create rules
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters"
    ))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_event_date"))]
    pub date: Option<String>,

    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,

    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(min = 3, max = 200, message = "Location must be between 3 and 200 characters"))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,

    #[validate(range(min = 1, max = 10000, message = "Maximum attendees must be between 1 and 10,000"))]
    pub max_attendees: Option<i64>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub status: Option<EventStatus>,

    #[serde(default, deserialize_with = "trim_option_string_vec")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
}

/// Query string of `GET /events`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Full-text search over title, description and location
    #[serde(default, deserialize_with = "trim_option_string")]
    pub search: Option<String>,

    /// Category name; empty or `All` disables the filter, an unknown name matches nothing
    #[serde(default, deserialize_with = "trim_option_string")]
    pub category: Option<String>,

    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    #[param(minimum = 1, default = 1)]
    pub page: i64,

    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub limit: i64,
}

impl Default for ListEventsQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListEventsQuery {
    /// Repository filter for this page
    pub fn to_filter(&self) -> EventFilter {
        let limit = self.limit.clamp(1, MAX_LIMIT);
        let page = self.page.max(1);

        EventFilter {
            search: self.search.clone().filter(|s| !s.is_empty()),
            category: self
                .category
                .clone()
                .filter(|c| !c.is_empty() && c != "All"),
            organizer: None,
            offset: ((page - 1) as u64)
                .saturating_mul(limit as u64)
                .min(MAX_OFFSET),
            limit: Some(limit),
        }
    }
}

/// Repository-level filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub search: Option<String>,
    /// Exact category name as stored
    pub category: Option<String>,
    pub organizer: Option<Uuid>,
    pub offset: u64,
    /// `None` returns every match
    pub limit: Option<i64>,
}

impl EventFilter {
    pub fn by_organizer(organizer: Uuid) -> Self {
        Self {
            organizer: Some(organizer),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    /// Current page
    pub current: i64,
    /// Total number of pages
    pub pages: u64,
    /// Total number of matching events
    pub total: u64,
}

impl Pagination {
    pub fn new(current: i64, limit: i64, total: u64) -> Self {
        Self {
            current,
            pages: total.div_ceil(limit.max(1) as u64),
            total,
        }
    }
}

/// `GET /events` response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub success: bool,
    pub events: Vec<EventResponse>,
    pub pagination: Pagination,
}

/// Single-event envelope; `message` is present on create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub event: EventResponse,
}

/// `GET /events/user/my-events` response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyEventsResponse {
    pub success: bool,
    pub events: Vec<EventResponse>,
}

fn default_category() -> String {
    EventCategory::default().to_string()
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM[:SS]` (UTC) or a bare date (midnight UTC).
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_event_date(value: &str) -> Result<(), ValidationError> {
    let date = parse_event_date(value).ok_or_else(|| {
        ValidationError::new("invalid_date").with_message("Please enter a valid date".into())
    })?;

    if date <= Utc::now() {
        return Err(ValidationError::new("date_in_past")
            .with_message("Event date must be in the future".into()));
    }

    Ok(())
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    if !TIME_PATTERN.is_match(value) {
        return Err(ValidationError::new("invalid_time")
            .with_message("Please enter a valid time in HH:MM format".into()));
    }
    Ok(())
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    EventCategory::from_str(value).map(|_| ()).map_err(|_| {
        ValidationError::new("invalid_category")
            .with_message("Please select a valid category".into())
    })
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_LEN) {
        return Err(ValidationError::new("tag_too_long")
            .with_message("Tag cannot exceed 30 characters".into()));
    }
    Ok(())
}
