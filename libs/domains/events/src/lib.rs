//! Events Domain
//!
//! Public event listing plus organizer-owned create, update and delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Request Flow                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  GET  /events ─────────────► search, category, pagination    │
//! │  GET  /events/{id}                                           │
//! │                                                              │
//! │  POST /events ──┐                                            │
//! │  PUT  /events/{id}  ├─► JWT ─► organizer check ─► MongoDB    │
//! │  DELETE /events/{id}│                                        │
//! │  GET  /events/user/my-events                                 │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed ids are reported as "Event not found" rather than as a
//! validation failure.

use utoipa::OpenApi;

mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{EventAction, EventError, Result};
pub use handlers::{EventsState, events_router};
pub use models::{
    CreateEvent, Event, EventCategory, EventEnvelope, EventFilter, EventListResponse,
    EventResponse, EventStatus, ListEventsQuery, MyEventsResponse, Organizer, OrganizerResponse,
    Pagination, UpdateEvent,
};
pub use mongodb::MongoEventRepository;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::{EventService, parse_event_id};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::get_event,
        handlers::create_event,
        handlers::update_event,
        handlers::delete_event,
        handlers::my_events,
    ),
    components(
        schemas(
            EventResponse,
            OrganizerResponse,
            CreateEvent,
            UpdateEvent,
            EventCategory,
            EventStatus,
            Pagination,
            EventListResponse,
            EventEnvelope,
            MyEventsResponse,
            axum_helpers::MessageResponse,
        ),
        responses(
            axum_helpers::errors::responses::BadRequestValidationResponse,
            axum_helpers::errors::responses::UnauthorizedResponse,
            axum_helpers::errors::responses::ForbiddenResponse,
            axum_helpers::errors::responses::NotFoundResponse,
            axum_helpers::errors::responses::InternalServerErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Event listing and organizer-owned event management")
    )
)]
pub struct ApiDoc;
