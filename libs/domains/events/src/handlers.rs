//! HTTP handlers for events API

use crate::error::{EventError, Result};
use crate::models::{
    CreateEvent, EventEnvelope, EventListResponse, ListEventsQuery, MyEventsResponse, Organizer,
    UpdateEvent,
};
use crate::repository::EventRepository;
use crate::service::{EventService, parse_event_id};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router, middleware};
use axum_helpers::{
    JwtAuth, JwtClaims, MessageResponse, ValidatedJson, ValidatedQuery, jwt_auth_middleware,
};
use tracing::instrument;
use uuid::Uuid;

/// Events router state
pub struct EventsState<R: EventRepository> {
    pub service: EventService<R>,
    pub jwt: JwtAuth,
}

impl<R: EventRepository> Clone for EventsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: EventRepository> EventsState<R> {
    pub fn new(service: EventService<R>, jwt: JwtAuth) -> Self {
        Self { service, jwt }
    }
}

/// Create the events router.
///
/// Reads are public; create, update, delete and `/user/my-events` require a token.
pub fn events_router<R: EventRepository + 'static>(state: EventsState<R>) -> Router {
    let jwt = state.jwt.clone();
    let auth = move || middleware::from_fn_with_state(jwt.clone(), jwt_auth_middleware);

    Router::new()
        .route(
            "/",
            post(create_event::<R>)
                .route_layer(auth())
                .get(list_events::<R>),
        )
        .route(
            "/{id}",
            put(update_event::<R>)
                .delete(delete_event::<R>)
                .route_layer(auth())
                .get(get_event::<R>),
        )
        .route(
            "/user/my-events",
            get(my_events::<R>).route_layer(auth()),
        )
        .with_state(state)
}

/// Token subject as the caller's user id
fn caller_id(claims: &JwtClaims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| EventError::InvalidToken(claims.sub.clone()))
}

/// List events with search, category filter and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Page of events", body = EventListResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
    ValidatedQuery(query): ValidatedQuery<ListEventsQuery>,
) -> Result<Json<EventListResponse>> {
    let (events, pagination) = state.service.list_events(query).await?;
    Ok(Json(EventListResponse {
        success: true,
        events,
        pagination,
    }))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventEnvelope),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<EventEnvelope>> {
    let event = state.service.get_event(parse_event_id(&id)?).await?;
    Ok(Json(EventEnvelope {
        success: true,
        message: None,
        event,
    }))
}

/// Create a new event organized by the caller
#[utoipa::path(
    post,
    path = "",
    tag = "events",
    request_body = CreateEvent,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Event created successfully", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 401, response = axum_helpers::errors::responses::UnauthorizedResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state, claims, input), fields(user_id = %claims.sub))]
pub async fn create_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> Result<impl IntoResponse> {
    let organizer = Organizer {
        id: caller_id(&claims)?,
        name: claims.name,
        email: claims.email,
    };

    let event = state.service.create_event(input, organizer).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventEnvelope {
            success: true,
            message: Some("Event created successfully".to_string()),
            event,
        }),
    ))
}

/// Update an event (organizer only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated successfully", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 401, response = axum_helpers::errors::responses::UnauthorizedResponse),
        (status = 403, response = axum_helpers::errors::responses::ForbiddenResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state, claims, input), fields(user_id = %claims.sub))]
pub async fn update_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Extension(claims): Extension<JwtClaims>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> Result<Json<EventEnvelope>> {
    let id = parse_event_id(&id)?;
    let event = state
        .service
        .update_event(id, caller_id(&claims)?, input)
        .await?;

    Ok(Json(EventEnvelope {
        success: true,
        message: Some("Event updated successfully".to_string()),
        event,
    }))
}

/// Delete an event (organizer only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 401, response = axum_helpers::errors::responses::UnauthorizedResponse),
        (status = 403, response = axum_helpers::errors::responses::ForbiddenResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn delete_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Extension(claims): Extension<JwtClaims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_event_id(&id)?;
    state.service.delete_event(id, caller_id(&claims)?).await?;
    Ok(Json(MessageResponse::ok("Event deleted successfully")))
}

/// Events organized by the caller
#[utoipa::path(
    get,
    path = "/user/my-events",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's events, soonest first", body = MyEventsResponse),
        (status = 401, response = axum_helpers::errors::responses::UnauthorizedResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
#[instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn my_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<MyEventsResponse>> {
    let events = state.service.my_events(caller_id(&claims)?).await?;
    Ok(Json(MyEventsResponse {
        success: true,
        events,
    }))
}
