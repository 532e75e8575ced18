//! Event service layer

use crate::error::{EventAction, EventError, Result};
use crate::models::{
    CreateEvent, Event, EventFilter, EventResponse, ListEventsQuery, Organizer, Pagination,
    UpdateEvent,
};
use crate::repository::EventRepository;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Event business logic: listing, pagination and organizer-only writes
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Parse a path id; anything that is not a UUID is reported as not found.
pub fn parse_event_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| EventError::NotFound(id.to_string()))
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of events and its pagination block
    #[instrument(skip(self))]
    pub async fn list_events(
        &self,
        query: ListEventsQuery,
    ) -> Result<(Vec<EventResponse>, Pagination)> {
        query.validate()?;

        let filter = query.to_filter();
        let (events, total) = tokio::try_join!(
            self.repository.list(&filter),
            self.repository.count(&filter)
        )?;

        let pagination = Pagination::new(query.page, query.limit, total);
        Ok((events.into_iter().map(Into::into).collect(), pagination))
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: Uuid) -> Result<EventResponse> {
        Ok(self.find(id).await?.into())
    }

    #[instrument(skip(self, input, organizer), fields(organizer_id = %organizer.id))]
    pub async fn create_event(
        &self,
        input: CreateEvent,
        organizer: Organizer,
    ) -> Result<EventResponse> {
        input.validate()?;

        let date = input.date.clone();
        let event = Event::new(input, organizer).ok_or(EventError::InvalidDate(date))?;

        let event = self.repository.create(event).await?;
        info!(event_id = %event.id, "Event created");
        Ok(event.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_event(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateEvent,
    ) -> Result<EventResponse> {
        input.validate()?;

        let mut event = self.find(id).await?;
        ensure_organizer(&event, user_id, EventAction::Update)?;

        let date = input.date.clone().unwrap_or_default();
        event
            .apply_update(input)
            .ok_or(EventError::InvalidDate(date))?;

        let event = self.repository.update(event).await?;
        info!(event_id = %event.id, "Event updated");
        Ok(event.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let event = self.find(id).await?;
        ensure_organizer(&event, user_id, EventAction::Delete)?;

        if !self.repository.delete(&id).await? {
            return Err(EventError::NotFound(id.to_string()));
        }

        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Every event organized by `user_id`, soonest first
    #[instrument(skip(self))]
    pub async fn my_events(&self, user_id: Uuid) -> Result<Vec<EventResponse>> {
        let events = self
            .repository
            .list(&EventFilter::by_organizer(user_id))
            .await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Event> {
        self.repository
            .get_by_id(&id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }
}

fn ensure_organizer(event: &Event, user_id: Uuid, action: EventAction) -> Result<()> {
    if event.is_organized_by(user_id) {
        return Ok(());
    }

    tracing::warn!(event_id = %event.id, user_id = %user_id, %action, "Rejected non-organizer");
    Err(EventError::Forbidden {
        action,
        event_id: event.id.to_string(),
        user_id: user_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use crate::repository::{InMemoryEventRepository, mock::MockEventRepository};
    use chrono::{Duration, Utc};

    fn organizer(id: Uuid) -> Organizer {
        Organizer {
            id,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    fn input(title: &str, days: i64) -> CreateEvent {
        CreateEvent {
            title: title.into(),
            description: "A perfectly ordinary event".into(),
            date: (Utc::now() + Duration::days(days)).to_rfc3339(),
            time: "19:00".into(),
            location: "Porto".into(),
            category: "Networking".into(),
            max_attendees: Some(10),
            price: Some(5.0),
            status: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_parse_event_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_event_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_event_id("abc"), Err(EventError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_sets_organizer() {
        let service = EventService::new(InMemoryEventRepository::new());
        let owner = Uuid::now_v7();

        let event = service
            .create_event(input("Founders Drinks", 5), organizer(owner))
            .await
            .unwrap();

        assert_eq!(event.organizer.id, owner);
        assert_eq!(event.category, EventCategory::Networking);
        assert_eq!(event.spots_remaining, Some(10));
    }

    #[tokio::test]
    async fn test_create_rejects_past_date() {
        let service = EventService::new(InMemoryEventRepository::new());
        let result = service
            .create_event(input("Yesterday", -1), organizer(Uuid::now_v7()))
            .await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_organizer() {
        let service = EventService::new(InMemoryEventRepository::new());
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let event = service
            .create_event(input("Founders Drinks", 5), organizer(owner))
            .await
            .unwrap();

        let update = UpdateEvent {
            title: Some("Hijacked".into()),
            ..Default::default()
        };
        let result = service.update_event(event.id, stranger, update.clone()).await;
        assert!(matches!(
            result,
            Err(EventError::Forbidden { action: EventAction::Update, .. })
        ));

        let result = service.delete_event(event.id, stranger).await;
        assert!(matches!(
            result,
            Err(EventError::Forbidden { action: EventAction::Delete, .. })
        ));

        let updated = service.update_event(event.id, owner, update).await.unwrap();
        assert_eq!(updated.title, "Hijacked");

        service.delete_event(event.id, owner).await.unwrap();
        assert!(matches!(
            service.get_event(event.id).await,
            Err(EventError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let service = EventService::new(InMemoryEventRepository::new());
        let owner = Uuid::now_v7();
        for day in 1..=5 {
            service
                .create_event(input(&format!("Event {}", day), day), organizer(owner))
                .await
                .unwrap();
        }

        let query = ListEventsQuery {
            page: 2,
            limit: 2,
            ..Default::default()
        };
        let (events, pagination) = service.list_events(query).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Event 3");
        assert_eq!(pagination, Pagination { current: 2, pages: 3, total: 5 });
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_query_before_repository() {
        let mut mock = MockEventRepository::new();
        mock.expect_list().never();
        mock.expect_count().never();

        let service = EventService::new(mock);
        let query = ListEventsQuery {
            limit: 500,
            ..Default::default()
        };
        assert!(matches!(
            service.list_events(query).await,
            Err(EventError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_my_events_filters_by_organizer() {
        let mut mock = MockEventRepository::new();
        let owner = Uuid::now_v7();
        mock.expect_list()
            .withf(move |filter| filter.organizer == Some(owner) && filter.limit.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = EventService::new(mock);
        assert!(service.my_events(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut mock = MockEventRepository::new();
        mock.expect_get_by_id()
            .returning(|_| Err(EventError::Database("connection reset".into())));

        let service = EventService::new(mock);
        assert!(matches!(
            service.get_event(Uuid::now_v7()).await,
            Err(EventError::Database(_))
        ));
    }
}
