//! Event repository trait and the in-memory implementation

use crate::error::{EventError, Result};
use crate::models::{Event, EventFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository trait for event storage operations
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event
    async fn create(&self, event: Event) -> Result<Event>;

    /// Get event by ID
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Event>>;

    /// List matching events sorted by date ascending, paginated by the filter
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    /// Count events matching filter (ignores pagination)
    async fn count(&self, filter: &EventFilter) -> Result<u64>;

    /// Replace an existing event
    async fn update(&self, event: Event) -> Result<Event>;

    /// Delete event by ID
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}

/// In-memory implementation (for development/testing).
///
/// `search` is a case-insensitive substring match over title, description and location.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(event: &Event, filter: &EventFilter) -> bool {
        if let Some(ref category) = filter.category {
            if event.category.to_string() != *category {
                return false;
            }
        }
        if let Some(organizer) = filter.organizer {
            if event.organizer.id != organizer {
                return false;
            }
        }
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            let hit = [&event.title, &event.description, &event.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> Result<Event> {
        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());

        tracing::info!(event_id = %event.id, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.events.read().await;

        let mut result: Vec<Event> = events
            .values()
            .filter(|e| Self::matches(e, filter))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let page = result.into_iter().skip(filter.offset as usize);
        Ok(match filter.limit {
            Some(limit) => page.take(limit.max(0) as usize).collect(),
            None => page.collect(),
        })
    }

    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let events = self.events.read().await;
        Ok(events.values().filter(|e| Self::matches(e, filter)).count() as u64)
    }

    async fn update(&self, event: Event) -> Result<Event> {
        let mut events = self.events.write().await;

        if !events.contains_key(&event.id) {
            return Err(EventError::NotFound(event.id.to_string()));
        }

        events.insert(event.id, event.clone());
        tracing::info!(event_id = %event.id, "Updated event");
        Ok(event)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut events = self.events.write().await;

        if events.remove(id).is_some() {
            tracing::info!(event_id = %id, "Deleted event");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
