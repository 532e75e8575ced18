//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Event, EventFilter};
use crate::repository::EventRepository;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use tracing::instrument;
use uuid::Uuid;

pub const EVENTS_COLLECTION: &str = "events";

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(EVENTS_COLLECTION),
        }
    }

    /// Create indexes for search, date ordering and the per-organizer listing
    pub async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            // Full-text search
            IndexModel::builder()
                .keys(doc! { "title": "text", "description": "text", "location": "text" })
                .options(IndexOptions::builder().name("events_text".to_string()).build())
                .build(),
            IndexModel::builder().keys(doc! { "date": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "organizer._id": 1, "date": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    /// Build filter document from EventFilter
    fn build_filter(filter: &EventFilter) -> Document {
        let mut doc = Document::new();

        if let Some(search) = &filter.search {
            doc.insert("$text", doc! { "$search": search });
        }

        if let Some(category) = &filter.category {
            doc.insert("category", category.as_str());
        }

        if let Some(organizer) = filter.organizer {
            doc.insert("organizer._id", bson::Uuid::from(organizer));
        }

        doc
    }

    fn id_filter(id: &Uuid) -> Document {
        doc! { "_id": bson::Uuid::from(*id) }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: Event) -> Result<Event> {
        self.collection.insert_one(&event).await?;
        tracing::info!("Event stored in MongoDB");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Event>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut options = FindOptions::builder()
            .sort(doc! { "date": 1, "_id": 1 })
            .skip(filter.offset)
            .build();
        options.limit = filter.limit;

        let cursor = self
            .collection
            .find(Self::build_filter(filter))
            .with_options(options)
            .await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: Event) -> Result<Event> {
        let result = self
            .collection
            .replace_one(Self::id_filter(&event.id), &event)
            .await?;

        if result.matched_count == 0 {
            return Err(EventError::NotFound(event.id.to_string()));
        }

        tracing::info!("Event updated in MongoDB");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
