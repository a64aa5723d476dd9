//! MongoDB post store.

use std::time::Duration;

use async_trait::async_trait;
use bson::{Bson, doc};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use post_core::domain::{Post, PostChanges};
use post_core::error::StoreError;
use post_core::ports::{PostCursor, PostFilter, PostStore, UpdateOutcome};

use super::MongoConfig;

/// Stored shape of a post. `_id` is the post id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    content: String,
    author_id: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            content: doc.content,
            author_id: doc.author_id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// `$set` document for an update. Only the mutable fields are written.
fn set_changes(changes: &PostChanges) -> bson::Document {
    doc! {
        "$set": {
            "title": changes.title.as_str(),
            "content": changes.content.as_str(),
            "author_id": changes.author_id.as_str(),
            "updated_at": bson::DateTime::from_chrono(changes.updated_at),
        }
    }
}

fn filter_document(filter: &PostFilter) -> bson::Document {
    match filter {
        PostFilter::All => doc! {},
        PostFilter::Author(author_id) => doc! { "author_id": author_id.as_str() },
    }
}

fn map_error(err: MongoError) -> StoreError {
    match *err.kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::Connection(err.to_string()),
        ErrorKind::BsonDeserialization(_) => StoreError::Decode(err.to_string()),
        ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref write))
            if write.code == 11000 =>
        {
            StoreError::Conflict(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

/// Post store backed by a single MongoDB collection.
pub struct MongoPostStore {
    db: Database,
    posts: Collection<PostDocument>,
}

impl MongoPostStore {
    /// Connect with the given configuration.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        tracing::info!("Initializing MongoDB connection...");

        let mut options = ClientOptions::parse(config.url.as_str()).await.map_err(map_error)?;
        options.max_pool_size = Some(config.max_pool_size);
        // Timeouts given in the connection string win
        options.connect_timeout.get_or_insert(Duration::from_secs(10));
        options
            .server_selection_timeout
            .get_or_insert(Duration::from_secs(10));
        if options.app_name.is_none() {
            options.app_name = config.app_name.clone();
        }

        let client = Client::with_options(options).map_err(map_error)?;
        let store = Self::new(&client, &config.database, &config.collection);

        // The driver connects lazily; reach the server before reporting success
        store.ping().await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB connected (pool: {})",
            config.max_pool_size
        );

        Ok(store)
    }

    /// Build a store over an existing client handle.
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        let db = client.database(database);
        let posts = db.collection::<PostDocument>(collection);
        Self { db, posts }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert_one(&self, post: &Post) -> Result<String, StoreError> {
        let result = self
            .posts
            .insert_one(PostDocument::from(post))
            .await
            .map_err(map_error)?;

        match result.inserted_id {
            Bson::String(id) => Ok(id),
            other => Err(StoreError::Decode(format!(
                "unexpected inserted id type: {other}"
            ))),
        }
    }

    async fn find_one(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let found = self
            .posts
            .find_one(doc! { "_id": id })
            .await
            .map_err(map_error)?;

        Ok(found.map(Into::into))
    }

    async fn find_many(&self, filter: PostFilter) -> Result<PostCursor, StoreError> {
        tracing::debug!(?filter, "Opening post cursor");

        let cursor = self
            .posts
            .find(filter_document(&filter))
            .await
            .map_err(map_error)?;

        // The driver kills the server-side cursor when this stream is dropped
        Ok(cursor.map_ok(Post::from).map_err(map_error).boxed())
    }

    async fn update_one(&self, id: &str, changes: PostChanges) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .posts
            .update_one(doc! { "_id": id }, set_changes(&changes))
            .await
            .map_err(map_error)?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let result = self
            .posts
            .delete_one(doc! { "_id": id })
            .await
            .map_err(map_error)?;

        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_error)?;
        Ok(())
    }
}
