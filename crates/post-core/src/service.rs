//! Post service - maps each remote operation onto store calls.

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::domain::{DeletedPost, Post, PostChanges};
use crate::error::{Operation, ServiceError, StoreError};
use crate::ports::{PostFilter, PostStore};

/// Request handling layer for posts.
///
/// Holds no state besides the store handle; every call is a single
/// request/response exchange. Each operation takes the caller's cancellation
/// token and aborts the in-flight store call when it fires.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Mint a new post, persist it and return the stored record.
    ///
    /// A failed confirmation read does not undo the insert.
    #[tracing::instrument(name = "post.create", skip_all, fields(author_id = %author_id))]
    pub async fn create(
        &self,
        title: String,
        content: String,
        author_id: String,
        cancel: &CancellationToken,
    ) -> Result<Post, ServiceError> {
        let operation = Operation::Create;
        cancellable(operation, cancel, async {
            let post = Post::new(title, content, author_id);
            let id = self
                .store
                .insert_one(&post)
                .await
                .map_err(|e| ServiceError::persistence(operation, Some(&post.id), e))?;

            tracing::debug!(post_id = %id, "Post inserted");
            self.read(operation, &id).await
        })
        .await
    }

    #[tracing::instrument(name = "post.get", skip(self, cancel))]
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<Post, ServiceError> {
        cancellable(Operation::Get, cancel, self.read(Operation::Get, id)).await
    }

    /// Overwrite title, content and author of a post, then return the stored record.
    ///
    /// The write is issued without checking the post exists; a missing post
    /// surfaces as `NotFound` from the confirmation read.
    #[tracing::instrument(name = "post.update", skip(self, title, content, cancel))]
    pub async fn update(
        &self,
        id: &str,
        title: String,
        content: String,
        author_id: String,
        cancel: &CancellationToken,
    ) -> Result<Post, ServiceError> {
        let operation = Operation::Update;
        cancellable(operation, cancel, async {
            let changes = PostChanges::new(title, content, author_id);
            let outcome = self
                .store
                .update_one(id, changes)
                .await
                .map_err(|e| ServiceError::persistence(operation, Some(id), e))?;

            if outcome.matched == 0 {
                tracing::debug!("Update matched no post");
            }

            self.read(operation, id).await
        })
        .await
    }

    /// Remove a post. Succeeds even when nothing matched.
    #[tracing::instrument(name = "post.delete", skip(self, cancel))]
    pub async fn delete(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<DeletedPost, ServiceError> {
        let operation = Operation::Delete;
        cancellable(operation, cancel, async {
            let deleted = self
                .store
                .delete_one(id)
                .await
                .map_err(|e| ServiceError::persistence(operation, Some(id), e))?;

            tracing::debug!(deleted, "Delete completed");

            Ok(DeletedPost {
                id: id.to_owned(),
                success: true,
            })
        })
        .await
    }

    #[tracing::instrument(name = "post.list", skip_all)]
    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<Post>, ServiceError> {
        cancellable(
            Operation::List,
            cancel,
            self.drain(Operation::List, None, PostFilter::All),
        )
        .await
    }

    #[tracing::instrument(name = "post.list_by_author", skip(self, cancel))]
    pub async fn list_by_author(
        &self,
        author_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, ServiceError> {
        cancellable(
            Operation::ListByAuthor,
            cancel,
            self.drain(
                Operation::ListByAuthor,
                Some(author_id),
                PostFilter::Author(author_id.to_owned()),
            ),
        )
        .await
    }

    /// Readiness check against the backing store.
    pub async fn ready(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    async fn read(&self, operation: Operation, id: &str) -> Result<Post, ServiceError> {
        self.store
            .find_one(id)
            .await
            .map_err(|e| ServiceError::persistence(operation, Some(id), e))?
            .ok_or_else(|| ServiceError::NotFound {
                operation,
                id: id.to_owned(),
            })
    }

    // The cursor is dropped, and with it the store-side cursor, on every
    // return path including the early one.
    async fn drain(
        &self,
        operation: Operation,
        subject: Option<&str>,
        filter: PostFilter,
    ) -> Result<Vec<Post>, ServiceError> {
        let mut cursor = self
            .store
            .find_many(filter)
            .await
            .map_err(|e| ServiceError::persistence(operation, subject, e))?;

        let mut posts = Vec::new();
        while let Some(item) = cursor.next().await {
            posts.push(item.map_err(|e| ServiceError::persistence(operation, subject, e))?);
        }

        tracing::debug!(count = posts.len(), "Cursor drained");
        Ok(posts)
    }
}

/// Race the operation against the caller's cancellation token.
///
/// Losing the race drops the operation future, which aborts the store call.
async fn cancellable<T, F>(
    operation: Operation,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(%operation, "Operation cancelled");
            Err(ServiceError::Cancelled { operation })
        }
        result = fut => result,
    }
}
