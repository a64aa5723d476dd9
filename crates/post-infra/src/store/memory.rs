//! In-memory post store - used when no document store is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use futures::{StreamExt, stream};
use tokio::sync::RwLock;

use post_core::domain::{Post, PostChanges};
use post_core::error::StoreError;
use post_core::ports::{PostCursor, PostFilter, PostStore, UpdateOutcome};

/// In-memory post store using a HashMap keyed by post id with async RwLock.
///
/// Timestamps are truncated to milliseconds on write, the precision a
/// document store keeps for datetimes.
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<String, Post>>,
    open_cursors: Arc<AtomicUsize>,
}

/// Keeps the open-cursor count while a cursor is alive.
struct CursorGuard(Arc<AtomicUsize>);

impl CursorGuard {
    fn open(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of cursors handed out by `find_many` that are still alive.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
        ts.trunc_subsecs(3)
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert_one(&self, post: &Post) -> Result<String, StoreError> {
        let mut posts = self.posts.write().await;

        if posts.contains_key(&post.id) {
            return Err(StoreError::Conflict(format!("duplicate key: {}", post.id)));
        }

        let mut record = post.clone();
        record.created_at = Self::normalize(record.created_at);
        record.updated_at = Self::normalize(record.updated_at);
        posts.insert(record.id.clone(), record);

        Ok(post.id.clone())
    }

    async fn find_one(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.get(id).cloned())
    }

    async fn find_many(&self, filter: PostFilter) -> Result<PostCursor, StoreError> {
        // Snapshot under the read lock so the cursor holds no lock while iterated
        let matching: Vec<Post> = {
            let posts = self.posts.read().await;
            posts
                .values()
                .filter(|post| filter.matches(post))
                .cloned()
                .collect()
        };

        let guard = CursorGuard::open(&self.open_cursors);
        tracing::debug!(count = matching.len(), "Opened in-memory cursor");

        Ok(stream::iter(matching)
            .map(move |post| {
                let _open = &guard;
                Ok(post)
            })
            .boxed())
    }

    async fn update_one(
        &self,
        id: &str,
        mut changes: PostChanges,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut posts = self.posts.write().await;

        let Some(post) = posts.get_mut(id) else {
            return Ok(UpdateOutcome::default());
        };

        changes.updated_at = Self::normalize(changes.updated_at);
        let modified = post.title != changes.title
            || post.content != changes.content
            || post.author_id != changes.author_id
            || post.updated_at != changes.updated_at;
        post.apply(changes);

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let mut posts = self.posts.write().await;
        Ok(u64::from(posts.remove(id).is_some()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;

    fn post(author: &str) -> Post {
        Post::new("Title".into(), "Body".into(), author.into())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryPostStore::new();
        let post = post("alice");

        let id = store.insert_one(&post).await.unwrap();
        let found = store.find_one(&id).await.unwrap().unwrap();

        assert_eq!(found.id, post.id);
        assert_eq!(found.title, "Title");
        assert_eq!(found.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_conflicts() {
        let store = InMemoryPostStore::new();
        let post = post("alice");

        store.insert_one(&post).await.unwrap();
        let err = store.insert_one(&post).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_matches_nothing() {
        let store = InMemoryPostStore::new();

        let outcome = store
            .update_one(
                "missing",
                PostChanges::new("t".into(), "c".into(), "a".into()),
            )
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = InMemoryPostStore::new();
        let post = post("alice");
        store.insert_one(&post).await.unwrap();
        let before = store.find_one(&post.id).await.unwrap().unwrap();

        let outcome = store
            .update_one(
                &post.id,
                PostChanges::new("New".into(), "Body".into(), "bob".into()),
            )
            .await
            .unwrap();

        let after = store.find_one(&post.id).await.unwrap().unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.title, "New");
        assert_eq!(after.author_id, "bob");
    }

    #[tokio::test]
    async fn test_delete_counts_removed() {
        let store = InMemoryPostStore::new();
        let post = post("alice");
        store.insert_one(&post).await.unwrap();

        assert_eq!(store.delete_one(&post.id).await.unwrap(), 1);
        assert_eq!(store.delete_one(&post.id).await.unwrap(), 0);
        assert!(store.find_one(&post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_many_filters_by_author() {
        let store = InMemoryPostStore::new();
        for author in ["alice", "bob", "alice"] {
            store.insert_one(&post(author)).await.unwrap();
        }

        let cursor = store
            .find_many(PostFilter::Author("alice".into()))
            .await
            .unwrap();
        let posts: Vec<Post> = cursor.try_collect().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.author_id == "alice"));
    }

    #[tokio::test]
    async fn test_cursor_released_on_drop() {
        let store = InMemoryPostStore::new();
        store.insert_one(&post("alice")).await.unwrap();

        let cursor = store.find_many(PostFilter::All).await.unwrap();
        assert_eq!(store.open_cursors(), 1);

        drop(cursor);
        assert_eq!(store.open_cursors(), 0);
    }
}
