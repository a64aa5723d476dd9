//! Service behaviour against the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use post_core::PostService;
use post_core::domain::DeletedPost;
use post_infra::InMemoryPostStore;

fn setup() -> (PostService, Arc<InMemoryPostStore>) {
    let store = Arc::new(InMemoryPostStore::new());
    (PostService::new(store.clone()), store)
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (service, _) = setup();
    let cancel = CancellationToken::new();

    let created = service
        .create("Hello".into(), "World".into(), "alice".into(), &cancel)
        .await
        .unwrap();
    let fetched = service.get(&created.id, &cancel).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let (service, _) = setup();
    let cancel = CancellationToken::new();

    let created = service
        .create("Hello".into(), "World".into(), "alice".into(), &cancel)
        .await
        .unwrap();
    assert_eq!(created.title, "Hello");
    assert_eq!(created.content, "World");
    assert_eq!(created.author_id, "alice");

    let updated = service
        .update(
            &created.id,
            "Hi".into(),
            "World2".into(),
            "alice".into(),
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Hi");
    assert_eq!(updated.content, "World2");
    assert_eq!(updated.author_id, "alice");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= updated.created_at);

    let fetched = service.get(&created.id, &cancel).await.unwrap();
    assert_eq!(fetched, updated);

    let deleted = service.delete(&created.id, &cancel).await.unwrap();
    assert_eq!(
        deleted,
        DeletedPost {
            id: created.id.clone(),
            success: true
        }
    );

    let err = service.get(&created.id, &cancel).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_missing_post_does_not_create_it() {
    let (service, store) = setup();

    let err = service
        .update(
            "ghost",
            "t".into(),
            "c".into(),
            "a".into(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_list_by_author_returns_exactly_matching_posts() {
    let (service, _) = setup();
    let cancel = CancellationToken::new();

    let mut alice = HashSet::new();
    for (i, author) in ["alice", "bob", "alice", "carol", "alice", "bob"]
        .into_iter()
        .enumerate()
    {
        let post = service
            .create(format!("post {i}"), "body".into(), author.into(), &cancel)
            .await
            .unwrap();
        if author == "alice" {
            alice.insert(post.id);
        }
    }

    let listed: HashSet<String> = service
        .list_by_author("alice", &cancel)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(listed, alice);

    assert!(service.list_by_author("nobody", &cancel).await.unwrap().is_empty());
    assert_eq!(service.list(&cancel).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_listing_releases_cursors() {
    let (service, store) = setup();
    let cancel = CancellationToken::new();
    service
        .create("t".into(), "c".into(), "alice".into(), &cancel)
        .await
        .unwrap();

    service.list(&cancel).await.unwrap();
    service.list_by_author("alice", &cancel).await.unwrap();

    assert_eq!(store.open_cursors(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_never_collide() {
    let (service, store) = setup();

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(
                        format!("title {i}"),
                        format!("content {i}"),
                        format!("author-{}", i % 4),
                        &CancellationToken::new(),
                    )
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }

    assert_eq!(ids.len(), 64);
    assert_eq!(store.len().await, 64);
}
