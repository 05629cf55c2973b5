mod support;

use access_rust::{
    AccessError, Accessor, Cancellation, Entity, InMemoryStore, Specification, StoreConfig,
    StreamAccessor,
};
use futures::StreamExt;
use support::{backlog, store_with, t0, ticket_at, titles, Ticket};

fn urgent() -> Specification<Entity<Ticket>> {
    Specification::named("urgent", |e: &Entity<Ticket>| e.value().priority <= 2)
}

#[tokio::test]
async fn get_all_matching_returns_exact_subset() {
    let store = store_with(backlog()).await;
    let cancel = Cancellation::new();

    let matched = store
        .get_all_matching(|e: &Entity<Ticket>| e.value().priority <= 2, &cancel)
        .await
        .unwrap();
    assert_eq!(
        titles(&matched),
        vec!["login broken", "export times out", "slow search"]
    );

    let all = store.get_all(&cancel).await.unwrap();
    let expected: Vec<_> = all
        .into_iter()
        .filter(|e| e.value().priority <= 2)
        .collect();
    assert_eq!(matched, expected);
}

#[tokio::test]
async fn created_after_cutoff() {
    let store = store_with(vec![
        ticket_at("acme", -1, "before", 3),
        ticket_at("acme", 0, "at", 3),
        ticket_at("acme", 1, "after", 3),
    ])
    .await;

    let cutoff = t0();
    let matched = store
        .get_all_matching(
            move |e: &Entity<Ticket>| e.key().created_at() > cutoff,
            &Cancellation::new(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&matched), vec!["after"]);
}

#[tokio::test]
async fn composed_specification_with_ordering_and_paging() {
    let store = store_with(backlog()).await;
    let not_search = Specification::named("not-search", |e: &Entity<Ticket>| {
        !e.value().title.contains("search")
    });

    let spec = urgent()
        .and(&not_search)
        .ordered_by(|a: &Entity<Ticket>, b: &Entity<Ticket>| {
            b.value().priority.cmp(&a.value().priority)
        })
        .paged(0, Some(1));

    let page = store
        .get_all_satisfying(&spec, &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["export times out"]);
}

#[tokio::test]
async fn negated_conjunction_matches_disjunction_of_negations() {
    let store = store_with(backlog()).await;
    let cancel = Cancellation::new();
    let recent = Specification::named("recent", |e: &Entity<Ticket>| {
        e.key().created_at() >= t0() + chrono::Duration::seconds(2)
    });

    let left = store
        .get_all_satisfying(&urgent().and(&recent).not(), &cancel)
        .await
        .unwrap();
    let right = store
        .get_all_satisfying(&urgent().not().or(&recent.not()), &cancel)
        .await
        .unwrap();
    assert_eq!(left, right);
    assert_eq!(
        titles(&left),
        vec!["login broken", "typo on pricing page", "dark mode"]
    );
}

#[tokio::test]
async fn stream_matches_materialized_read() {
    let store = store_with(backlog()).await;
    let listed = store
        .get_all_satisfying(&urgent(), &Cancellation::new())
        .await
        .unwrap();

    let streamed: Vec<Entity<Ticket>> = store
        .stream_satisfying(urgent(), Cancellation::new())
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(streamed, listed);
}

#[tokio::test]
async fn each_stream_has_its_own_cursor() {
    let store = store_with(backlog()).await;
    let mut first = store.stream_all(Cancellation::new()).unwrap();
    let mut second = store.stream_all(Cancellation::new()).unwrap();

    first.next().await;
    first.next().await;
    let head = second.next().await.unwrap().unwrap();
    assert_eq!(head.value().title, "login broken");
}

#[tokio::test]
async fn cancelling_a_stream_mid_sequence() {
    let store = store_with(backlog()).await;
    let cancel = Cancellation::new();
    let mut stream = store.stream_all(cancel.clone()).unwrap();

    let first = stream.next().await.unwrap().unwrap();
    let second = stream.next().await.unwrap().unwrap();
    cancel.cancel();

    assert_eq!(stream.next().await, Some(Err(AccessError::Cancelled)));
    assert!(stream.next().await.is_none());
    assert_eq!(first.value().title, "login broken");
    assert_eq!(second.value().title, "typo on pricing page");
}

#[tokio::test]
async fn closed_store_is_unavailable() {
    let store = store_with(backlog()).await;
    store.close().unwrap();
    let cancel = Cancellation::new();

    assert!(matches!(
        store.get_all(&cancel).await,
        Err(AccessError::Unavailable(_))
    ));
    let mut stream = store.stream_all(cancel).unwrap();
    assert!(matches!(
        stream.next().await,
        Some(Err(AccessError::Unavailable(_)))
    ));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn specification_deeper_than_limit_is_refused() {
    let store = InMemoryStore::<Ticket>::with_config(StoreConfig {
        max_specification_depth: 2,
        ..StoreConfig::default()
    });
    let spec = urgent().not().not();

    let err = store
        .get_all_satisfying(&spec, &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::UnsupportedSpecification {
            depth: 3,
            max_depth: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn concurrent_readers_see_the_same_rows() {
    let store = store_with(backlog()).await;
    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.get_all(&Cancellation::new()).await.map(|all| all.len())
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(5));
    }
}
