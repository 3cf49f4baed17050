mod common;

use std::sync::Arc;

use common::scripted::{items, Reply, Scripted, ScriptedSource};
use storefront::catalog::{ListController, ListPhase, LoadOutcome};
use tokio::sync::oneshot;

fn controller() -> ListController<ScriptedSource> {
    ListController::new(ScriptedSource::new())
}

#[tokio::test]
async fn test_full_page_then_short_page() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Items(items(15, 3)));

    assert_eq!(c.load_first_page("q".into()).await, LoadOutcome::Loaded { count: 15 });
    let state = c.snapshot();
    assert!(state.has_more);
    assert_eq!(state.next_page, 2);
    assert!(state.initial_load_completed);

    assert_eq!(c.load_next_page().await, LoadOutcome::Loaded { count: 3 });
    let state = c.snapshot();
    assert_eq!(state.items.len(), 18);
    assert!(!state.has_more);
    assert_eq!(state.phase, ListPhase::Loaded);

    assert_eq!(c.source().calls(), vec![("q".to_string(), 1), ("q".to_string(), 2)]);
}

#[tokio::test]
async fn test_k_full_pages_accumulate() {
    let c = ListController::with_page_size(ScriptedSource::new(), 4);
    for k in 0..5 {
        c.source().reply(Reply::Items(items(k * 4, 4)));
    }

    c.load_first_page("q".into()).await;
    for _ in 1..5 {
        assert_eq!(c.load_next_page().await, LoadOutcome::Loaded { count: 4 });
    }

    let state = c.snapshot();
    assert_eq!(state.items, items(0, 20));
    assert!(state.has_more);
    assert_eq!(state.next_page, 6);
}

#[tokio::test]
async fn test_next_page_is_noop_once_exhausted() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 3)));
    c.load_first_page("q".into()).await;

    let before = c.snapshot();
    assert_eq!(c.load_next_page().await, LoadOutcome::Skipped);
    assert_eq!(c.load_next_page().await, LoadOutcome::Skipped);
    assert_eq!(c.snapshot(), before);
    assert_eq!(c.source().calls().len(), 1);
}

#[tokio::test]
async fn test_empty_next_page_exhausts() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Items(vec![]));
    c.load_first_page("q".into()).await;

    assert_eq!(c.load_next_page().await, LoadOutcome::Empty);
    let state = c.snapshot();
    assert_eq!(state.items.len(), 15);
    assert_eq!(state.next_page, 2);
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_next_page_before_any_load_is_skipped() {
    let c = controller();
    assert_eq!(c.load_next_page().await, LoadOutcome::Skipped);
    assert!(c.source().calls().is_empty());
}

#[tokio::test]
async fn test_next_page_is_noop_while_loading() {
    let c = Arc::new(controller());
    c.source().reply(Reply::Items(items(0, 15)));
    c.load_first_page("q".into()).await;

    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    c.source()
        .push(Scripted::gated(Reply::Items(items(15, 15)), started_tx, release_rx));

    let background = {
        let c = c.clone();
        tokio::spawn(async move { c.load_next_page().await })
    };
    started_rx.await.unwrap();

    assert!(c.snapshot().is_loading_more());
    assert_eq!(c.load_next_page().await, LoadOutcome::Skipped);
    assert_eq!(c.source().calls().len(), 2);

    release_tx.send(()).unwrap();
    assert_eq!(background.await.unwrap(), LoadOutcome::Loaded { count: 15 });
    assert_eq!(c.snapshot().items.len(), 30);
}

#[tokio::test]
async fn test_refresh_with_same_query_replaces() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Items(items(15, 2)));
    c.source().reply(Reply::Items(items(100, 15)));

    c.load_first_page("q".into()).await;
    c.load_next_page().await;
    assert!(!c.snapshot().has_more);

    assert_eq!(c.refresh("q".into()).await, LoadOutcome::Loaded { count: 15 });
    let state = c.snapshot();
    assert_eq!(state.items, items(100, 15));
    assert_eq!(state.next_page, 2);
    assert!(state.has_more);
    assert_eq!(state.phase, ListPhase::Loaded);
}

#[tokio::test]
async fn test_refresh_current_reuses_query() {
    let c = controller();
    assert_eq!(c.refresh_current().await, LoadOutcome::Skipped);

    c.source().reply(Reply::Items(items(0, 2)));
    c.source().reply(Reply::Items(items(0, 3)));
    c.load_first_page("shoes".into()).await;
    c.refresh_current().await;

    assert_eq!(
        c.source().calls(),
        vec![("shoes".to_string(), 1), ("shoes".to_string(), 1)]
    );
    assert_eq!(c.snapshot().items.len(), 3);
}

#[tokio::test]
async fn test_query_change_resets_pagination() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Items(items(15, 15)));
    c.source().reply(Reply::Items(items(500, 4)));

    c.load_first_page("a".into()).await;
    c.load_next_page().await;
    assert_eq!(c.snapshot().next_page, 3);

    assert_eq!(c.apply_query("b".into()).await, LoadOutcome::Loaded { count: 4 });
    let state = c.snapshot();
    assert_eq!(state.items, items(500, 4));
    assert_eq!(state.next_page, 2);
    assert_eq!(state.query.as_deref(), Some("b"));
    assert_eq!(c.source().calls().last(), Some(&("b".to_string(), 1)));
}

#[tokio::test]
async fn test_reapplying_current_query_does_nothing() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 5)));
    c.apply_query("a".into()).await;

    assert_eq!(c.apply_query("a".into()).await, LoadOutcome::Skipped);
    assert_eq!(c.source().calls().len(), 1);
}

#[tokio::test]
async fn test_first_page_failure_completes_initial_load() {
    let c = controller();
    c.source().reply(Reply::Fail("offline"));

    let outcome = c.load_first_page("q".into()).await;
    assert!(matches!(outcome, LoadOutcome::Failed { ref message } if message.contains("offline")));

    let state = c.snapshot();
    assert!(state.initial_load_completed);
    assert!(!state.phase.is_loading());
    assert!(state.items.is_empty());
    assert!(state.is_empty_result());
    assert!(state.last_error.as_deref().unwrap().contains("offline"));
}

#[tokio::test]
async fn test_next_page_failure_keeps_state() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Fail("502"));
    c.source().reply(Reply::Items(items(15, 15)));
    c.load_first_page("q".into()).await;

    assert!(matches!(c.load_next_page().await, LoadOutcome::Failed { .. }));
    let state = c.snapshot();
    assert_eq!(state.items.len(), 15);
    assert_eq!(state.next_page, 2);
    assert!(state.has_more);
    assert!(!state.is_loading_more());

    // Scrolling again retries the same page.
    assert_eq!(c.load_next_page().await, LoadOutcome::Loaded { count: 15 });
    assert_eq!(c.source().calls()[2], ("q".to_string(), 2));
}

#[tokio::test]
async fn test_stale_first_page_is_discarded() {
    let c = Arc::new(controller());
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    c.source()
        .push(Scripted::gated(Reply::Items(items(0, 15)), started_tx, release_rx));
    c.source().reply(Reply::Items(items(100, 3)));

    let old = {
        let c = c.clone();
        tokio::spawn(async move { c.load_first_page("old".into()).await })
    };
    started_rx.await.unwrap();

    assert_eq!(c.load_first_page("new".into()).await, LoadOutcome::Loaded { count: 3 });
    let current = c.snapshot();

    release_tx.send(()).unwrap();
    assert_eq!(old.await.unwrap(), LoadOutcome::Stale);

    assert_eq!(c.snapshot(), current);
    assert_eq!(current.items, items(100, 3));
    assert_eq!(current.query.as_deref(), Some("new"));
    assert!(!current.has_more);
}

#[tokio::test]
async fn test_stale_append_after_refresh_is_discarded() {
    let c = Arc::new(controller());
    c.source().reply(Reply::Items(items(0, 15)));
    c.load_first_page("q".into()).await;

    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    c.source()
        .push(Scripted::gated(Reply::Items(items(15, 15)), started_tx, release_rx));
    c.source().reply(Reply::Items(items(200, 15)));

    let more = {
        let c = c.clone();
        tokio::spawn(async move { c.load_next_page().await })
    };
    started_rx.await.unwrap();

    assert_eq!(c.refresh("q".into()).await, LoadOutcome::Loaded { count: 15 });
    release_tx.send(()).unwrap();
    assert_eq!(more.await.unwrap(), LoadOutcome::Stale);

    let state = c.snapshot();
    assert_eq!(state.items, items(200, 15));
    assert_eq!(state.next_page, 2);
    assert_eq!(state.phase, ListPhase::Loaded);
}

#[tokio::test]
async fn test_stale_failure_does_not_clear_newer_loading_flag() {
    let c = Arc::new(controller());
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let (started2_tx, started2_rx) = oneshot::channel();
    let (release2_tx, release2_rx) = oneshot::channel();
    c.source()
        .push(Scripted::gated(Reply::Fail("late"), started_tx, release_rx));
    c.source()
        .push(Scripted::gated(Reply::Items(items(0, 2)), started2_tx, release2_rx));

    let first = {
        let c = c.clone();
        tokio::spawn(async move { c.load_first_page("a".into()).await })
    };
    started_rx.await.unwrap();
    let second = {
        let c = c.clone();
        tokio::spawn(async move { c.refresh("b".into()).await })
    };
    started2_rx.await.unwrap();

    release_tx.send(()).unwrap();
    assert_eq!(first.await.unwrap(), LoadOutcome::Stale);
    let state = c.snapshot();
    assert!(state.is_refreshing());
    assert!(state.last_error.is_none());
    assert!(!state.initial_load_completed);

    release2_tx.send(()).unwrap();
    assert_eq!(second.await.unwrap(), LoadOutcome::Loaded { count: 2 });
    assert!(c.snapshot().initial_load_completed);
}

#[tokio::test]
async fn test_next_page_after_failed_query_change_continues_previous_query() {
    let c = controller();
    c.source().reply(Reply::Items(items(0, 15)));
    c.source().reply(Reply::Fail("offline"));
    c.source().reply(Reply::Items(items(15, 15)));

    c.load_first_page("shoes".into()).await;
    assert!(matches!(
        c.apply_query("hats".into()).await,
        LoadOutcome::Failed { .. }
    ));
    assert_eq!(c.snapshot().query.as_deref(), Some("shoes"));
    assert!(c.snapshot().pending_query.is_none());

    assert_eq!(c.load_next_page().await, LoadOutcome::Loaded { count: 15 });
    assert_eq!(c.source().calls()[2], ("shoes".to_string(), 2));
    assert_eq!(c.snapshot().items, items(0, 30));
}
