use companion_backend::services::conversation::Author;
use companion_backend::services::metrics_manager::MetricsManager;
use companion_backend::services::responder::Responder;
use companion_backend::services::session_manager::SessionManager;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::time::sleep;

fn manager(reply_delay: Duration, ttl: Duration) -> (SessionManager, MetricsManager) {
    let metrics = MetricsManager::new();
    let mgr = SessionManager::new(
        Responder::with_default_rules().unwrap(),
        metrics.clone(),
        StdRng::seed_from_u64(3),
        reply_delay,
        ttl,
    );
    (mgr, metrics)
}

#[tokio::test(start_paused = true)]
async fn test_session_expiration() {
    let (mgr, _) = manager(Duration::from_millis(1500), Duration::from_millis(10));
    let sid = mgr.create_session("Jo").await;

    // Wait for expiration
    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(
        !mgr.remove_session(sid).await,
        "Session should already be gone"
    );
    assert_eq!(mgr.len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_active_session_survives_purge() {
    let (mgr, _) = manager(Duration::from_millis(5), Duration::from_millis(100));
    let sid = mgr.create_session("Jo").await;

    sleep(Duration::from_millis(60)).await;
    mgr.submit(sid, "still here").await.unwrap();
    sleep(Duration::from_millis(60)).await;

    assert_eq!(mgr.purge_expired().await, 0);
    assert_eq!(mgr.len().await, 1);
    assert!(mgr.transcript(sid).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_each_submission_gets_its_own_reply() {
    let (mgr, metrics) = manager(Duration::from_millis(1500), Duration::from_secs(60));
    let sid = mgr.create_session("Jo").await;

    let first = mgr.submit(sid, "I feel down").await.unwrap();
    sleep(Duration::from_millis(500)).await;
    // not blocked while a reply is still pending
    let second = mgr.submit(sid, "and so tired").await.unwrap();
    assert!(first.accepted && second.accepted);

    // first reply landed, second still owed
    sleep(Duration::from_millis(1200)).await;
    let mid = mgr.transcript(sid).await.unwrap();
    assert_eq!(mid.messages.len(), 4);
    assert!(mid.composing);

    sleep(Duration::from_millis(1000)).await;
    let done = mgr.transcript(sid).await.unwrap();
    let authors: Vec<Author> = done.messages.iter().map(|m| m.author).collect();
    assert_eq!(
        authors,
        [
            Author::Assistant,
            Author::User,
            Author::User,
            Author::Assistant,
            Author::Assistant
        ]
    );
    assert!(!done.composing);

    let data = metrics.get_metrics().await;
    assert_eq!(data.rule_hits.get("sad"), Some(&1));
    assert_eq!(data.rule_hits.get("tired"), Some(&1));
    assert_eq!(data.accepted_messages, 2);
}

#[tokio::test(start_paused = true)]
async fn test_removed_session_is_not_resurrected() {
    let (mgr, metrics) = manager(Duration::from_millis(1500), Duration::from_secs(60));
    let sid = mgr.create_session("Jo").await;
    mgr.submit(sid, "help me").await.unwrap();
    assert!(mgr.remove_session(sid).await);

    sleep(Duration::from_secs(3)).await;
    assert!(mgr.transcript(sid).await.is_none());
    assert_eq!(mgr.len().await, 0);
    assert!(metrics.get_metrics().await.rule_hits.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_keeps_greeting_and_accepts_new_input() {
    let (mgr, _) = manager(Duration::from_millis(1500), Duration::from_secs(60));
    let sid = mgr.create_session("Jo").await;
    mgr.submit(sid, "I'm worried").await.unwrap();

    let reset = mgr.reset_session(sid).await.unwrap();
    assert_eq!(reset.messages.len(), 1);
    assert!(reset.messages[0].text.contains("Jo"));

    mgr.submit(sid, "feeling great now").await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let history = mgr.transcript(sid).await.unwrap();
    assert_eq!(history.messages.len(), 3);
    assert_eq!(history.messages[1].text, "feeling great now");
    assert!(!history.composing);
}

#[tokio::test(start_paused = true)]
async fn test_expired_session_drops_pending_reply() {
    let (mgr, metrics) = manager(Duration::from_millis(1500), Duration::from_millis(10));
    let sid = mgr.create_session("Jo").await;
    mgr.submit(sid, "help").await.unwrap();

    sleep(Duration::from_millis(20)).await;
    assert_eq!(mgr.purge_expired().await, 1);

    // the reply timer would have fired by now
    sleep(Duration::from_secs(3)).await;
    assert!(mgr.transcript(sid).await.is_none());
    assert!(metrics.get_metrics().await.rule_hits.is_empty());
}
