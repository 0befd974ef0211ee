use sparse_bridge::membership::{EventIngress, IngressErrorKind};

use crate::membership_event;

#[tokio::test]
async fn closed_ingress_rejects_new_events() {
    let (ingress, mut event_rx) = EventIngress::channel(4);
    let sender = ingress.clone();

    sender
        .send(membership_event("g-a-viewers", "alice"))
        .await
        .expect("open ingress should accept");
    ingress.close();

    assert!(!sender.is_open(), "clones share the sender");
    let err = sender
        .send(membership_event("g-b-viewers", "alice"))
        .await
        .expect_err("closed ingress should reject");
    assert_eq!(err.kind, IngressErrorKind::Closed);

    let queued = event_rx.recv().await.expect("accepted event stays queued");
    assert_eq!(queued, membership_event("g-a-viewers", "alice"));
}

#[tokio::test]
async fn dropped_receiver_is_reported() {
    let (ingress, event_rx) = EventIngress::channel(1);
    drop(event_rx);

    let err = ingress
        .send(membership_event("g-a-viewers", "alice"))
        .await
        .expect_err("send without receiver should fail");
    assert_eq!(err.kind, IngressErrorKind::QueueClosed);
}

#[tokio::test]
async fn closing_ends_the_channel_for_the_receiver() {
    let (ingress, mut event_rx) = EventIngress::channel(2);
    let _kept_clone = ingress.clone();

    ingress
        .send(membership_event("g-a-viewers", "alice"))
        .await
        .expect("open ingress should accept");
    ingress.close();

    assert!(event_rx.recv().await.is_some());
    assert!(event_rx.recv().await.is_none(), "live clones no longer hold a sender");
}
