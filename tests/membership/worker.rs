use std::{sync::Arc, time::Duration};

use sparse_bridge::membership::{
    Event, EventIngress, MembershipSyncHandler, MembershipSyncWorker,
};

use crate::{HangingService, RecordingService, membership_event, toggle};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_drains_queue_before_stopping() {
    let service = Arc::new(RecordingService::default());
    let handler = Arc::new(MembershipSyncHandler::new(service.clone()));
    let (ingress, event_rx) = EventIngress::channel(8);
    let worker = tokio::spawn(MembershipSyncWorker::new(handler, event_rx, 4).run());

    for index in 0..5 {
        ingress
            .send(membership_event(&format!("g-site{index}-viewers"), "alice"))
            .await
            .expect("send should succeed");
    }
    ingress
        .send(Event::new("unrelated/topic"))
        .await
        .expect("send should succeed");
    ingress.close();

    let dispatched = worker.await.expect("worker should finish");
    assert_eq!(dispatched, 6);

    let mut toggles = service.toggles();
    toggles.sort();
    let expected: Vec<_> = (0..5)
        .map(|index| toggle(&format!("site{index}"), "alice"))
        .collect();
    assert_eq!(toggles, expected);
}

#[tokio::test]
async fn failing_service_does_not_stop_the_worker() {
    let service = Arc::new(RecordingService::failing());
    let handler = Arc::new(MembershipSyncHandler::new(service.clone()));
    let (ingress, event_rx) = EventIngress::channel(4);
    let worker = tokio::spawn(MembershipSyncWorker::new(handler, event_rx, 4).run());

    ingress
        .send(membership_event("g-a-collaborators", "alice"))
        .await
        .expect("send should succeed");
    ingress
        .send(membership_event("g-b-collaborators", "bob"))
        .await
        .expect("send should succeed");
    drop(ingress);

    assert_eq!(worker.await.expect("worker should finish"), 2);
    assert_eq!(service.toggles().len(), 2);
}

#[tokio::test]
async fn stalled_service_pushes_back_on_senders() {
    let service = Arc::new(HangingService::default());
    let handler = Arc::new(MembershipSyncHandler::new(service.clone()));
    let (ingress, event_rx) = EventIngress::channel(1);
    let worker = tokio::spawn(MembershipSyncWorker::new(handler, event_rx, 2).run());

    // Two deliveries hang, one event waits for a slot and one sits in the queue.
    let mut accepted = 0;
    for index in 0..20 {
        let event = membership_event(&format!("g-site{index}-viewers"), "alice");
        match tokio::time::timeout(Duration::from_millis(200), ingress.send(event)).await {
            Ok(sent) => {
                sent.expect("send should succeed");
                accepted += 1;
            }
            Err(_) => break,
        }
    }

    assert_eq!(accepted, 4);
    assert_eq!(service.started(), 2);

    worker.abort();
}
