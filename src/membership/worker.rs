use std::sync::Arc;

use tokio::{
    sync::{Semaphore, mpsc},
    task::JoinSet,
};

use crate::membership::{handler::MembershipSyncHandler, types::Event};

/// Drains the event channel, handing every event to the handler on its own
/// task. Deliveries are independent and may complete in any order.
///
/// At most `max_in_flight` deliveries run at once. While every slot is taken
/// the worker stops receiving, so the bounded channel fills and
/// `EventIngress::send` waits.
pub struct MembershipSyncWorker {
    handler: Arc<MembershipSyncHandler>,
    event_rx: mpsc::Receiver<Event>,
    slots: Arc<Semaphore>,
}

impl MembershipSyncWorker {
    pub fn new(
        handler: Arc<MembershipSyncHandler>,
        event_rx: mpsc::Receiver<Event>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            handler,
            event_rx,
            slots: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Runs until every sender is dropped, then waits for in-flight
    /// deliveries. Returns the number of events dispatched.
    #[tracing::instrument(name = "membership_worker_run", target = "membership", skip(self))]
    pub async fn run(mut self) -> u64 {
        let mut in_flight = JoinSet::new();
        let mut dispatched = 0u64;

        while let Some(event) = self.event_rx.recv().await {
            // The semaphore is never closed.
            let Ok(slot) = Arc::clone(&self.slots).acquire_owned().await else {
                break;
            };
            let handler = Arc::clone(&self.handler);
            in_flight.spawn(async move {
                let _slot = slot;
                handler.handle(&event).await
            });
            dispatched = dispatched.saturating_add(1);

            while let Some(finished) = in_flight.try_join_next() {
                log_join_failure(finished);
            }
        }

        while let Some(finished) = in_flight.join_next().await {
            log_join_failure(finished);
        }

        tracing::debug!(target: "membership", dispatched, "membership_worker_stopped");
        dispatched
    }
}

fn log_join_failure(finished: Result<(), tokio::task::JoinError>) {
    if let Err(err) = finished {
        tracing::warn!(target: "membership", error = %err, "membership_delivery_aborted");
    }
}
